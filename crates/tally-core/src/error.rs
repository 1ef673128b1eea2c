//! Error types for tally-core.
//!
//! The counting and density functions are total and never fail. Errors only
//! come from loading configuration and from starting the scheduler outside a
//! Tokio runtime.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur when scheduling debounced updates.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The scheduler needs a Tokio runtime to drive its timer.
    #[error("no Tokio runtime available to run the debounce timer")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Result type alias using [`SchedulerError`].
pub type SchedulerResult<T> = Result<T, SchedulerError>;
