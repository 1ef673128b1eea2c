//! Core library for tally.
//!
//! Counts characters, words, and sentences, estimates reading time, and
//! builds a ranked letter-density view of a text. A debounced scheduler
//! decides when a freshly typed text is analyzed.
//!
//! # Modules
//!
//! - [`metrics`] - Character, word, sentence counts and reading time
//! - [`frequency`] - Order-preserving letter frequency table
//! - [`density`] - Ranked, percentage-annotated density view
//! - [`scheduler`] - Debounced update delivery
//! - [`limit`] - Optional character limit
//! - [`session`] - Session toggle flags
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use tally_core::{build_display_state, compute_frequencies, compute_metrics};
//!
//! let metrics = compute_metrics("Hello world", true);
//! assert_eq!(metrics.char_count, 10);
//!
//! let table = compute_frequencies("Hello, HELLO!");
//! assert_eq!(table.get('L'), Some(4));
//! assert_eq!(table.total(), 10);
//!
//! let display = build_display_state("Hello, HELLO!", false);
//! assert_eq!(display.entries()[0].letter, 'L');
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod density;
pub mod error;
pub mod frequency;
pub mod limit;
pub mod metrics;
pub mod scheduler;
pub mod session;

pub use config::{Config, ConfigLoader, ConfigSources, DEFAULT_MAX_INPUT_BYTES, LogLevel};
pub use density::{DisplayState, RankedEntry, VISIBLE_LETTERS, build_display_state};
pub use error::{ConfigError, ConfigResult, SchedulerError, SchedulerResult};
pub use frequency::{FrequencyTable, compute_frequencies};
pub use limit::{CharLimit, LimitStatus, limit_status, would_exceed};
pub use metrics::{Metrics, WORDS_PER_MINUTE, compute_metrics};
pub use scheduler::{
    CancelHandle, SchedulerOptions, SchedulerState, Update, UpdateScheduler, schedule_update,
};
pub use session::{SessionFlags, Theme};
