//! Debounced update scheduling.
//!
//! Text-change events arrive in bursts while someone types. The scheduler
//! waits for a quiet period after the most recent event before running the
//! analysis, so a burst of N edits produces exactly one computation over the
//! last text. Each new event cancels the timer of the previous one.
//!
//! ```text
//!   text_changed ──► Pending ──(quiet period elapses)──► Settled ──► Idle
//!        ▲              │
//!        └──────────────┘ (new event: cancel and restart the timer)
//! ```
//!
//! Toggling a session flag skips the debounce and redraws the density view
//! right away from the last text seen.
//!
//! Timers run on Tokio. The scheduler captures a runtime handle when it is
//! created, so its methods can be called from synchronous code.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::config::Config;
use crate::density::{DisplayState, build_display_state, present};
use crate::error::SchedulerResult;
use crate::frequency::compute_frequencies;
use crate::metrics::{Metrics, compute_metrics};
use crate::session::SessionFlags;

/// Quiet period used when none is configured.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(400);

/// Where the scheduler is in its cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    /// Nothing scheduled.
    #[default]
    Idle,
    /// Waiting for the quiet period to elapse.
    Pending,
    /// Computing and delivering a result.
    Settled,
}

/// A result delivered to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Update {
    /// The settled text was empty after trimming.
    Empty,
    /// Full recomputation after a quiet period.
    Settled {
        /// Counts over the raw text.
        metrics: Metrics,
        /// Density view over the trimmed text.
        display: DisplayState,
    },
    /// Density view redrawn after a flag toggle. Metrics are unchanged.
    Redisplay {
        /// Density view over the last text seen.
        display: DisplayState,
        /// Flags after the toggle.
        flags: SessionFlags,
    },
}

/// Settings that shape each computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Delay after the last event before computing.
    pub quiet_period: Duration,
    /// Whether the character count skips whitespace.
    pub exclude_whitespace: bool,
    /// Initial session flags.
    pub flags: SessionFlags,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            exclude_whitespace: false,
            flags: SessionFlags::default(),
        }
    }
}

impl From<&Config> for SchedulerOptions {
    fn from(config: &Config) -> Self {
        Self {
            quiet_period: Duration::from_millis(config.quiet_period_ms),
            exclude_whitespace: config.exclude_spaces,
            flags: config.session_flags(),
        }
    }
}

/// Run the full pipeline for one settled text.
///
/// Metrics are computed over `text` as given; the density view over the
/// trimmed text.
pub fn settle(text: &str, exclude_whitespace: bool, show_all_letters: bool) -> Update {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Update::Empty;
    }
    Update::Settled {
        metrics: compute_metrics(text, exclude_whitespace),
        display: present(&compute_frequencies(trimmed), show_all_letters),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a single deferred computation from [`schedule_update`].
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<Mutex<bool>>,
    task: AbortHandle,
}

impl CancelHandle {
    /// Cancel the computation if it has not run yet.
    ///
    /// A cancelled computation never runs, not even partially. If it is
    /// already running, this waits for it to finish.
    pub fn cancel(&self) {
        let mut cancelled = lock(&self.cancelled);
        *cancelled = true;
        self.task.abort();
    }

    /// Whether [`CancelHandle::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        *lock(&self.cancelled)
    }

    /// Whether the computation ran or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Schedule one computation of `text` after `options.quiet_period`.
///
/// `on_settled` receives the result unless the returned handle is cancelled
/// first. Use [`UpdateScheduler`] to get cancel-and-restart behavior across
/// many events.
///
/// # Errors
///
/// Returns [`crate::SchedulerError::NoRuntime`] when called outside a Tokio
/// runtime.
pub fn schedule_update<F>(
    text: impl Into<String>,
    options: SchedulerOptions,
    on_settled: F,
) -> SchedulerResult<CancelHandle>
where
    F: FnOnce(Update) + Send + 'static,
{
    let runtime = Handle::try_current()?;
    let text = text.into();
    let cancelled = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&cancelled);

    let task = runtime.spawn(async move {
        tokio::time::sleep(options.quiet_period).await;
        let guard = lock(&flag);
        if *guard {
            return;
        }
        on_settled(settle(
            &text,
            options.exclude_whitespace,
            options.flags.show_all_letters,
        ));
        drop(guard);
    });

    Ok(CancelHandle {
        cancelled,
        task: task.abort_handle(),
    })
}

struct Shared {
    state: SchedulerState,
    /// Bumped on every event and on cancel; a timer only fires if its
    /// generation is still current.
    generation: u64,
    pending: Option<AbortHandle>,
    text: String,
    flags: SessionFlags,
    on_update: Box<dyn FnMut(Update) + Send>,
}

/// Debounces text-change events and delivers settled results.
///
/// The callback runs while the scheduler's internal lock is held, so it must
/// not call back into the scheduler.
pub struct UpdateScheduler {
    shared: Arc<Mutex<Shared>>,
    runtime: Handle,
    quiet_period: Duration,
    exclude_whitespace: bool,
}

impl std::fmt::Debug for UpdateScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = lock(&self.shared);
        f.debug_struct("UpdateScheduler")
            .field("state", &shared.state)
            .field("generation", &shared.generation)
            .field("flags", &shared.flags)
            .field("quiet_period", &self.quiet_period)
            .field("exclude_whitespace", &self.exclude_whitespace)
            .finish_non_exhaustive()
    }
}

impl UpdateScheduler {
    /// Create a scheduler on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SchedulerError::NoRuntime`] when called outside a
    /// Tokio runtime.
    pub fn new<F>(options: SchedulerOptions, on_update: F) -> SchedulerResult<Self>
    where
        F: FnMut(Update) + Send + 'static,
    {
        Ok(Self::with_runtime(Handle::try_current()?, options, on_update))
    }

    /// Create a scheduler whose timers run on `runtime`.
    pub fn with_runtime<F>(runtime: Handle, options: SchedulerOptions, on_update: F) -> Self
    where
        F: FnMut(Update) + Send + 'static,
    {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                state: SchedulerState::Idle,
                generation: 0,
                pending: None,
                text: String::new(),
                flags: options.flags,
                on_update: Box::new(on_update),
            })),
            runtime,
            quiet_period: options.quiet_period,
            exclude_whitespace: options.exclude_whitespace,
        }
    }

    /// Record a new text and restart the quiet-period timer.
    pub fn text_changed(&self, text: impl Into<String>) {
        let text = text.into();
        let text_len = text.len();

        let mut shared = lock(&self.shared);
        if let Some(previous) = shared.pending.take() {
            previous.abort();
            debug!(generation = shared.generation, "superseded pending update");
        }
        shared.generation += 1;
        shared.text = text;
        shared.state = SchedulerState::Pending;

        let task = self.runtime.spawn(settle_after(
            Arc::clone(&self.shared),
            shared.generation,
            self.quiet_period,
            self.exclude_whitespace,
        ));
        shared.pending = Some(task.abort_handle());
        debug!(
            generation = shared.generation,
            text_len,
            quiet_ms = self.quiet_period.as_millis() as u64,
            "update scheduled"
        );
    }

    /// Drop any pending update without computing it.
    pub fn cancel(&self) {
        let mut shared = lock(&self.shared);
        if let Some(pending) = shared.pending.take() {
            pending.abort();
            debug!(generation = shared.generation, "pending update cancelled");
        }
        shared.generation += 1;
        shared.state = SchedulerState::Idle;
    }

    /// Flip "show all letters" and redraw the density view immediately.
    ///
    /// Returns the new value.
    pub fn toggle_show_all_letters(&self) -> bool {
        let mut shared = lock(&self.shared);
        let show_all = shared.flags.toggle_show_all_letters();
        debug!(show_all, "show-all-letters toggled");
        redisplay(&mut shared);
        show_all
    }

    /// Flip the theme and redraw the density view immediately.
    ///
    /// Returns the new value of the light-theme flag.
    pub fn toggle_theme(&self) -> bool {
        let mut shared = lock(&self.shared);
        let theme = shared.flags.toggle_theme();
        debug!(%theme, "theme toggled");
        redisplay(&mut shared);
        shared.flags.light_theme
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        lock(&self.shared).state
    }

    /// Current session flags.
    pub fn flags(&self) -> SessionFlags {
        lock(&self.shared).flags
    }

    /// The last text passed to [`UpdateScheduler::text_changed`].
    pub fn text(&self) -> String {
        lock(&self.shared).text.clone()
    }
}

impl Drop for UpdateScheduler {
    fn drop(&mut self) {
        if let Some(pending) = lock(&self.shared).pending.take() {
            pending.abort();
        }
    }
}

fn redisplay(shared: &mut Shared) {
    let display = build_display_state(&shared.text, shared.flags.show_all_letters);
    let flags = shared.flags;
    (shared.on_update)(Update::Redisplay { display, flags });
}

async fn settle_after(
    shared: Arc<Mutex<Shared>>,
    generation: u64,
    quiet_period: Duration,
    exclude_whitespace: bool,
) {
    tokio::time::sleep(quiet_period).await;

    let mut guard = lock(&shared);
    if guard.generation != generation {
        return;
    }
    guard.state = SchedulerState::Settled;
    guard.pending = None;

    let update = settle(&guard.text, exclude_whitespace, guard.flags.show_all_letters);
    debug!(generation, empty = matches!(update, Update::Empty), "update settled");
    (guard.on_update)(update);
    guard.state = SchedulerState::Idle;
}
