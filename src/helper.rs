//! Delay Scheduler
//!
//! The [`DelayHelper`] spawns a task onto a tokio runtime after a delay. One
//! shared instance exists per process, reachable through
//! [`DelayHelper::shared`]; embedders that want private instances (tests,
//! multi-runtime hosts) construct their own with [`DelayHelper::new`].
//!
//! # Design Philosophy
//!
//! The helper captures a runtime [`Handle`] at construction, so scheduling
//! works from any thread, not just runtime threads. Tasks count as "pending"
//! while they wait out their delay; an optional cap on that count lets an
//! application bound how much deferred work can pile up.
//!
//! # Shared Instance
//!
//! The shared instance is created lazily, on the first [`DelayHelper::shared`]
//! call made from inside a tokio runtime. Initialization is race-safe: one
//! caller wins, everyone else observes the identical instance for the rest of
//! the process lifetime. A call made outside any runtime fails with
//! [`DelayError::SingletonUnavailable`] and leaves the slot empty, so a later
//! correctly placed call still succeeds.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::DelayConfig;

// =============================================================================
// Time Units
// =============================================================================

/// Unit for a delay amount
///
/// Mirrors the usual coarse scheduling units. [`TimeUnit::Seconds`] is the
/// default unit wherever one is not given explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Milliseconds
    Millis,
    /// Seconds (default)
    #[default]
    Seconds,
    /// Minutes
    Minutes,
    /// Hours
    Hours,
}

impl TimeUnit {
    /// Convert an amount in this unit to a [`Duration`]
    ///
    /// Saturates instead of overflowing for absurdly large amounts.
    #[must_use]
    pub fn to_duration(self, amount: u64) -> Duration {
        match self {
            Self::Millis => Duration::from_millis(amount),
            Self::Seconds => Duration::from_secs(amount),
            Self::Minutes => Duration::from_secs(amount.saturating_mul(60)),
            Self::Hours => Duration::from_secs(amount.saturating_mul(3600)),
        }
    }

    /// Parse a unit from a string (for configuration)
    ///
    /// Unknown strings fall back to [`TimeUnit::Seconds`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ms" | "milli" | "millis" | "milliseconds" => Self::Millis,
            "s" | "sec" | "secs" | "seconds" => Self::Seconds,
            "m" | "min" | "mins" | "minutes" => Self::Minutes,
            "h" | "hour" | "hours" => Self::Hours,
            _ => Self::Seconds,
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Millis => "millis",
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors from the delay scheduler
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DelayError {
    /// The shared instance could not be constructed
    ///
    /// Raised only when no tokio runtime is available to capture. The shared
    /// slot stays empty, so a later call from inside a runtime succeeds.
    #[error("shared delay helper unavailable: no tokio runtime to capture")]
    SingletonUnavailable,

    /// Too many tasks are waiting out their delay
    #[error("too many pending delayed tasks: {current} (limit: {limit})")]
    TooManyPending {
        /// The configured limit
        limit: usize,
        /// Current pending task count
        current: usize,
    },
}

// =============================================================================
// Pending-task accounting
// =============================================================================

/// Counts a task as pending until dropped
///
/// Moved into the spawned future and dropped once the delay has elapsed, so
/// aborted tasks release their slot when the future is dropped mid-sleep.
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// =============================================================================
// DelayHelper
// =============================================================================

/// Schedules tasks to run after a delay
///
/// Cheap to share behind an [`Arc`]; all methods take `&self`.
#[derive(Debug)]
pub struct DelayHelper {
    /// Runtime the delayed tasks are spawned onto
    handle: Handle,
    /// Tasks currently waiting out their delay
    pending: Arc<AtomicUsize>,
    /// Maximum pending tasks enforced by [`DelayHelper::try_launch`] (0 = unlimited)
    max_pending: usize,
    /// Unit assumed by [`DelayHelper::delay_task_default`]
    default_unit: TimeUnit,
}

/// Process-wide shared instance
static SHARED: OnceLock<Arc<DelayHelper>> = OnceLock::new();

impl DelayHelper {
    /// Create a helper with default configuration
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self::with_config(handle, DelayConfig::default())
    }

    /// Create a helper with explicit configuration
    #[must_use]
    pub fn with_config(handle: Handle, config: DelayConfig) -> Self {
        Self {
            handle,
            pending: Arc::new(AtomicUsize::new(0)),
            max_pending: config.max_pending,
            default_unit: config.default_unit,
        }
    }

    /// Get the process-wide shared instance
    ///
    /// Every successful call returns a handle to the identical underlying
    /// instance. The first successful call constructs it, capturing the
    /// current tokio runtime and reading [`DelayConfig::from_env`].
    ///
    /// # Errors
    ///
    /// [`DelayError::SingletonUnavailable`] if the instance has not been
    /// constructed yet and this call was made outside a tokio runtime.
    pub fn shared() -> Result<Arc<Self>, DelayError> {
        if let Some(shared) = SHARED.get() {
            return Ok(Arc::clone(shared));
        }
        let handle = Handle::try_current().map_err(|_| DelayError::SingletonUnavailable)?;
        let shared = SHARED.get_or_init(|| {
            tracing::info!("Constructing shared delay helper");
            Arc::new(Self::with_config(handle, DelayConfig::from_env()))
        });
        Ok(Arc::clone(shared))
    }

    /// Spawn `task` onto the captured runtime once `delay` has elapsed
    ///
    /// Returns the [`JoinHandle`] of the spawned wrapper. Dropping the handle
    /// detaches the task; aborting it during the delay releases its pending
    /// slot without running the task.
    pub fn launch<F>(&self, delay: Duration, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let guard = PendingGuard::enter(Arc::clone(&self.pending));
        tracing::debug!(
            delay_ms = delay.as_millis() as u64,
            pending = self.pending_count(),
            "Delayed task scheduled"
        );
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            drop(guard);
            tracing::trace!("Delayed task firing");
            task.await
        })
    }

    /// As [`DelayHelper::launch`], but enforce the pending-task cap
    ///
    /// # Errors
    ///
    /// [`DelayError::TooManyPending`] if the configured cap (when non-zero)
    /// is already reached.
    pub fn try_launch<F>(&self, delay: Duration, task: F) -> Result<JoinHandle<F::Output>, DelayError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if self.max_pending > 0 {
            let current = self.pending_count();
            if current >= self.max_pending {
                return Err(DelayError::TooManyPending {
                    limit: self.max_pending,
                    current,
                });
            }
        }
        Ok(self.launch(delay, task))
    }

    /// Run a closure after `time` in the given unit
    pub fn delay_task<T>(&self, task: T, time: u64, unit: TimeUnit) -> JoinHandle<()>
    where
        T: FnOnce() + Send + 'static,
    {
        self.launch(unit.to_duration(time), async move { task() })
    }

    /// Run a closure after `time` in the configured default unit
    ///
    /// The default unit is seconds unless configured otherwise.
    pub fn delay_task_default<T>(&self, task: T, time: u64) -> JoinHandle<()>
    where
        T: FnOnce() + Send + 'static,
    {
        self.delay_task(task, time, self.default_unit)
    }

    /// Number of tasks currently waiting out their delay
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// The configured pending-task cap (0 = unlimited)
    #[must_use]
    pub fn max_pending(&self) -> usize {
        self.max_pending
    }

    /// The unit assumed by [`DelayHelper::delay_task_default`]
    #[must_use]
    pub fn default_unit(&self) -> TimeUnit {
        self.default_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn test_time_unit_to_duration() {
        assert_eq!(TimeUnit::Millis.to_duration(1500), Duration::from_millis(1500));
        assert_eq!(TimeUnit::Seconds.to_duration(2), Duration::from_secs(2));
        assert_eq!(TimeUnit::Minutes.to_duration(3), Duration::from_secs(180));
        assert_eq!(TimeUnit::Hours.to_duration(1), Duration::from_secs(3600));
    }

    #[test]
    fn test_time_unit_saturates() {
        assert_eq!(
            TimeUnit::Hours.to_duration(u64::MAX),
            Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn test_time_unit_parse() {
        assert_eq!(TimeUnit::parse("ms"), TimeUnit::Millis);
        assert_eq!(TimeUnit::parse("SECONDS"), TimeUnit::Seconds);
        assert_eq!(TimeUnit::parse("  min  "), TimeUnit::Minutes);
        assert_eq!(TimeUnit::parse("hours"), TimeUnit::Hours);
        assert_eq!(TimeUnit::parse("fortnights"), TimeUnit::Seconds);
    }

    #[test]
    fn test_time_unit_default_is_seconds() {
        assert_eq!(TimeUnit::default(), TimeUnit::Seconds);
    }

    #[tokio::test]
    async fn test_launch_waits_out_the_delay() {
        let helper = DelayHelper::new(Handle::current());
        let fired = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&fired);
        let handle = helper.launch(Duration::from_millis(50), async move {
            flag.store(true, Ordering::SeqCst);
        });

        // Still inside the delay window.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!fired.load(Ordering::SeqCst));
        assert_eq!(helper.pending_count(), 1);

        handle.await.unwrap();
        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(helper.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_delay_fires_immediately() {
        let helper = DelayHelper::new(Handle::current());
        let handle = helper.launch(Duration::ZERO, async { 7 });
        assert_eq!(handle.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_delay_task_runs_closure() {
        let helper = DelayHelper::new(Handle::current());
        let fired = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&fired);
        let handle = helper.delay_task(
            move || flag.store(true, Ordering::SeqCst),
            20,
            TimeUnit::Millis,
        );

        handle.await.unwrap();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_try_launch_enforces_cap() {
        let config = DelayConfig::default().with_max_pending(1);
        let helper = DelayHelper::with_config(Handle::current(), config);

        let first = helper
            .try_launch(Duration::from_secs(60), async {})
            .expect("first task fits under the cap");

        let second = helper.try_launch(Duration::from_secs(60), async {});
        assert_eq!(
            second.err(),
            Some(DelayError::TooManyPending {
                limit: 1,
                current: 1
            })
        );

        first.abort();
    }

    #[tokio::test]
    async fn test_aborted_task_releases_pending_slot() {
        let helper = DelayHelper::new(Handle::current());

        let handle = helper.launch(Duration::from_secs(60), async {});
        assert_eq!(helper.pending_count(), 1);

        handle.abort();
        // Abort is asynchronous; give the runtime a moment to drop the future.
        for _ in 0..50 {
            if helper.pending_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(helper.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_unlimited_cap_accepts_everything() {
        let helper = DelayHelper::new(Handle::current());
        let mut handles = Vec::new();
        for _ in 0..32 {
            handles.push(
                helper
                    .try_launch(Duration::from_millis(1), async {})
                    .expect("no cap configured"),
            );
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(helper.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_default_unit_comes_from_config() {
        let config = DelayConfig::default().with_default_unit(TimeUnit::Millis);
        let helper = DelayHelper::with_config(Handle::current(), config);
        assert_eq!(helper.default_unit(), TimeUnit::Millis);

        // With millis as the default unit this completes quickly.
        let handle = helper.delay_task_default(|| {}, 5);
        handle.await.unwrap();
    }
}
