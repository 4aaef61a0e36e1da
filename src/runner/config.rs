//! # Runner configuration.
//!
//! Provides [`RunnerConfig`], the settings of a [`TaskRunner`](crate::TaskRunner).
//!
//! ## Sentinel values
//! - `retry_interval = 0s` → no sleep between passes, only a cooperative yield
//! - `max_pending = 0` → unbounded run queue

use std::time::Duration;

/// Configuration for the task runner.
///
/// ## Field semantics
/// - `retry_interval`: pause between passes while deferred work remains (`0s` = yield only)
/// - `max_pending`: admission limit for `enqueue` (`0` = unlimited)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
///
/// ## Notes
/// All fields are public. Prefer the accessors to avoid sprinkling sentinel checks.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// How long the async drain loop waits after a pass that left deferred tasks.
    ///
    /// An enqueue wakes the loop early.
    pub retry_interval: Duration,

    /// Maximum number of pending tasks accepted by `enqueue`.
    ///
    /// Deferred tasks are always re-queued, even above the limit.
    pub max_pending: usize,

    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
}

impl RunnerConfig {
    /// Returns the inter-pass delay, or `None` for yield-only.
    #[inline]
    pub fn retry_delay(&self) -> Option<Duration> {
        if self.retry_interval == Duration::ZERO {
            None
        } else {
            Some(self.retry_interval)
        }
    }

    /// Returns the admission limit, or `None` for an unbounded queue.
    #[inline]
    pub fn pending_limit(&self) -> Option<usize> {
        if self.max_pending == 0 {
            None
        } else {
            Some(self.max_pending)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for RunnerConfig {
    /// Default configuration:
    ///
    /// - `retry_interval = 10ms`
    /// - `max_pending = 0` (unbounded)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            retry_interval: Duration::from_millis(10),
            max_pending: 0,
            bus_capacity: 1024,
        }
    }
}
