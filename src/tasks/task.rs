//! # Task abstraction consumed by the run queue.
//!
//! This module defines the [`Task`] trait (synchronous, re-runnable) and its outcome [`RunResult`].
//! The queue stores tasks as [`TaskHandle`], a `Box<dyn Task>`, so tasks with different
//! result types can share one queue.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter used to synthesize names for unnamed tasks.
static TASK_SEQ: AtomicU64 = AtomicU64::new(1);

/// Outcome of a single [`Task::run`] call.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    /// The task finished; its completion (if any) has been written or abandoned.
    /// It must not be run again.
    Done,
    /// The task is not finished and must be re-enqueued as is.
    Deferred,
}

impl RunResult {
    /// `true` for [`RunResult::Done`].
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, RunResult::Done)
    }
}

/// # Re-runnable unit of deferred work.
///
/// A `Task` has a human-readable [`name`](Task::name) and a [`run`](Task::run) method that
/// performs one bounded attempt. Instead of blocking while waiting on some external state,
/// `run` returns [`RunResult::Deferred`] and the runner calls it again on a later pass.
///
/// `run` takes `&mut self`: a task is owned by exactly one queue slot or worker at a time,
/// so it is never run concurrently with itself.
///
/// # Example
/// ```
/// use deferq::{RunResult, Task};
///
/// struct Countdown(u32);
///
/// impl Task for Countdown {
///     fn name(&self) -> &str { "countdown" }
///
///     fn run(&mut self) -> RunResult {
///         if self.0 == 0 {
///             return RunResult::Done;
///         }
///         self.0 -= 1;
///         RunResult::Deferred
///     }
/// }
///
/// let mut t = Countdown(1);
/// assert_eq!(t.run(), RunResult::Deferred);
/// assert_eq!(t.run(), RunResult::Done);
/// ```
pub trait Task: Send + 'static {
    /// Returns the task name. Used for logging only; not guaranteed unique.
    fn name(&self) -> &str;

    /// Performs one attempt.
    ///
    /// Implementations must not block and must not let failures escape:
    /// failures are reported through the task's own completion handle.
    ///
    /// # Panics
    /// The runner does not isolate custom tasks: a panic here propagates out of
    /// `TaskRunner::drive_one`. [`NamedTask`](crate::NamedTask) and
    /// [`TaskWithAttempts`](crate::TaskWithAttempts) catch panics from their work.
    fn run(&mut self) -> RunResult;
}

/// Owned, type-erased task as stored in the run queue.
pub type TaskHandle = Box<dyn Task>;

/// Returns a fresh diagnostic name (`task#<n>`).
///
/// Unique within the process only; not stable across runs.
pub(crate) fn next_task_name() -> String {
    format!("task#{}", TASK_SEQ.fetch_add(1, Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_do_not_repeat() {
        let a = next_task_name();
        let b = next_task_name();
        assert_ne!(a, b);
        assert!(a.starts_with("task#"));
    }
}
