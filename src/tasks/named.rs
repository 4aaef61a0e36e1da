//! # Closure-backed task (`NamedTask`)
//!
//! [`NamedTask`] wraps a unit of work `F: FnMut() -> O` (see [`Outcome`]) and an optional
//! [`Completer`]. Each [`Task::run`] calls the closure exactly once:
//!
//! ```text
//! run()
//!   ├─ not ready      ─► Deferred (completer untouched)
//!   ├─ ready(v)       ─► completer.succeed(v) ─► Done
//!   ├─ Err(e)         ─► completer.fail(e)    ─► Done
//!   └─ panic          ─► completer.fail(Panicked) ─► Done
//! ```
//!
//! Without a bound completer the result is discarded and the task is fire-and-forget.
//!
//! ## Example
//! ```rust
//! use deferq::{NamedTask, RunResult, Task};
//!
//! let mut polls = 0;
//! let mut t = NamedTask::new("gpu-ready", move || {
//!     polls += 1;
//!     (polls == 2).then_some("ready")
//! });
//! let (tx, rx) = deferq::channel();
//! t.bind(tx).unwrap();
//!
//! assert_eq!(t.run(), RunResult::Deferred);
//! assert_eq!(t.run(), RunResult::Done);
//! assert_eq!(rx.wait(), Ok("ready"));
//! ```

use std::borrow::Cow;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::task::Poll;

use crate::completion::Completer;
use crate::error::{BindError, TaskError};
use crate::tasks::outcome::Outcome;
use crate::tasks::task::{RunResult, Task, TaskHandle, next_task_name};

/// Closure-backed task with an optional completion writer.
pub struct NamedTask<F, T> {
    name: Cow<'static, str>,
    work: F,
    pub(super) completer: Option<Completer<T>>,
}

impl<F, O, T> NamedTask<F, T>
where
    F: FnMut() -> O,
    O: Outcome<Output = T>,
{
    /// Creates a task with the given diagnostic name.
    pub fn new(name: impl Into<Cow<'static, str>>, work: F) -> Self {
        Self {
            name: name.into(),
            work,
            completer: None,
        }
    }

    /// Creates a task with a generated name (`task#<n>`).
    pub fn unnamed(work: F) -> Self {
        Self::new(next_task_name(), work)
    }

    /// Runs the unit of work once and settles the completer when it is ready.
    pub(super) fn attempt(&mut self) -> RunResult {
        let outcome = catch_unwind(AssertUnwindSafe(|| (self.work)().into_poll()));
        let result = match outcome {
            Ok(Ok(Poll::Pending)) => return RunResult::Deferred,
            Ok(Ok(Poll::Ready(value))) => Ok(value),
            Ok(Err(err)) => {
                tracing::debug!(task = %self.name, error = %err, "unit of work failed");
                Err(err)
            }
            Err(payload) => {
                let err = TaskError::from_panic(payload.as_ref());
                tracing::warn!(task = %self.name, error = %err, "unit of work panicked");
                Err(err)
            }
        };
        if let Some(completer) = self.completer.take() {
            completer.complete(result);
        }
        RunResult::Done
    }
}

impl<F, T> NamedTask<F, T> {
    /// Attaches the completion writer that receives this task's result.
    ///
    /// At most one writer may be attached. A second call is rejected and the
    /// rejected writer is dropped, so its reader observes `Abandoned`.
    pub fn bind(&mut self, completer: Completer<T>) -> Result<(), BindError> {
        if self.completer.is_some() {
            return Err(BindError::AlreadyBound {
                task: self.name.to_string(),
            });
        }
        self.completer = Some(completer);
        Ok(())
    }

    /// `true` if a completion writer is attached.
    pub fn is_bound(&self) -> bool {
        self.completer.is_some()
    }

    /// Drops the writer without delivering a result.
    pub(super) fn abandon(&mut self) {
        self.completer = None;
    }

    pub(super) fn label(&self) -> &str {
        &self.name
    }
}

impl<F, O, T> NamedTask<F, T>
where
    F: FnMut() -> O + Send + 'static,
    O: Outcome<Output = T>,
    T: Send + 'static,
{
    /// Erases the task into a queueable [`TaskHandle`].
    pub fn boxed(self) -> TaskHandle {
        Box::new(self)
    }
}

impl<F, O, T> Task for NamedTask<F, T>
where
    F: FnMut() -> O + Send + 'static,
    O: Outcome<Output = T>,
    T: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self) -> RunResult {
        self.attempt()
    }
}

impl<F, T> std::fmt::Debug for NamedTask<F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedTask")
            .field("name", &self.name)
            .field("bound", &self.completer.is_some())
            .finish_non_exhaustive()
    }
}
