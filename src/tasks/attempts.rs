//! # Bounded-retry task (`TaskWithAttempts`)
//!
//! Wraps a [`NamedTask`] with an attempt budget. Every [`RunResult::Deferred`] from the
//! inner task consumes one attempt; when the budget reaches zero the completion writer
//! is dropped unwritten and the task reports [`RunResult::Done`].
//!
//! ```text
//! run()
//!   ├─ inner Done     ─► Done (budget untouched)
//!   └─ inner Deferred ─► remaining -= 1
//!                         ├─ remaining > 0 ─► Deferred
//!                         └─ remaining = 0 ─► abandon completer ─► Done
//! ```
//!
//! The reader of an exhausted task observes
//! [`CompletionError::Abandoned`](crate::CompletionError::Abandoned), never a value.

use std::borrow::Cow;

use crate::completion::Completer;
use crate::error::BindError;
use crate::tasks::named::NamedTask;
use crate::tasks::outcome::Outcome;
use crate::tasks::task::{RunResult, Task, TaskHandle};

/// Task that gives up after a fixed number of not-ready attempts.
pub struct TaskWithAttempts<F, T> {
    pub(super) inner: NamedTask<F, T>,
    remaining: u32,
}

impl<F, O, T> TaskWithAttempts<F, T>
where
    F: FnMut() -> O,
    O: Outcome<Output = T>,
{
    /// Creates a named task allowed to run at most `attempts` times.
    ///
    /// A budget of `0` is clamped to `1`.
    pub fn new(name: impl Into<Cow<'static, str>>, attempts: u32, work: F) -> Self {
        Self::wrap(NamedTask::new(name, work), attempts)
    }

    /// Creates an unnamed task allowed to run at most `attempts` times.
    pub fn unnamed(attempts: u32, work: F) -> Self {
        Self::wrap(NamedTask::unnamed(work), attempts)
    }
}

impl<F, T> TaskWithAttempts<F, T> {
    /// Puts an attempt budget on an existing task, keeping any bound completer.
    pub fn wrap(inner: NamedTask<F, T>, attempts: u32) -> Self {
        Self {
            inner,
            remaining: attempts.max(1),
        }
    }

    /// Attaches the completion writer. See [`NamedTask::bind`].
    pub fn bind(&mut self, completer: Completer<T>) -> Result<(), BindError> {
        self.inner.bind(completer)
    }

    /// `true` if a completion writer is still attached.
    pub fn is_bound(&self) -> bool {
        self.inner.is_bound()
    }

    /// Attempts left before the task gives up.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl<F, O, T> TaskWithAttempts<F, T>
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

impl<F, O, T> Task for TaskWithAttempts<F, T>
where
    F: FnMut() -> O + Send + 'static,
    O: Outcome<Output = T>,
    T: Send + 'static,
{
    fn name(&self) -> &str {
        self.inner.label()
    }

    fn run(&mut self) -> RunResult {
        if self.inner.attempt().is_done() {
            return RunResult::Done;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return RunResult::Deferred;
        }

        tracing::warn!(task = %self.inner.label(), "attempts exhausted; abandoning completion");
        self.inner.abandon();
        RunResult::Done
    }
}

impl<F, T> std::fmt::Debug for TaskWithAttempts<F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskWithAttempts")
            .field("inner", &self.inner)
            .field("remaining", &self.remaining)
            .finish()
    }
}
