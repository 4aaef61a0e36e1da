//! Error types used by deferq tasks, completion handles and the runner.
//!
//! This module defines four error enums:
//!
//! - [`TaskError`]: failures raised by a unit of work while a task runs.
//! - [`CompletionError`]: what a [`Completion`](crate::Completion) reader observes instead of a value.
//! - [`RunnerError`]: admission failures returned by [`TaskRunner::enqueue`](crate::TaskRunner::enqueue).
//! - [`BindError`]: misuse of [`NamedTask::bind`](crate::NamedTask::bind).
//!
//! All of them provide `as_label` (stable snake_case label) for logs/metrics.

use std::any::Any;

use thiserror::Error;

/// # Errors produced by a unit of work.
///
/// A task catches these at its `run` boundary and hands them to the bound
/// completion reader; they never propagate into the runner.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The unit of work reported a failure.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The unit of work panicked; the panic was caught at the task boundary.
    #[error("unit of work panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// The unit of work observed an external cancellation request.
    #[error("context cancelled")]
    Canceled,
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use deferq::TaskError;
    ///
    /// let err = TaskError::fail("driver busy");
    /// assert_eq!(err.to_string(), "execution failed: driver busy");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
            TaskError::Canceled => "context cancelled".to_string(),
        }
    }

    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        TaskError::Panicked {
            info: panic_info(payload),
        }
    }
}

impl From<String> for TaskError {
    fn from(error: String) -> Self {
        TaskError::Fail { error }
    }
}

impl From<&str> for TaskError {
    fn from(error: &str) -> Self {
        TaskError::fail(error)
    }
}

/// # Errors observed by a completion reader.
///
/// Callers can tell "the work actively failed" ([`CompletionError::Failed`])
/// from "nobody will ever deliver a result" ([`CompletionError::Abandoned`]).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The unit of work finished with an error.
    #[error("task failed: {0}")]
    Failed(#[from] TaskError),

    /// The writer half was dropped without a result.
    ///
    /// Happens when a bounded-retry task exhausts its attempts, when the task
    /// is rejected by or dropped from the runner, or when it is dropped unrun.
    #[error("completion abandoned before a result was delivered")]
    Abandoned,
}

impl CompletionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use deferq::{CompletionError, TaskError};
    ///
    /// assert_eq!(CompletionError::Abandoned.as_label(), "completion_abandoned");
    /// assert_eq!(CompletionError::Failed(TaskError::Canceled).as_label(), "task_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CompletionError::Failed(e) => e.as_label(),
            CompletionError::Abandoned => "completion_abandoned",
        }
    }

    /// `true` if the writer half went away without delivering anything.
    pub fn is_abandoned(&self) -> bool {
        matches!(self, CompletionError::Abandoned)
    }

    /// Returns the task failure, if this is one.
    pub fn task_error(&self) -> Option<&TaskError> {
        match self {
            CompletionError::Failed(e) => Some(e),
            CompletionError::Abandoned => None,
        }
    }
}

/// # Errors returned when the runner refuses a task.
///
/// The refused task is dropped, so its completion reader observes
/// [`CompletionError::Abandoned`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    /// The runner was stopped; no new work is admitted.
    #[error("runner stopped; task {task:?} rejected")]
    Stopped {
        /// Name of the rejected task.
        task: String,
    },

    /// The run queue already holds `capacity` pending tasks.
    #[error("run queue full ({capacity} pending); task {task:?} rejected")]
    QueueFull {
        /// Name of the rejected task.
        task: String,
        /// Configured pending limit.
        capacity: usize,
    },
}

impl RunnerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunnerError::Stopped { .. } => "runner_stopped",
            RunnerError::QueueFull { .. } => "runner_queue_full",
        }
    }
}

/// # Task wiring misuse.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A completion writer is already attached to this task.
    #[error("task {task:?} already has a completion bound")]
    AlreadyBound {
        /// Name of the task.
        task: String,
    },
}

impl BindError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BindError::AlreadyBound { .. } => "bind_already_bound",
        }
    }
}

/// Renders a panic payload the way `std` would print it.
pub(crate) fn panic_info(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
