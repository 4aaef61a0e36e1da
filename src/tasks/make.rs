//! # Task factories.
//!
//! Each factory builds the task, creates a completion channel, binds the writer and
//! returns the type-erased task together with the reader:
//!
//! ```text
//! make_task(work) ──► (TaskHandle, Completion<T>)
//!        │                 │            └─► caller awaits / waits
//!        │                 └─► TaskRunner::enqueue
//!        └─ T = <work's Outcome>::Output   (`()` for void work)
//! ```
//!
//! For fire-and-forget tasks build [`NamedTask`] / [`TaskWithAttempts`] directly and call `boxed()`.

use std::borrow::Cow;

use crate::completion::{Completion, channel};
use crate::tasks::attempts::TaskWithAttempts;
use crate::tasks::named::NamedTask;
use crate::tasks::outcome::Outcome;
use crate::tasks::task::TaskHandle;

/// Builds an unnamed task from `work`.
///
/// # Example
/// ```
/// use deferq::{make_task, TaskRunner, RunnerConfig};
///
/// let runner = TaskRunner::new(RunnerConfig::default());
/// let (task, answer) = make_task(|| Some(42));
/// runner.enqueue(task).unwrap();
///
/// assert!(runner.drive_one());
/// assert_eq!(answer.wait(), Ok(42));
/// ```
pub fn make_task<F, O>(work: F) -> (TaskHandle, Completion<O::Output>)
where
    F: FnMut() -> O + Send + 'static,
    O: Outcome,
    O::Output: Send + 'static,
{
    bind_named(NamedTask::unnamed(work))
}

/// Builds a named task from `work`.
pub fn make_named_task<F, O>(
    name: impl Into<Cow<'static, str>>,
    work: F,
) -> (TaskHandle, Completion<O::Output>)
where
    F: FnMut() -> O + Send + 'static,
    O: Outcome,
    O::Output: Send + 'static,
{
    bind_named(NamedTask::new(name, work))
}

/// Builds an unnamed task that gives up after `attempts` not-ready results.
///
/// # Example
/// ```
/// use deferq::{make_task_with_attempts, CompletionError, TaskRunner, RunnerConfig};
///
/// let runner = TaskRunner::new(RunnerConfig::default());
/// let (task, never) = make_task_with_attempts(3, || None::<u32>);
/// runner.enqueue(task).unwrap();
///
/// assert_eq!(runner.drive_until_empty(), 3);
/// assert_eq!(never.wait(), Err(CompletionError::Abandoned));
/// ```
pub fn make_task_with_attempts<F, O>(attempts: u32, work: F) -> (TaskHandle, Completion<O::Output>)
where
    F: FnMut() -> O + Send + 'static,
    O: Outcome,
    O::Output: Send + 'static,
{
    bind_attempts(TaskWithAttempts::unnamed(attempts, work))
}

/// Builds a named task that gives up after `attempts` not-ready results.
pub fn make_named_task_with_attempts<F, O>(
    name: impl Into<Cow<'static, str>>,
    attempts: u32,
    work: F,
) -> (TaskHandle, Completion<O::Output>)
where
    F: FnMut() -> O + Send + 'static,
    O: Outcome,
    O::Output: Send + 'static,
{
    bind_attempts(TaskWithAttempts::new(name, attempts, work))
}

fn bind_named<F, O>(mut task: NamedTask<F, O::Output>) -> (TaskHandle, Completion<O::Output>)
where
    F: FnMut() -> O + Send + 'static,
    O: Outcome,
    O::Output: Send + 'static,
{
    let (tx, rx) = channel();
    task.completer = Some(tx);
    (task.boxed(), rx)
}

fn bind_attempts<F, O>(
    mut task: TaskWithAttempts<F, O::Output>,
) -> (TaskHandle, Completion<O::Output>)
where
    F: FnMut() -> O + Send + 'static,
    O: Outcome,
    O::Output: Send + 'static,
{
    let (tx, rx) = channel();
    task.inner.completer = Some(tx);
    (task.boxed(), rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompletionError, TaskError};
    use crate::tasks::task::{RunResult, Task};

    #[test]
    fn named_factory_keeps_name() {
        let (task, _rx) = make_named_task("dcgm-health", || Some(()));
        assert_eq!(task.name(), "dcgm-health");

        let (task, _rx) = make_named_task_with_attempts("dcgm-retry", 2, || Some(1));
        assert_eq!(task.name(), "dcgm-retry");
    }

    #[test]
    fn unnamed_factory_generates_name() {
        let (task, _rx) = make_task(|| Some(1));
        assert!(task.name().starts_with("task#"));
    }

    #[test]
    fn void_work_resolves_to_unit() {
        let (mut task, rx) = make_task(|| {});
        assert_eq!(task.run(), RunResult::Done);
        assert_eq!(rx.wait(), Ok(()));
    }

    #[test]
    fn fallible_work_reports_error() {
        let (mut task, rx) = make_task(|| -> Result<Option<String>, TaskError> {
            Err(TaskError::fail("device lost"))
        });
        assert_eq!(task.run(), RunResult::Done);
        assert_eq!(
            rx.wait(),
            Err(CompletionError::Failed(TaskError::fail("device lost")))
        );
    }

    #[test]
    fn attempts_factory_abandons_on_exhaustion() {
        let (mut task, rx) = make_task_with_attempts(2, || None::<u8>);
        assert_eq!(task.run(), RunResult::Deferred);
        assert_eq!(task.run(), RunResult::Done);
        assert_eq!(rx.wait(), Err(CompletionError::Abandoned));
    }
}
