//! # Task abstractions and factories.
//!
//! This module provides the task-related types:
//! - [`Task`] - object-safe trait the run queue works with
//! - [`RunResult`] - `Done` / `Deferred` outcome of one `run`
//! - [`TaskHandle`] - owned, type-erased task (`Box<dyn Task>`)
//! - [`Outcome`] - return shapes a unit of work may produce
//! - [`NamedTask`] - closure-backed task bound to an optional completion
//! - [`TaskWithAttempts`] - bounded-retry wrapper
//! - `make_*` factories returning `(TaskHandle, Completion<T>)`

mod attempts;
mod make;
mod named;
mod outcome;
mod task;

pub use attempts::TaskWithAttempts;
pub use make::{make_named_task, make_named_task_with_attempts, make_task, make_task_with_attempts};
pub use named::NamedTask;
pub use outcome::Outcome;
pub use task::{RunResult, Task, TaskHandle};
