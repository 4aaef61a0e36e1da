//! # deferq
//!
//! **deferq** is a small deferred-execution library for Rust.
//!
//! A unit of work is a closure that either produces its result or reports
//! "not ready yet". The work is wrapped in a named task, bound to a one-shot
//! completion channel and driven by a cooperative run queue that re-queues
//! deferred tasks behind everything else. Optional attempt budgets bound how
//! often a task may defer before it is abandoned.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   make_task(|| ...)      make_task_with_attempts(n, || ...)      impl Task
//!          │                          │                                │
//!          ▼                          ▼                                │
//!   (TaskHandle, Completion<T>) (TaskHandle, Completion<T>)            │
//!          │        │                 │        │                       │
//!          │        └─► caller ◄──────┼────────┘                       │
//!          ▼           wait()/.await  ▼                                ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  TaskRunner (cooperative run queue)                                   │
//! │  - VecDeque<TaskHandle> behind a mutex (FIFO, deferred → back)        │
//! │  - drive_one / drive_pass / drive_until_empty (sync, any thread)      │
//! │  - run() async drain loop (retry_interval between passes)             │
//! └──────────────────────────────┬────────────────────────────────────────┘
//!                                │ publishes TaskEnqueued / TaskDeferred /
//!                                │ TaskDone / TaskDropped / RunnerStopped
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                    Bus (broadcast channel)                            │
//! │              (capacity: RunnerConfig::bus_capacity)                   │
//! └──────────────────────────────┬────────────────────────────────────────┘
//!                                ▼
//!                     fan-out listener (builder only)
//!                                ▼
//!                          SubscriberSet
//!                        ┌───────┼────────┐
//!                        ▼       ▼        ▼
//!                     worker1  worker2  workerN
//! ```
//!
//! ### Task lifecycle
//! ```text
//! run()
//!   ├─ work() panics          ─► Completion = Failed(Panicked)  ─► Done
//!   ├─ work() returns Err(e)  ─► Completion = Failed(e)         ─► Done
//!   ├─ work() returns ready v ─► Completion = Ok(v)             ─► Done
//!   └─ work() not ready       ─► Deferred
//!          └─ with attempts: remaining -= 1
//!               └─ remaining == 0 ─► writer dropped (Abandoned) ─► Done
//! ```
//!
//! ## Features
//! | Area              | Description                                                | Key types / traits                           |
//! |-------------------|------------------------------------------------------------|----------------------------------------------|
//! | **Tasks**         | Closure-backed tasks, bounded retries, custom tasks.       | [`Task`], [`NamedTask`], [`TaskWithAttempts`] |
//! | **Factories**     | Build a task and its completion in one call.               | [`make_task`], [`make_task_with_attempts`]   |
//! | **Completion**    | One-shot result delivery, blocking or async.               | [`Completer`], [`Completion`]                |
//! | **Runner**        | Cooperative FIFO scheduling with re-queue on deferral.     | [`TaskRunner`], [`RunnerConfig`]             |
//! | **Subscriber API**| Observe runner events.                                     | [`Subscribe`], [`Event`]                     |
//! | **Errors**        | Typed errors for work, completion and admission.           | [`TaskError`], [`CompletionError`], [`RunnerError`] |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] subscriber that emits `tracing` records.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use deferq::{make_named_task_with_attempts, RunnerConfig, TaskRunner};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = RunnerConfig {
//!         retry_interval: Duration::from_millis(5),
//!         ..RunnerConfig::default()
//!     };
//!     let runner = Arc::new(TaskRunner::new(cfg));
//!
//!     let worker = tokio::spawn({
//!         let runner = Arc::clone(&runner);
//!         async move { runner.run().await }
//!     });
//!
//!     // Not ready twice, then ready.
//!     let mut polls = 0;
//!     let (task, health) = make_named_task_with_attempts("health", 5, move || {
//!         polls += 1;
//!         (polls == 3).then_some("healthy")
//!     });
//!     runner.enqueue(task)?;
//!
//!     assert_eq!(health.await?, "healthy");
//!
//!     runner.shutdown().await;
//!     worker.await?;
//!     Ok(())
//! }
//! ```
mod completion;
mod error;
mod events;
mod runner;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use completion::{Completer, Completion, channel};
pub use error::{BindError, CompletionError, RunnerError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use runner::{RunnerConfig, TaskRunner, TaskRunnerBuilder};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{
    NamedTask, Outcome, RunResult, Task, TaskHandle, TaskWithAttempts, make_named_task,
    make_named_task_with_attempts, make_task, make_task_with_attempts,
};

// Optional: expose a built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
