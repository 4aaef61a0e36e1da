//! # Runner: the cooperative run queue.
//!
//! - [`RunnerConfig`] tunables for the queue and the async drain loop
//! - [`TaskRunner`] FIFO queue driving tasks one `run` at a time
//! - [`TaskRunnerBuilder`] attaches event subscribers

mod builder;
mod config;
mod task_runner;

pub use builder::TaskRunnerBuilder;
pub use config::RunnerConfig;
pub use task_runner::TaskRunner;
