use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};
use super::{config::RunnerConfig, task_runner::{TaskRunner, fan_out}};

/// Builder for constructing a [`TaskRunner`] with event subscribers.
pub struct TaskRunnerBuilder {
    cfg: RunnerConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl TaskRunnerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: RunnerConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive runner events (enqueue, deferral, completion, stop)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the runner.
    ///
    /// With subscribers attached this spawns the fan-out listener and must be called
    /// within a Tokio runtime; without subscribers it is runtime-free.
    pub fn build(self) -> Arc<TaskRunner> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let stop_token = CancellationToken::new();

        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let rx = bus.subscribe();
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            Some(tokio::spawn(fan_out(rx, set, stop_token.clone())))
        };

        Arc::new(TaskRunner::from_parts(self.cfg, bus, stop_token, listener))
    }
}
