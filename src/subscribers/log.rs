//! # LogWriter: events as `tracing` records
//!
//! A subscriber that turns every runner [`Event`] into a `tracing` event under the
//! `deferq::events` target. Install any `tracing` subscriber to see the output.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! DEBUG deferq::events: enqueued task="gpu-probe" pending=1
//! DEBUG deferq::events: deferred task="gpu-probe" pending=1
//!  INFO deferq::events: done task="gpu-probe" pending=0
//!  WARN deferq::events: dropped on stop task="slow-poll"
//!  INFO deferq::events: runner stopped dropped=1
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("-");
        let pending = e.pending.unwrap_or_default();
        let reason = e.reason.as_deref().unwrap_or("unknown");

        match e.kind {
            EventKind::TaskEnqueued => {
                tracing::debug!(target: "deferq::events", seq = e.seq, task, pending, "enqueued");
            }
            EventKind::TaskDeferred => {
                tracing::debug!(target: "deferq::events", seq = e.seq, task, pending, "deferred");
            }
            EventKind::TaskDone => {
                tracing::info!(target: "deferq::events", seq = e.seq, task, pending, "done");
            }
            EventKind::TaskRejected => {
                tracing::warn!(target: "deferq::events", seq = e.seq, task, reason, "rejected");
            }
            EventKind::TaskDropped => {
                tracing::warn!(target: "deferq::events", seq = e.seq, task, "dropped on stop");
            }
            EventKind::RunnerStopped => {
                tracing::info!(target: "deferq::events", seq = e.seq, dropped = pending, "runner stopped");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "deferq::events", subscriber = task, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(target: "deferq::events", subscriber = task, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_kind_is_rendered() {
        let writer = LogWriter::new();
        for kind in [
            EventKind::TaskEnqueued,
            EventKind::TaskDeferred,
            EventKind::TaskDone,
            EventKind::TaskRejected,
            EventKind::TaskDropped,
            EventKind::RunnerStopped,
            EventKind::SubscriberOverflow,
            EventKind::SubscriberPanicked,
        ] {
            writer.on_event(&Event::new(kind).with_task("t")).await;
        }
    }
}
