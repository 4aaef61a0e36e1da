//! # Runtime events emitted by the task runner.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Queue events**: admission and per-run outcomes (enqueued, rejected, deferred, done)
//! - **Shutdown events**: runner stop and tasks dropped by it
//! - **Subscriber events**: overflow and panics inside subscriber workers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task name,
//! reason and queue depth.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use deferq::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskDeferred)
//!     .with_task("gpu-probe")
//!     .with_pending(3);
//!
//! assert_eq!(ev.kind, EventKind::TaskDeferred);
//! assert_eq!(ev.task.as_deref(), Some("gpu-probe"));
//! assert_eq!(ev.pending, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Queue events ===
    /// Task was appended to the back of the run queue.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `pending`: queue depth after the append
    TaskEnqueued,

    /// Task was refused at admission (runner stopped or queue full).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: rejection label (`runner_stopped`, `runner_queue_full`)
    TaskRejected,

    /// A run returned `Deferred`; the task went back to the end of the queue.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `pending`: queue depth after re-insertion
    TaskDeferred,

    /// A run returned `Done`; the task was dropped.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `pending`: queue depth after removal
    TaskDone,

    // === Shutdown events ===
    /// Pending task was dropped because the runner stopped.
    ///
    /// Its completion reader observes `Abandoned`.
    ///
    /// Sets:
    /// - `task`: task name
    TaskDropped,

    /// Runner stopped; no further tasks are admitted.
    ///
    /// Sets:
    /// - `pending`: number of tasks dropped by the stop
    RunnerStopped,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (rejections, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Run queue depth observed right after the event.
    pub pending: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            pending: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the queue depth.
    #[inline]
    pub fn with_pending(mut self, pending: usize) -> Self {
        self.pending = Some(pending);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }
}
