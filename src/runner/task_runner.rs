//! # TaskRunner: cooperative run queue.
//!
//! Owns an ordered queue of [`TaskHandle`]s and drives them one `run` at a time.
//!
//! ## Slot lifecycle
//! ```text
//! enqueue ──► Pending ──► drive_one() pops ──► Running ──► task.run()
//!                ▲                                            │
//!                │                      Deferred ◄────────────┤
//!                └──── push_back (Re-queued) ◄───┘            │
//!                                                  Done ──────┴──► dropped (Completed)
//! ```
//!
//! ## Rules
//! - FIFO for tasks that never defer; a deferred task goes behind everything queued
//!   at the moment it is re-inserted (round-robin, no priorities).
//! - The queue lock is **never** held while a task runs; a task is owned by exactly one
//!   worker during `run`.
//! - Retry policy is task-local: the runner never drops a task unless it is `Done`
//!   or the runner is stopped.
//! - After `stop()`, enqueues are rejected and pending tasks are dropped, so their
//!   completion readers observe `Abandoned`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Notify, broadcast};
use tokio::task::JoinHandle;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::error::RunnerError;
use crate::events::{Bus, Event, EventKind};
use crate::runner::builder::TaskRunnerBuilder;
use crate::runner::config::RunnerConfig;
use crate::subscribers::SubscriberSet;
use crate::tasks::{RunResult, TaskHandle};

struct RunQueue {
    tasks: VecDeque<TaskHandle>,
    stopped: bool,
}

/// Cooperative task runner with a single logical run queue.
///
/// Drive it synchronously ([`drive_one`](Self::drive_one),
/// [`drive_pass`](Self::drive_pass), [`drive_until_empty`](Self::drive_until_empty))
/// from any number of threads, or asynchronously with [`run`](Self::run).
///
/// # Example
/// ```
/// use deferq::{make_named_task, RunnerConfig, TaskRunner};
///
/// let runner = TaskRunner::new(RunnerConfig::default());
///
/// let mut polls = 0;
/// let (task, link_up) = make_named_task("link-up", move || {
///     polls += 1;
///     (polls == 3).then_some("up")
/// });
/// runner.enqueue(task).unwrap();
///
/// assert_eq!(runner.drive_until_empty(), 3);
/// assert_eq!(link_up.wait(), Ok("up"));
/// ```
pub struct TaskRunner {
    cfg: RunnerConfig,
    queue: Mutex<RunQueue>,
    wake: Notify,
    stop_token: CancellationToken,
    bus: Bus,
    fan_out: Mutex<Option<JoinHandle<()>>>,
}

impl TaskRunner {
    /// Creates a runner without subscribers.
    ///
    /// Does not need an async runtime; events are still published on [`bus`](Self::bus).
    pub fn new(cfg: RunnerConfig) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::from_parts(cfg, bus, CancellationToken::new(), None)
    }

    /// Returns a builder for attaching subscribers.
    pub fn builder(cfg: RunnerConfig) -> TaskRunnerBuilder {
        TaskRunnerBuilder::new(cfg)
    }

    pub(super) fn from_parts(
        cfg: RunnerConfig,
        bus: Bus,
        stop_token: CancellationToken,
        fan_out: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            cfg,
            queue: Mutex::new(RunQueue {
                tasks: VecDeque::new(),
                stopped: false,
            }),
            wake: Notify::new(),
            stop_token,
            bus,
            fan_out: Mutex::new(fan_out),
        }
    }

    /// Appends a task to the back of the run queue and wakes one async worker.
    ///
    /// ### Errors
    /// - [`RunnerError::Stopped`] after [`stop`](Self::stop)
    /// - [`RunnerError::QueueFull`] when `max_pending` is reached
    ///
    /// A rejected task is dropped; its completion reader observes `Abandoned`.
    pub fn enqueue(&self, task: TaskHandle) -> Result<(), RunnerError> {
        let name: Arc<str> = Arc::from(task.name());

        let admitted = {
            let mut queue = self.lock();
            match self.admit(&queue, &name) {
                Ok(()) => {
                    queue.tasks.push_back(task);
                    Ok(queue.tasks.len())
                }
                Err(err) => Err((err, task)),
            }
        };

        match admitted {
            Ok(pending) => {
                self.bus.publish(
                    Event::new(EventKind::TaskEnqueued)
                        .with_task(name)
                        .with_pending(pending),
                );
                self.wake.notify_one();
                Ok(())
            }
            Err((err, task)) => {
                drop(task);
                self.bus.publish(
                    Event::new(EventKind::TaskRejected)
                        .with_task(name)
                        .with_reason(err.as_label()),
                );
                Err(err)
            }
        }
    }

    fn admit(&self, queue: &RunQueue, name: &str) -> Result<(), RunnerError> {
        if queue.stopped {
            return Err(RunnerError::Stopped {
                task: name.to_string(),
            });
        }
        match self.cfg.pending_limit() {
            Some(capacity) if queue.tasks.len() >= capacity => Err(RunnerError::QueueFull {
                task: name.to_string(),
                capacity,
            }),
            _ => Ok(()),
        }
    }

    /// Pops the front task and runs it once.
    ///
    /// `Done` drops the task; `Deferred` appends it to the back of the queue.
    /// Returns `false` if the queue was empty.
    ///
    /// # Panics
    /// Tasks built from closures catch panics themselves. A custom [`Task`](crate::Task)
    /// whose `run` panics unwinds through this call (and ends an async [`run`](Self::run)
    /// loop); the panicking task is dropped and the queue stays usable.
    pub fn drive_one(&self) -> bool {
        let Some(mut task) = self.lock().tasks.pop_front() else {
            return false;
        };

        match task.run() {
            RunResult::Done => {
                let name: Arc<str> = Arc::from(task.name());
                drop(task);
                self.bus.publish(
                    Event::new(EventKind::TaskDone)
                        .with_task(name)
                        .with_pending(self.len()),
                );
            }
            RunResult::Deferred => self.requeue(task),
        }
        true
    }

    fn requeue(&self, task: TaskHandle) {
        let name: Arc<str> = Arc::from(task.name());
        let requeued = {
            let mut queue = self.lock();
            if queue.stopped {
                Err(task)
            } else {
                queue.tasks.push_back(task);
                Ok(queue.tasks.len())
            }
        };

        match requeued {
            Ok(pending) => self.bus.publish(
                Event::new(EventKind::TaskDeferred)
                    .with_task(name)
                    .with_pending(pending),
            ),
            Err(task) => {
                drop(task);
                self.bus
                    .publish(Event::new(EventKind::TaskDropped).with_task(name));
            }
        }
    }

    /// Gives every task queued at the start of the pass one `run`.
    ///
    /// Returns the number of tasks still pending afterwards.
    pub fn drive_pass(&self) -> usize {
        for _ in 0..self.len() {
            if !self.drive_one() {
                break;
            }
        }
        self.len()
    }

    /// Calls [`drive_one`](Self::drive_one) until the queue is empty.
    ///
    /// Returns the number of `run` calls made. A task that never becomes ready keeps
    /// this looping; give such work an attempt budget or use [`drive_pass`](Self::drive_pass).
    pub fn drive_until_empty(&self) -> usize {
        let mut runs = 0;
        while self.drive_one() {
            runs += 1;
        }
        runs
    }

    /// Continuous drain loop; returns once the runner is stopped.
    ///
    /// - runs passes while tasks are pending;
    /// - after a pass that left deferred tasks, waits `retry_interval` (or yields when it is zero);
    /// - on an empty queue, sleeps until the next `enqueue`.
    ///
    /// Several workers may run this loop concurrently on a shared `Arc<TaskRunner>`.
    pub async fn run(&self) {
        loop {
            if self.stop_token.is_cancelled() {
                break;
            }

            let notified = self.wake.notified();
            if self.drive_pass() == 0 {
                select! {
                    _ = notified => {}
                    _ = self.stop_token.cancelled() => break,
                }
                continue;
            }

            match self.cfg.retry_delay() {
                None => tokio::task::yield_now().await,
                Some(delay) => {
                    select! {
                        _ = time::sleep(delay) => {}
                        _ = notified => {}
                        _ = self.stop_token.cancelled() => break,
                    }
                }
            }
        }
    }

    /// Stops the runner.
    ///
    /// Further enqueues are rejected, pending tasks are dropped (their readers observe
    /// `Abandoned`) and every [`run`](Self::run) loop returns. Idempotent.
    pub fn stop(&self) {
        let dropped: Vec<TaskHandle> = {
            let mut queue = self.lock();
            if queue.stopped {
                return;
            }
            queue.stopped = true;
            queue.tasks.drain(..).collect()
        };

        let count = dropped.len();
        for task in dropped {
            let name: Arc<str> = Arc::from(task.name());
            drop(task);
            self.bus
                .publish(Event::new(EventKind::TaskDropped).with_task(name));
        }
        self.bus
            .publish(Event::new(EventKind::RunnerStopped).with_pending(count));
        tracing::debug!(dropped = count, "task runner stopped");

        self.stop_token.cancel();
    }

    /// Stops the runner and waits until subscribers have received the final events.
    pub async fn shutdown(&self) {
        self.stop();
        let fan_out = self
            .fan_out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = fan_out {
            let _ = handle.await;
        }
    }

    /// Number of pending tasks (excluding any currently running).
    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    /// `true` if no task is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` once [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.cfg
    }

    /// Returns the event bus; use `bus().subscribe()` to observe events.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    fn lock(&self) -> MutexGuard<'_, RunQueue> {
        // Tasks never run under the lock, so a poisoned queue is still consistent.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TaskRunner {
    fn drop(&mut self) {
        self.stop_token.cancel();
    }
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner")
            .field("cfg", &self.cfg)
            .field("pending", &self.len())
            .field("stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}

/// Forwards bus events to the subscriber set until the runner stops.
///
/// Overflow or panic events that subscriber workers publish while the set shuts down
/// are not forwarded to subscribers; they remain visible on `bus().subscribe()` receivers.
pub(super) async fn fan_out(
    mut rx: broadcast::Receiver<Event>,
    set: SubscriberSet,
    stop_token: CancellationToken,
) {
    loop {
        select! {
            biased;
            res = rx.recv() => match res {
                Ok(ev) => set.emit_arc(Arc::new(ev)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event fan-out lagged; events lost");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = stop_token.cancelled() => break,
        }
    }
    while let Ok(ev) = rx.try_recv() {
        set.emit_arc(Arc::new(ev));
    }
    set.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompletionError, TaskError};
    use crate::tasks::{NamedTask, Task, make_named_task, make_task, make_task_with_attempts};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    fn runner() -> TaskRunner {
        TaskRunner::new(RunnerConfig::default())
    }

    /// Records its name into `log` on every call; ready after `defer` not-ready calls.
    fn logged(
        name: &'static str,
        defer: usize,
        log: &Arc<Mutex<Vec<String>>>,
    ) -> impl FnMut() -> Option<()> + Send + 'static {
        let log = Arc::clone(log);
        let mut calls = 0;
        move || {
            calls += 1;
            log.lock().unwrap().push(format!("{name}{calls}"));
            (calls > defer).then_some(())
        }
    }

    #[test]
    fn ready_value_after_one_drive() {
        let r = runner();
        let (task, rx) = make_task(|| Some(42));
        r.enqueue(task).unwrap();

        assert!(r.drive_one());
        assert!(r.is_empty());
        assert_eq!(rx.wait(), Ok(42));
    }

    #[test]
    fn deferred_task_completes_within_budget() {
        let r = runner();
        let mut calls = 0;
        let (task, rx) = make_task_with_attempts(5, move || {
            calls += 1;
            (calls == 3).then_some("done")
        });
        r.enqueue(task).unwrap();

        assert_eq!(r.drive_until_empty(), 3);
        assert_eq!(rx.wait(), Ok("done"));
    }

    #[test]
    fn deferred_task_abandoned_when_budget_too_small() {
        let r = runner();
        let mut calls = 0;
        let (task, rx) = make_task_with_attempts(2, move || {
            calls += 1;
            (calls == 3).then_some("done")
        });
        r.enqueue(task).unwrap();

        assert_eq!(r.drive_until_empty(), 2);
        assert_eq!(rx.wait(), Err(CompletionError::Abandoned));
    }

    #[test]
    fn failing_work_is_reported_after_one_drive() {
        let r = runner();
        let (task, rx) = make_task(|| -> Result<Option<u32>, TaskError> {
            Err(TaskError::fail("XID 79: GPU fell off the bus"))
        });
        r.enqueue(task).unwrap();

        assert_eq!(r.drive_until_empty(), 1);
        assert_eq!(
            rx.wait(),
            Err(CompletionError::Failed(TaskError::fail(
                "XID 79: GPU fell off the bus"
            )))
        );
    }

    #[test]
    fn plain_task_needs_k_plus_one_runs() {
        for k in 0..5 {
            let r = runner();
            let mut calls = 0;
            let (task, rx) = make_task(move || {
                calls += 1;
                (calls > k).then_some(k)
            });
            r.enqueue(task).unwrap();
            assert_eq!(r.drive_until_empty(), k + 1);
            assert_eq!(rx.wait(), Ok(k));
        }
    }

    #[test]
    fn done_task_is_never_run_again() {
        let r = runner();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let (task, _rx) = make_task(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(())
        });
        r.enqueue(task).unwrap();

        assert_eq!(r.drive_until_empty(), 1);
        assert!(!r.drive_one());
        assert_eq!(r.drive_pass(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fifo_for_tasks_that_never_defer() {
        let r = runner();
        let log = Arc::new(Mutex::new(Vec::new()));
        for name in ["a", "b", "c"] {
            r.enqueue(NamedTask::new(name, logged(name, 0, &log)).boxed())
                .unwrap();
        }
        r.drive_until_empty();
        assert_eq!(*log.lock().unwrap(), ["a1", "b1", "c1"]);
    }

    #[test]
    fn deferred_task_goes_to_the_back() {
        let r = runner();
        let log = Arc::new(Mutex::new(Vec::new()));
        r.enqueue(NamedTask::new("a", logged("a", 0, &log)).boxed())
            .unwrap();
        r.enqueue(NamedTask::new("b", logged("b", 1, &log)).boxed())
            .unwrap();
        r.enqueue(NamedTask::new("c", logged("c", 0, &log)).boxed())
            .unwrap();

        r.drive_until_empty();
        assert_eq!(*log.lock().unwrap(), ["a1", "b1", "c1", "b2"]);
    }

    #[test]
    fn deferred_head_lets_others_run_first() {
        let r = runner();
        let log = Arc::new(Mutex::new(Vec::new()));
        r.enqueue(NamedTask::new("b", logged("b", 1, &log)).boxed())
            .unwrap();
        r.enqueue(NamedTask::new("a", logged("a", 0, &log)).boxed())
            .unwrap();

        r.drive_until_empty();
        assert_eq!(*log.lock().unwrap(), ["b1", "a1", "b2"]);
    }

    #[test]
    fn drive_pass_runs_each_task_once() {
        let r = runner();
        let log = Arc::new(Mutex::new(Vec::new()));
        r.enqueue(NamedTask::new("x", logged("x", 2, &log)).boxed())
            .unwrap();
        r.enqueue(NamedTask::new("y", logged("y", 0, &log)).boxed())
            .unwrap();

        assert_eq!(r.drive_pass(), 1);
        assert_eq!(*log.lock().unwrap(), ["x1", "y1"]);
        assert_eq!(r.drive_pass(), 1);
        assert_eq!(r.drive_pass(), 0);
    }

    #[test]
    fn failure_does_not_affect_siblings() {
        let r = runner();
        let (bad, bad_rx) = make_named_task("bad", || -> Option<u8> { panic!("driver crash") });
        let (good, good_rx) = make_named_task("good", || Some(7_u8));
        r.enqueue(bad).unwrap();
        r.enqueue(good).unwrap();

        assert_eq!(r.drive_until_empty(), 2);
        assert!(matches!(
            bad_rx.wait(),
            Err(CompletionError::Failed(TaskError::Panicked { .. }))
        ));
        assert_eq!(good_rx.wait(), Ok(7));
    }

    #[test]
    fn stop_drops_pending_and_rejects_new_work() {
        let r = runner();
        let (pending, pending_rx) = make_task(|| None::<u8>);
        r.enqueue(pending).unwrap();
        assert_eq!(r.drive_pass(), 1);

        r.stop();
        assert!(r.is_stopped());
        assert!(r.is_empty());
        assert_eq!(pending_rx.wait(), Err(CompletionError::Abandoned));

        let (late, late_rx) = make_named_task("late", || Some(1_u8));
        assert_eq!(
            r.enqueue(late),
            Err(RunnerError::Stopped {
                task: "late".into()
            })
        );
        assert_eq!(late_rx.wait(), Err(CompletionError::Abandoned));

        r.stop();
    }

    #[test]
    fn pending_limit_rejects_admission() {
        let r = TaskRunner::new(RunnerConfig {
            max_pending: 1,
            ..RunnerConfig::default()
        });
        let (first, _first_rx) = make_task(|| Some(1));
        let (second, second_rx) = make_named_task("second", || Some(2));
        r.enqueue(first).unwrap();

        assert_eq!(
            r.enqueue(second),
            Err(RunnerError::QueueFull {
                task: "second".into(),
                capacity: 1
            })
        );
        assert_eq!(second_rx.wait(), Err(CompletionError::Abandoned));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn events_follow_the_slot_lifecycle() {
        let r = runner();
        let mut rx = r.bus().subscribe();
        let mut calls = 0;
        let (task, _done) = make_named_task("probe", move || {
            calls += 1;
            (calls == 2).then_some(())
        });
        r.enqueue(task).unwrap();
        r.drive_until_empty();
        r.stop();

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            [
                EventKind::TaskEnqueued,
                EventKind::TaskDeferred,
                EventKind::TaskDone,
                EventKind::RunnerStopped,
            ]
        );
    }

    #[test]
    fn task_deferring_after_stop_is_dropped() {
        struct StopsRunner {
            runner: Arc<TaskRunner>,
            inner: TaskHandle,
        }

        impl Task for StopsRunner {
            fn name(&self) -> &str {
                "stopper"
            }

            fn run(&mut self) -> RunResult {
                self.runner.stop();
                self.inner.run()
            }
        }

        let r = Arc::new(runner());
        let mut events = r.bus().subscribe();
        let (inner, rx) = make_task(|| None::<u8>);
        r.enqueue(Box::new(StopsRunner {
            runner: Arc::clone(&r),
            inner,
        }))
        .unwrap();

        assert!(r.drive_one());
        assert!(r.is_empty());
        assert_eq!(rx.wait(), Err(CompletionError::Abandoned));

        let mut kinds = Vec::new();
        while let Ok(ev) = events.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            [
                EventKind::TaskEnqueued,
                EventKind::RunnerStopped,
                EventKind::TaskDropped,
            ]
        );
    }

    #[test]
    fn deferred_task_requeued_at_pending_limit() {
        let r = TaskRunner::new(RunnerConfig {
            max_pending: 1,
            ..RunnerConfig::default()
        });
        let mut calls = 0;
        let (task, rx) = make_task(move || {
            calls += 1;
            (calls == 2).then_some(calls)
        });
        r.enqueue(task).unwrap();

        assert!(r.drive_one());
        assert_eq!(r.len(), 1);

        let (extra, _extra_rx) = make_named_task("extra", || Some(0));
        assert!(matches!(
            r.enqueue(extra),
            Err(RunnerError::QueueFull { capacity: 1, .. })
        ));

        assert!(r.drive_one());
        assert!(r.is_empty());
        assert_eq!(rx.wait(), Ok(2));
    }

    #[test]
    fn panicking_custom_task_unwinds_but_queue_survives() {
        struct Faulty;

        impl Task for Faulty {
            fn name(&self) -> &str {
                "faulty"
            }

            fn run(&mut self) -> RunResult {
                panic!("custom task broke its contract");
            }
        }

        let r = runner();
        let (task, rx) = make_task(|| Some("after"));
        r.enqueue(Box::new(Faulty)).unwrap();
        r.enqueue(task).unwrap();

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| r.drive_one()));
        assert!(unwound.is_err());

        assert_eq!(r.len(), 1);
        assert_eq!(r.drive_until_empty(), 1);
        assert_eq!(rx.wait(), Ok("after"));
    }

    #[test]
    fn worker_threads_never_run_a_task_concurrently() {
        struct Guarded {
            running: AtomicBool,
            left: usize,
            overlaps: Arc<AtomicUsize>,
        }

        impl Task for Guarded {
            fn name(&self) -> &str {
                "guarded"
            }

            fn run(&mut self) -> RunResult {
                if self.running.swap(true, Ordering::SeqCst) {
                    self.overlaps.fetch_add(1, Ordering::SeqCst);
                }
                std::thread::yield_now();
                self.running.store(false, Ordering::SeqCst);
                if self.left == 0 {
                    return RunResult::Done;
                }
                self.left -= 1;
                RunResult::Deferred
            }
        }

        let r = Arc::new(runner());
        let overlaps = Arc::new(AtomicUsize::new(0));
        for _ in 0..32 {
            r.enqueue(Box::new(Guarded {
                running: AtomicBool::new(false),
                left: 5,
                overlaps: Arc::clone(&overlaps),
            }))
            .unwrap();
        }

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let r = Arc::clone(&r);
                std::thread::spawn(move || r.drive_until_empty())
            })
            .collect();
        let runs: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();

        assert_eq!(runs, 32 * 6);
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        assert!(r.is_empty());
    }

    #[tokio::test]
    async fn async_loop_resolves_completions() {
        let r = Arc::new(TaskRunner::new(RunnerConfig {
            retry_interval: Duration::from_millis(1),
            ..RunnerConfig::default()
        }));
        let worker = tokio::spawn({
            let r = Arc::clone(&r);
            async move { r.run().await }
        });

        let mut polls = 0;
        let (task, rx) = make_task(move || {
            polls += 1;
            (polls == 3).then_some("stable")
        });
        r.enqueue(task).unwrap();

        let value = time::timeout(Duration::from_secs(5), rx).await.unwrap();
        assert_eq!(value, Ok("stable"));

        r.shutdown().await;
        worker.await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn several_async_workers_share_one_queue() {
        let r = Arc::new(TaskRunner::new(RunnerConfig {
            retry_interval: Duration::ZERO,
            ..RunnerConfig::default()
        }));
        let workers: Vec<_> = (0..3)
            .map(|_| {
                let r = Arc::clone(&r);
                tokio::spawn(async move { r.run().await })
            })
            .collect();

        let mut readers = Vec::new();
        for i in 0..64_u32 {
            let mut deferred = false;
            let (task, rx) = make_task(move || {
                if !deferred {
                    deferred = true;
                    return None;
                }
                Some(i)
            });
            r.enqueue(task).unwrap();
            readers.push(rx);
        }

        for (i, rx) in readers.into_iter().enumerate() {
            let value = time::timeout(Duration::from_secs(5), rx).await.unwrap();
            assert_eq!(value, Ok(i as u32));
        }

        r.stop();
        for w in workers {
            w.await.unwrap();
        }
    }

    #[tokio::test]
    async fn stop_ends_idle_loop() {
        let r = Arc::new(runner());
        let worker = tokio::spawn({
            let r = Arc::clone(&r);
            async move { r.run().await }
        });
        tokio::task::yield_now().await;

        r.stop();
        time::timeout(Duration::from_secs(5), worker)
            .await
            .unwrap()
            .unwrap();
    }
}
