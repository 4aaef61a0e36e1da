//! # One-shot completion channel.
//!
//! [`channel`] creates a connected pair:
//! - [`Completer`]: the writer half, bound to a task and consumed on write;
//! - [`Completion`]: the reader half, kept by whoever wants the result.
//!
//! The reader resolves to exactly one of:
//! - `Ok(value)`: the unit of work produced a value;
//! - `Err(CompletionError::Failed(_))`: the unit of work failed;
//! - `Err(CompletionError::Abandoned)`: the writer was dropped unwritten.
//!
//! ## Rules
//! - A completer is written **at most once**: every write method takes `self`.
//! - The reader never hangs once the writer is gone.
//! - The reader can be awaited (it is a [`Future`]) or blocked on with
//!   [`Completion::wait`] from a thread outside any async runtime.
//!
//! A completer cannot be written twice:
//! ```compile_fail
//! let (tx, _rx) = deferq::channel::<u32>();
//! tx.succeed(1);
//! tx.succeed(2);
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{CompletionError, TaskError};

/// Creates a connected completer/completion pair.
///
/// # Example
/// ```
/// let (tx, rx) = deferq::channel::<&str>();
/// tx.succeed("ready");
/// assert_eq!(rx.wait(), Ok("ready"));
/// ```
pub fn channel<T>() -> (Completer<T>, Completion<T>) {
    let (tx, rx) = oneshot::channel();
    (Completer { tx }, Completion { rx })
}

/// Writer half of a completion channel.
///
/// Dropping it without writing abandons the channel.
#[derive(Debug)]
pub struct Completer<T> {
    tx: oneshot::Sender<Result<T, TaskError>>,
}

impl<T> Completer<T> {
    /// Delivers the final result.
    ///
    /// Returns `false` if the reader was already dropped (the result is discarded).
    pub fn complete(self, result: Result<T, TaskError>) -> bool {
        self.tx.send(result).is_ok()
    }

    /// Delivers a success value.
    pub fn succeed(self, value: T) -> bool {
        self.complete(Ok(value))
    }

    /// Delivers a failure.
    pub fn fail(self, error: TaskError) -> bool {
        self.complete(Err(error))
    }

    /// `true` if the reader half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Reader half of a completion channel.
///
/// Resolves independently of the task's lifetime.
#[derive(Debug)]
#[must_use = "a completion does nothing unless awaited or waited on"]
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T, TaskError>>,
}

impl<T> Completion<T> {
    /// Blocks the current thread until the result is available.
    ///
    /// # Panics
    /// Panics if called from within an asynchronous execution context; await
    /// the completion there instead.
    pub fn wait(self) -> Result<T, CompletionError> {
        resolve(self.rx.blocking_recv())
    }

    /// Non-blocking probe.
    ///
    /// Returns `None` while the task is still pending. Once it returns
    /// `Some(_)` the channel is spent and the completion should be dropped.
    pub fn try_take(&mut self) -> Option<Result<T, CompletionError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result.map_err(CompletionError::Failed)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(CompletionError::Abandoned)),
        }
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T, CompletionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(resolve)
    }
}

fn resolve<T>(
    received: Result<Result<T, TaskError>, oneshot::error::RecvError>,
) -> Result<T, CompletionError> {
    match received {
        Ok(result) => result.map_err(CompletionError::Failed),
        Err(_closed) => Err(CompletionError::Abandoned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_delivered() {
        let (tx, rx) = channel::<u32>();
        assert!(tx.succeed(42));
        assert_eq!(rx.wait(), Ok(42));
    }

    #[test]
    fn failure_is_delivered_verbatim() {
        let (tx, rx) = channel::<u32>();
        assert!(tx.fail(TaskError::fail("nvml not ready")));
        assert_eq!(
            rx.wait(),
            Err(CompletionError::Failed(TaskError::fail("nvml not ready")))
        );
    }

    #[test]
    fn dropped_writer_abandons() {
        let (tx, rx) = channel::<u32>();
        drop(tx);
        assert_eq!(rx.wait(), Err(CompletionError::Abandoned));
    }

    #[test]
    fn try_take_reports_pending_then_value() {
        let (tx, mut rx) = channel::<&str>();
        assert_eq!(rx.try_take(), None);
        tx.succeed("done");
        assert_eq!(rx.try_take(), Some(Ok("done")));
    }

    #[test]
    fn try_take_reports_abandonment() {
        let (tx, mut rx) = channel::<&str>();
        drop(tx);
        assert_eq!(rx.try_take(), Some(Err(CompletionError::Abandoned)));
    }

    #[test]
    fn writer_sees_dropped_reader() {
        let (tx, rx) = channel::<u32>();
        assert!(!tx.is_closed());
        drop(rx);
        assert!(tx.is_closed());
        assert!(!tx.succeed(1));
    }

    #[tokio::test]
    async fn completion_is_awaitable() {
        let (tx, rx) = channel::<String>();
        let writer = tokio::spawn(async move {
            tx.succeed("from another task".to_string());
        });
        assert_eq!(rx.await, Ok("from another task".to_string()));
        writer.await.unwrap();
    }
}
