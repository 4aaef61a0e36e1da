//! # Return shapes accepted from a unit of work.
//!
//! A unit of work is any `FnMut() -> O` where `O: Outcome`. The outcome tells the task
//! whether a value is ready, still pending, or failed:
//!
//! | Return type       | Ready            | Not ready      | Failure  |
//! |-------------------|------------------|----------------|----------|
//! | `Option<T>`       | `Some(v)`        | `None`         | -        |
//! | `Poll<T>`         | `Poll::Ready(v)` | `Poll::Pending`| -        |
//! | `()`              | always           | -              | -        |
//! | `Result<O, E>`    | as `O`           | as `O`         | `Err(e)` |
//!
//! Optionals are **not** flattened: a closure returning `Option<Option<u8>>` produces a
//! task whose value type is `Option<u8>`, so "no value yet" and "the value is `None`"
//! stay distinguishable.

use std::task::Poll;

use crate::error::TaskError;

/// Conversion from a unit-of-work return value into a readiness state.
pub trait Outcome {
    /// Value delivered to the completion once ready.
    type Output;

    /// Classifies this return value.
    fn into_poll(self) -> Result<Poll<Self::Output>, TaskError>;
}

impl<T> Outcome for Option<T> {
    type Output = T;

    #[inline]
    fn into_poll(self) -> Result<Poll<T>, TaskError> {
        Ok(match self {
            Some(value) => Poll::Ready(value),
            None => Poll::Pending,
        })
    }
}

impl<T> Outcome for Poll<T> {
    type Output = T;

    #[inline]
    fn into_poll(self) -> Result<Poll<T>, TaskError> {
        Ok(self)
    }
}

impl Outcome for () {
    type Output = ();

    #[inline]
    fn into_poll(self) -> Result<Poll<()>, TaskError> {
        Ok(Poll::Ready(()))
    }
}

impl<O, E> Outcome for Result<O, E>
where
    O: Outcome,
    E: Into<TaskError>,
{
    type Output = O::Output;

    #[inline]
    fn into_poll(self) -> Result<Poll<O::Output>, TaskError> {
        self.map_err(Into::into)?.into_poll()
    }
}
