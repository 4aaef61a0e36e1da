//! # Event subscribers for the task runner.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out used by
//! the runner, and (feature `logging`) the built-in [`LogWriter`].
//!
//! ```text
//! TaskRunner ── publish(Event) ──► Bus ──► fan-out listener ──► SubscriberSet
//!                                                                  ├──► LogWriter
//!                                                                  └──► custom ...
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
