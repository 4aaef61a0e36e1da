//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `TaskRunner` (enqueue, drive, stop), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the runner's fan-out listener (feeds `SubscriberSet`) and any
//!   receiver obtained through `TaskRunner::bus().subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
