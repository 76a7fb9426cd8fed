//! Simulation events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the `Simulation` driver, every gate task, and
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the simulation's fan-out listener, which forwards to the
//!   `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
