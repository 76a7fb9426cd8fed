//! # Event subscribers.
//!
//! ```text
//!   Gate ── publish(Event) ──► Bus ──► Simulation fan-out ──► SubscriberSet
//!                                                                 │
//!                                              ┌──────────────────┼──────────┐
//!                                              ▼                  ▼          ▼
//!                                          LogWriter           Metrics     Custom
//! ```
//!
//! Implement [`Subscribe`] to plug in metrics, auditing, or alerts; the
//! built-in [`LogWriter`] (feature `logging`) prints events to stdout.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
