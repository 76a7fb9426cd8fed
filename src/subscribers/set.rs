//! # Non-blocking event fan-out to multiple subscribers.
//!
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (bounded)         └──────► panic → SubscriberPanicked
//!     ├──► [queue 2] ──► worker 2 ──► subscriber2.on_event()
//!     └──► [queue N] ──► worker N ──► subscriberN.on_event()
//! ```
//!
//! ## Rules
//! - **Non-blocking**: `emit()` uses `try_send` and returns immediately.
//! - **Overflow**: the event is dropped for that subscriber only; `SubscriberOverflow` is published.
//! - **Isolation**: a panicking subscriber is reported and keeps receiving events.
//!   A panic while handling a subscriber report is swallowed, so one broken
//!   subscriber produces at most one report per real event.
//! - **Per-subscriber FIFO**; no ordering across subscribers.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for event subscribers.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let quiet = ev.is_subscriber_event();
                    let fut = sub.on_event(ev.as_ref());
                    let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await else {
                        continue;
                    };
                    if quiet {
                        continue;
                    }
                    let any = &*panic_err;
                    let info = if let Some(msg) = any.downcast_ref::<&'static str>() {
                        (*msg).to_string()
                    } else if let Some(msg) = any.downcast_ref::<String>() {
                        msg.clone()
                    } else {
                        "unknown panic".to_string()
                    };
                    bus_for_worker.publish(Event::subscriber_panicked(sub.name(), info));
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Emits an event to all subscribers (non-blocking).
    pub fn emit(&self, event: &Event) {
        let event = Arc::new(event.clone());
        // Overflow reports are not re-reported when they overflow themselves.
        let quiet = event.is_subscriber_overflow();

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !quiet {
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Closes every queue and waits for workers to drain them.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if the set has no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}
