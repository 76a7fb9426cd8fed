//! # Event bus for broadcasting simulation events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. Gates publish
//! from many tasks at once; a single listener inside the
//! [`Simulation`](crate::Simulation) fans events out to subscribers.
//!
//! ```text
//! Publishers (many):                 Listener (one):
//!   Gate 1 ──┐
//!   Gate 2 ──┼──────► Bus ───────► fan_out ────► SubscriberSet
//!   Gate N ──┤  (broadcast chan)   (in Simulation)
//!   Driver ──┘
//! ```
//!
//! ## Rules
//! - `publish()` never blocks and never fails; with no receivers the event is dropped.
//! - One ring buffer of `capacity` events is shared by all receivers.
//! - Slow receivers get `RecvError::Lagged(n)` and skip the `n` oldest events.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for simulation events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus; capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver that observes events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn receivers_see_events_published_after_subscribing() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::SimulationStarting));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::SimulationStarted));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::SimulationStarted);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn slow_receivers_lag() {
        let bus = Bus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..5 {
            bus.publish(Event::new(EventKind::VehicleFound));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
    }
}
