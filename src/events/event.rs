//! # Events emitted by the simulation driver and its gates.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Run events**: the simulation window opening, closing, and draining
//! - **Gate events**: the outcome of one gate operation (park, unpark, search)
//! - **Subscriber events**: delivery problems inside the fan-out
//!
//! The [`Event`] struct carries the metadata of the operation: gate, vehicle,
//! category, spot, and a reason for failures.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use parkvisor::{Category, Coordinate, Event, EventKind};
//!
//! let ev = Event::new(EventKind::VehicleParked)
//!     .with_gate(3)
//!     .with_vehicle(10003)
//!     .with_category(Category::Automobile)
//!     .with_spot(Coordinate::new(0, 4, 2).spot_id());
//!
//! assert_eq!(ev.kind, EventKind::VehicleParked);
//! assert_eq!(ev.vehicle, Some(10003));
//! assert_eq!(ev.spot.map(|s| s.to_string()).as_deref(), Some("0-2-4"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::facility::{Category, SpotId, VehicleId};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of simulation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Run events ===
    /// Facility built; warm-up is about to start.
    ///
    /// Sets:
    /// - `reason`: initial free spots per category
    SimulationStarting,

    /// Warm-up over; gates are being admitted.
    SimulationStarted,

    /// Shutdown requested (OS signal observed). No new gates are admitted.
    ShutdownRequested,

    /// The run window elapsed; waiting for in-flight gates.
    WindowClosed,

    /// Every gate finished within the grace period.
    ///
    /// Sets:
    /// - `reason`: run summary
    AllGatesStopped,

    /// Grace period exceeded; some gates did not finish in time.
    GraceExceeded,

    // === Gate events ===
    /// A vehicle was given a spot.
    ///
    /// Sets: `gate`, `vehicle`, `category`, `spot`
    VehicleParked,

    /// No free spot of the requested category (expected, not an error).
    ///
    /// Sets: `gate`, `vehicle`, `category`
    FacilityFull,

    /// A vehicle left its spot.
    ///
    /// Sets: `gate`, `vehicle`, `spot`
    VehicleUnparked,

    /// A vehicle was looked up.
    ///
    /// Sets: `gate`, `vehicle`, `spot`
    VehicleFound,

    /// A gate operation failed unexpectedly.
    ///
    /// Sets: `gate`, `vehicle` (if known), `reason`
    OperationFailed,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `reason` (subscriber name and panic message)
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `reason` (subscriber name and cause)
    SubscriberOverflow,
}

/// Simulation event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Tick number of the gate that produced the event.
    pub gate: Option<u64>,
    /// Vehicle involved.
    pub vehicle: Option<VehicleId>,
    /// Category requested or held.
    pub category: Option<Category>,
    /// Spot assigned, released, or found.
    pub spot: Option<SpotId>,
    /// Human-readable reason (errors, summaries, overflow details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            gate: None,
            vehicle: None,
            category: None,
            spot: None,
            reason: None,
        }
    }

    /// Attaches the gate tick.
    #[inline]
    pub fn with_gate(mut self, gate: u64) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Attaches the vehicle id.
    #[inline]
    pub fn with_vehicle(mut self, vehicle: VehicleId) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    /// Attaches the vehicle category.
    #[inline]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Attaches the spot involved.
    #[inline]
    pub fn with_spot(mut self, spot: SpotId) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    /// True for events produced by a gate operation.
    #[inline]
    pub fn is_gate_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::VehicleParked
                | EventKind::FacilityFull
                | EventKind::VehicleUnparked
                | EventKind::VehicleFound
                | EventKind::OperationFailed
        )
    }

    /// True for subscriber queue overflow reports.
    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// True for reports about subscribers themselves (overflow or panic).
    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}
