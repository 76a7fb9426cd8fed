//! # parkvisor
//!
//! **Parkvisor** allocates spots in a multi-floor parking facility to vehicles
//! arriving through many concurrent gates, without losing or double-allocating
//! a spot.
//!
//! The core is synchronous and lock-based: one FIFO pool of free spots per
//! vehicle category plus a vehicle registry behind a single reader/writer
//! lock. Around it, a tokio driver runs a bounded pool of simulated gates and
//! reports through an event bus, the same way the subscribers of a task
//! supervisor would.
//!
//! ## Architecture
//! ```text
//!  ┌───────────────────────────── ParkingFacility ─────────────────────────────┐
//!  │  SpotGrid (floor × column × row → Category, read-only after seeding)     │
//!  │                                                                           │
//!  │  pools[M1] ── SpotQueue<Coordinate>   (FIFO, RwLock<VecDeque>)            │
//!  │  pools[B1] ── SpotQueue<Coordinate>                                       │
//!  │  pools[A1] ── SpotQueue<Coordinate>                                       │
//!  │                                                                           │
//!  │  VehicleRegistry (RwLock<HashMap<VehicleId, VehicleRecord>>)              │
//!  └──────────▲───────────────────▲───────────────────▲───────────────────────┘
//!             │ park              │ unpark            │ search_vehicle
//!       ┌─────┴─────┐       ┌─────┴─────┐       ┌─────┴─────┐
//!       │  Gate #0  │       │  Gate #1  │  ...  │  Gate #N  │   (≤ gates at once)
//!       └─────┬─────┘       └─────┬─────┘       └─────┬─────┘
//!             └──── publish(Event) ───► Bus ◄─────────┘
//!                                        │
//!                                   fan_out (in Simulation)
//!                                        ▼
//!                                  SubscriberSet
//!                               ┌────────┼────────┐
//!                               ▼        ▼        ▼
//!                           LogWriter  metrics  custom
//! ```
//!
//! ## Lock order
//! Registry before pool. A pool lock is never held while the registry lock is
//! requested, so `park` and `unpark` cannot deadlock each other.
//!
//! ## Features
//! | Area            | Description                                               | Key types                                  |
//! |-----------------|-----------------------------------------------------------|--------------------------------------------|
//! | **Facility**    | Park, unpark, search, availability snapshots.             | [`ParkingFacility`], [`FacilityBuilder`]   |
//! | **Layout**      | Categories, coordinates, spot ids, seeded grids.          | [`Category`], [`SpotId`], [`SpotGrid`]     |
//! | **Simulation**  | Bounded gate pool over a wall-clock window.               | [`Simulation`], [`SimulationConfig`]       |
//! | **Subscribers** | Observe every gate outcome and run transition.            | [`Subscribe`], [`Event`], [`EventKind`]    |
//! | **Errors**      | Typed rejections and driver failures.                     | [`ParkingError`], [`SimulationError`]      |
//!
//! ## Optional features
//! - `logging` (default): exports the stdout [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use parkvisor::{Category, ParkingError, ParkingFacility};
//!
//! let facility = ParkingFacility::builder(parkvisor::Dimensions::new(1, 2, 1).unwrap())
//!     .with_layout(|_| Category::Automobile)
//!     .build();
//!
//! let spot = facility.park(Category::Automobile, 1001).unwrap();
//! assert_eq!(spot.to_string(), "0-0-0");
//! assert_eq!(
//!     facility.park(Category::Automobile, 1001),
//!     Err(ParkingError::AlreadyParked { vehicle: 1001 })
//! );
//!
//! facility.unpark("0-0-0", 1001).unwrap();
//! assert_eq!(facility.search_vehicle(1001).unwrap(), spot);
//! assert_eq!(facility.available_spot(Category::Automobile).0, 2);
//! ```
mod error;
mod events;
mod facility;
mod simulation;
mod subscribers;

// ---- Public re-exports ----

pub use error::{FacilityError, ParkingError, SimulationError};
pub use events::{Bus, Event, EventKind};
pub use facility::{
    Category, Coordinate, Dimensions, FacilityBuilder, FacilityStats, MalformedSpotId,
    ParkingFacility, RandomSource, SpotGrid, SpotId, SpotQueue, UnknownCategory, VehicleId,
    VehicleRecord, VehicleRegistry,
};
pub use simulation::{
    GateOutcome, Operation, OperationMix, Simulation, SimulationBuilder, SimulationConfig,
    SimulationReport, wait_for_shutdown_signal,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber.
// Enabled by default; disable with `--no-default-features`.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
