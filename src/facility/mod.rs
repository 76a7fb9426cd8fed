//! Spot-allocation core.
//!
//! Everything here is synchronous and lock-based; no operation performs I/O or
//! waits for anything but a briefly held lock.
//!
//! Internal modules:
//! - [`category`]: vehicle/spot categories and their pool index;
//! - [`spot`]: coordinates, spot ids, grid dimensions;
//! - [`queue`]: per-category FIFO of free spots;
//! - [`grid`]: static category grid and seeding;
//! - [`registry`]: vehicle records behind one reader/writer lock;
//! - [`random`]: randomness capability used by seeding;
//! - [`facility`]: the composed [`ParkingFacility`].

mod category;
#[allow(clippy::module_inception)]
mod facility;
mod grid;
mod queue;
mod random;
mod registry;
mod spot;

pub use category::{Category, UnknownCategory};
pub use facility::{FacilityBuilder, FacilityStats, ParkingFacility};
pub use grid::SpotGrid;
pub use queue::SpotQueue;
pub use random::RandomSource;
pub use registry::{VehicleId, VehicleRecord, VehicleRegistry};
pub use spot::{Coordinate, Dimensions, MalformedSpotId, SpotId};
