//! # Vehicle registry: who is parked where.
//!
//! [`VehicleRegistry`] maps a vehicle id to its [`VehicleRecord`]: the spot it
//! was last given, the category of that spot, and whether it is still parked.
//! Records are kept after unpark so [`ParkingFacility::search_vehicle`]
//! can answer with the last known spot.
//!
//! ## Lock discipline
//! ```text
//! VehicleRegistry ── RwLock<HashMap<VehicleId, VehicleRecord>>
//!     read  → lookup / is_parked / counts / snapshot
//!     write → update (closure runs inside the critical section)
//!
//! Lock order: registry → pool.
//!   A pool lock may be taken *inside* `update`, never the other way round.
//! ```
//!
//! [`ParkingFacility::search_vehicle`]: crate::ParkingFacility::search_vehicle

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use parking_lot::RwLock;

use super::category::Category;
use super::spot::SpotId;

/// Caller-unique vehicle identifier.
pub type VehicleId = u64;

/// Where a vehicle is (or was last) parked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleRecord {
    /// Spot assigned on the most recent park.
    pub spot: SpotId,
    /// Category of that spot.
    pub category: Category,
    /// `false` once the vehicle has been unparked.
    pub still_parked: bool,
}

/// Concurrent map of vehicle records guarded by a single reader/writer lock.
#[derive(Debug, Default)]
pub struct VehicleRegistry {
    records: RwLock<HashMap<VehicleId, VehicleRecord>>,
}

impl VehicleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the vehicle's record (shared lock).
    pub fn lookup(&self, vehicle: VehicleId) -> Option<VehicleRecord> {
        self.records.read().get(&vehicle).copied()
    }

    /// True if the vehicle has a record that is still parked (shared lock).
    pub fn is_parked(&self, vehicle: VehicleId) -> bool {
        self.records
            .read()
            .get(&vehicle)
            .is_some_and(|r| r.still_parked)
    }

    /// Runs `f` on the vehicle's entry while holding the exclusive lock.
    ///
    /// Everything `f` does (including touching a pool) is atomic with respect
    /// to every other registry reader and writer. Crate-private: a record may
    /// only change together with its pool.
    pub(crate) fn update<R>(
        &self,
        vehicle: VehicleId,
        f: impl FnOnce(Entry<'_, VehicleId, VehicleRecord>) -> R,
    ) -> R {
        let mut records = self.records.write();
        f(records.entry(vehicle))
    }

    /// Number of records (parked or not).
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True if no vehicle has ever parked.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Number of records still parked.
    pub fn parked_count(&self) -> usize {
        self.records
            .read()
            .values()
            .filter(|r| r.still_parked)
            .count()
    }

    /// Copy of every record, sorted by vehicle id.
    pub fn snapshot(&self) -> Vec<(VehicleId, VehicleRecord)> {
        let mut all: Vec<_> = self
            .records
            .read()
            .iter()
            .map(|(id, r)| (*id, *r))
            .collect();
        all.sort_unstable_by_key(|(id, _)| *id);
        all
    }
}
