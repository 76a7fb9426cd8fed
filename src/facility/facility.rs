//! # ParkingFacility: the spot-allocation engine.
//!
//! Composes the static [`SpotGrid`], one [`SpotQueue`] of free coordinates per
//! active category, and the shared [`VehicleRegistry`].
//!
//! ## Operation flow
//! ```text
//! park(category, vehicle)
//!   ├─► registry.is_parked(vehicle)          (shared lock)   → AlreadyParked
//!   ├─► pools[category]                                       → InvalidVehicleType
//!   ├─► pool.dequeue()                       (pool lock)     → SpotNotFound
//!   └─► registry.update(vehicle)             (exclusive)
//!         ├─ lost a race to another park → pool.requeue_front(spot), AlreadyParked
//!         └─ write {spot, category, still_parked = true}      → SpotId
//!
//! unpark(spot_id, vehicle)
//!   ├─► registry.lookup(vehicle)             (shared lock)   → VehicleNotFound
//!   └─► registry.update(vehicle)             (exclusive)
//!         ├─ re-check record (spot id, still_parked)          → VehicleNotFound
//!         ├─ still_parked = false
//!         └─ pools[record.category].enqueue(coordinate)       (pool lock, nested)
//! ```
//!
//! ## Invariants
//! - A coordinate is in at most one pool, and never in a pool while a record
//!   with `still_parked = true` points at it.
//! - free spots + still-parked records == active cells, at every quiescent point.
//! - The registry lock is always taken before a pool lock.

use std::collections::hash_map::Entry;

use rand::Rng;

use crate::error::{FacilityError, ParkingError};

use super::category::Category;
use super::grid::SpotGrid;
use super::queue::SpotQueue;
use super::random::RandomSource;
use super::registry::{VehicleId, VehicleRecord, VehicleRegistry};
use super::spot::{Coordinate, Dimensions, SpotId};

/// Point-in-time counters of a facility.
///
/// Each field is read under its own lock, so under concurrent traffic the
/// fields are individually exact but not a single atomic snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacilityStats {
    /// Total grid cells.
    pub total_cells: usize,
    /// Cells tagged [`Category::Inactive`].
    pub inactive_cells: usize,
    /// Free spots per active category, indexed like [`Category::ACTIVE`].
    pub free: [usize; 3],
    /// Vehicles whose record is still parked.
    pub parked: usize,
}

impl FacilityStats {
    /// Cells that can hold a vehicle.
    pub fn active_cells(&self) -> usize {
        self.total_cells - self.inactive_cells
    }

    /// Free spots across all categories.
    pub fn free_total(&self) -> usize {
        self.free.iter().sum()
    }

    /// Free spots of `category` (0 for inactive).
    pub fn free_of(&self, category: Category) -> usize {
        category.pool_index().map_or(0, |i| self.free[i])
    }

    /// True when every active cell is either free or held by a parked vehicle.
    pub fn is_conserved(&self) -> bool {
        self.free_total() + self.parked == self.active_cells()
    }
}

/// Multi-floor parking facility safe for concurrent park/unpark/search.
///
/// Shared between gates through an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct ParkingFacility {
    grid: SpotGrid,
    pools: [SpotQueue<Coordinate>; 3],
    registry: VehicleRegistry,
}

impl ParkingFacility {
    /// Builds a facility of `floors × columns × rows` cells.
    ///
    /// - `seeded = true`: every cell draws a category uniformly from the thread RNG.
    /// - `seeded = false`: every cell is inactive and all pools are empty.
    ///
    /// # Example
    /// ```
    /// use parkvisor::{Category, ParkingFacility};
    ///
    /// let facility = ParkingFacility::new(2, 10, 10, true).unwrap();
    /// let stats = facility.stats();
    /// assert_eq!(stats.free_total() + stats.inactive_cells, 200);
    /// ```
    pub fn new(
        floors: usize,
        columns: usize,
        rows: usize,
        seeded: bool,
    ) -> Result<Self, FacilityError> {
        let builder = Self::builder(Dimensions::new(floors, columns, rows)?);
        Ok(if seeded {
            builder.seeded_with(&mut rand::rng()).build()
        } else {
            builder.build()
        })
    }

    /// Starts a builder for deterministic layouts.
    pub fn builder(dims: Dimensions) -> FacilityBuilder {
        FacilityBuilder {
            grid: SpotGrid::inactive(dims),
        }
    }

    fn from_grid(grid: SpotGrid) -> Self {
        let pools = Category::ACTIVE.map(|c| grid.cells_of(c).collect::<SpotQueue<_>>());
        Self {
            grid,
            pools,
            registry: VehicleRegistry::new(),
        }
    }

    #[inline]
    fn pool(&self, category: Category) -> Option<&SpotQueue<Coordinate>> {
        category.pool_index().map(|i| &self.pools[i])
    }

    /// Allocates a free spot of `category` to `vehicle`.
    ///
    /// # Errors
    /// - [`ParkingError::AlreadyParked`]: the vehicle still holds a spot.
    /// - [`ParkingError::InvalidVehicleType`]: `category` is inactive.
    /// - [`ParkingError::SpotNotFound`]: no free spot of that category (expected when full).
    pub fn park(&self, category: Category, vehicle: VehicleId) -> Result<SpotId, ParkingError> {
        if self.registry.is_parked(vehicle) {
            return Err(ParkingError::AlreadyParked { vehicle });
        }

        let pool = self
            .pool(category)
            .ok_or(ParkingError::InvalidVehicleType { category })?;
        let coordinate = pool
            .dequeue()
            .ok_or(ParkingError::SpotNotFound { category })?;

        let spot = coordinate.spot_id();
        let fresh = VehicleRecord {
            spot,
            category,
            still_parked: true,
        };

        self.registry.update(vehicle, |entry| match entry {
            Entry::Occupied(o) if o.get().still_parked => {
                // Another gate parked this id between the check and now; the
                // spot came from the head, so it goes back there.
                pool.requeue_front(coordinate);
                Err(ParkingError::AlreadyParked { vehicle })
            }
            Entry::Occupied(mut o) => {
                o.insert(fresh);
                Ok(spot)
            }
            Entry::Vacant(v) => {
                v.insert(fresh);
                Ok(spot)
            }
        })
    }

    /// Releases the spot `spot_id` held by `vehicle`.
    ///
    /// The record is kept with `still_parked = false`; the coordinate goes back
    /// to the tail of its category's pool inside the same critical section.
    ///
    /// # Errors
    /// - [`ParkingError::VehicleNotFound`]: unknown vehicle, `spot_id` is not the
    ///   vehicle's spot, or the vehicle was already unparked.
    /// - [`ParkingError::InvalidVehicleType`]: the record's category has no pool.
    pub fn unpark(&self, spot_id: &str, vehicle: VehicleId) -> Result<(), ParkingError> {
        let not_found = ParkingError::VehicleNotFound { vehicle };

        match self.registry.lookup(vehicle) {
            Some(r) if r.still_parked && r.spot.matches(spot_id) => {}
            _ => return Err(not_found),
        }

        self.registry.update(vehicle, |entry| {
            let Entry::Occupied(mut o) = entry else {
                return Err(not_found);
            };
            let record = o.get_mut();
            if !record.still_parked || !record.spot.matches(spot_id) {
                return Err(not_found);
            }
            let category = record.category;
            let pool = self
                .pool(category)
                .ok_or(ParkingError::InvalidVehicleType { category })?;
            record.still_parked = false;
            pool.enqueue(record.spot.coordinate());
            Ok(())
        })
    }

    /// Current or last-known spot of `vehicle`.
    ///
    /// Answers for unparked vehicles too (their last spot); it does not tell
    /// whether the vehicle is still there.
    ///
    /// # Errors
    /// [`ParkingError::VehicleNotFound`] if the vehicle never parked.
    pub fn search_vehicle(&self, vehicle: VehicleId) -> Result<SpotId, ParkingError> {
        self.registry
            .lookup(vehicle)
            .map(|r| r.spot)
            .ok_or(ParkingError::VehicleNotFound { vehicle })
    }

    /// Free-spot count and head-to-tail snapshot for `category`.
    ///
    /// Inactive categories yield `(0, [])`.
    pub fn available_spot(&self, category: Category) -> (usize, Vec<Coordinate>) {
        self.pool(category)
            .map(SpotQueue::size_and_snapshot)
            .unwrap_or_default()
    }

    /// Counters for reports and conservation checks.
    pub fn stats(&self) -> FacilityStats {
        let [.., inactive_cells] = self.grid.counts();
        FacilityStats {
            total_cells: self.grid.dimensions().cells(),
            inactive_cells,
            free: self.pools.each_ref().map(SpotQueue::size),
            parked: self.registry.parked_count(),
        }
    }

    /// Category of the cell at `c`, or `None` outside the grid.
    pub fn category_at(&self, c: Coordinate) -> Option<Category> {
        self.grid.get(c)
    }

    /// Size of the grid this facility was built over.
    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    /// Read-only view of the vehicle registry.
    ///
    /// Records change only through [`park`](Self::park) and
    /// [`unpark`](Self::unpark), which move the spot between the registry and
    /// its pool in one step.
    ///
    /// ```compile_fail
    /// use parkvisor::{Category, Dimensions, ParkingFacility};
    ///
    /// let facility = ParkingFacility::builder(Dimensions::new(1, 1, 1).unwrap())
    ///     .with_layout(|_| Category::Automobile)
    ///     .build();
    /// facility.registry().update(1, |_| ());
    /// ```
    pub fn registry(&self) -> &VehicleRegistry {
        &self.registry
    }
}

/// Builder for facilities with a chosen layout.
///
/// ```
/// use parkvisor::{Category, Dimensions, ParkingFacility};
///
/// let dims = Dimensions::new(1, 2, 2).unwrap();
/// let facility = ParkingFacility::builder(dims)
///     .with_layout(|_| Category::Bicycle)
///     .build();
/// assert_eq!(facility.available_spot(Category::Bicycle).0, 4);
/// ```
#[derive(Debug)]
pub struct FacilityBuilder {
    grid: SpotGrid,
}

impl FacilityBuilder {
    /// Seeds every cell uniformly from `rng`.
    pub fn seeded_with<R: Rng>(self, rng: &mut R) -> Self {
        self.seeded_from(rng)
    }

    /// Seeds every cell uniformly from any [`RandomSource`].
    pub fn seeded_from<R: RandomSource + ?Sized>(self, rng: &mut R) -> Self {
        Self {
            grid: SpotGrid::seeded(self.grid.dimensions(), rng),
        }
    }

    /// Assigns every cell from `layout`.
    pub fn with_layout(self, layout: impl FnMut(Coordinate) -> Category) -> Self {
        Self {
            grid: SpotGrid::from_fn(self.grid.dimensions(), layout),
        }
    }

    /// Builds the facility; pools are filled in floor → column → row order.
    pub fn build(self) -> ParkingFacility {
        ParkingFacility::from_grid(self.grid)
    }
}
