//! # Ledger of vehicles parked by the simulation.
//!
//! Gates pick their unpark and search targets from here, so the facility
//! is only asked about vehicles the run knows are inside.
//!
//! Entries live in a dense `Vec` with a position index, making a uniform
//! random pick and its removal O(1) (`swap_remove` + index fix-up).

use std::collections::HashMap;

use parking_lot::{Mutex, MutexGuard};

use crate::facility::{RandomSource, SpotId, VehicleId};

#[derive(Debug, Default)]
struct Entries {
    parked: Vec<(VehicleId, SpotId)>,
    index: HashMap<VehicleId, usize>,
}

/// Shared record of vehicles currently parked by gates.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    inner: Mutex<Entries>,
}

/// Exclusive access to the ledger.
///
/// The unpark gate holds this across the facility call so two gates never
/// race to release the same vehicle.
pub(crate) struct LedgerGuard<'a> {
    entries: MutexGuard<'a, Entries>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `vehicle` as parked at `spot`, replacing any previous entry.
    pub fn insert(&self, vehicle: VehicleId, spot: SpotId) {
        self.lock().insert(vehicle, spot);
    }

    /// Uniformly picks a parked vehicle without removing it.
    pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<(VehicleId, SpotId)> {
        self.lock().pick(rng)
    }

    /// Takes exclusive access for a pick-act-remove sequence.
    pub fn lock(&self) -> LedgerGuard<'_> {
        LedgerGuard {
            entries: self.inner.lock(),
        }
    }

    /// Number of vehicles recorded as parked.
    pub fn len(&self) -> usize {
        self.inner.lock().parked.len()
    }
}

impl LedgerGuard<'_> {
    /// Records `vehicle` as parked at `spot`, replacing any previous entry.
    pub fn insert(&mut self, vehicle: VehicleId, spot: SpotId) {
        let e = &mut *self.entries;
        match e.index.get(&vehicle) {
            Some(&i) => e.parked[i].1 = spot,
            None => {
                e.index.insert(vehicle, e.parked.len());
                e.parked.push((vehicle, spot));
            }
        }
    }

    /// Uniformly picks a parked vehicle without removing it.
    pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<(VehicleId, SpotId)> {
        rng.choose_one_of(&self.entries.parked).copied()
    }

    /// Removes `vehicle`; returns its spot if it was recorded.
    pub fn remove(&mut self, vehicle: VehicleId) -> Option<SpotId> {
        let e = &mut *self.entries;
        let i = e.index.remove(&vehicle)?;
        let (_, spot) = e.parked.swap_remove(i);
        if let Some(&(moved, _)) = e.parked.get(i) {
            e.index.insert(moved, i);
        }
        Some(spot)
    }
}
