//! # Gate: one simulated entrance performing one operation.
//!
//! Each admitted tick of the run becomes one gate. The gate rolls an
//! [`Operation`] from the configured [`OperationMix`], performs it against the
//! shared facility and publishes the outcome.
//!
//! ```text
//! roll 1..=total
//!   ├─ Park   → vehicle = first_vehicle + tick, random active category
//!   │            ├─ Ok(spot)          → ledger.insert, VehicleParked
//!   │            ├─ SpotNotFound      → FacilityFull (expected)
//!   │            └─ other error       → OperationFailed
//!   ├─ Unpark → ledger locked, random parked vehicle
//!   │            ├─ Ok                → ledger.remove, VehicleUnparked
//!   │            └─ error             → OperationFailed
//!   └─ Search → random parked vehicle (ledger released before searching)
//!                ├─ Ok(spot)          → VehicleFound
//!                └─ error             → OperationFailed
//! ```
//!
//! Unpark and search on an empty ledger do nothing ([`GateOutcome::Idle`]).

use std::sync::Arc;

use crate::error::ParkingError;
use crate::events::{Bus, Event, EventKind};
use crate::facility::{Category, ParkingFacility, RandomSource, VehicleId};

use super::config::{Operation, OperationMix};
use super::ledger::Ledger;

/// What one gate did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// A vehicle got a spot.
    Parked,
    /// No free spot of the drawn category.
    Full,
    /// A vehicle left its spot.
    Unparked,
    /// A vehicle's spot was looked up.
    Found,
    /// Nothing to unpark or search, or no category could be drawn.
    Idle,
    /// An unexpected facility error.
    Failed(ParkingError),
}

pub(crate) struct Gate {
    pub tick: u64,
    pub first_vehicle: VehicleId,
    pub mix: OperationMix,
    pub facility: Arc<ParkingFacility>,
    pub ledger: Arc<Ledger>,
    pub bus: Bus,
}

impl Gate {
    /// Performs one operation and publishes its event.
    pub fn run<R: RandomSource + ?Sized>(&self, rng: &mut R) -> GateOutcome {
        let total = i64::from(self.mix.total());
        let roll = rng.int_in_range(1, total).clamp(1, total);
        match self.mix.pick(u32::try_from(roll).unwrap_or(u32::MAX)) {
            Operation::Park => self.park(rng),
            Operation::Unpark => self.unpark(rng),
            Operation::Search => self.search(rng),
        }
    }

    fn event(&self, kind: EventKind, vehicle: VehicleId) -> Event {
        Event::new(kind).with_gate(self.tick).with_vehicle(vehicle)
    }

    fn fail(&self, vehicle: VehicleId, err: ParkingError) -> GateOutcome {
        self.bus.publish(
            self.event(EventKind::OperationFailed, vehicle)
                .with_reason(err.to_string()),
        );
        GateOutcome::Failed(err)
    }

    fn park<R: RandomSource + ?Sized>(&self, rng: &mut R) -> GateOutcome {
        let vehicle = self.first_vehicle.wrapping_add(self.tick);
        let Some(&category) = rng.choose_one_of(&Category::ACTIVE) else {
            return GateOutcome::Idle;
        };

        match self.facility.park(category, vehicle) {
            Ok(spot) => {
                self.ledger.insert(vehicle, spot);
                self.bus.publish(
                    self.event(EventKind::VehicleParked, vehicle)
                        .with_category(category)
                        .with_spot(spot),
                );
                GateOutcome::Parked
            }
            Err(e) if e.is_expected() => {
                let event = self.event(EventKind::FacilityFull, vehicle);
                self.bus.publish(event.with_category(category));
                GateOutcome::Full
            }
            Err(e) => self.fail(vehicle, e),
        }
    }

    fn unpark<R: RandomSource + ?Sized>(&self, rng: &mut R) -> GateOutcome {
        let mut ledger = self.ledger.lock();
        let Some((vehicle, spot)) = ledger.pick(rng) else {
            return GateOutcome::Idle;
        };

        match self.facility.unpark(&spot.to_string(), vehicle) {
            Ok(()) => {
                ledger.remove(vehicle);
                drop(ledger);
                let event = self.event(EventKind::VehicleUnparked, vehicle);
                self.bus.publish(event.with_spot(spot));
                GateOutcome::Unparked
            }
            Err(e) => {
                drop(ledger);
                self.fail(vehicle, e)
            }
        }
    }

    fn search<R: RandomSource + ?Sized>(&self, rng: &mut R) -> GateOutcome {
        let Some((vehicle, _)) = self.ledger.pick(rng) else {
            return GateOutcome::Idle;
        };

        match self.facility.search_vehicle(vehicle) {
            Ok(spot) => {
                let event = self.event(EventKind::VehicleFound, vehicle);
                self.bus.publish(event.with_spot(spot));
                GateOutcome::Found
            }
            Err(e) => self.fail(vehicle, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::Dimensions;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gate(
        tick: u64,
        mix: OperationMix,
        facility: &Arc<ParkingFacility>,
        ledger: &Arc<Ledger>,
    ) -> Gate {
        Gate {
            tick,
            first_vehicle: 10_000,
            mix,
            facility: Arc::clone(facility),
            ledger: Arc::clone(ledger),
            bus: Bus::new(64),
        }
    }

    fn only(op: Operation) -> OperationMix {
        OperationMix {
            park: u32::from(op == Operation::Park),
            unpark: u32::from(op == Operation::Unpark),
            search: u32::from(op == Operation::Search),
        }
    }

    fn single_category(category: Category, cells: usize) -> Arc<ParkingFacility> {
        let dims = Dimensions::new(1, cells, 1).unwrap();
        let facility = ParkingFacility::builder(dims).with_layout(|_| category);
        Arc::new(facility.build())
    }

    #[test]
    fn park_records_vehicle_in_ledger() {
        let dims = Dimensions::new(1, 3, 2).unwrap();
        let facility = Arc::new(
            ParkingFacility::builder(dims)
                .seeded_with(&mut StdRng::seed_from_u64(1))
                .build(),
        );
        let ledger = Arc::new(Ledger::new());
        let mut rng = StdRng::seed_from_u64(9);

        let mut parked = 0;
        for tick in 0..20 {
            match gate(tick, only(Operation::Park), &facility, &ledger).run(&mut rng) {
                GateOutcome::Parked => parked += 1,
                GateOutcome::Full => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(ledger.len(), parked);
        assert_eq!(facility.stats().parked, parked);
        assert!(facility.stats().is_conserved());
    }

    #[test]
    fn unpark_and_search_are_idle_on_empty_ledger() {
        let facility = single_category(Category::Bicycle, 4);
        let ledger = Arc::new(Ledger::new());
        let mut rng = StdRng::seed_from_u64(2);

        assert_eq!(
            gate(0, only(Operation::Unpark), &facility, &ledger).run(&mut rng),
            GateOutcome::Idle
        );
        assert_eq!(
            gate(1, only(Operation::Search), &facility, &ledger).run(&mut rng),
            GateOutcome::Idle
        );
    }

    #[test]
    fn unpark_releases_a_ledger_vehicle() {
        let facility = single_category(Category::Automobile, 2);
        let ledger = Arc::new(Ledger::new());
        let spot = facility.park(Category::Automobile, 77).unwrap();
        ledger.insert(77, spot);
        let mut rng = StdRng::seed_from_u64(4);

        assert_eq!(
            gate(0, only(Operation::Search), &facility, &ledger).run(&mut rng),
            GateOutcome::Found
        );
        assert_eq!(
            gate(1, only(Operation::Unpark), &facility, &ledger).run(&mut rng),
            GateOutcome::Unparked
        );
        assert_eq!(ledger.len(), 0);
        assert_eq!(facility.available_spot(Category::Automobile).0, 2);
    }

    #[test]
    fn stale_ledger_entry_is_reported_as_failure() {
        let facility = single_category(Category::Automobile, 2);
        let ledger = Arc::new(Ledger::new());
        let spot = facility.park(Category::Automobile, 5).unwrap();
        facility.unpark(&spot.to_string(), 5).unwrap();
        ledger.insert(5, spot);

        let g = gate(3, only(Operation::Unpark), &facility, &ledger);
        let mut rx = g.bus.subscribe();
        let outcome = g.run(&mut StdRng::seed_from_u64(0));

        assert_eq!(
            outcome,
            GateOutcome::Failed(ParkingError::VehicleNotFound { vehicle: 5 })
        );
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::OperationFailed);
        assert_eq!(ev.gate, Some(3));
        assert_eq!(ev.reason.as_deref(), Some("vehicle 5 not found"));
    }

    #[test]
    fn full_facility_is_not_a_failure() {
        let facility = single_category(Category::Inactive, 3);
        let ledger = Arc::new(Ledger::new());
        let mut rng = StdRng::seed_from_u64(5);

        for tick in 0..10 {
            assert_eq!(
                gate(tick, only(Operation::Park), &facility, &ledger).run(&mut rng),
                GateOutcome::Full
            );
        }
        assert_eq!(ledger.len(), 0);
    }

    /// Returns values outside every requested range.
    struct OutOfRange;

    impl RandomSource for OutOfRange {
        fn choose_one_of<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
            options.last()
        }

        fn int_in_range(&mut self, _min: i64, max: i64) -> i64 {
            max.saturating_add(1_000)
        }
    }

    #[test]
    fn out_of_range_draws_do_not_panic() {
        let facility = single_category(Category::Automobile, 2);
        let ledger = Arc::new(Ledger::new());

        assert_eq!(
            gate(0, only(Operation::Park), &facility, &ledger).run(&mut OutOfRange),
            GateOutcome::Parked
        );
        assert_eq!(
            gate(1, only(Operation::Unpark), &facility, &ledger).run(&mut OutOfRange),
            GateOutcome::Unparked
        );
        assert_eq!(
            gate(2, OperationMix::default(), &facility, &ledger).run(&mut OutOfRange),
            GateOutcome::Idle
        );
        assert!(facility.stats().is_conserved());
    }
}
