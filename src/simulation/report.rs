//! # Summary of a finished simulation run.

use std::fmt;
use std::time::Duration;

use crate::facility::{Category, FacilityStats};

use super::gate::GateOutcome;

/// Counters and before/after facility state of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// Facility state when the window opened.
    pub before: FacilityStats,
    /// Facility state after every gate finished.
    pub after: FacilityStats,
    /// Gates admitted during the window.
    pub executions: u64,
    /// Parks that got a spot.
    pub parked: u64,
    /// Successful unparks.
    pub unparked: u64,
    /// Successful searches.
    pub searched: u64,
    /// Parks rejected because the category was full.
    pub full: u64,
    /// Gates that had nothing to do (see [`GateOutcome::Idle`]).
    pub idle: u64,
    /// Unexpected facility errors.
    pub failures: u64,
    /// Vehicles the run left parked.
    pub remaining_parked: usize,
    /// Time from window open to the last gate finishing.
    pub elapsed: Duration,
    /// True if a shutdown signal closed the window early.
    pub interrupted: bool,
}

impl SimulationReport {
    pub(crate) fn new(before: FacilityStats) -> Self {
        Self {
            before,
            after: before,
            executions: 0,
            parked: 0,
            unparked: 0,
            searched: 0,
            full: 0,
            idle: 0,
            failures: 0,
            remaining_parked: 0,
            elapsed: Duration::ZERO,
            interrupted: false,
        }
    }

    pub(crate) fn record(&mut self, outcome: &GateOutcome) {
        match outcome {
            GateOutcome::Parked => self.parked += 1,
            GateOutcome::Full => self.full += 1,
            GateOutcome::Unparked => self.unparked += 1,
            GateOutcome::Found => self.searched += 1,
            GateOutcome::Idle => self.idle += 1,
            GateOutcome::Failed(_) => self.failures += 1,
        }
    }

    /// Gates whose outcome was recorded.
    pub fn completed(&self) -> u64 {
        self.parked + self.unparked + self.searched + self.full + self.idle + self.failures
    }

    /// True when no spot was lost or duplicated over the run.
    ///
    /// Free spots before == free spots after + vehicles the run left parked,
    /// the registry agrees with that count, and the final facility state
    /// accounts for every active cell.
    pub fn is_consistent(&self) -> bool {
        self.before.free_total() == self.after.free_total() + self.remaining_parked
            && self.after.parked == self.before.parked + self.remaining_parked
            && self.after.is_conserved()
    }
}

fn free_line(f: &mut fmt::Formatter<'_>, label: &str, stats: &FacilityStats) -> fmt::Result {
    write!(f, "{label}:")?;
    for &c in Category::ACTIVE.iter().rev() {
        write!(f, " {}={}", c.code(), stats.free_of(c))?;
    }
    writeln!(f)
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        free_line(f, "before", &self.before)?;
        free_line(f, "after", &self.after)?;
        writeln!(f, "remaining vehicles parked: {}", self.remaining_parked)?;
        writeln!(
            f,
            "total spots: {}, total free spots: {}, remaining + free spots: {}",
            self.before.free_total(),
            self.after.free_total(),
            self.after.free_total() + self.remaining_parked
        )?;
        writeln!(
            f,
            "parked={} unparked={} searched={} full={} idle={} failures={}",
            self.parked, self.unparked, self.searched, self.full, self.idle, self.failures
        )?;
        let note = if self.interrupted {
            " (interrupted)"
        } else {
            ""
        };
        write!(
            f,
            "total executions: {} in {:?}{note}",
            self.executions, self.elapsed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParkingError;

    fn stats(free: [usize; 3], parked: usize) -> FacilityStats {
        FacilityStats {
            total_cells: 12,
            inactive_cells: 2,
            free,
            parked,
        }
    }

    #[test]
    fn consistency_requires_conservation() {
        let mut r = SimulationReport::new(stats([4, 3, 3], 0));
        r.after = stats([3, 2, 2], 3);
        r.remaining_parked = 3;
        assert!(r.is_consistent());

        r.remaining_parked = 2;
        assert!(!r.is_consistent());

        r.remaining_parked = 3;
        r.after = stats([3, 2, 1], 3);
        assert!(!r.is_consistent());
    }

    #[test]
    fn record_counts_every_outcome() {
        let mut r = SimulationReport::new(stats([4, 3, 3], 0));
        for o in [
            GateOutcome::Parked,
            GateOutcome::Parked,
            GateOutcome::Full,
            GateOutcome::Unparked,
            GateOutcome::Found,
            GateOutcome::Idle,
            GateOutcome::Failed(ParkingError::VehicleNotFound { vehicle: 1 }),
        ] {
            r.record(&o);
        }
        assert_eq!((r.parked, r.full, r.unparked), (2, 1, 1));
        assert_eq!((r.searched, r.idle, r.failures), (1, 1, 1));
        assert_eq!(r.completed(), 7);
    }

    #[test]
    fn display_lists_free_spots_per_category() {
        let r = SimulationReport::new(stats([4, 3, 2], 0));
        let text = r.to_string();
        assert!(text.starts_with("before: A1=2 B1=3 M1=4\n"), "{text}");
        assert!(text.contains("total executions: 0"));
    }
}
