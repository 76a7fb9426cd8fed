//! # Simulation configuration.
//!
//! Provides [`SimulationConfig`], the centralized settings of one gate run,
//! and [`OperationMix`], the weights used to pick each gate's operation.
//!
//! ## Sentinel values
//! - `gates = 0` → treated as 1 (a run always has at least one gate)
//! - `grace = 0s` → wait for in-flight gates without a limit
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::error::SimulationError;
use crate::facility::{Dimensions, VehicleId};

/// Operation a gate performs on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Park a new vehicle in a random active category.
    Park,
    /// Release a vehicle the run parked earlier.
    Unpark,
    /// Look up a vehicle the run parked earlier.
    Search,
}

/// Relative weights of the three gate operations.
///
/// The default mix is park 6 : unpark 3 : search 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationMix {
    /// Weight of [`Operation::Park`].
    pub park: u32,
    /// Weight of [`Operation::Unpark`].
    pub unpark: u32,
    /// Weight of [`Operation::Search`].
    pub search: u32,
}

impl OperationMix {
    /// Sum of all weights.
    #[inline]
    pub fn total(&self) -> u32 {
        self.park + self.unpark + self.search
    }

    /// Maps a roll in `1..=total()` to an operation.
    ///
    /// ```
    /// use parkvisor::{Operation, OperationMix};
    ///
    /// let mix = OperationMix::default();
    /// assert_eq!(mix.pick(6), Operation::Park);
    /// assert_eq!(mix.pick(7), Operation::Unpark);
    /// assert_eq!(mix.pick(10), Operation::Search);
    /// ```
    pub fn pick(&self, roll: u32) -> Operation {
        if roll <= self.park {
            Operation::Park
        } else if roll <= self.park + self.unpark {
            Operation::Unpark
        } else {
            Operation::Search
        }
    }
}

impl Default for OperationMix {
    fn default() -> Self {
        Self {
            park: 6,
            unpark: 3,
            search: 1,
        }
    }
}

/// Settings for one simulation run.
///
/// ## Field semantics
/// - `floors`, `columns`, `rows`: facility size (seeded randomly)
/// - `gates`: maximum gates in flight at once
/// - `duration`: wall-clock window during which new gates are admitted
/// - `warmup`: pause between building the facility and opening the window
/// - `grace`: maximum wait for in-flight gates after the window closes
/// - `seed`: makes the facility layout and every gate's choices reproducible
/// - `first_vehicle`: id of the vehicle parked by gate 0; gate `n` uses `first_vehicle + n`
/// - `handle_signals`: close the window early on SIGINT/SIGTERM/Ctrl-C
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub floors: usize,
    pub columns: usize,
    pub rows: usize,
    pub gates: usize,
    pub duration: Duration,
    pub warmup: Duration,
    pub grace: Duration,
    pub bus_capacity: usize,
    pub mix: OperationMix,
    pub seed: Option<u64>,
    pub first_vehicle: VehicleId,
    pub handle_signals: bool,
}

impl SimulationConfig {
    /// Number of gates that may run at once (at least 1).
    #[inline]
    pub fn gates_clamped(&self) -> usize {
        self.gates.max(1)
    }

    /// Grace limit as an `Option` (`None` = wait without limit).
    #[inline]
    pub fn grace_limit(&self) -> Option<Duration> {
        if self.grace == Duration::ZERO {
            None
        } else {
            Some(self.grace)
        }
    }

    /// Bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Facility dimensions, or an error if the cell count overflows.
    pub fn dimensions(&self) -> Result<Dimensions, SimulationError> {
        Ok(Dimensions::new(self.floors, self.columns, self.rows)?)
    }

    /// Checks the settings a run cannot start without.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.dimensions()?;
        let weights = self
            .mix
            .park
            .checked_add(self.mix.unpark)
            .and_then(|s| s.checked_add(self.mix.search));
        if weights.is_none() {
            return Err(SimulationError::InvalidConfig {
                reason: "operation weights overflow".into(),
            });
        }
        if self.mix.total() == 0 {
            return Err(SimulationError::InvalidConfig {
                reason: "operation weights are all zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    /// Default configuration:
    ///
    /// - `8 × 1000 × 1000` cells, `10` gates
    /// - `duration = 15s`, `warmup = 5s`, `grace = 30s`
    /// - `bus_capacity = 4096`, default [`OperationMix`]
    /// - unseeded, first vehicle `10000`, OS signals handled
    fn default() -> Self {
        Self {
            floors: 8,
            columns: 1000,
            rows: 1000,
            gates: 10,
            duration: Duration::from_secs(15),
            warmup: Duration::from_secs(5),
            grace: Duration::from_secs(30),
            bus_capacity: 4096,
            mix: OperationMix::default(),
            seed: None,
            first_vehicle: 10_000,
            handle_signals: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_clamped() {
        let cfg = SimulationConfig {
            gates: 0,
            grace: Duration::ZERO,
            bus_capacity: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.gates_clamped(), 1);
        assert_eq!(cfg.grace_limit(), None);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn validate_rejects_bad_settings() {
        assert!(SimulationConfig::default().validate().is_ok());

        let zero_mix = SimulationConfig {
            mix: OperationMix {
                park: 0,
                unpark: 0,
                search: 0,
            },
            ..SimulationConfig::default()
        };
        assert_eq!(
            zero_mix.validate().map_err(|e| e.as_label()),
            Err("simulation_invalid_config")
        );

        let huge = SimulationConfig {
            floors: usize::MAX,
            columns: 2,
            ..SimulationConfig::default()
        };
        assert_eq!(
            huge.validate().map_err(|e| e.as_label()),
            Err("facility_invalid_dimensions")
        );
    }

    #[test]
    fn mix_boundaries() {
        let mix = OperationMix {
            park: 1,
            unpark: 0,
            search: 2,
        };
        assert_eq!(mix.total(), 3);
        assert_eq!(mix.pick(1), Operation::Park);
        assert_eq!(mix.pick(2), Operation::Search);
        assert_eq!(mix.pick(3), Operation::Search);
    }
}
