//! # Gate simulation.
//!
//! Drives many concurrent gates against one [`ParkingFacility`](crate::ParkingFacility)
//! for a fixed wall-clock window and checks that no spot was lost.
//!
//! - [`SimulationConfig`] run settings and [`OperationMix`] weights
//! - [`Simulation`] / [`SimulationBuilder`] the driver
//! - [`SimulationReport`] before/after counters and the conservation check
//! - [`wait_for_shutdown_signal`] OS signal helper used by the driver

mod config;
mod driver;
mod gate;
mod ledger;
mod report;
mod shutdown;

pub use config::{Operation, OperationMix, SimulationConfig};
pub use driver::{Simulation, SimulationBuilder};
pub use gate::GateOutcome;
pub use report::SimulationReport;
pub use shutdown::wait_for_shutdown_signal;
