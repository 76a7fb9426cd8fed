//! Error types used by the parking facility and the gate simulation.
//!
//! This module defines three error enums:
//!
//! - [`ParkingError`]: rejections returned by facility operations (park, unpark, search).
//! - [`FacilityError`]: failures while constructing a facility.
//! - [`SimulationError`]: failures of the simulation driver itself.
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! [`ParkingError::is_expected`] separates "facility full" from real bugs.

use std::time::Duration;
use thiserror::Error;

use crate::facility::{Category, VehicleId};

/// # Errors returned by facility operations.
///
/// Every variant is a typed rejection; the facility never panics on caller input.
/// [`ParkingError::SpotNotFound`] is the only expected condition (the pool for a
/// category is exhausted), everything else indicates a caller mistake.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParkingError {
    /// The vehicle already holds a spot.
    #[error("vehicle {vehicle} is already parked")]
    AlreadyParked {
        /// Vehicle that tried to park twice.
        vehicle: VehicleId,
    },

    /// The category cannot hold vehicles (inactive spots).
    #[error("invalid vehicle type {category}")]
    InvalidVehicleType {
        /// Category that was rejected.
        category: Category,
    },

    /// No free spot is left for the category.
    #[error("spot not found for {category}")]
    SpotNotFound {
        /// Category whose pool is empty.
        category: Category,
    },

    /// Unknown vehicle, spot id mismatch, or vehicle already left.
    #[error("vehicle {vehicle} not found")]
    VehicleNotFound {
        /// Vehicle that could not be matched.
        vehicle: VehicleId,
    },
}

impl ParkingError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use parkvisor::{Category, ParkingError};
    ///
    /// let err = ParkingError::SpotNotFound { category: Category::Automobile };
    /// assert_eq!(err.as_label(), "spot_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ParkingError::AlreadyParked { .. } => "already_parked",
            ParkingError::InvalidVehicleType { .. } => "invalid_vehicle_type",
            ParkingError::SpotNotFound { .. } => "spot_not_found",
            ParkingError::VehicleNotFound { .. } => "vehicle_not_found",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ParkingError::AlreadyParked { vehicle } => format!("already parked: {vehicle}"),
            ParkingError::InvalidVehicleType { category } => {
                format!("invalid vehicle type: {}", category.code())
            }
            ParkingError::SpotNotFound { category } => format!("full: {}", category.code()),
            ParkingError::VehicleNotFound { vehicle } => format!("not found: {vehicle}"),
        }
    }

    /// Indicates whether the error is an expected outcome rather than a bug.
    ///
    /// Returns `true` only for [`ParkingError::SpotNotFound`].
    ///
    /// # Example
    /// ```
    /// use parkvisor::{Category, ParkingError};
    ///
    /// let full = ParkingError::SpotNotFound { category: Category::Bicycle };
    /// assert!(full.is_expected());
    ///
    /// let twice = ParkingError::AlreadyParked { vehicle: 7 };
    /// assert!(!twice.is_expected());
    /// ```
    pub fn is_expected(&self) -> bool {
        matches!(self, ParkingError::SpotNotFound { .. })
    }
}

/// # Errors produced while building a facility.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacilityError {
    /// The grid cell count does not fit in memory addressing.
    #[error("invalid dimensions {floors}x{columns}x{rows}: cell count overflows")]
    InvalidDimensions {
        /// Requested floors.
        floors: usize,
        /// Requested columns per floor.
        columns: usize,
        /// Requested rows per column.
        rows: usize,
    },
}

impl FacilityError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FacilityError::InvalidDimensions { .. } => "facility_invalid_dimensions",
        }
    }
}

/// # Errors produced by the simulation driver.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SimulationError {
    /// The facility could not be built.
    #[error(transparent)]
    Facility(#[from] FacilityError),

    /// The configuration was rejected by [`SimulationConfig::validate`](crate::SimulationConfig::validate).
    #[error("invalid simulation config: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },

    /// Gates still running after the grace period; the run was abandoned.
    #[error("grace {grace:?} exceeded; {outstanding} gates still running")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Gates that did not finish in time.
        outstanding: usize,
    },
}

impl SimulationError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use parkvisor::SimulationError;
    /// use std::time::Duration;
    ///
    /// let err = SimulationError::GraceExceeded { grace: Duration::from_secs(5), outstanding: 2 };
    /// assert_eq!(err.as_label(), "simulation_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SimulationError::Facility(e) => e.as_label(),
            SimulationError::InvalidConfig { .. } => "simulation_invalid_config",
            SimulationError::GraceExceeded { .. } => "simulation_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SimulationError::Facility(e) => e.to_string(),
            SimulationError::InvalidConfig { reason } => format!("config: {reason}"),
            SimulationError::GraceExceeded { grace, outstanding } => {
                format!("grace exceeded after {grace:?}; outstanding gates={outstanding}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_spot_not_found_is_expected() {
        let errs = [
            ParkingError::AlreadyParked { vehicle: 1 },
            ParkingError::InvalidVehicleType {
                category: Category::Inactive,
            },
            ParkingError::VehicleNotFound { vehicle: 1 },
        ];
        for e in errs {
            assert!(!e.is_expected(), "{} should not be expected", e.as_label());
        }
        assert!(
            ParkingError::SpotNotFound {
                category: Category::Motorcycle
            }
            .is_expected()
        );
    }

    #[test]
    fn display_names_the_subject() {
        let e = ParkingError::VehicleNotFound { vehicle: 10042 };
        assert_eq!(e.to_string(), "vehicle 10042 not found");

        let e = ParkingError::SpotNotFound {
            category: Category::Bicycle,
        };
        assert_eq!(e.to_string(), "spot not found for bicycle");
        assert_eq!(e.as_message(), "full: B1");
    }
}
