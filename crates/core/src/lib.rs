//! Core units, constants, and shared primitives for the aircraft performance workspace.

pub mod condition;
pub mod table;

pub use condition::{Airspeed, FlightCondition};
pub use error::DomainError;
pub use table::{
    AvailableThrustTable, ReferencePoint, ReferenceTable, RequiredThrustTable, TableError,
};

/// Physical constants and model defaults expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Sea-level air density of the standard atmosphere (kg/m³).
    pub const RHO_SEA_LEVEL_KG_M3: f64 = 1.225;
    /// Lowest altitude accepted from free-text altitude lists (m).
    pub const ALTITUDE_INPUT_MIN_M: f64 = 0.0;
    /// Highest altitude accepted from free-text altitude lists (m).
    pub const ALTITUDE_INPUT_MAX_M: f64 = 12_000.0;
    /// Lift within this percentage of weight counts as level flight.
    pub const LEVEL_FLIGHT_TOLERANCE_PCT: f64 = 1.0;
    /// Lower bound applied to fitted parasite drag coefficients.
    pub const PARASITE_DRAG_FLOOR: f64 = 1.0e-4;
    /// Watts per megawatt.
    pub const WATTS_PER_MEGAWATT: f64 = 1.0e6;
    /// Metres per nautical mile.
    pub const METRES_PER_NAUTICAL_MILE: f64 = 1_852.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{METRES_PER_NAUTICAL_MILE, WATTS_PER_MEGAWATT};

    /// Convert knots to metres per second.
    #[inline]
    pub fn knots_to_m_s(v: f64) -> f64 {
        v * METRES_PER_NAUTICAL_MILE / 3_600.0
    }

    /// Convert metres per second to knots.
    #[inline]
    pub fn m_s_to_knots(v: f64) -> f64 {
        v * 3_600.0 / METRES_PER_NAUTICAL_MILE
    }

    /// Convert watts to megawatts.
    #[inline]
    pub fn w_to_mw(v: f64) -> f64 {
        v / WATTS_PER_MEGAWATT
    }

    /// Convert megawatts to watts.
    #[inline]
    pub fn mw_to_w(v: f64) -> f64 {
        v * WATTS_PER_MEGAWATT
    }
}

/// Errors for inputs outside the physical domain of the models.
pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error, Clone, PartialEq)]
    pub enum DomainError {
        #[error("{what} must be positive (got {value})")]
        NonPositive { what: &'static str, value: f64 },
        #[error("non-finite value for {what}: {value}")]
        NonFinite { what: &'static str, value: f64 },
    }

    /// Reject values that are not strictly positive and finite.
    pub fn ensure_positive(value: f64, what: &'static str) -> Result<f64, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::NonFinite { what, value });
        }
        if value <= 0.0 {
            return Err(DomainError::NonPositive { what, value });
        }
        Ok(value)
    }

    /// Reject NaN and infinities.
    pub fn ensure_finite(value: f64, what: &'static str) -> Result<f64, DomainError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(DomainError::NonFinite { what, value })
        }
    }
}
