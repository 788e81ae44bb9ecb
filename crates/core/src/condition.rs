//! Flight-condition inputs supplied fresh by the caller for every evaluation.

use serde::{Deserialize, Serialize};

use crate::units::knots_to_m_s;

/// True airspeed in the unit the caller entered it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum Airspeed {
    MetersPerSecond(f64),
    Knots(f64),
}

impl Airspeed {
    /// Airspeed normalized to metres per second.
    #[inline]
    pub fn to_m_s(self) -> f64 {
        match self {
            Airspeed::MetersPerSecond(v) => v,
            Airspeed::Knots(v) => knots_to_m_s(v),
        }
    }
}

/// Altitude, airspeed and weight for a single evaluation point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightCondition {
    pub altitude_m: f64,
    pub airspeed: Airspeed,
    pub weight_n: f64,
}

impl FlightCondition {
    pub fn new(altitude_m: f64, airspeed: Airspeed, weight_n: f64) -> Self {
        Self {
            altitude_m,
            airspeed,
            weight_n,
        }
    }

    /// Shorthand for a condition with airspeed already in m/s.
    pub fn with_m_s(altitude_m: f64, velocity_m_s: f64, weight_n: f64) -> Self {
        Self::new(
            altitude_m,
            Airspeed::MetersPerSecond(velocity_m_s),
            weight_n,
        )
    }

    /// True airspeed in m/s.
    #[inline]
    pub fn velocity_m_s(&self) -> f64 {
        self.airspeed.to_m_s()
    }

    /// Copy of this condition moved to another altitude.
    pub fn at_altitude(&self, altitude_m: f64) -> Self {
        Self {
            altitude_m,
            ..*self
        }
    }
}
