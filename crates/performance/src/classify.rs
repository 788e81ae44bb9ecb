//! Lift-vs-weight classification.

use std::fmt;

use aeroperf_core::constants::LEVEL_FLIGHT_TOLERANCE_PCT;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightState {
    Level,
    Climbing,
    Descending,
}

impl FlightState {
    pub fn label(self) -> &'static str {
        match self {
            FlightState::Level => "level",
            FlightState::Climbing => "climbing",
            FlightState::Descending => "descending",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FlightState::Level => "lift is within 1% of weight: steady, level flight",
            FlightState::Climbing => "lift exceeds weight: pulling up or climbing",
            FlightState::Descending => "lift is below weight: heading down or descending",
        }
    }
}

impl fmt::Display for FlightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `|L - W| / W` in percent; infinite when the weight is not positive.
pub fn lift_weight_difference_pct(lift_n: f64, weight_n: f64) -> f64 {
    if weight_n > 0.0 {
        (lift_n - weight_n).abs() / weight_n * 100.0
    } else {
        f64::INFINITY
    }
}

pub fn classify_lift(lift_n: f64, weight_n: f64) -> FlightState {
    if lift_weight_difference_pct(lift_n, weight_n) < LEVEL_FLIGHT_TOLERANCE_PCT {
        FlightState::Level
    } else if lift_n > weight_n {
        FlightState::Climbing
    } else {
        FlightState::Descending
    }
}
