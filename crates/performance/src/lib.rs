//! Performance evaluator: thrust/power required versus available, excess thrust/power,
//! and the lift-vs-weight check, for one altitude or an ordered list of altitudes.

pub mod aircraft;
pub mod classify;
pub mod evaluator;
pub mod input;
pub mod session;

pub use aircraft::{AircraftError, AircraftModel, find, from_config, select};
pub use classify::{FlightState, classify_lift, lift_weight_difference_pct};
pub use evaluator::{
    DragModel, EmpiricalCoefficients, ModelConfig, PerformanceError, PerformanceResult,
    altitude_grid, evaluate, evaluate_altitudes, evaluate_many, sort_by_altitude,
};
pub use input::{ParseError, parse_altitude_list};
pub use session::{EvaluationSession, SessionError};

pub use aeroperf_core::{Airspeed, FlightCondition};

pub use aeroperf_aero as aero;
pub use aeroperf_atmosphere as atmosphere;
pub use aeroperf_propulsion as propulsion;
