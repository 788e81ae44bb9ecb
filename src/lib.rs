//! Aircraft performance estimator.
//!
//! The calculation engine is split into small crates (atmosphere, aerodynamics,
//! propulsion, evaluator) so front-ends such as the `aeroperf` CLI can share it.
//! This crate re-exports them under one roof.

pub use aeroperf_aero as aero;
pub use aeroperf_atmosphere as atmosphere;
pub use aeroperf_config as config;
pub use aeroperf_core as core;
pub use aeroperf_export as export;
pub use aeroperf_performance as performance;
pub use aeroperf_propulsion as propulsion;

pub use aeroperf_performance::{
    DragModel, EvaluationSession, FlightState, ModelConfig, PerformanceResult, evaluate,
    evaluate_many,
};

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
