//! Interactive evaluation session: keeps the last good results on screen when a new
//! request fails.

use aeroperf_aero::AircraftGeometry;
use aeroperf_core::FlightCondition;
use aeroperf_core::constants::{ALTITUDE_INPUT_MAX_M, ALTITUDE_INPUT_MIN_M};
use thiserror::Error;
use tracing::warn;

use crate::evaluator::{
    DragModel, ModelConfig, PerformanceError, PerformanceResult, evaluate, evaluate_altitudes,
};
use crate::input::{ParseError, parse_altitude_list};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("All altitudes must be between 0 and 12000 meters.")]
    NoAltitudesInRange,
    #[error(transparent)]
    Evaluation(#[from] PerformanceError),
}

#[derive(Debug, Clone)]
pub struct EvaluationSession {
    geometry: AircraftGeometry,
    config: ModelConfig,
    mode: DragModel,
    template: FlightCondition,
    results: Vec<PerformanceResult>,
}

impl EvaluationSession {
    pub fn new(
        geometry: AircraftGeometry,
        config: ModelConfig,
        mode: DragModel,
        template: FlightCondition,
    ) -> Self {
        Self {
            geometry,
            config,
            mode,
            template,
            results: Vec::new(),
        }
    }

    /// Results of the last successful submission.
    pub fn results(&self) -> &[PerformanceResult] {
        &self.results
    }

    pub fn template(&self) -> &FlightCondition {
        &self.template
    }

    /// Change airspeed/weight for subsequent submissions.
    pub fn set_template(&mut self, template: FlightCondition) {
        self.template = template;
    }

    /// Evaluate a single altitude. Values outside `[0, 12000]` m are rejected and the
    /// previous results kept.
    pub fn submit_altitude(&mut self, altitude_m: f64) -> Result<&[PerformanceResult], SessionError> {
        if !(ALTITUDE_INPUT_MIN_M..=ALTITUDE_INPUT_MAX_M).contains(&altitude_m) {
            return Err(SessionError::NoAltitudesInRange);
        }
        let condition = self.template.at_altitude(altitude_m);
        let result = evaluate(&condition, &self.geometry, &self.config, &self.mode)?;
        self.results = vec![result];
        Ok(&self.results)
    }

    /// Parse and evaluate a comma-separated altitude list. On any error the previous
    /// results are left untouched.
    pub fn submit_altitudes(&mut self, text: &str) -> Result<&[PerformanceResult], SessionError> {
        let altitudes = parse_altitude_list(text).inspect_err(|err| {
            warn!(%err, "rejected altitude list");
        })?;
        if altitudes.is_empty() {
            return Err(SessionError::NoAltitudesInRange);
        }
        let results = evaluate_altitudes(
            &self.template,
            &altitudes,
            &self.geometry,
            &self.config,
            &self.mode,
        )?;
        self.results = results;
        Ok(&self.results)
    }
}
