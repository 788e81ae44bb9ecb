//! Combine atmosphere, coefficients and propulsion into a [`PerformanceResult`].

use aeroperf_aero::{AircraftGeometry, CoefficientSet, FitError, LiftMode, coefficients};
use aeroperf_atmosphere::ExponentialAtmosphere;
use aeroperf_core::error::ensure_finite;
use aeroperf_core::units::{mw_to_w, w_to_mw};
use aeroperf_core::{DomainError, FlightCondition, RequiredThrustTable};
use aeroperf_propulsion::{ThrustModel, thrust_power_available};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::classify::{FlightState, classify_lift};

#[derive(Debug, Error)]
pub enum PerformanceError {
    #[error("invalid input: {0}")]
    Domain(#[from] DomainError),
    #[error("parasite drag fit failed: {0}")]
    Fit(#[from] FitError),
}

/// Atmosphere and thrust-available strategy shared by every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    pub atmosphere: ExponentialAtmosphere,
    pub thrust: ThrustModel,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            atmosphere: ExponentialAtmosphere::standard(),
            thrust: ThrustModel::default(),
        }
    }
}

/// Low-fidelity placeholder for thrust/power required.
///
/// `T = k1 ρ V² + k2 W` and `P = k3 ρ V³ + k4 W V`. These stand in for a drag
/// model; keep the numbers stable so older results stay reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmpiricalCoefficients {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
}

impl EmpiricalCoefficients {
    pub fn thrust_required_n(&self, density_kg_m3: f64, velocity_m_s: f64, weight_n: f64) -> f64 {
        self.k1 * density_kg_m3 * velocity_m_s.powi(2) + self.k2 * weight_n
    }

    pub fn power_required_w(&self, density_kg_m3: f64, velocity_m_s: f64, weight_n: f64) -> f64 {
        self.k3 * density_kg_m3 * velocity_m_s.powi(3) + self.k4 * weight_n * velocity_m_s
    }
}

impl Default for EmpiricalCoefficients {
    fn default() -> Self {
        Self {
            k1: 0.02,
            k2: 0.05,
            k3: 0.02,
            k4: 0.05,
        }
    }
}

/// Strategy for thrust/power required.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DragModel {
    /// `T = q S CD`, `P = T V`, with coefficients from the given lift mode.
    Coefficient(LiftMode),
    /// Placeholder formulas; see [`EmpiricalCoefficients`].
    Empirical(EmpiricalCoefficients),
    /// Thrust/power required interpolated from a reference table.
    ReferenceTable(RequiredThrustTable),
}

impl DragModel {
    pub fn label(&self) -> &'static str {
        match self {
            DragModel::Coefficient(LiftMode::Direct(_)) => "coefficient_direct",
            DragModel::Coefficient(LiftMode::WeightBalanced(_)) => "coefficient_weight_balanced",
            DragModel::Empirical(_) => "empirical",
            DragModel::ReferenceTable(_) => "reference_table",
        }
    }
}

/// One evaluated flight condition. Power is stored in watts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceResult {
    pub altitude_m: f64,
    pub airspeed_m_s: f64,
    pub weight_n: f64,
    pub density_kg_m3: f64,
    pub thrust_required_n: f64,
    pub thrust_available_n: f64,
    pub power_required_w: f64,
    pub power_available_w: f64,
    pub excess_thrust_n: f64,
    pub excess_power_w: f64,
    pub coefficients: Option<CoefficientSet>,
    /// Present only when lift is computed independently of weight.
    pub lift_n: Option<f64>,
}

impl PerformanceResult {
    pub fn power_required_mw(&self) -> f64 {
        w_to_mw(self.power_required_w)
    }

    pub fn power_available_mw(&self) -> f64 {
        w_to_mw(self.power_available_w)
    }

    pub fn excess_power_mw(&self) -> f64 {
        w_to_mw(self.excess_power_w)
    }

    pub fn flight_state(&self) -> Option<FlightState> {
        self.lift_n.map(|lift| classify_lift(lift, self.weight_n))
    }
}

/// Evaluate a single flight condition.
pub fn evaluate(
    condition: &FlightCondition,
    geometry: &AircraftGeometry,
    config: &ModelConfig,
    mode: &DragModel,
) -> Result<PerformanceResult, PerformanceError> {
    let altitude = condition.altitude_m;
    let velocity = ensure_finite(condition.velocity_m_s(), "airspeed")?;
    let weight = condition.weight_n;
    let density = config.atmosphere.density(altitude);
    let available = thrust_power_available(altitude, velocity, &config.atmosphere, &config.thrust);

    let (thrust_required, power_required, coeffs, lift) = match mode {
        DragModel::Coefficient(lift_mode) => {
            let set = coefficients(condition, geometry, &config.atmosphere, lift_mode)?;
            let thrust = set.drag_n();
            let lift = match lift_mode {
                LiftMode::Direct(_) => Some(set.lift_n()),
                LiftMode::WeightBalanced(_) => None,
            };
            (thrust, thrust * velocity, Some(set), lift)
        }
        DragModel::Empirical(k) => (
            k.thrust_required_n(density, velocity, weight),
            k.power_required_w(density, velocity, weight),
            None,
            None,
        ),
        DragModel::ReferenceTable(table) => {
            let point = table.interpolate(altitude);
            (point.thrust_n, mw_to_w(point.power_mw), None, None)
        }
    };

    debug!(
        altitude,
        velocity,
        model = mode.label(),
        thrust_required,
        thrust_available = available.thrust_n,
        "evaluated flight condition"
    );

    Ok(PerformanceResult {
        altitude_m: altitude,
        airspeed_m_s: velocity,
        weight_n: weight,
        density_kg_m3: density,
        thrust_required_n: thrust_required,
        thrust_available_n: available.thrust_n,
        power_required_w: power_required,
        power_available_w: available.power_w,
        excess_thrust_n: available.thrust_n - thrust_required,
        excess_power_w: available.power_w - power_required,
        coefficients: coeffs,
        lift_n: lift,
    })
}

/// Evaluate every condition, keeping the caller's order.
pub fn evaluate_many(
    conditions: &[FlightCondition],
    geometry: &AircraftGeometry,
    config: &ModelConfig,
    mode: &DragModel,
) -> Result<Vec<PerformanceResult>, PerformanceError> {
    conditions
        .iter()
        .map(|condition| evaluate(condition, geometry, config, mode))
        .collect()
}

/// Evaluate `template` moved to each altitude, keeping the caller's order.
pub fn evaluate_altitudes(
    template: &FlightCondition,
    altitudes: &[f64],
    geometry: &AircraftGeometry,
    config: &ModelConfig,
    mode: &DragModel,
) -> Result<Vec<PerformanceResult>, PerformanceError> {
    let conditions: Vec<FlightCondition> =
        altitudes.iter().map(|&h| template.at_altitude(h)).collect();
    evaluate_many(&conditions, geometry, config, mode)
}

/// Evenly spaced altitudes from `start_m` to `end_m` inclusive.
pub fn altitude_grid(start_m: f64, end_m: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![start_m],
        n => {
            let step = (end_m - start_m) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        end_m
                    } else {
                        start_m + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Reorder results by ascending altitude for display.
pub fn sort_by_altitude(results: &mut [PerformanceResult]) {
    results.sort_by(|a, b| a.altitude_m.total_cmp(&b.altitude_m));
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeroperf_aero::{DirectCoefficients, ParasiteDrag, WeightBalancedCoefficients};

    fn geometry() -> AircraftGeometry {
        AircraftGeometry::new(10.0, 7.0).unwrap()
    }

    fn quick_check_mode() -> DragModel {
        DragModel::Coefficient(LiftMode::Direct(DirectCoefficients {
            lift_coefficient: 0.3,
            drag_coefficient: 0.03,
            oswald_efficiency: None,
        }))
    }

    fn density_scaled() -> ModelConfig {
        ModelConfig {
            atmosphere: ExponentialAtmosphere::standard(),
            thrust: ThrustModel::DensityScaled {
                sea_level_static_thrust_n: 2_500.0,
            },
        }
    }

    #[test]
    fn quick_check_scenario_at_sea_level() {
        let cond = FlightCondition::with_m_s(0.0, 50.0, 10_000.0);
        let result = evaluate(&cond, &geometry(), &density_scaled(), &quick_check_mode()).unwrap();
        assert_eq!(result.density_kg_m3, 1.225);
        assert!((result.thrust_required_n - 656.25).abs() < 1e-9);
        assert!((result.power_required_w - 32_812.5).abs() < 1e-7);
        assert!((result.lift_n.unwrap() - 6_562.5).abs() < 1e-9);
        assert!((result.excess_thrust_n - (2_500.0 - 656.25)).abs() < 1e-9);
        assert_eq!(result.flight_state(), Some(FlightState::Descending));
    }

    #[test]
    fn weight_balanced_mode_has_no_classification() {
        let mode = DragModel::Coefficient(LiftMode::WeightBalanced(WeightBalancedCoefficients {
            oswald_efficiency: 0.8,
            parasite: ParasiteDrag::Constant(0.025),
        }));
        let cond = FlightCondition::with_m_s(2_000.0, 60.0, 9_000.0);
        let result = evaluate(&cond, &geometry(), &density_scaled(), &mode).unwrap();
        assert_eq!(result.lift_n, None);
        assert_eq!(result.flight_state(), None);
        let set = result.coefficients.unwrap();
        assert!((set.lift_n() - 9_000.0).abs() < 1e-9);
    }

    #[test]
    fn empirical_placeholder_numbers_are_stable() {
        let mode = DragModel::Empirical(EmpiricalCoefficients::default());
        let cond = FlightCondition::with_m_s(0.0, 50.0, 10_000.0);
        let result = evaluate(&cond, &geometry(), &density_scaled(), &mode).unwrap();
        // 0.02 * 1.225 * 2500 + 0.05 * 10000
        assert!((result.thrust_required_n - 561.25).abs() < 1e-9);
        // 0.02 * 1.225 * 125000 + 0.05 * 10000 * 50
        assert!((result.power_required_w - 28_062.5).abs() < 1e-7);
        assert!((result.power_required_mw() - 0.028_062_5).abs() < 1e-12);
        assert_eq!(result.coefficients, None);
    }

    #[test]
    fn reference_table_mode_matches_default_tables() {
        let mode = DragModel::ReferenceTable(RequiredThrustTable::default());
        let cond = FlightCondition::with_m_s(0.0, 50.0, 10_000.0);
        let result = evaluate(&cond, &geometry(), &ModelConfig::default(), &mode).unwrap();
        assert_eq!(result.thrust_available_n, 50_000.0);
        assert_eq!(result.thrust_required_n, 10_000.0);
        assert_eq!(result.excess_thrust_n, 40_000.0);
        assert!((result.excess_power_mw() - 16.0).abs() < 1e-12);
    }

    #[test]
    fn excess_may_be_negative() {
        let mode = DragModel::ReferenceTable(RequiredThrustTable::default());
        let cond = FlightCondition::with_m_s(12_000.0, 50.0, 10_000.0);
        let result = evaluate(&cond, &geometry(), &ModelConfig::default(), &mode).unwrap();
        assert_eq!(result.excess_thrust_n, 5_000.0 - 9_200.0);
        assert!(result.excess_power_w < 0.0);
    }

    #[test]
    fn evaluate_altitudes_preserves_order() {
        let template = FlightCondition::with_m_s(0.0, 50.0, 10_000.0);
        let results = evaluate_altitudes(
            &template,
            &[5_000.0, 0.0, 8_000.0],
            &geometry(),
            &ModelConfig::default(),
            &quick_check_mode(),
        )
        .unwrap();
        let order: Vec<f64> = results.iter().map(|r| r.altitude_m).collect();
        assert_eq!(order, vec![5_000.0, 0.0, 8_000.0]);

        let mut sorted = results.clone();
        sort_by_altitude(&mut sorted);
        let order: Vec<f64> = sorted.iter().map(|r| r.altitude_m).collect();
        assert_eq!(order, vec![0.0, 5_000.0, 8_000.0]);
    }

    #[test]
    fn domain_errors_propagate() {
        let bad = AircraftGeometry {
            span_m: 10.0,
            aspect_ratio: 0.0,
        };
        let cond = FlightCondition::with_m_s(0.0, 50.0, 10_000.0);
        let err = evaluate(&cond, &bad, &ModelConfig::default(), &quick_check_mode()).unwrap_err();
        assert!(matches!(err, PerformanceError::Domain(_)));
        assert!(err.to_string().contains("aspect ratio"));
    }

    #[test]
    fn grid_includes_both_ends() {
        let grid = altitude_grid(0.0, 12_000.0, 100);
        assert_eq!(grid.len(), 100);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[99], 12_000.0);
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(altitude_grid(500.0, 900.0, 1), vec![500.0]);
        assert!(altitude_grid(0.0, 1.0, 0).is_empty());
    }
}
