//! Aerodynamic coefficient model: wing area, dynamic pressure, and the lift/drag
//! coefficient decomposition used by the performance evaluator.
//!
//! Two lift modes exist and are deliberately kept apart:
//! - [`coefficients_direct`] takes CL and CD as free inputs, so lift is computed
//!   independently of weight and lift-vs-weight becomes a diagnostic;
//! - [`coefficients_weight_balanced`] solves CL from `L = W` and builds CD from a
//!   parasite term plus the induced term.

pub mod fit;

pub use fit::{
    FitError, ParasiteDragFit, ParasiteFitCache, ParasiteFitRequest, ParasiteSample,
    QuadraticFit, fit_parasite_drag, fit_quadratic,
};

use std::f64::consts::PI;

use aeroperf_atmosphere::ExponentialAtmosphere;
use aeroperf_core::error::{ensure_finite, ensure_positive};
use aeroperf_core::{DomainError, FlightCondition};
use serde::Serialize;
use tracing::warn;

/// Wing planform described by span and aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AircraftGeometry {
    pub span_m: f64,
    pub aspect_ratio: f64,
}

impl AircraftGeometry {
    pub fn new(span_m: f64, aspect_ratio: f64) -> Result<Self, DomainError> {
        ensure_positive(span_m, "wing span")?;
        ensure_positive(aspect_ratio, "aspect ratio")?;
        Ok(Self {
            span_m,
            aspect_ratio,
        })
    }

    pub fn wing_area(&self) -> Result<f64, DomainError> {
        wing_area(self.span_m, self.aspect_ratio)
    }
}

/// Wing reference area `S = b² / AR` (m²).
pub fn wing_area(span_m: f64, aspect_ratio: f64) -> Result<f64, DomainError> {
    ensure_positive(aspect_ratio, "aspect ratio")?;
    ensure_positive(span_m, "wing span")?;
    ensure_positive(span_m * span_m / aspect_ratio, "wing area")
}

/// Dynamic pressure `q = ½ ρ V²` (Pa).
#[inline]
pub fn dynamic_pressure(density_kg_m3: f64, velocity_m_s: f64) -> f64 {
    0.5 * density_kg_m3 * velocity_m_s * velocity_m_s
}

/// Induced drag coefficient `CL² / (π AR e)`.
pub fn induced_drag_coefficient(
    lift_coefficient: f64,
    aspect_ratio: f64,
    oswald_efficiency: f64,
) -> Result<f64, DomainError> {
    ensure_positive(aspect_ratio, "aspect ratio")?;
    ensure_positive(oswald_efficiency, "Oswald efficiency")?;
    Ok(lift_coefficient * lift_coefficient / (PI * aspect_ratio * oswald_efficiency))
}

/// Where the parasite (zero-lift) drag coefficient comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ParasiteDrag {
    Constant(f64),
    /// Quadratic in altitude, floored at [`aeroperf_core::constants::PARASITE_DRAG_FLOOR`].
    Fitted(QuadraticFit),
}

impl ParasiteDrag {
    pub fn coefficient_at(&self, altitude_m: f64) -> f64 {
        match self {
            ParasiteDrag::Constant(cd0) => *cd0,
            ParasiteDrag::Fitted(fit) => fit.evaluate(altitude_m),
        }
    }

    /// Use the fit when it succeeded, otherwise fall back to a constant.
    pub fn fitted_or(result: Result<&ParasiteDragFit, FitError>, fallback_cd0: f64) -> Self {
        match result {
            Ok(fit) => ParasiteDrag::Fitted(fit.fit),
            Err(err) => {
                warn!(%err, fallback_cd0, "parasite drag fit failed; using constant");
                ParasiteDrag::Constant(fallback_cd0)
            }
        }
    }
}

/// Free-input coefficients: CL and CD supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectCoefficients {
    pub lift_coefficient: f64,
    pub drag_coefficient: f64,
    /// When present the induced/parasite split of `drag_coefficient` is reported too.
    pub oswald_efficiency: Option<f64>,
}

/// Force-balanced coefficients: CL from `L = W`, CD from parasite + induced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightBalancedCoefficients {
    pub oswald_efficiency: f64,
    pub parasite: ParasiteDrag,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LiftMode {
    Direct(DirectCoefficients),
    WeightBalanced(WeightBalancedCoefficients),
}

impl LiftMode {
    pub fn label(&self) -> &'static str {
        match self {
            LiftMode::Direct(_) => "direct",
            LiftMode::WeightBalanced(_) => "weight_balanced",
        }
    }
}

/// Coefficients and force scales for one flight condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoefficientSet {
    pub wing_area_m2: f64,
    pub dynamic_pressure_pa: f64,
    pub lift_coefficient: f64,
    pub induced_drag_coefficient: Option<f64>,
    pub parasite_drag_coefficient: Option<f64>,
    pub total_drag_coefficient: f64,
}

impl CoefficientSet {
    /// `q S CL` (N).
    pub fn lift_n(&self) -> f64 {
        self.dynamic_pressure_pa * self.wing_area_m2 * self.lift_coefficient
    }

    /// `q S CD` (N); equals thrust required in steady flight.
    pub fn drag_n(&self) -> f64 {
        self.dynamic_pressure_pa * self.wing_area_m2 * self.total_drag_coefficient
    }
}

/// Coefficients with CL and CD taken verbatim from `mode`.
pub fn coefficients_direct(
    condition: &FlightCondition,
    geometry: &AircraftGeometry,
    atmosphere: &ExponentialAtmosphere,
    mode: &DirectCoefficients,
) -> Result<CoefficientSet, DomainError> {
    let area = geometry.wing_area()?;
    let velocity = ensure_finite(condition.velocity_m_s(), "airspeed")?;
    let q = dynamic_pressure(atmosphere.density(condition.altitude_m), velocity);

    let (induced, parasite) = match mode.oswald_efficiency {
        Some(e) => {
            let cdi = induced_drag_coefficient(mode.lift_coefficient, geometry.aspect_ratio, e)?;
            (Some(cdi), Some(mode.drag_coefficient - cdi))
        }
        None => (None, None),
    };

    Ok(CoefficientSet {
        wing_area_m2: area,
        dynamic_pressure_pa: q,
        lift_coefficient: mode.lift_coefficient,
        induced_drag_coefficient: induced,
        parasite_drag_coefficient: parasite,
        total_drag_coefficient: mode.drag_coefficient,
    })
}

/// Coefficients with CL chosen so that lift equals weight.
pub fn coefficients_weight_balanced(
    condition: &FlightCondition,
    geometry: &AircraftGeometry,
    atmosphere: &ExponentialAtmosphere,
    mode: &WeightBalancedCoefficients,
) -> Result<CoefficientSet, DomainError> {
    let area = geometry.wing_area()?;
    let weight = ensure_positive(condition.weight_n, "weight")?;
    let velocity = ensure_finite(condition.velocity_m_s(), "airspeed")?;
    let q = dynamic_pressure(atmosphere.density(condition.altitude_m), velocity);
    let qs = ensure_positive(q * area, "dynamic pressure times wing area")?;

    let cl = weight / qs;
    let cdi = induced_drag_coefficient(cl, geometry.aspect_ratio, mode.oswald_efficiency)?;
    let cd0 = mode.parasite.coefficient_at(condition.altitude_m);

    Ok(CoefficientSet {
        wing_area_m2: area,
        dynamic_pressure_pa: q,
        lift_coefficient: cl,
        induced_drag_coefficient: Some(cdi),
        parasite_drag_coefficient: Some(cd0),
        total_drag_coefficient: cd0 + cdi,
    })
}

/// Route to the entry point matching `mode`.
pub fn coefficients(
    condition: &FlightCondition,
    geometry: &AircraftGeometry,
    atmosphere: &ExponentialAtmosphere,
    mode: &LiftMode,
) -> Result<CoefficientSet, DomainError> {
    match mode {
        LiftMode::Direct(direct) => coefficients_direct(condition, geometry, atmosphere, direct),
        LiftMode::WeightBalanced(balanced) => {
            coefficients_weight_balanced(condition, geometry, atmosphere, balanced)
        }
    }
}
