//! Thrust and power available as a function of altitude.

use aeroperf_atmosphere::ExponentialAtmosphere;
use aeroperf_core::AvailableThrustTable;
use aeroperf_core::units::{mw_to_w, w_to_mw};
use serde::Serialize;

/// Strategy for the thrust/power the engine can deliver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ThrustModel {
    /// Sea-level static thrust scaled by `rho(h) / rho(0)`; power is thrust times airspeed.
    DensityScaled { sea_level_static_thrust_n: f64 },
    /// Linear interpolation over an altitude table, clamped at both ends.
    ReferenceCurve(AvailableThrustTable),
}

impl ThrustModel {
    pub fn label(&self) -> &'static str {
        match self {
            ThrustModel::DensityScaled { .. } => "density_scaled",
            ThrustModel::ReferenceCurve(_) => "reference_curve",
        }
    }
}

impl Default for ThrustModel {
    fn default() -> Self {
        ThrustModel::ReferenceCurve(AvailableThrustTable::default())
    }
}

/// Thrust (N) and power (W) available at one flight condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Available {
    pub thrust_n: f64,
    pub power_w: f64,
}

impl Available {
    pub fn power_mw(&self) -> f64 {
        w_to_mw(self.power_w)
    }
}

/// Thrust and power available at `altitude_m` and `velocity_m_s`.
///
/// The reference curve ignores velocity: its power column is tabulated directly.
pub fn thrust_power_available(
    altitude_m: f64,
    velocity_m_s: f64,
    atmosphere: &ExponentialAtmosphere,
    model: &ThrustModel,
) -> Available {
    match model {
        ThrustModel::DensityScaled {
            sea_level_static_thrust_n,
        } => {
            let thrust = sea_level_static_thrust_n * atmosphere.density_ratio(altitude_m);
            Available {
                thrust_n: thrust,
                power_w: thrust * velocity_m_s,
            }
        }
        ThrustModel::ReferenceCurve(table) => {
            let point = table.interpolate(altitude_m);
            Available {
                thrust_n: point.thrust_n,
                power_w: mw_to_w(point.power_mw),
            }
        }
    }
}
