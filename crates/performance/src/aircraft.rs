//! Conversion from catalog entries to runtime aircraft models.

use aeroperf_aero::{
    AircraftGeometry, DirectCoefficients, LiftMode, ParasiteDrag, ParasiteFitCache,
    ParasiteFitRequest, WeightBalancedCoefficients,
};
use aeroperf_atmosphere::{AtmosphereError, ExponentialAtmosphere};
use aeroperf_config::{
    AircraftConfig, AnchorConfig, DragConfig, ParasiteConfig, PropulsionConfig,
};
use aeroperf_core::{
    Airspeed, AvailableThrustTable, DomainError, FlightCondition, ReferencePoint,
    RequiredThrustTable, TableError,
};
use aeroperf_propulsion::ThrustModel;
use thiserror::Error;
use tracing::debug;

use crate::evaluator::{DragModel, EmpiricalCoefficients, ModelConfig};

/// Errors surfaced when selecting or converting aircraft.
#[derive(Debug, Error)]
pub enum AircraftError {
    #[error("aircraft '{0}' not found in catalog")]
    NotFound(String),
    #[error("aircraft catalog is empty")]
    EmptyCatalog,
    #[error("propulsion configuration is not supported")]
    UnsupportedPropulsion,
    #[error("drag configuration is not supported")]
    UnsupportedDrag,
    #[error("aircraft '{0}' has no cruise airspeed (set airspeed_m_s or airspeed_kt)")]
    MissingAirspeed(String),
    #[error("invalid reference table: {0}")]
    InvalidTable(#[from] TableError),
    #[error(transparent)]
    Atmosphere(#[from] AtmosphereError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Everything needed to evaluate one aircraft.
#[derive(Debug, Clone)]
pub struct AircraftModel {
    pub name: String,
    pub geometry: AircraftGeometry,
    pub config: ModelConfig,
    pub mode: DragModel,
    /// Cruise condition from the catalog; altitude defaults to sea level.
    pub default_condition: FlightCondition,
}

fn points(anchors: &[AnchorConfig]) -> Vec<ReferencePoint> {
    anchors
        .iter()
        .map(|a| ReferencePoint::new(a.altitude_m, a.thrust_n, a.power_mw))
        .collect()
}

fn required_table(anchors: Option<&[AnchorConfig]>) -> Result<RequiredThrustTable, TableError> {
    match anchors {
        Some(anchors) => RequiredThrustTable::new(points(anchors)),
        None => Ok(RequiredThrustTable::default()),
    }
}

fn available_table(anchors: Option<&[AnchorConfig]>) -> Result<AvailableThrustTable, TableError> {
    match anchors {
        Some(anchors) => AvailableThrustTable::new(points(anchors)),
        None => Ok(AvailableThrustTable::default()),
    }
}

/// Convert an `AircraftConfig` into its runtime model.
///
/// A fitted parasite drag is looked up in `cache` first; when the fit fails the
/// configured `fallback_cd0` is used instead.
pub fn from_config(
    config: &AircraftConfig,
    cache: &mut ParasiteFitCache,
) -> Result<AircraftModel, AircraftError> {
    let geometry = AircraftGeometry::new(config.span_m, config.aspect_ratio)?;
    let atmosphere = ExponentialAtmosphere::new(
        config.atmosphere.sea_level_density_kg_m3,
        config.atmosphere.scale_height_m,
    )?;

    let thrust = match &config.propulsion {
        PropulsionConfig::DensityScaled {
            sea_level_static_thrust_n,
        } => ThrustModel::DensityScaled {
            sea_level_static_thrust_n: *sea_level_static_thrust_n,
        },
        PropulsionConfig::ReferenceCurve { anchors } => {
            ThrustModel::ReferenceCurve(available_table(anchors.as_deref())?)
        }
        PropulsionConfig::Unsupported => return Err(AircraftError::UnsupportedPropulsion),
    };

    let airspeed = match (config.airspeed_m_s, config.airspeed_kt) {
        (Some(v), _) => Airspeed::MetersPerSecond(v),
        (None, Some(kt)) => Airspeed::Knots(kt),
        (None, None) => return Err(AircraftError::MissingAirspeed(config.name.clone())),
    };

    let mode = match &config.drag {
        DragConfig::Direct {
            lift_coefficient,
            drag_coefficient,
            oswald_efficiency,
        } => DragModel::Coefficient(LiftMode::Direct(DirectCoefficients {
            lift_coefficient: *lift_coefficient,
            drag_coefficient: *drag_coefficient,
            oswald_efficiency: *oswald_efficiency,
        })),
        DragConfig::WeightBalanced {
            oswald_efficiency,
            parasite,
        } => {
            let parasite = match parasite {
                ParasiteConfig::Constant { cd0 } => ParasiteDrag::Constant(*cd0),
                ParasiteConfig::Fitted {
                    reference_velocity_m_s,
                    fallback_cd0,
                    anchors,
                } => {
                    let table = required_table(anchors.as_deref())?;
                    let request = ParasiteFitRequest {
                        table: &table,
                        geometry,
                        weight_n: config.weight_n,
                        oswald_efficiency: *oswald_efficiency,
                        reference_velocity_m_s: *reference_velocity_m_s,
                        atmosphere,
                    };
                    ParasiteDrag::fitted_or(cache.get_or_fit(&request), *fallback_cd0)
                }
            };
            DragModel::Coefficient(LiftMode::WeightBalanced(WeightBalancedCoefficients {
                oswald_efficiency: *oswald_efficiency,
                parasite,
            }))
        }
        DragConfig::Empirical { k1, k2, k3, k4 } => {
            let defaults = EmpiricalCoefficients::default();
            DragModel::Empirical(EmpiricalCoefficients {
                k1: k1.unwrap_or(defaults.k1),
                k2: k2.unwrap_or(defaults.k2),
                k3: k3.unwrap_or(defaults.k3),
                k4: k4.unwrap_or(defaults.k4),
            })
        }
        DragConfig::ReferenceTable { anchors } => {
            DragModel::ReferenceTable(required_table(anchors.as_deref())?)
        }
        DragConfig::Unsupported => return Err(AircraftError::UnsupportedDrag),
    };

    debug!(
        aircraft = %config.name,
        thrust = thrust.label(),
        drag = mode.label(),
        "loaded aircraft"
    );

    Ok(AircraftModel {
        name: config.name.clone(),
        geometry,
        config: ModelConfig { atmosphere, thrust },
        mode,
        default_condition: FlightCondition::new(
            config.altitude_m.unwrap_or(0.0),
            airspeed,
            config.weight_n,
        ),
    })
}

/// Find a catalog entry by case-insensitive name, defaulting to the first entry.
pub fn find<'a>(
    configs: &'a [AircraftConfig],
    requested: Option<&str>,
) -> Result<&'a AircraftConfig, AircraftError> {
    let first = configs.first().ok_or(AircraftError::EmptyCatalog)?;

    match requested {
        Some(name) => {
            let upper = name.to_uppercase();
            configs
                .iter()
                .find(|cfg| cfg.name.to_uppercase() == upper)
                .ok_or_else(|| AircraftError::NotFound(name.to_string()))
        }
        None => Ok(first),
    }
}

/// Select an aircraft from the catalog and convert it.
pub fn select(
    configs: &[AircraftConfig],
    requested: Option<&str>,
    cache: &mut ParasiteFitCache,
) -> Result<AircraftModel, AircraftError> {
    from_config(find(configs, requested)?, cache)
}
