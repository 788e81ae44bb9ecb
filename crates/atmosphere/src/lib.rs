//! Exponential atmosphere: `rho(h) = rho0 * exp(-h / H)`.
//!
//! The scale height `H` is a configuration value rather than a constant. Callers in
//! the wild use 8000 m, 8400 m and 8500 m, and the densities they produce at altitude
//! differ materially, so every model carries its own.

use aeroperf_core::constants::RHO_SEA_LEVEL_KG_M3;
use serde::Serialize;
use thiserror::Error;

/// Scale height used by the coarse 8 km approximation (m).
pub const SCALE_HEIGHT_8000_M: f64 = 8_000.0;
/// Scale height matching the isothermal atmosphere at ~288 K (m).
pub const SCALE_HEIGHT_8400_M: f64 = 8_400.0;
/// Scale height used by the quick-check calculator (m).
pub const SCALE_HEIGHT_8500_M: f64 = 8_500.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AtmosphereError {
    #[error("atmosphere scale height must be positive (got {0})")]
    InvalidScaleHeight(f64),
    #[error("sea-level density must be positive (got {0})")]
    InvalidSeaLevelDensity(f64),
}

/// Air density at a single altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtmosphereSample {
    pub altitude_m: f64,
    pub density_kg_m3: f64,
}

/// Single-scale-height exponential density model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExponentialAtmosphere {
    sea_level_density_kg_m3: f64,
    scale_height_m: f64,
}

impl ExponentialAtmosphere {
    pub fn new(sea_level_density_kg_m3: f64, scale_height_m: f64) -> Result<Self, AtmosphereError> {
        if !(scale_height_m.is_finite() && scale_height_m > 0.0) {
            return Err(AtmosphereError::InvalidScaleHeight(scale_height_m));
        }
        if !(sea_level_density_kg_m3.is_finite() && sea_level_density_kg_m3 > 0.0) {
            return Err(AtmosphereError::InvalidSeaLevelDensity(
                sea_level_density_kg_m3,
            ));
        }
        Ok(Self {
            sea_level_density_kg_m3,
            scale_height_m,
        })
    }

    /// 1.225 kg/m³ at sea level with an 8500 m scale height.
    pub fn standard() -> Self {
        Self {
            sea_level_density_kg_m3: RHO_SEA_LEVEL_KG_M3,
            scale_height_m: SCALE_HEIGHT_8500_M,
        }
    }

    /// Standard sea-level density with a caller-chosen scale height.
    pub fn with_scale_height(scale_height_m: f64) -> Result<Self, AtmosphereError> {
        Self::new(RHO_SEA_LEVEL_KG_M3, scale_height_m)
    }

    pub fn sea_level_density_kg_m3(&self) -> f64 {
        self.sea_level_density_kg_m3
    }

    pub fn scale_height_m(&self) -> f64 {
        self.scale_height_m
    }

    /// Density (kg/m³) at `altitude_m`. Negative altitudes extend the exponential.
    #[inline]
    pub fn density(&self, altitude_m: f64) -> f64 {
        self.sea_level_density_kg_m3 * f64::exp(-altitude_m / self.scale_height_m)
    }

    /// `density(h) / density(0)`.
    #[inline]
    pub fn density_ratio(&self, altitude_m: f64) -> f64 {
        self.density(altitude_m) / self.density(0.0)
    }

    pub fn sample(&self, altitude_m: f64) -> AtmosphereSample {
        AtmosphereSample {
            altitude_m,
            density_kg_m3: self.density(altitude_m),
        }
    }
}

impl Default for ExponentialAtmosphere {
    fn default() -> Self {
        Self::standard()
    }
}
