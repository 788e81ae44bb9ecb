//! Configuration models and loaders for aircraft catalogs.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

fn default_sea_level_density() -> f64 {
    1.225
}

fn default_scale_height() -> f64 {
    8_500.0
}

/// Aircraft entry parsed from a catalog.
#[derive(Debug, Deserialize, Clone)]
pub struct AircraftConfig {
    pub name: String,
    pub span_m: f64,
    pub aspect_ratio: f64,
    pub weight_n: f64,
    #[serde(default)]
    pub airspeed_m_s: Option<f64>,
    #[serde(default)]
    pub airspeed_kt: Option<f64>,
    #[serde(default)]
    pub altitude_m: Option<f64>,
    #[serde(default)]
    pub atmosphere: AtmosphereConfig,
    pub propulsion: PropulsionConfig,
    pub drag: DragConfig,
}

/// Exponential atmosphere parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct AtmosphereConfig {
    #[serde(default = "default_sea_level_density")]
    pub sea_level_density_kg_m3: f64,
    #[serde(default = "default_scale_height")]
    pub scale_height_m: f64,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            sea_level_density_kg_m3: default_sea_level_density(),
            scale_height_m: default_scale_height(),
        }
    }
}

/// Altitude anchor for thrust/power tables.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct AnchorConfig {
    pub altitude_m: f64,
    pub thrust_n: f64,
    pub power_mw: f64,
}

/// Thrust-available strategy.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum PropulsionConfig {
    #[serde(rename = "density_scaled")]
    DensityScaled { sea_level_static_thrust_n: f64 },
    #[serde(rename = "reference_curve")]
    ReferenceCurve {
        #[serde(default)]
        anchors: Option<Vec<AnchorConfig>>,
    },
    #[serde(other)]
    Unsupported,
}

/// Thrust-required strategy.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum DragConfig {
    #[serde(rename = "direct")]
    Direct {
        lift_coefficient: f64,
        drag_coefficient: f64,
        #[serde(default)]
        oswald_efficiency: Option<f64>,
    },
    #[serde(rename = "weight_balanced")]
    WeightBalanced {
        oswald_efficiency: f64,
        parasite: ParasiteConfig,
    },
    #[serde(rename = "empirical")]
    Empirical {
        #[serde(default)]
        k1: Option<f64>,
        #[serde(default)]
        k2: Option<f64>,
        #[serde(default)]
        k3: Option<f64>,
        #[serde(default)]
        k4: Option<f64>,
    },
    #[serde(rename = "reference_table")]
    ReferenceTable {
        #[serde(default)]
        anchors: Option<Vec<AnchorConfig>>,
    },
    #[serde(other)]
    Unsupported,
}

/// Parasite drag source for the weight-balanced lift mode.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum ParasiteConfig {
    #[serde(rename = "constant")]
    Constant { cd0: f64 },
    #[serde(rename = "fitted")]
    Fitted {
        reference_velocity_m_s: f64,
        fallback_cd0: f64,
        #[serde(default)]
        anchors: Option<Vec<AnchorConfig>>,
    },
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load aircraft from a YAML list, a single TOML file, or a directory of TOML files.
///
/// Directory entries are read in file-name order.
pub fn load_aircraft<P: AsRef<Path>>(path: P) -> Result<Vec<AircraftConfig>, ConfigError> {
    let path = path.as_ref();
    if path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_toml(p))
            .collect();
        files.sort();
        files.iter().map(|file| read_toml(file)).collect()
    } else if is_toml(path) {
        Ok(vec![read_toml(path)?])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

fn read_toml(path: &Path) -> Result<AircraftConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}
