//! Least-squares quadratic fit of parasite drag against altitude.
//!
//! Each anchor of a [`RequiredThrustTable`] implies a total drag coefficient at the
//! reference velocity. Removing the induced part for a weight-balanced CL leaves the
//! parasite coefficient, which is fitted as `a h² + b h + c`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use aeroperf_atmosphere::ExponentialAtmosphere;
use aeroperf_core::constants::PARASITE_DRAG_FLOOR;
use aeroperf_core::error::ensure_positive;
use aeroperf_core::{DomainError, RequiredThrustTable};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{AircraftGeometry, dynamic_pressure, induced_drag_coefficient};

/// Altitudes are fitted in kilometres to keep the design matrix well conditioned.
const ALTITUDE_SCALE_M: f64 = 1_000.0;
const RANK_TOLERANCE: f64 = 1.0e-9;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("quadratic fit needs at least 3 reference points, found {found}")]
    InsufficientPoints { found: usize },
    #[error("reference altitudes do not determine a unique quadratic")]
    Singular,
    #[error("non-finite parasite drag derived at {altitude_m} m")]
    NonFinite { altitude_m: f64 },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// `a h² + b h + c` with `h` in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadraticFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl QuadraticFit {
    /// Polynomial value without the floor.
    #[inline]
    pub fn raw(&self, altitude_m: f64) -> f64 {
        (self.a * altitude_m + self.b) * altitude_m + self.c
    }

    /// Polynomial value floored at [`PARASITE_DRAG_FLOOR`].
    #[inline]
    pub fn evaluate(&self, altitude_m: f64) -> f64 {
        self.raw(altitude_m).max(PARASITE_DRAG_FLOOR)
    }
}

/// Parasite drag recovered from one table anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParasiteSample {
    pub altitude_m: f64,
    pub parasite_drag_coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParasiteDragFit {
    pub fit: QuadraticFit,
    pub samples: Vec<ParasiteSample>,
    pub rms_residual: f64,
}

impl ParasiteDragFit {
    /// `sample - raw fit` at every anchor.
    pub fn residuals(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|s| s.parasite_drag_coefficient - self.fit.raw(s.altitude_m))
            .collect()
    }
}

/// Everything the parasite-drag fit depends on.
#[derive(Debug, Clone)]
pub struct ParasiteFitRequest<'a> {
    pub table: &'a RequiredThrustTable,
    pub geometry: AircraftGeometry,
    pub weight_n: f64,
    pub oswald_efficiency: f64,
    pub reference_velocity_m_s: f64,
    pub atmosphere: ExponentialAtmosphere,
}

/// Parasite drag coefficient implied by each anchor of the request's table.
pub fn parasite_samples(request: &ParasiteFitRequest<'_>) -> Result<Vec<ParasiteSample>, FitError> {
    let area = request.geometry.wing_area()?;
    let weight = ensure_positive(request.weight_n, "weight")?;
    let velocity = ensure_positive(request.reference_velocity_m_s, "reference velocity")?;
    ensure_positive(request.oswald_efficiency, "Oswald efficiency")?;

    request
        .table
        .table()
        .anchors()
        .iter()
        .map(|anchor| {
            let h = anchor.altitude_m;
            let qs = dynamic_pressure(request.atmosphere.density(h), velocity) * area;
            let cd_total = anchor.thrust_n / qs;
            let cl = weight / qs;
            let cdi = induced_drag_coefficient(
                cl,
                request.geometry.aspect_ratio,
                request.oswald_efficiency,
            )?;
            let cd0 = cd_total - cdi;
            if !cd0.is_finite() {
                return Err(FitError::NonFinite { altitude_m: h });
            }
            Ok(ParasiteSample {
                altitude_m: h,
                parasite_drag_coefficient: cd0,
            })
        })
        .collect()
}

/// Least-squares quadratic through `(altitude_m, value)` pairs.
pub fn fit_quadratic(points: &[(f64, f64)]) -> Result<QuadraticFit, FitError> {
    if points.len() < 3 {
        return Err(FitError::InsufficientPoints {
            found: points.len(),
        });
    }

    let n = points.len();
    let design = DMatrix::from_fn(n, 3, |i, j| {
        let x = points[i].0 / ALTITUDE_SCALE_M;
        match j {
            0 => x * x,
            1 => x,
            _ => 1.0,
        }
    });
    let rhs = DVector::from_iterator(n, points.iter().map(|p| p.1));

    let svd = design.svd(true, true);
    if svd.rank(RANK_TOLERANCE) < 3 {
        return Err(FitError::Singular);
    }
    let coeffs = svd
        .solve(&rhs, RANK_TOLERANCE)
        .map_err(|_| FitError::Singular)?;

    let fit = QuadraticFit {
        a: coeffs[0] / (ALTITUDE_SCALE_M * ALTITUDE_SCALE_M),
        b: coeffs[1] / ALTITUDE_SCALE_M,
        c: coeffs[2],
    };
    if !(fit.a.is_finite() && fit.b.is_finite() && fit.c.is_finite()) {
        return Err(FitError::Singular);
    }
    Ok(fit)
}

/// Fit parasite drag for the request's table, geometry and reference velocity.
pub fn fit_parasite_drag(request: &ParasiteFitRequest<'_>) -> Result<ParasiteDragFit, FitError> {
    let samples = parasite_samples(request)?;
    let points: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.altitude_m, s.parasite_drag_coefficient))
        .collect();
    let fit = fit_quadratic(&points)?;

    let sum_sq: f64 = points
        .iter()
        .map(|(h, cd0)| {
            let r = cd0 - fit.raw(*h);
            r * r
        })
        .sum();
    let rms_residual = (sum_sq / points.len() as f64).sqrt();
    debug!(
        a = fit.a,
        b = fit.b,
        c = fit.c,
        rms_residual,
        "fitted parasite drag"
    );

    Ok(ParasiteDragFit {
        fit,
        samples,
        rms_residual,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FitKey(Vec<u64>);

impl FitKey {
    fn from_request(request: &ParasiteFitRequest<'_>) -> Self {
        let mut bits = vec![
            request.geometry.aspect_ratio.to_bits(),
            request.oswald_efficiency.to_bits(),
            request.reference_velocity_m_s.to_bits(),
            request.geometry.span_m.to_bits(),
            request.weight_n.to_bits(),
            request.atmosphere.sea_level_density_kg_m3().to_bits(),
            request.atmosphere.scale_height_m().to_bits(),
        ];
        for anchor in request.table.table().anchors() {
            bits.push(anchor.altitude_m.to_bits());
            bits.push(anchor.thrust_n.to_bits());
        }
        Self(bits)
    }
}

/// Memoized fits keyed by the configuration they were fitted against.
#[derive(Debug, Default)]
pub struct ParasiteFitCache {
    fits: HashMap<FitKey, ParasiteDragFit>,
}

impl ParasiteFitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached fit for `request`, fitting on first use. Failures are not cached.
    pub fn get_or_fit(
        &mut self,
        request: &ParasiteFitRequest<'_>,
    ) -> Result<&ParasiteDragFit, FitError> {
        match self.fits.entry(FitKey::from_request(request)) {
            Entry::Occupied(entry) => {
                trace!("parasite drag fit cache hit");
                let fit: &ParasiteDragFit = entry.into_mut();
                Ok(fit)
            }
            Entry::Vacant(entry) => {
                let fit: &ParasiteDragFit = entry.insert(fit_parasite_drag(request)?);
                Ok(fit)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.fits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fits.is_empty()
    }

    pub fn clear(&mut self) {
        self.fits.clear();
    }
}
