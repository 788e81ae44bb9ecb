//! Altitude-indexed reference tables with clamped linear interpolation.
//!
//! Two tables with different meanings share the same shape: the thrust/power the
//! engine can deliver ([`AvailableThrustTable`]) and the thrust/power the airframe
//! needs ([`RequiredThrustTable`]). They are kept as separate types so a caller
//! cannot hand one where the other is expected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One anchor of a reference table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub altitude_m: f64,
    pub thrust_n: f64,
    pub power_mw: f64,
}

impl ReferencePoint {
    pub const fn new(altitude_m: f64, thrust_n: f64, power_mw: f64) -> Self {
        Self {
            altitude_m,
            thrust_n,
            power_mw,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("reference table has no anchors")]
    Empty,
    #[error("anchor {index} contains a non-finite value")]
    NonFinite { index: usize },
    #[error("anchor altitudes must be strictly increasing (anchor {index} at {altitude_m} m)")]
    NotAscending { index: usize, altitude_m: f64 },
}

/// Validated, strictly ascending list of anchors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceTable {
    anchors: Vec<ReferencePoint>,
}

impl ReferenceTable {
    pub fn new(anchors: Vec<ReferencePoint>) -> Result<Self, TableError> {
        if anchors.is_empty() {
            return Err(TableError::Empty);
        }
        for (index, point) in anchors.iter().enumerate() {
            if !(point.altitude_m.is_finite()
                && point.thrust_n.is_finite()
                && point.power_mw.is_finite())
            {
                return Err(TableError::NonFinite { index });
            }
            if index > 0 && point.altitude_m <= anchors[index - 1].altitude_m {
                return Err(TableError::NotAscending {
                    index,
                    altitude_m: point.altitude_m,
                });
            }
        }
        Ok(Self { anchors })
    }

    pub fn anchors(&self) -> &[ReferencePoint] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Altitude range covered by the anchors.
    pub fn altitude_range(&self) -> (f64, f64) {
        let first = self.anchors[0].altitude_m;
        let last = self.anchors[self.anchors.len() - 1].altitude_m;
        (first, last)
    }

    /// Interpolated thrust (N) and power (MW) at `altitude_m`.
    ///
    /// Altitudes outside the table clamp to the nearest boundary anchor; there is no
    /// extrapolation. An altitude that lands on an anchor returns that anchor verbatim.
    pub fn interpolate(&self, altitude_m: f64) -> ReferencePoint {
        let first = self.anchors[0];
        let last = self.anchors[self.anchors.len() - 1];
        if altitude_m <= first.altitude_m || altitude_m.is_nan() {
            return ReferencePoint {
                altitude_m,
                ..first
            };
        }
        if altitude_m >= last.altitude_m {
            return ReferencePoint { altitude_m, ..last };
        }

        let idx = self.anchors.partition_point(|p| p.altitude_m < altitude_m);
        let upper = self.anchors[idx];
        if upper.altitude_m == altitude_m {
            return upper;
        }
        let lower = self.anchors[idx - 1];
        let frac = (altitude_m - lower.altitude_m) / (upper.altitude_m - lower.altitude_m);
        ReferencePoint {
            altitude_m,
            thrust_n: lower.thrust_n + frac * (upper.thrust_n - lower.thrust_n),
            power_mw: lower.power_mw + frac * (upper.power_mw - lower.power_mw),
        }
    }
}

/// Thrust and power the engine can deliver at each anchor altitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableThrustTable(ReferenceTable);

impl AvailableThrustTable {
    pub fn new(anchors: Vec<ReferencePoint>) -> Result<Self, TableError> {
        ReferenceTable::new(anchors).map(Self)
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.0
    }

    pub fn interpolate(&self, altitude_m: f64) -> ReferencePoint {
        self.0.interpolate(altitude_m)
    }
}

impl Default for AvailableThrustTable {
    fn default() -> Self {
        Self(ReferenceTable {
            anchors: vec![
                ReferencePoint::new(0.0, 50_000.0, 20.0),
                ReferencePoint::new(2_000.0, 40_000.0, 16.0),
                ReferencePoint::new(5_000.0, 25_000.0, 10.0),
                ReferencePoint::new(8_000.0, 10_000.0, 4.0),
                ReferencePoint::new(10_000.0, 5_000.0, 2.0),
            ],
        })
    }
}

/// Thrust and power the airframe needs at each anchor altitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequiredThrustTable(ReferenceTable);

impl RequiredThrustTable {
    pub fn new(anchors: Vec<ReferencePoint>) -> Result<Self, TableError> {
        ReferenceTable::new(anchors).map(Self)
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.0
    }

    pub fn interpolate(&self, altitude_m: f64) -> ReferencePoint {
        self.0.interpolate(altitude_m)
    }
}

impl Default for RequiredThrustTable {
    fn default() -> Self {
        Self(ReferenceTable {
            anchors: vec![
                ReferencePoint::new(0.0, 10_000.0, 4.0),
                ReferencePoint::new(2_000.0, 9_800.0, 3.9),
                ReferencePoint::new(5_000.0, 9_500.0, 3.8),
                ReferencePoint::new(8_000.0, 9_300.0, 3.7),
                ReferencePoint::new(10_000.0, 9_200.0, 3.6),
            ],
        })
    }
}
