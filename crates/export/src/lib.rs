//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use aeroperf_performance::PerformanceResult;
use serde::Serialize;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Flat row shared by the CSV and JSON exporters. Power columns are in MW; the
/// coefficient columns are only filled by the coefficient drag model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub altitude_m: f64,
    pub airspeed_m_s: f64,
    pub weight_n: f64,
    pub density_kg_m3: f64,
    pub thrust_required_n: f64,
    pub thrust_available_n: f64,
    pub power_required_mw: f64,
    pub power_available_mw: f64,
    pub excess_thrust_n: f64,
    pub excess_power_mw: f64,
    pub wing_area_m2: Option<f64>,
    pub dynamic_pressure_pa: Option<f64>,
    pub lift_coefficient: Option<f64>,
    pub drag_coefficient: Option<f64>,
    pub lift_n: Option<f64>,
    pub flight_state: Option<&'static str>,
}

impl From<&PerformanceResult> for Row {
    fn from(result: &PerformanceResult) -> Self {
        let coeffs = result.coefficients.as_ref();
        Self {
            altitude_m: result.altitude_m,
            airspeed_m_s: result.airspeed_m_s,
            weight_n: result.weight_n,
            density_kg_m3: result.density_kg_m3,
            thrust_required_n: result.thrust_required_n,
            thrust_available_n: result.thrust_available_n,
            power_required_mw: result.power_required_mw(),
            power_available_mw: result.power_available_mw(),
            excess_thrust_n: result.excess_thrust_n,
            excess_power_mw: result.excess_power_mw(),
            wing_area_m2: coeffs.map(|c| c.wing_area_m2),
            dynamic_pressure_pa: coeffs.map(|c| c.dynamic_pressure_pa),
            lift_coefficient: coeffs.map(|c| c.lift_coefficient),
            drag_coefficient: coeffs.map(|c| c.total_drag_coefficient),
            lift_n: result.lift_n,
            flight_state: result.flight_state().map(|state| state.label()),
        }
    }
}

pub mod results {
    use std::io::{self, Write};

    use aeroperf_performance::PerformanceResult;

    use super::Row;

    pub const HEADER: &str = "altitude_m,airspeed_m_s,weight_n,density_kg_m3,thrust_required_n,thrust_available_n,power_required_mw,power_available_mw,excess_thrust_n,excess_power_mw,wing_area_m2,dynamic_pressure_pa,lift_coefficient,drag_coefficient,lift_n,flight_state";

    /// Write results as CSV in the order given. Missing coefficients, lift and state
    /// become empty fields.
    pub fn write_csv(writer: &mut dyn Write, results: &[PerformanceResult]) -> io::Result<()> {
        let mut csv = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv.write_record(HEADER.split(','))?;
        for result in results {
            csv.serialize(Row::from(result))?;
        }
        csv.flush()
    }
}

pub mod report {
    use std::io::{self, Write};

    use aeroperf_performance::PerformanceResult;
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::Row;

    /// JSON envelope describing one run.
    #[derive(Debug, Serialize)]
    pub struct Report<'a> {
        pub aircraft: &'a str,
        pub thrust_model: &'a str,
        pub drag_model: &'a str,
        pub scale_height_m: f64,
        pub results: Vec<Row>,
    }

    impl<'a> Report<'a> {
        pub fn new(
            aircraft: &'a str,
            thrust_model: &'a str,
            drag_model: &'a str,
            scale_height_m: f64,
            results: &[PerformanceResult],
        ) -> Self {
            Self {
                aircraft,
                thrust_model,
                drag_model,
                scale_height_m,
                results: results.iter().map(Row::from).collect(),
            }
        }
    }

    pub fn write_json(writer: &mut dyn Write, report: &Report<'_>) -> io::Result<()> {
        to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)
    }
}
