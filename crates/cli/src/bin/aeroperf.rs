use std::io::{self, Write};
use std::path::PathBuf;

use aeroperf::config::{AircraftConfig, load_aircraft};
use aeroperf::core::FlightCondition;
use aeroperf::core::constants::{ALTITUDE_INPUT_MAX_M, ALTITUDE_INPUT_MIN_M, WATTS_PER_MEGAWATT};
use aeroperf::core::units::m_s_to_knots;
use aeroperf::export::report::{self, Report};
use aeroperf::export::{results, writer_for_path};
use aeroperf::performance::aero::ParasiteFitCache;
use aeroperf::performance::aircraft::{self, AircraftModel};
use aeroperf::propulsion::ThrustModel;
use aeroperf::performance::{
    EvaluationSession, FlightState, PerformanceResult, altitude_grid, evaluate_altitudes,
    lift_weight_difference_pct, sort_by_altitude,
};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Thrust/power required vs available for one or more altitudes"
)]
struct Cli {
    /// Aircraft catalog: directory of TOML files, single TOML file, or YAML list
    #[arg(long, default_value = "configs/aircraft")]
    catalog: PathBuf,

    /// Aircraft name from the catalog (case-insensitive, defaults to the first entry)
    #[arg(long)]
    aircraft: Option<String>,

    /// Single altitude in metres (defaults to the catalog cruise altitude)
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["altitudes", "sweep"])]
    altitude: Option<f64>,

    /// Comma-separated altitudes in metres, e.g. "0, 2000, 5000"
    #[arg(long, allow_hyphen_values = true, conflicts_with = "sweep")]
    altitudes: Option<String>,

    /// Evaluate N evenly spaced altitudes from 0 to 12000 m
    #[arg(long)]
    sweep: Option<usize>,

    /// True airspeed in m/s
    #[arg(long, conflicts_with = "knots")]
    velocity: Option<f64>,

    /// True airspeed in knots
    #[arg(long)]
    knots: Option<f64>,

    /// Aircraft weight in newtons
    #[arg(long)]
    weight: Option<f64>,

    /// Atmosphere scale height in metres
    #[arg(long)]
    scale_height: Option<f64>,

    /// List results by ascending altitude instead of input order
    #[arg(long, default_value_t = false)]
    sort: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Output path (`-` for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let catalog = load_aircraft(&cli.catalog)
        .with_context(|| format!("failed to load catalog {}", cli.catalog.display()))?;
    let mut config = aircraft::find(&catalog, cli.aircraft.as_deref())?.clone();
    apply_overrides(&mut config, &cli);

    let mut cache = ParasiteFitCache::new();
    let model = aircraft::from_config(&config, &mut cache)?;
    info!(
        aircraft = %model.name,
        thrust = model.config.thrust.label(),
        drag = model.mode.label(),
        "selected aircraft"
    );

    let mut session = EvaluationSession::new(
        model.geometry,
        model.config.clone(),
        model.mode.clone(),
        model.default_condition,
    );
    let mut rows: Vec<PerformanceResult> = if let Some(text) = cli.altitudes.as_deref() {
        session.submit_altitudes(text)?.to_vec()
    } else if let Some(samples) = cli.sweep {
        let grid = altitude_grid(ALTITUDE_INPUT_MIN_M, ALTITUDE_INPUT_MAX_M, samples);
        evaluate_altitudes(
            session.template(),
            &grid,
            &model.geometry,
            &model.config,
            &model.mode,
        )?
    } else {
        let altitude = cli.altitude.unwrap_or(model.default_condition.altitude_m);
        session.submit_altitude(altitude)?.to_vec()
    };

    if cli.sort {
        sort_by_altitude(&mut rows);
    }

    let mut writer = writer_for_path(&cli.output)
        .with_context(|| format!("failed to open {}", cli.output.display()))?;
    match cli.format {
        OutputFormat::Table => write_table(&mut writer, &model, session.template(), &rows)?,
        OutputFormat::Csv => results::write_csv(&mut writer, &rows)?,
        OutputFormat::Json => {
            let doc = Report::new(
                &model.name,
                model.config.thrust.label(),
                model.mode.label(),
                model.config.atmosphere.scale_height_m(),
                &rows,
            );
            report::write_json(&mut writer, &doc)?;
        }
    }
    writer.flush()?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn apply_overrides(config: &mut AircraftConfig, cli: &Cli) {
    if let Some(v) = cli.velocity {
        config.airspeed_m_s = Some(v);
        config.airspeed_kt = None;
    }
    if let Some(kt) = cli.knots {
        config.airspeed_m_s = None;
        config.airspeed_kt = Some(kt);
    }
    if let Some(weight) = cli.weight {
        config.weight_n = weight;
    }
    if let Some(h) = cli.scale_height {
        config.atmosphere.scale_height_m = h;
    }
}

fn write_table(
    w: &mut dyn Write,
    model: &AircraftModel,
    template: &FlightCondition,
    rows: &[PerformanceResult],
) -> io::Result<()> {
    let velocity = template.velocity_m_s();

    writeln!(w, "=== Aircraft Performance ===")?;
    writeln!(w, "Aircraft       : {}", model.name)?;
    writeln!(
        w,
        "Models         : thrust = {}, drag = {}, H = {:.0} m",
        model.config.thrust.label(),
        model.mode.label(),
        model.config.atmosphere.scale_height_m()
    )?;
    writeln!(
        w,
        "Airspeed       : {:.1} m/s ({:.1} kt)",
        velocity,
        m_s_to_knots(velocity)
    )?;
    writeln!(w, "Weight         : {:.0} N", template.weight_n)?;
    writeln!(w)?;
    let (unit, scale, precision) = power_unit(&model.config.thrust);
    writeln!(
        w,
        "{:>9} {:>8} {:>11} {:>11} {:>11} {:>12} {:>12} {:>12}  state",
        "alt_m",
        "rho",
        "T_req_N",
        "T_avail_N",
        "T_xs_N",
        format!("P_req_{unit}"),
        format!("P_av_{unit}"),
        format!("P_xs_{unit}"),
    )?;
    for r in rows {
        writeln!(
            w,
            "{:>9.0} {:>8.4} {:>11.1} {:>11.1} {:>11.1} {:>12.p$} {:>12.p$} {:>12.p$}  {}",
            r.altitude_m,
            r.density_kg_m3,
            r.thrust_required_n,
            r.thrust_available_n,
            r.excess_thrust_n,
            r.power_required_w * scale,
            r.power_available_w * scale,
            r.excess_power_w * scale,
            r.flight_state().map(|s| s.label()).unwrap_or("-"),
            p = precision,
        )?;
    }

    if let [single] = rows {
        if let Some(set) = single.coefficients {
            writeln!(w)?;
            writeln!(w, "Wing area      : {:.2} m²", set.wing_area_m2)?;
            writeln!(w, "Dynamic press. : {:.2} Pa", set.dynamic_pressure_pa)?;
            writeln!(
                w,
                "CL / CD        : {:.4} / {:.4}",
                set.lift_coefficient, set.total_drag_coefficient
            )?;
        }
        if let Some(lift) = single.lift_n {
            writeln!(
                w,
                "Lift           : {:.1} N vs weight {:.1} N ({:.2}% difference)",
                lift,
                single.weight_n,
                lift_weight_difference_pct(lift, single.weight_n)
            )?;
        }
    }

    // One legend line per state, in order of first appearance.
    let mut seen: Vec<FlightState> = Vec::new();
    for state in rows.iter().filter_map(|r| r.flight_state()) {
        if !seen.contains(&state) {
            seen.push(state);
        }
    }
    if !seen.is_empty() {
        writeln!(w)?;
        for state in seen {
            writeln!(w, "{:<10}: {}", state.label(), state.description())?;
        }
    }
    Ok(())
}

/// Column unit, scale from watts and precision for power.
fn power_unit(thrust: &ThrustModel) -> (&'static str, f64, usize) {
    match thrust {
        ThrustModel::DensityScaled { .. } => ("W", 1.0, 1),
        ThrustModel::ReferenceCurve(_) => ("MW", 1.0 / WATTS_PER_MEGAWATT, 3),
    }
}
