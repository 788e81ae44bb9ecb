use aeroperf::aero::{
    AircraftGeometry, DirectCoefficients, LiftMode, ParasiteDrag, ParasiteFitRequest,
    WeightBalancedCoefficients, fit_parasite_drag, fit_quadratic,
};
use aeroperf::atmosphere::{ExponentialAtmosphere, SCALE_HEIGHT_8000_M};
use aeroperf::core::constants::PARASITE_DRAG_FLOOR;
use aeroperf::core::{Airspeed, AvailableThrustTable, FlightCondition, RequiredThrustTable};
use aeroperf::performance::{
    DragModel, EmpiricalCoefficients, EvaluationSession, FlightState, ModelConfig, SessionError,
    evaluate, evaluate_altitudes,
};
use aeroperf::propulsion::ThrustModel;
use proptest::prelude::*;

fn geometry() -> AircraftGeometry {
    AircraftGeometry::new(10.0, 7.0).expect("geometry")
}

fn trainer_config() -> ModelConfig {
    ModelConfig {
        atmosphere: ExponentialAtmosphere::standard(),
        thrust: ThrustModel::DensityScaled {
            sea_level_static_thrust_n: 2_500.0,
        },
    }
}

fn trainer_mode() -> DragModel {
    DragModel::Coefficient(LiftMode::Direct(DirectCoefficients {
        lift_coefficient: 0.3,
        drag_coefficient: 0.03,
        oswald_efficiency: None,
    }))
}

#[test]
fn trainer_at_sea_level_is_descending() {
    let cond = FlightCondition::with_m_s(0.0, 50.0, 10_000.0);
    let result = evaluate(&cond, &geometry(), &trainer_config(), &trainer_mode()).expect("evaluate");

    let set = result.coefficients.expect("coefficients");
    assert!((set.wing_area_m2 - 14.285_714_285_714).abs() < 1e-9);
    assert!((set.dynamic_pressure_pa - 1_531.25).abs() < 1e-9);
    assert!((result.lift_n.expect("lift") - 6_562.5).abs() < 1e-9);
    assert!((result.thrust_required_n - 656.25).abs() < 1e-9);
    assert!((result.power_required_mw() - 0.032_812_5).abs() < 1e-12);
    assert_eq!(result.thrust_available_n, 2_500.0);
    assert_eq!(result.flight_state(), Some(FlightState::Descending));
}

#[test]
fn knots_are_normalized_before_evaluation() {
    let knots = FlightCondition::new(0.0, Airspeed::Knots(100.0), 10_000.0);
    let m_s = FlightCondition::with_m_s(0.0, 100.0 * 1_852.0 / 3_600.0, 10_000.0);
    let a = evaluate(&knots, &geometry(), &trainer_config(), &trainer_mode()).expect("knots");
    let b = evaluate(&m_s, &geometry(), &trainer_config(), &trainer_mode()).expect("m/s");
    assert!((a.airspeed_m_s - 51.444_444).abs() < 1e-5);
    assert!((a.thrust_required_n - b.thrust_required_n).abs() < 1e-9);
}

#[test]
fn density_follows_exponential_law() {
    let atm = ExponentialAtmosphere::standard();
    assert_eq!(atm.density(0.0), 1.225);
    assert!((atm.density(8_500.0) - 1.225 / std::f64::consts::E).abs() < 1e-12);

    let coarse = ExponentialAtmosphere::with_scale_height(SCALE_HEIGHT_8000_M).expect("atm");
    assert!(coarse.density(5_000.0) < atm.density(5_000.0));
}

#[test]
fn reference_curves_hit_anchors_and_clamp() {
    let available = AvailableThrustTable::default();
    let at_anchor = available.interpolate(5_000.0);
    assert_eq!(at_anchor.thrust_n, 25_000.0);
    assert_eq!(at_anchor.power_mw, 10.0);

    let mid = available.interpolate(1_000.0);
    assert!((mid.thrust_n - 45_000.0).abs() < 1e-9);
    assert!((mid.power_mw - 18.0).abs() < 1e-12);

    assert_eq!(available.interpolate(-250.0).thrust_n, 50_000.0);
    assert_eq!(available.interpolate(12_000.0).thrust_n, 5_000.0);

    let required = RequiredThrustTable::default();
    assert_eq!(required.interpolate(8_000.0).thrust_n, 9_300.0);
    assert_eq!(required.interpolate(11_000.0).power_mw, 3.6);
}

#[test]
fn multi_altitude_results_keep_input_order() {
    let template = FlightCondition::with_m_s(0.0, 50.0, 10_000.0);
    let results = evaluate_altitudes(
        &template,
        &[5_000.0, 0.0, 8_000.0],
        &geometry(),
        &ModelConfig::default(),
        &DragModel::ReferenceTable(RequiredThrustTable::default()),
    )
    .expect("evaluate altitudes");

    let altitudes: Vec<f64> = results.iter().map(|r| r.altitude_m).collect();
    assert_eq!(altitudes, vec![5_000.0, 0.0, 8_000.0]);
    assert_eq!(results[0].excess_thrust_n, 25_000.0 - 9_500.0);
    assert_eq!(results[1].excess_thrust_n, 40_000.0);
    assert_eq!(results[2].excess_thrust_n, 10_000.0 - 9_300.0);
}

#[test]
fn session_rejects_bad_lists_without_losing_results() {
    let mut session = EvaluationSession::new(
        geometry(),
        trainer_config(),
        trainer_mode(),
        FlightCondition::with_m_s(0.0, 50.0, 10_000.0),
    );
    session.submit_altitudes("0, 1000, 5000").expect("first submission");

    let err = session
        .submit_altitudes("0, 1000, abc")
        .expect_err("malformed list");
    assert!(matches!(err, SessionError::Parse(_)));

    let err = session
        .submit_altitudes("-1, 20000")
        .expect_err("out of range list");
    assert_eq!(
        err.to_string(),
        "All altitudes must be between 0 and 12000 meters."
    );
    assert_eq!(session.results().len(), 3);
}

#[test]
fn parasite_fit_at_cruise_speed_is_least_squares() {
    let table = RequiredThrustTable::default();
    let request = ParasiteFitRequest {
        table: &table,
        geometry: geometry(),
        weight_n: 10_000.0,
        oswald_efficiency: 0.8,
        reference_velocity_m_s: 400.0,
        atmosphere: ExponentialAtmosphere::standard(),
    };
    let fit = fit_parasite_drag(&request).expect("fit");
    assert_eq!(fit.samples.len(), 5);
    assert!(fit.rms_residual.is_finite());

    // Residuals of a fit with an intercept term sum to zero.
    let sum: f64 = fit.residuals().iter().sum();
    assert!(sum.abs() < 1e-10);

    // Drag coefficient needed grows with altitude at fixed true airspeed.
    assert!(fit.samples[4].parasite_drag_coefficient > fit.samples[0].parasite_drag_coefficient);
    for h in [0.0, 3_000.0, 6_000.0, 12_000.0] {
        assert!(fit.fit.evaluate(h) >= PARASITE_DRAG_FLOOR);
    }
}

#[test]
fn fitted_parasite_drag_is_floored() {
    let fit = fit_quadratic(&[(0.0, 0.01), (5_000.0, -0.01), (10_000.0, 0.01)]).expect("fit");
    assert!(fit.raw(5_000.0) < 0.0);
    assert_eq!(fit.evaluate(5_000.0), PARASITE_DRAG_FLOOR);

    let mode = DragModel::Coefficient(LiftMode::WeightBalanced(WeightBalancedCoefficients {
        oswald_efficiency: 0.8,
        parasite: ParasiteDrag::Fitted(fit),
    }));
    let cond = FlightCondition::with_m_s(5_000.0, 100.0, 10_000.0);
    let result = evaluate(&cond, &geometry(), &ModelConfig::default(), &mode).expect("evaluate");
    let set = result.coefficients.expect("coefficients");
    assert_eq!(set.parasite_drag_coefficient, Some(PARASITE_DRAG_FLOOR));
}

proptest! {
    #[test]
    fn excess_is_available_minus_required(
        altitude in 0.0f64..12_000.0,
        velocity in 10.0f64..400.0,
        weight in 1_000.0f64..50_000.0,
    ) {
        let cond = FlightCondition::with_m_s(altitude, velocity, weight);
        let modes = [
            trainer_mode(),
            DragModel::Empirical(EmpiricalCoefficients::default()),
            DragModel::ReferenceTable(RequiredThrustTable::default()),
        ];
        for mode in &modes {
            let r = evaluate(&cond, &geometry(), &trainer_config(), mode).unwrap();
            prop_assert_eq!(r.excess_thrust_n, r.thrust_available_n - r.thrust_required_n);
            prop_assert_eq!(r.excess_power_w, r.power_available_w - r.power_required_w);
        }
    }
}
