use std::path::PathBuf;

use aeroperf::aero::{LiftMode, ParasiteDrag, ParasiteFitCache};
use aeroperf::config::{DragConfig, load_aircraft};
use aeroperf::performance::{AircraftError, DragModel, FlightState, aircraft, evaluate};

fn configs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs")
}

#[test]
fn bundled_catalog_converts_and_evaluates() {
    let catalog = load_aircraft(configs_dir().join("aircraft")).expect("catalog");
    let names: Vec<&str> = catalog.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Trainer", "Reference Jet", "Fitted Jet", "Placeholder"]
    );

    let mut cache = ParasiteFitCache::new();
    for config in &catalog {
        let model = aircraft::from_config(config, &mut cache).expect("convert");
        let result = evaluate(
            &model.default_condition,
            &model.geometry,
            &model.config,
            &model.mode,
        )
        .expect("evaluate");
        assert!(result.thrust_required_n.is_finite(), "{}", model.name);
        assert!(result.power_available_w.is_finite(), "{}", model.name);
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn default_selection_is_the_quick_check_trainer() {
    let catalog = load_aircraft(configs_dir().join("aircraft")).expect("catalog");
    let model = aircraft::select(&catalog, None, &mut ParasiteFitCache::new()).expect("select");
    assert_eq!(model.name, "Trainer");

    let result = evaluate(
        &model.default_condition,
        &model.geometry,
        &model.config,
        &model.mode,
    )
    .expect("evaluate");
    assert!((result.thrust_required_n - 656.25).abs() < 1e-9);
    assert_eq!(result.flight_state(), Some(FlightState::Descending));
}

#[test]
fn fitted_jet_uses_the_fitted_parasite_drag() {
    let catalog = load_aircraft(configs_dir().join("aircraft")).expect("catalog");
    let model = aircraft::select(&catalog, Some("fitted jet"), &mut ParasiteFitCache::new())
        .expect("select");
    match model.mode {
        DragModel::Coefficient(LiftMode::WeightBalanced(wb)) => {
            assert!(matches!(wb.parasite, ParasiteDrag::Fitted(_)));
        }
        other => panic!("unexpected drag model {other:?}"),
    }
    assert_eq!(model.config.atmosphere.scale_height_m(), 8_000.0);
}

#[test]
fn yaml_fleet_loads_and_unknown_names_fail() {
    let catalog = load_aircraft(configs_dir().join("fleet.yaml")).expect("fleet");
    assert_eq!(catalog.len(), 2);

    let toml_trainer = &load_aircraft(configs_dir().join("aircraft")).expect("catalog")[0];
    assert!(matches!(
        (&catalog[0].drag, &toml_trainer.drag),
        (
            DragConfig::Direct { oswald_efficiency: Some(a), .. },
            DragConfig::Direct { oswald_efficiency: Some(b), .. },
        ) if a == b
    ));

    let mut cache = ParasiteFitCache::new();
    let glider = aircraft::select(&catalog, Some("GLIDER"), &mut cache).expect("glider");
    assert!((glider.default_condition.velocity_m_s() - 25.722_222).abs() < 1e-5);

    let err = aircraft::select(&catalog, Some("Concorde"), &mut cache).expect_err("missing");
    assert!(matches!(err, AircraftError::NotFound(_)));
}

#[test]
fn version_matches_package_manifest() {
    assert_eq!(aeroperf::version(), env!("CARGO_PKG_VERSION"));
}
