//! End-to-end: catchment -> optimizer -> compliance -> report.

use drain_core::catchment::{CatchmentParams, LandUse, SoilType};
use drain_core::compliance::{evaluate, Verdict};
use drain_core::config::{DesignConfig, STANDARD_DIAMETERS_MM};
use drain_core::hydraulics::peak_runoff;
use drain_core::optimizer::{optimize_with, ConvergenceModel, OptimizerSettings};
use drain_core::rainfall::{design_intensity, ReturnPeriod};
use drain_core::report::DrainageReport;

fn settings(seed: u64) -> OptimizerSettings {
    OptimizerSettings {
        num_pipes: 8,
        generations: 40,
        seed: Some(seed),
        convergence: ConvergenceModel::Simulated,
    }
}

#[test]
fn large_catchment_degrades_to_largest_pipe() {
    let config = DesignConfig::default();
    let catchment = CatchmentParams::new(18.5, 0.65, 100.0, 1.2);
    assert!((peak_runoff(&catchment) - 3.340_277_777_8).abs() < 1e-6);

    let result = optimize_with(&catchment, &config, settings(2024)).unwrap();
    let network = &result.network;

    assert_eq!(network.manholes.len(), 9);
    assert_eq!(network.pipes.len(), 8);
    network.check_topology().unwrap();
    assert_eq!(result.convergence_data.len(), 40);

    // No catalog size carries 3.34 m³/s within the velocity limits
    for pipe in &network.pipes {
        assert_eq!(pipe.diameter_mm, 1200);
        assert!(pipe.fill_ratio <= 0.79 + 1e-12);
    }
    assert!(!network.nbc_compliant);

    let report = DrainageReport::build(result, &config).unwrap();
    assert_eq!(report.compliance.len(), 9);
    assert_eq!(report.summary.overall, Verdict::Fail);
    // 18.5 ha is below the clearance threshold
    assert_eq!(report.compliance[8].verdict, Verdict::Pass);
}

#[test]
fn small_catchment_design() {
    let config = DesignConfig::default();
    let intensity = design_intensity("Bengaluru", ReturnPeriod::Years5).unwrap();
    let catchment = CatchmentParams::new(1.5, 0.45, intensity, 1.0)
        .with_soil(SoilType::Loam)
        .with_land_use(LandUse::Residential);

    let result = optimize_with(&catchment, &config, settings(5)).unwrap();
    let network = &result.network;

    for pipe in &network.pipes {
        assert!(STANDARD_DIAMETERS_MM.contains(&pipe.diameter_mm));
        assert!(pipe.slope_pct >= config.standards.min_slope_pct);
        assert!(pipe.slope_pct <= config.standards.max_slope_pct);
        assert!(pipe.flood_risk <= 100);
    }
    let expected_compliance = network.pipes.iter().all(|p| p.meets_nbc(&config.standards));
    assert_eq!(network.nbc_compliant, expected_compliance);

    let checks = evaluate(network, &config.standards).unwrap();
    assert_eq!(checks.len(), 9);
    assert!(result.warnings.is_empty());
}

#[test]
fn same_seed_same_report_content() {
    let config = DesignConfig::default();
    let catchment = CatchmentParams::new(6.0, 0.8, 130.0, 0.4);

    let a = optimize_with(&catchment, &config, settings(77)).unwrap();
    let b = optimize_with(&catchment, &config, settings(77)).unwrap();
    assert_eq!(a.network, b.network);
    assert_eq!(a.savings_pct, b.savings_pct);
    assert_eq!(a.warnings.len(), 3);

    let ra = DrainageReport::build(a, &config).unwrap();
    let rb = DrainageReport::build(b, &config).unwrap();
    assert_ne!(ra.id, rb.id);
    assert_eq!(ra.compliance, rb.compliance);
}

#[test]
fn custom_config_from_json() {
    let json = r#"{ "standards": { "max_velocity_mps": 6.0 }, "rates": { "labor_per_m": 400.0 } }"#;
    let config = DesignConfig::from_json_str(json).unwrap();
    assert_eq!(config.standards.min_velocity_mps, 0.6);

    let catchment = CatchmentParams::new(3.0, 0.6, 90.0, 2.0);
    let result = optimize_with(&catchment, &config, settings(9)).unwrap();
    let report = DrainageReport::build(result, &config).unwrap();
    assert_eq!(report.compliance[1].limit, "<= 6.0 m/s");
}
