use sph_core::config::{SimulationConfig, MAX_KERNEL_EXPONENT};
use sph_core::error::SimulationError;

#[test]
fn test_defaults() {
    let config = SimulationConfig::default();

    assert_eq!(config.particle_count, 1000);
    assert_eq!(config.particle_mass, 1.0);
    assert_eq!(config.target_density, 1.0);
    assert_eq!(config.gravity_strength, 1.0);
    assert_eq!(config.smoothing_radius, 1.0);
    assert_eq!(config.kernel_exponent, 2);
    assert_eq!(config.width, 512.0);
    assert_eq!(config.height, 512.0);
    assert_eq!(config.spatial_hash_bins, None);
    assert_eq!(config.random_seed, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_fills_defaults() {
    let config = SimulationConfig::from_json_str(
        r#"{ "particle_count": 250, "gravity_strength": 0.5, "random_seed": 9 }"#,
    )
    .unwrap();

    assert_eq!(config.particle_count, 250);
    assert_eq!(config.gravity_strength, 0.5);
    assert_eq!(config.random_seed, Some(9));
    assert_eq!(config.width, 512.0);
    assert_eq!(config.kernel_exponent, 2);
}

#[test]
fn test_json_round_trip_through_serde() {
    let config = SimulationConfig {
        spatial_hash_bins: Some(4096),
        random_seed: Some(77),
        ..SimulationConfig::default()
    };
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(SimulationConfig::from_json_str(&text).unwrap(), config);
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = SimulationConfig::from_json_str("{ particle_count: ").unwrap_err();
    assert!(matches!(err, SimulationError::ConfigParse { .. }), "got {err:?}");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SimulationConfig::load("/definitely/not/here.json").unwrap_err();
    match err {
        SimulationError::ConfigIo { path, .. } => assert!(path.ends_with("here.json")),
        other => panic!("expected ConfigIo, got {other:?}"),
    }
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("sph-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "width": 64.0, "height": 32.0 }"#).unwrap();

    let config = SimulationConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.width, 64.0);
    assert_eq!(config.height, 32.0);
}

fn rejected(config: SimulationConfig) -> bool {
    matches!(
        config.validate(),
        Err(SimulationError::InvalidConfiguration { .. })
    )
}

#[test]
fn test_fatal_values_rejected() {
    let base = SimulationConfig::default;

    assert!(rejected(SimulationConfig { particle_mass: 0.0, ..base() }));
    assert!(rejected(SimulationConfig { particle_mass: -1.0, ..base() }));
    assert!(rejected(SimulationConfig { smoothing_radius: 0.0, ..base() }));
    assert!(rejected(SimulationConfig { kernel_exponent: 0, ..base() }));
    assert!(rejected(SimulationConfig { kernel_exponent: MAX_KERNEL_EXPONENT + 1, ..base() }));
    assert!(rejected(SimulationConfig { kernel_exponent: u32::MAX, ..base() }));
    assert!(rejected(SimulationConfig { spatial_hash_bins: Some(0), ..base() }));
    assert!(rejected(SimulationConfig { width: 0.0, ..base() }));
    assert!(rejected(SimulationConfig { height: -5.0, ..base() }));
    assert!(rejected(SimulationConfig { worker_count: 0, ..base() }));
    assert!(rejected(SimulationConfig { target_density: 0.0, ..base() }));
    assert!(rejected(SimulationConfig { boundary_jitter: 0.0, ..base() }));
    assert!(rejected(SimulationConfig { boundary_jitter: 300.0, ..base() }));
    assert!(rejected(SimulationConfig { step_size: -0.1, ..base() }));
    assert!(rejected(SimulationConfig { gravity_strength: f32::NAN, ..base() }));
}

#[test]
fn test_largest_kernel_exponent_accepted() {
    let config = SimulationConfig {
        kernel_exponent: MAX_KERNEL_EXPONENT,
        ..SimulationConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_huge_kernel_exponent_from_json_rejected() {
    let err = SimulationConfig::from_json_str(r#"{ "kernel_exponent": 4294967295 }"#).unwrap_err();
    assert!(err.to_string().contains("kernel_exponent"), "got {err}");
}

#[test]
fn test_invalid_json_values_rejected() {
    let err = SimulationConfig::from_json_str(r#"{ "particle_mass": 0.0 }"#).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidConfiguration { .. }));
    assert!(err.to_string().contains("particle_mass"));
}

#[test]
fn test_cell_size_and_derived_bins() {
    let config = SimulationConfig {
        width: 100.0,
        height: 50.0,
        smoothing_radius: 2.5,
        ..SimulationConfig::default()
    };
    assert_eq!(config.cell_size(), 5.0);
    assert_eq!(config.cell_counts(), (20, 10));
    // cell coordinates 0..=20 by 0..=10
    assert_eq!(config.bin_count(), 21 * 11);
}

#[test]
fn test_explicit_bins_kept() {
    let config = SimulationConfig {
        spatial_hash_bins: Some(1009),
        ..SimulationConfig::default()
    };
    assert_eq!(config.bin_count(), 1009);
}
