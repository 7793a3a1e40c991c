//! Configuration tests: paths, defaults and YAML round trips

use qcgrid::config::GridConfig;
use qcgrid::config_paths;
use tempfile::TempDir;

#[test]
fn test_config_dir_is_app_specific() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("qcgrid"));
    }
}

#[test]
fn test_config_file_is_yaml_in_config_dir() {
    if let (Some(dir), Some(file)) = (config_paths::config_dir(), config_paths::config_file()) {
        assert_eq!(file.parent(), Some(dir.as_path()));
        assert_eq!(file.extension().and_then(|e| e.to_str()), Some("yaml"));
    }
}

#[test]
fn test_logs_dir_inside_config_dir() {
    if let (Some(dir), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(dir));
    }
}

#[test]
fn test_defaults() {
    let config = GridConfig::default();
    assert_eq!(config.long_press_ms, 500);
    assert_eq!(config.aql_debounce_ms, 500);
    assert_eq!(config.tolerance_epsilon, 1e-4);
    assert!(config.confirm_bulk_clear);
    assert!(config.extra_header_labels.is_empty());
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = GridConfig::load_from(&dir.path().join("nope.yaml"));
    assert_eq!(config, GridConfig::default());
}

#[test]
fn test_partial_file_overrides_named_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "long_press_ms: 650\nconfirm_bulk_clear: false\nextra_header_labels:\n  - Point 1\n",
    )
    .unwrap();

    let config = GridConfig::load_from(&path);
    assert_eq!(config.long_press_ms, 650);
    assert!(!config.confirm_bulk_clear);
    assert_eq!(config.extra_header_labels, vec!["Point 1".to_string()]);
    assert_eq!(config.aql_debounce_ms, 500);
}

#[test]
fn test_invalid_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "long_press_ms: [not, a, number]").unwrap();
    assert_eq!(GridConfig::load_from(&path), GridConfig::default());
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let config = GridConfig {
        tolerance_epsilon: 0.0,
        haptic_pulse_ms: 20,
        ..GridConfig::default()
    };

    config.save_to(&path).unwrap();
    assert_eq!(GridConfig::load_from(&path), config);
}

#[test]
fn test_negative_epsilon_falls_back_to_default_rule() {
    let config = GridConfig {
        tolerance_epsilon: -1.0,
        ..GridConfig::default()
    };
    assert_eq!(config.tolerance_rule().epsilon, 1e-4);
}
