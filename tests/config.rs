use loadwatch::config::Config;
use loadwatch::ui::core::View;
use loadwatch::utils::datetime;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.api.base_url, "http://localhost:8000/api/");
    assert_eq!(config.ui.page_size, 10);
    assert_eq!(config.default_view(), View::Dashboard);
    assert_eq!(config.reports.default_range_days, 30);
    assert_eq!(config.display.currency, "TZS");
    assert!(config.session.persist);
    assert!(!config.logging.enabled);
    assert!(config.export.directory.is_none());
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Invalid sidebar width should fail
    config.ui.sidebar_width = 5;
    assert!(config.validate().is_err());

    // Reset and test an unknown start view
    config = Config::default();
    config.ui.default_view = "settings".to_string();
    assert!(config.validate().is_err());

    config = Config::default();
    config.api.base_url = "localhost:8000".to_string();
    assert!(config.validate().is_err());

    config = Config::default();
    config.ui.page_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("default_view = \"dashboard\""));
    assert!(toml_str.contains("auto_refresh_interval_seconds = 60"));
}

#[test]
fn test_partial_config_deserialization() {
    // Partial TOML configs merge with defaults
    let partial_toml = r#"
[ui]
default_view = "/vehicle-management"
page_size = 25

[logging]
enabled = true
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();

    assert_eq!(config.ui.page_size, 25);
    assert_eq!(config.default_view(), View::Vehicles);
    assert!(config.logging.enabled);

    // Unspecified values use defaults
    assert_eq!(config.api.timeout_seconds, 10);
    assert_eq!(config.display.date_format, datetime::API_DATE_FORMAT);
    assert!(config.validate().is_ok());
}

#[test]
fn test_refresh_interval() {
    let mut config = Config::default();
    assert_eq!(config.sync.interval(), Some(Duration::from_secs(60)));

    config.sync.auto_refresh_interval_seconds = 0;
    assert_eq!(config.sync.interval(), None);
}

#[test]
fn test_api_url_override() {
    let mut config = Config::default();
    config.apply_api_url_override(Some("   ".to_string()));
    assert_eq!(config.api.base_url, "http://localhost:8000/api/");

    config.apply_api_url_override(Some(" https://weigh.example.com/api/ ".to_string()));
    assert_eq!(config.api.base_url, "https://weigh.example.com/api/");
}

#[test]
fn test_generate_and_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    Config::generate_default_config(&path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# Loadwatch Configuration File"));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.ui.page_size, Config::default().ui.page_size);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\ntimeout_seconds = 0\n").unwrap();

    assert!(Config::load_from_file(&path).is_err());
}
