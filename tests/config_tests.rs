use fleet_wizard::config::{ConfigError, ConfigManager, WizardConfig};
use fleet_wizard::wizard::SubmitPolicy;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::new(dir.path().join("absent.json"));
    let config = manager.load().unwrap();
    assert_eq!(config, WizardConfig::default());
    assert_eq!(config.submit_policy, SubmitPolicy::Strict);
}

#[test]
fn save_then_load_round_trips_and_leaves_no_tmp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let manager = ConfigManager::new(path.clone());
    let config = WizardConfig {
        submit_policy: SubmitPolicy::FinalStep,
        log_filter: "fleet_wizard=debug".into(),
    };

    manager.save(&config).unwrap();
    assert_eq!(manager.load().unwrap(), config);
    assert!(!dir.path().join("nested").join("config.json.tmp").exists());

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"final_step\""));
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = ConfigManager::new(path).load().unwrap_err();
    assert!(matches!(err, ConfigError::Serde(_)));
}
