use std::fs;

use tally_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_uses_standard_fallback_labels() {
    let cfg = Config::default();

    assert_eq!(cfg.classifier.cash_label, "Cash");
    assert_eq!(cfg.classifier.revenue_label, "Service Revenue");
    assert_eq!(cfg.classifier.expense_label, "General Expenses");
    assert!(cfg.validate().is_ok());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("tally.json"), dir.path().join("backups"));

    let mut cfg = Config::default();
    cfg.currency = "EUR".to_string();
    cfg.classifier.cash_label = "Bank".to_string();
    cfg.data_root = Some(dir.path().join("books"));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.resolve_data_root(), dir.path().join("books"));
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("tally.json");
    fs::write(&path, r#"{"classifier": {"expense_label": "Operating Costs"}}"#).expect("write");
    let manager = ConfigManager::new(path, dir.path().join("backups"));

    let loaded = manager.load().expect("load");
    assert_eq!(loaded.classifier.expense_label, "Operating Costs");
    assert_eq!(loaded.classifier.cash_label, "Cash");
    assert_eq!(loaded.currency, "USD");
}

#[test]
fn blank_label_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("tally.json");
    fs::write(&path, r#"{"classifier": {"cash_label": "  "}}"#).expect("write");
    let manager = ConfigManager::new(path, dir.path().join("backups"));

    assert!(matches!(manager.load(), Err(ConfigError::Invalid(_))));
}

#[test]
fn backups_are_listed_and_restorable() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
    let mut cfg = Config::default();
    cfg.currency = "EUR".into();

    let name = manager.backup(&cfg, Some("Before import")).expect("backup");
    assert!(name.ends_with("_before-import.json"));
    assert_eq!(manager.list_backups().expect("list"), vec![name.clone()]);
    assert_eq!(manager.restore(&name).expect("restore").currency, "EUR");
}

#[test]
fn blank_currency_is_rejected() {
    let mut cfg = Config::default();
    cfg.currency = " ".into();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}
