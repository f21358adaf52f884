use super::*;
use tempfile::TempDir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = TempDir::new().unwrap();
    let config = AppConfig::load(&temp.path().join("config.toml")).unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.auth.min_password_length, 6);
    assert_eq!(config.gallery.showcase_size, 20);
}

#[test]
fn save_then_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");

    let mut config = AppConfig::default();
    config.auth.min_password_length = 10;
    config.gallery.max_payload_bytes = 1024;
    config.save(&path).unwrap();

    assert_eq!(AppConfig::load(&path).unwrap(), config);
}

#[test]
fn partial_file_fills_in_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[gallery]\nshowcase_size = 5\n").unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.gallery.showcase_size, 5);
    assert_eq!(config.gallery.max_payload_bytes, 5 * 1024 * 1024);
    assert_eq!(config.auth, AuthConfig::default());
}

#[test]
fn malformed_file_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[gallery\nshowcase_size = ").unwrap();

    assert!(matches!(
        AppConfig::load(&path),
        Err(AppConfigError::Parse(_))
    ));
}

#[test]
fn default_config_is_valid() {
    assert!(AppConfig::default().validate().is_empty());
}

#[test]
fn invalid_values_are_reported_and_replaced() {
    let mut config = AppConfig::default();
    config.auth.min_password_length = 0;
    config.auth.iterations = 0;
    config.gallery.showcase_size = 0;

    assert_eq!(config.validate().len(), 3);

    let fixed = config.with_defaults_for_invalid();
    assert!(fixed.validate().is_empty());
    assert_eq!(fixed.auth.min_password_length, 6);
    assert_eq!(fixed.auth.iterations, 2);
    assert_eq!(fixed.gallery.showcase_size, 20);
}

#[test]
fn memory_cost_must_cover_parallelism() {
    let mut config = AppConfig::default();
    config.auth.parallelism = 4;
    config.auth.memory_kib = 16;

    assert_eq!(config.validate().len(), 1);

    let fixed = config.with_defaults_for_invalid();
    assert_eq!(fixed.auth.parallelism, 4);
    assert!(fixed.auth.memory_kib >= 32);
    assert!(fixed.validate().is_empty());
}
