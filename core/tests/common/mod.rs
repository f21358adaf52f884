#![allow(dead_code)]

use gallery_core::types::{AppConfig, AuthConfig, Config, Payload};
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Cheap hashing so tests stay fast.
pub fn fast_settings() -> AppConfig {
    AppConfig {
        auth: AuthConfig {
            min_password_length: 6,
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
        ..AppConfig::default()
    }
}

pub fn write_fast_settings(config: &Config) -> AppConfig {
    let settings = fast_settings();
    std::fs::create_dir_all(&config.base_path).unwrap();
    settings.save(&config.settings_path()).unwrap();
    settings
}

pub fn data_config(dir: &Path) -> Config {
    Config {
        base_path: dir.join("gallery"),
    }
}

pub fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

pub fn png_payload() -> Payload {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&[0; 24]);
    Payload::from_bytes(bytes).unwrap()
}
