use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// User-facing settings, persisted as config.toml.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), AppConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.auth.min_password_length == 0 {
            errors.push("min_password_length must be at least 1".to_string());
        }

        if self.auth.iterations == 0 {
            errors.push("iterations must be at least 1".to_string());
        }

        if self.auth.parallelism == 0 {
            errors.push("parallelism must be at least 1".to_string());
        }

        if self.auth.memory_kib < self.auth.parallelism.max(1).saturating_mul(8) {
            errors.push("memory_kib must be at least 8 * parallelism".to_string());
        }

        if self.gallery.max_payload_bytes == 0 {
            errors.push("max_payload_bytes must be at least 1".to_string());
        }

        if self.gallery.showcase_size == 0 {
            errors.push("showcase_size must be at least 1".to_string());
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::default();
        let parallelism = if self.auth.parallelism == 0 {
            defaults.auth.parallelism
        } else {
            self.auth.parallelism
        };
        let min_memory_kib = parallelism.saturating_mul(8);

        Self {
            auth: AuthConfig {
                min_password_length: if self.auth.min_password_length == 0 {
                    defaults.auth.min_password_length
                } else {
                    self.auth.min_password_length
                },
                memory_kib: if self.auth.memory_kib < min_memory_kib {
                    defaults.auth.memory_kib.max(min_memory_kib)
                } else {
                    self.auth.memory_kib
                },
                iterations: if self.auth.iterations == 0 {
                    defaults.auth.iterations
                } else {
                    self.auth.iterations
                },
                parallelism,
            },
            gallery: GalleryConfig {
                max_payload_bytes: if self.gallery.max_payload_bytes == 0 {
                    defaults.gallery.max_payload_bytes
                } else {
                    self.gallery.max_payload_bytes
                },
                showcase_size: if self.gallery.showcase_size == 0 {
                    defaults.gallery.showcase_size
                } else {
                    self.gallery.showcase_size
                },
            },
        }
    }
}

/// Registration policy and Argon2id cost parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_min_password_length() -> usize {
    6
}

// argon2 crate defaults (OWASP minimum for Argon2id)
fn default_memory_kib() -> u32 {
    19 * 1024
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

/// Upload limits and browsing settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: u64,
    #[serde(default = "default_showcase_size")]
    pub showcase_size: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: default_max_payload_bytes(),
            showcase_size: default_showcase_size(),
        }
    }
}

fn default_max_payload_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_showcase_size() -> usize {
    20
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
