mod app;
mod core;

pub use app::{AppConfig, AppConfigError, AuthConfig, GalleryConfig};
pub use self::core::Config;

#[cfg(test)]
mod tests;
