use std::path::PathBuf;

/// Location of a gallery installation's data directory.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_path: PathBuf,
}

impl Config {
    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("gallery.redb")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_path.join("config.toml")
    }
}
