use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::Deserialize;

/// File looked up in the working directory by [`AppConfig::load`].
pub const CONFIG_FILE: &str = "dataset-lens.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory scanned for `*.json` datasets.
    pub datasets_dir: PathBuf,
    /// Debounce delay for UI refreshes, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            datasets_dir: PathBuf::from("./datasets"),
            debounce_ms: 300,
        }
    }
}

impl AppConfig {
    /// `dataset-lens.toml` if present, then `DATASET_LENS_DIR` /
    /// `DATASET_LENS_DEBOUNCE_MS` on top.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE), |key| env::var(key).ok())
    }

    fn load_from(path: &Path, var: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::from_file(path);
        cfg.apply_env(var);
        cfg
    }

    /// Read a config file, falling back to defaults when it is missing or invalid.
    pub fn from_file(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("failed to parse {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("DATASET_LENS_DIR") {
            self.datasets_dir = PathBuf::from(dir);
        }
        if let Some(ms) = var("DATASET_LENS_DEBOUNCE_MS") {
            match ms.parse() {
                Ok(ms) => self.debounce_ms = ms,
                Err(_) => warn!("ignoring DATASET_LENS_DEBOUNCE_MS={ms:?}: not a number"),
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
