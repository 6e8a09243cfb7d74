// Store configuration loaded from YAML

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const APP_NAME: &str = "taskdeck";
const CONFIG_FILE: &str = "config.yml";
const DATA_FILE: &str = "tasks.json";

/// Settings for opening a [`crate::TaskStore`]
///
/// ```yaml
/// data_file: ~/notes/tasks.json
/// seed_on_empty: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backing JSON file. Relative paths are resolved against the config file's directory.
    pub data_file: PathBuf,
    /// Populate a brand-new store with onboarding tasks
    pub seed_on_empty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            seed_on_empty: true,
        }
    }
}

impl StoreConfig {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed_on_empty: bool) -> Self {
        self.seed_on_empty = seed_on_empty;
        self
    }

    /// Load from a YAML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(file = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))?;

        if config.data_file.is_relative() {
            if let Some(dir) = path.parent() {
                config.data_file = dir.join(&config.data_file);
            }
        }

        debug!(file = ?path, data_file = ?config.data_file, "Loaded config");
        Ok(config)
    }

    /// Load from the platform config directory, or defaults if there is none
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse YAML config")
    }
}

/// `<config_dir>/taskdeck/config.yml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
}

/// `<data_dir>/taskdeck/tasks.json`, or `./taskdeck.json` without a data dir
pub fn default_data_file() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(APP_NAME).join(DATA_FILE),
        None => PathBuf::from(format!("{}.json", APP_NAME)),
    }
}
