//! Configuration loading.
//!
//! Defaults first, then an optional TOML file merged on top. Paths not set
//! in the file fall back to the platform data directory (relocatable via
//! `NW_DATA_DIR`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NwError, Result};
use crate::settings::StorageSettings;
use crate::widget::SortMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
}

/// `[storage]` section: path overrides for the two store locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub legacy_path: Option<PathBuf>,
    pub shared_path: Option<PathBuf>,
    pub schema_path: Option<PathBuf>,
}

/// `[widget]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub sort_mode: SortMode,
    /// Result-count ceiling for widget queries; zero means unlimited.
    #[serde(default)]
    pub default_limit: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::default(),
            default_limit: 0,
        }
    }
}

impl Config {
    /// Load configuration, merging an explicit file (or the default
    /// location) over built-in defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = explicit_path.map(PathBuf::from).or_else(default_config_path);

        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            if explicit_path.is_some() {
                return Err(NwError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .map_err(|err| NwError::Config(format!("read config {}: {err}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|err| NwError::Config(format!("parse config {}: {err}", path.display())))
    }

    /// Resolve storage settings: configured paths win, defaults fill the
    /// gaps.
    pub fn storage_settings(&self) -> Result<StorageSettings> {
        let defaults = StorageSettings::resolve_default()
            .ok_or_else(|| NwError::Config("platform data directory not found".to_string()))?;

        Ok(StorageSettings::new(
            self.storage
                .legacy_path
                .clone()
                .unwrap_or_else(|| defaults.legacy_db().to_path_buf()),
            self.storage
                .shared_path
                .clone()
                .unwrap_or_else(|| defaults.shared_db().to_path_buf()),
            self.storage
                .schema_path
                .clone()
                .unwrap_or_else(|| defaults.schema().to_path_buf()),
        ))
    }
}

fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("notewidget/config.toml"))
}
