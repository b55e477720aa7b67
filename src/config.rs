//! User configuration: storage and log locations

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const STORAGE_FILE: &str = "storage.json";
const LOG_FILE: &str = "dynform-tui.log";

/// Optional overrides read from `config.json` in the platform config dir
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Where submitted entries and view state are cached
    pub storage_path: Option<PathBuf>,
    /// Log file location
    pub log_path: Option<PathBuf>,
    /// Keep state between runs (default true)
    pub persist: Option<bool>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "dynform", "dynform-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration; a missing file means defaults
    pub fn load() -> Result<Self> {
        let Some(path) = Self::config_path().filter(|p| p.exists()) else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Keep state between runs unless explicitly disabled
    pub fn persist_enabled(&self) -> bool {
        self.persist.unwrap_or(true)
    }

    /// Storage file, falling back to the platform data directory
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage_path.clone().or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_dir().join(STORAGE_FILE))
        })
    }

    /// Log file, falling back to the platform data directory
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join(LOG_FILE)))
    }
}
