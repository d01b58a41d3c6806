//! Configuration handling for the form

use crate::state::EngineOptions;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration for the form
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormConfig {
    /// Milliseconds between a successful submit and the automatic reset
    pub reset_delay_ms: Option<u64>,
    /// Re-check a touched confirmation field when the password changes
    pub revalidate_dependents: Option<bool>,
}

impl FormConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "signup-form", "signup-form")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, falling back to defaults when it is missing
    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: FormConfig = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn reset_delay(&self) -> Duration {
        self.reset_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(EngineOptions::default().reset_delay)
    }

    pub fn revalidate_dependents(&self) -> bool {
        self.revalidate_dependents.unwrap_or(false)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            reset_delay: self.reset_delay(),
            revalidate_dependents: self.revalidate_dependents(),
        }
    }
}
