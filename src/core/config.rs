//! User settings persisted as JSON in the heady configuration directory.

use crate::core::dirs::get_config_directory;
use crate::core::error::HeadyError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub trunk_refs: Vec<String>,
    pub remote: String,
    pub label_prefix: String,
    pub reflog_window_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trunk_refs: vec!["origin/main".to_string(), "origin/stable".to_string()],
            remote: "origin".to_string(),
            label_prefix: "heady".to_string(),
            reflog_window_days: 14,
        }
    }
}

impl Settings {
    pub fn load_or_create() -> Result<Self, HeadyError> {
        Self::load_or_create_in(&get_config_directory()?)
    }

    pub fn load_or_create_in(config_dir: &Path) -> Result<Self, HeadyError> {
        let config_file = Self::file_in(config_dir);

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            let settings = Self::default();
            settings.save_in(config_dir)?;
            Ok(settings)
        }
    }

    pub fn save_in(&self, config_dir: &Path) -> Result<(), HeadyError> {
        std::fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::file_in(config_dir), content)?;

        Ok(())
    }

    fn file_in(config_dir: &Path) -> PathBuf {
        config_dir.join("config.json")
    }

    pub fn reflog_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.reflog_window_days)
    }
}
