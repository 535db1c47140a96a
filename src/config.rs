//! Client configuration loaded from `config.yaml` in the data directory

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{API_URL_ENV, DATA_DIR_NAME, DEFAULT_API_BASE_URL};

const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(skip)]
    pub data_dir: PathBuf,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            data_dir: default_data_dir(),
        }
    }
}

/// `~/.chatdesk`, or `./.chatdesk` when no home directory is known
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

impl Config {
    /// Load from the default data directory, then apply env overrides
    pub fn load() -> Self {
        let mut config = Self::load_from(&default_data_dir());
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }
        config
    }

    /// Load `config.yaml` from `data_dir`. Missing or unreadable files yield defaults.
    pub fn load_from(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let mut config = match fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "Failed to parse config, using defaults");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        };
        config.data_dir = data_dir.to_path_buf();
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        config
    }

    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("creating {}", self.data_dir.display()))?;
        let content = serde_yaml::to_string(self)?;
        fs::write(self.data_dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(dir.path());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn test_save_and_reload_strips_trailing_slash() {
        let dir = tempdir().unwrap();
        let config = Config {
            api_base_url: "https://chat.example.com/".into(),
            data_dir: dir.path().to_path_buf(),
        };
        config.save().unwrap();
        let loaded = Config::load_from(dir.path());
        assert_eq!(loaded.api_base_url, "https://chat.example.com");
    }

    #[test]
    fn test_corrupt_config_falls_back() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "api_base_url: [unclosed").unwrap();
        let config = Config::load_from(dir.path());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
