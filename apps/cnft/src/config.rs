//! Configuration file and precedence rules.
//!
//! Values are taken from, in order: command-line flags (which clap already
//! merges with `SHYFT_API_KEY` / `CNFT_ENDPOINT` / `CNFT_NETWORK`), the JSON
//! config file, then built-in defaults.

use std::path::{Path, PathBuf};

use cnft_core::Network;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No API key configured (use --api-key, SHYFT_API_KEY or the config file)")]
    MissingApiKey,
}

/// Contents of the config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
}

/// Values given on the command line or via environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub network: Option<Network>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub endpoint: String,
    /// Cluster to use when a subcommand does not name one.
    pub network: Option<Network>,
}

impl Settings {
    /// Network for a command, falling back to that command's own default.
    pub fn network_or(&self, command_default: Network) -> Network {
        self.network.unwrap_or(command_default)
    }
}

/// `$XDG_CONFIG_HOME/cnft/config.json`, else `~/.config/cnft/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("cnft").join(CONFIG_FILE_NAME))
}

impl Config {
    /// Load the config at `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(write_err)?;
        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Overwrite the fields that `overrides` sets, keeping the rest.
    #[must_use]
    pub fn merged(self, overrides: Overrides) -> Self {
        Self {
            api_key: overrides.api_key.or(self.api_key),
            endpoint: overrides.endpoint.or(self.endpoint),
            network: overrides.network.or(self.network),
        }
    }

    /// Apply overrides and defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] when no source provides a key.
    pub fn resolve(self, overrides: Overrides) -> Result<Settings, ConfigError> {
        let api_key = overrides
            .api_key
            .or(self.api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let endpoint = overrides
            .endpoint
            .or(self.endpoint)
            .unwrap_or_else(|| cnft_sdk::DEFAULT_ENDPOINT.to_string());
        Ok(Settings {
            api_key,
            endpoint,
            network: overrides.network.or(self.network),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = Config {
            api_key: Some("k".to_string()),
            endpoint: None,
            network: Some(Network::Testnet),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides_win() {
        let config = Config {
            api_key: Some("file-key".to_string()),
            endpoint: Some("http://file".to_string()),
            network: Some(Network::Testnet),
        };
        let settings = config
            .resolve(Overrides {
                api_key: Some("flag-key".to_string()),
                endpoint: None,
                network: Some(Network::MainnetBeta),
            })
            .unwrap();
        assert_eq!(settings.api_key, "flag-key");
        assert_eq!(settings.endpoint, "http://file");
        assert_eq!(settings.network_or(Network::Devnet), Network::MainnetBeta);
    }

    #[test]
    fn test_defaults_applied() {
        let settings = Config {
            api_key: Some("k".to_string()),
            ..Config::default()
        }
        .resolve(Overrides::default())
        .unwrap();
        assert_eq!(settings.endpoint, cnft_sdk::DEFAULT_ENDPOINT);
        assert_eq!(settings.network_or(Network::Devnet), Network::Devnet);
    }

    #[test]
    fn test_merged_keeps_unset_fields() {
        let config = Config {
            api_key: Some("old".to_string()),
            endpoint: Some("http://file".to_string()),
            network: None,
        }
        .merged(Overrides {
            api_key: Some("new".to_string()),
            network: Some(Network::Devnet),
            ..Overrides::default()
        });
        assert_eq!(config.api_key.as_deref(), Some("new"));
        assert_eq!(config.endpoint.as_deref(), Some("http://file"));
        assert_eq!(config.network, Some(Network::Devnet));
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::default()
            .resolve(Overrides {
                api_key: Some("  ".to_string()),
                ..Overrides::default()
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }
}
