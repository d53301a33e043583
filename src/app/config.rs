//! Configuration file handling for snipcheck.
//!
//! Loads configuration from `~/.config/snipcheck/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analysis::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::capture::region::MIN_SNIP_SIZE;

/// Environment variable overriding `backend.endpoint`.
pub const ENDPOINT_ENV: &str = "SNIPCHECK_ENDPOINT";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub snip: SnipConfig,
    #[serde(default)]
    pub hotkeys: HotkeyConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnipConfig {
    /// Minimum snip width/height in logical points
    #[serde(default = "default_min_size")]
    pub min_size: f64,
    /// Delay between showing the panel and starting the request
    #[serde(default = "default_panel_delay_ms")]
    pub panel_delay_ms: u64,
}

impl Default for SnipConfig {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            panel_delay_ms: default_panel_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HotkeyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT.as_secs()
}

fn default_min_size() -> f64 {
    MIN_SNIP_SIZE
}

fn default_panel_delay_ms() -> u64 {
    200
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            toml::from_str::<Config>(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            Config::default()
        };

        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                config.backend.endpoint = endpoint;
            }
        }

        config.snip.min_size = config.snip.min_size.max(1.0);
        Ok(config)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("snipcheck").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/snipcheck/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.snip.panel_delay_ms, 200);
        assert_eq!(config.snip.min_size, 10.0);
        assert!(config.hotkeys.enabled);
        assert_eq!(config.backend.timeout_secs, 60);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[snip]\npanel_delay_ms = 0\n\n[hotkeys]\nenabled = false").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.snip.panel_delay_ms, 0);
        assert_eq!(config.snip.min_size, 10.0);
        assert!(!config.hotkeys.enabled);
        assert_eq!(config.backend.connect_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[snip\nmin_size = ").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = default_path();
        assert!(path.ends_with("snipcheck/config.toml"));
    }
}
