//! Configuration file handling for imgscii.
//!
//! Loads configuration from `~/.config/imgscii/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file structure for imgscii.
/// Loaded from ~/.config/imgscii/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct RenderConfig {
    /// Output width in characters when --width is not given.
    pub width: Option<u32>,
    /// Character aspect correction factor.
    pub aspect_correction: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HttpConfig {
    /// Remote fetch timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the default-path file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(explicit) => Self::read(explicit),
            None => {
                let default = default_path();
                if default.exists() {
                    Self::read(&default)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("imgscii").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/imgscii/config.toml")
        })
}
