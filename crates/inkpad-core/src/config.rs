//! Configuration loaded from a JSON file in the user's config directory.

use crate::state::{DEFAULT_STROKE_WIDTH, InkColor, InkStyle, InputPolicy, PadState};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Initial tool settings for a drawing pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    pub ink_color: InkColor,
    pub stroke_width: f64,
    pub finger_input: bool,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            ink_color: InkColor::default(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            finger_input: true,
        }
    }
}

impl PadConfig {
    /// Build the initial state. Out-of-range values are clamped.
    pub fn initial_state(&self) -> PadState {
        PadState {
            style: InkStyle::new(self.ink_color, self.stroke_width),
            input_policy: InputPolicy {
                finger_input: self.finger_input,
            },
            ..PadState::default()
        }
    }
}

/// Default location of the configuration file.
///
/// On Linux: `~/.config/inkpad/config.json`
pub fn default_config_path() -> ConfigResult<PathBuf> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("inkpad").join(CONFIG_FILE_NAME))
}

/// Read a JSON configuration file.
pub fn read_config<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a JSON configuration file, falling back to defaults.
///
/// A missing file is normal and yields defaults silently; any other
/// failure is logged.
pub fn read_config_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_config(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::debug!("No config at {}, using defaults", path.display());
            T::default()
        }
        Err(e) => {
            log::warn!("{}; using defaults", e);
            T::default()
        }
    }
}
