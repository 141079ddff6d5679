//! User configuration
//!
//! Optional defaults loaded from `<config_dir>/sudoku-scan/config.toml`.
//! A missing file means built-in defaults; a malformed file is an error
//! rather than a silent fallback.

use crate::ocr::DEFAULT_PSM;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Persistent scan defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Tesseract binary name or path
    pub tesseract: String,
    /// Page segmentation mode passed to tesseract
    pub psm: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tesseract: "tesseract".to_string(),
            psm: DEFAULT_PSM,
        }
    }
}

impl ScanConfig {
    /// Location of the user config file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sudoku-scan").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
