//! Application configuration
//!
//! Loaded from YAML or JSON; every field has a default, so a partial file
//! overrides only what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::GestureConfig;
use crate::grid::GridGeometry;

/// Esc
pub const DEFAULT_EXIT_KEY: u32 = 27;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path attempted
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// YAML parse failure
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parse failure
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range
    #[error("invalid {field}: {message}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Create a validation error
    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// File format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.json`
    Json,
    /// Anything else
    Yaml,
}

impl FileFormat {
    /// `.json` (any case) is JSON; everything else is YAML
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Reads a file into a string, tagging I/O errors with the path
pub(crate) fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Complete runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pinch detection
    pub gesture: GestureConfig,
    /// Button placement
    pub geometry: GridGeometry,
    /// Frame width in pixels
    pub frame_width: u32,
    /// Frame height in pixels
    pub frame_height: u32,
    /// Key code that ends a session
    pub exit_key: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            geometry: GridGeometry::default(),
            frame_width: 900,
            frame_height: 700,
            exit_key: DEFAULT_EXIT_KEY,
        }
    }
}

impl AppConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set gesture tunables
    #[must_use]
    pub const fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    /// Set grid geometry
    #[must_use]
    pub const fn with_geometry(mut self, geometry: GridGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set frame size
    #[must_use]
    pub const fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_width = width;
        self.frame_height = height;
        self
    }

    /// Set exit key
    #[must_use]
    pub const fn with_exit_key(mut self, key: u32) -> Self {
        self.exit_key = key;
        self
    }

    /// Parses and validates YAML
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml_ng::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates JSON
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a file, picking the format from its extension
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = read_file(path)?;
        match FileFormat::from_path(path) {
            FileFormat::Json => Self::from_json_str(&text),
            FileFormat::Yaml => Self::from_yaml_str(&text),
        }
    }

    /// Renders as YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Rejects values the session cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        let threshold = self.gesture.pinch_threshold;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::invalid(
                "gesture.pinch_threshold",
                format!("must be a positive number, got {threshold}"),
            ));
        }

        let g = &self.geometry;
        for (field, value) in [
            ("geometry.button_width", g.button_width),
            ("geometry.button_height", g.button_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be positive, got {value}"),
                ));
            }
        }
        for (field, value) in [
            ("geometry.padding_x", g.padding_x),
            ("geometry.padding_y", g.padding_y),
            ("geometry.origin_x", g.origin_x),
            ("geometry.origin_y", g.origin_y),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be zero or more, got {value}"),
                ));
            }
        }

        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::invalid(
                "frame size",
                format!("must be positive, got {}x{}", self.frame_width, self.frame_height),
            ));
        }
        Ok(())
    }
}
