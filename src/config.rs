//! Configuration file support for the viewer.
//!
//! This module provides serialization and deserialization of viewer settings:
//! zoom steps, loupe size, grid defaults and measurement policy. Every section
//! falls back to defaults when missing, so partial files load fine.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BUTTON_ZOOM_STEP, DEFAULT_LOUPE_RADIUS, DEFAULT_LOUPE_SCALE,
    DEFAULT_RELATIVE_SNAP_TOLERANCE, DEFAULT_WHEEL_ZOOM_STEP, GRID_MIN_LINES, ZOOM_MAX,
};
use crate::measure::MeasurementMode;
use crate::overlay::{GridColor, GridSettings};

/// Log level setting for the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Viewer configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Log verbosity requested for the host's logger
    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default)]
    pub zoom: ZoomConfig,

    #[serde(default)]
    pub loupe: LoupeConfig,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub measurement: MeasurementConfig,
}

/// Zoom step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Zoom change per wheel notch
    #[serde(default = "default_wheel_step")]
    pub wheel_step: f64,
    /// Zoom change per zoom button press
    #[serde(default = "default_button_step")]
    pub button_step: f64,
}

fn default_wheel_step() -> f64 {
    DEFAULT_WHEEL_ZOOM_STEP
}

fn default_button_step() -> f64 {
    DEFAULT_BUTTON_ZOOM_STEP
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            wheel_step: default_wheel_step(),
            button_step: default_button_step(),
        }
    }
}

/// Loupe size and magnification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoupeConfig {
    #[serde(default = "default_loupe_radius")]
    pub radius: f64,
    #[serde(default = "default_loupe_scale")]
    pub scale: f64,
}

fn default_loupe_radius() -> f64 {
    DEFAULT_LOUPE_RADIUS
}

fn default_loupe_scale() -> f64 {
    DEFAULT_LOUPE_SCALE
}

impl Default for LoupeConfig {
    fn default() -> Self {
        Self {
            radius: default_loupe_radius(),
            scale: default_loupe_scale(),
        }
    }
}

/// Initial grid appearance. Line counts are clamped when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub color: GridColor,
    #[serde(default = "default_grid_lines")]
    pub horizontal: u32,
    #[serde(default = "default_grid_lines")]
    pub vertical: u32,
}

fn default_grid_lines() -> u32 {
    GRID_MIN_LINES
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            color: GridColor::default(),
            horizontal: default_grid_lines(),
            vertical: default_grid_lines(),
        }
    }
}

impl GridConfig {
    /// Grid settings with counts clamped into the supported range.
    pub fn to_settings(&self) -> GridSettings {
        let mut settings = GridSettings::new(self.horizontal, self.vertical);
        settings.color = self.color;
        settings
    }
}

/// Measurement behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementConfig {
    /// Mode selected when a viewer opens
    #[serde(default)]
    pub default_mode: MeasurementMode,
    /// Relative ratios this close to a whole number are shown as that number
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f64,
    /// Drop measurement points when a different image is shown
    #[serde(default = "default_clear_on_image_change")]
    pub clear_on_image_change: bool,
}

fn default_snap_tolerance() -> f64 {
    DEFAULT_RELATIVE_SNAP_TOLERANCE
}

fn default_clear_on_image_change() -> bool {
    true
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            default_mode: MeasurementMode::default(),
            snap_tolerance: default_snap_tolerance(),
            clear_on_image_change: default_clear_on_image_change(),
        }
    }
}

impl ViewerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            zoom: ZoomConfig::default(),
            loupe: LoupeConfig::default(),
            grid: GridConfig::default(),
            measurement: MeasurementConfig::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that numeric settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("zoom.wheel_step", self.zoom.wheel_step, 0.0, ZOOM_MAX)?;
        check_range("zoom.button_step", self.zoom.button_step, 0.0, ZOOM_MAX)?;
        check_range("loupe.radius", self.loupe.radius, 0.0, f64::MAX)?;
        if !(self.loupe.scale >= 1.0 && self.loupe.scale.is_finite()) {
            return Err(ConfigError::invalid_value(
                "loupe.scale",
                format!("must be at least 1, got {}", self.loupe.scale),
            ));
        }
        let tolerance = self.measurement.snap_tolerance;
        if !(0.0..0.5).contains(&tolerance) {
            return Err(ConfigError::invalid_value(
                "measurement.snap_tolerance",
                format!("must be in [0, 0.5), got {}", tolerance),
            ));
        }
        Ok(())
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "refview-config.json"
    }

    /// Get the default config file path for auto-load/save.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("refview").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("refview")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to a file, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to_path(&path)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn check_range(field: &str, value: f64, min_exclusive: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > min_exclusive && value <= max {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(
            field,
            format!("must be in ({}, {}], got {}", min_exclusive, max, value),
        ))
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A setting is outside the range the viewer accepts
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
