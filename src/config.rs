//! Recognizer configuration.
//!
//! Loads and saves [`GestureConfig`] as TOML. Every field has a default, so
//! a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default screen density used until the platform reports one.
pub const DEFAULT_SCREEN_DPI: f32 = 160.0;

/// Default time a stationary touch must be held to become a long press.
pub const DEFAULT_HOLD_TIMEOUT_MS: u64 = 500;

/// Swipe recognition thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeSettings {
    /// Minimum travel along the swipe axis, as a fraction of the screen DPI
    pub min_distance_dpi_factor: f32,
    /// Maximum time between down and up in milliseconds
    pub max_duration_ms: u64,
    /// Maximum angle (degrees) the movement may deviate from the swipe axis
    pub max_variance_angle_deg: f32,
    /// Constant deviation allowance, as a fraction of the screen DPI
    pub variance_dpi_factor: f32,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            min_distance_dpi_factor: 0.5,
            max_duration_ms: 500,
            max_variance_angle_deg: 20.0,
            variance_dpi_factor: 0.2,
        }
    }
}

impl SwipeSettings {
    /// Maximum swipe duration in nanoseconds.
    pub fn max_duration_nanos(&self) -> i64 {
        Duration::from_millis(self.max_duration_ms)
            .as_nanos()
            .try_into()
            .unwrap_or(i64::MAX)
    }

    /// Minimum swipe distance in pixels for the given DPI.
    pub fn min_distance(&self, dpi: f32) -> f32 {
        dpi * self.min_distance_dpi_factor
    }

    /// Allowed perpendicular deviation for a movement of `aligned` pixels.
    pub fn max_deviation(&self, aligned: f32, dpi: f32) -> f32 {
        aligned * self.max_variance_angle_deg.to_radians().tan()
            + dpi * self.variance_dpi_factor / 2.0
    }
}

/// Gesture recognizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Time a stationary touch must be held to become a long press
    pub hold_timeout_ms: u64,
    /// Screen density used until the platform reports one
    pub screen_dpi: f32,
    /// Swipe thresholds
    pub swipe: SwipeSettings,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_timeout_ms: DEFAULT_HOLD_TIMEOUT_MS,
            screen_dpi: DEFAULT_SCREEN_DPI,
            swipe: SwipeSettings::default(),
        }
    }
}

impl GestureConfig {
    /// Hold timeout as a duration.
    pub fn hold_timeout(&self) -> Duration {
        Duration::from_millis(self.hold_timeout_ms)
    }

    /// Set the hold timeout.
    pub fn with_hold_timeout(mut self, timeout: Duration) -> Self {
        self.hold_timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Set the initial screen DPI.
    pub fn with_screen_dpi(mut self, dpi: f32) -> Self {
        self.screen_dpi = dpi;
        self
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GestureConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hold_timeout_ms == 0 {
            return Err(ConfigError::Invalid("hold_timeout_ms must be positive"));
        }
        if !(self.screen_dpi.is_finite() && self.screen_dpi > 0.0) {
            return Err(ConfigError::Invalid("screen_dpi must be a positive number"));
        }

        let swipe = &self.swipe;
        if !(swipe.min_distance_dpi_factor.is_finite() && swipe.min_distance_dpi_factor > 0.0) {
            return Err(ConfigError::Invalid(
                "swipe.min_distance_dpi_factor must be a positive number",
            ));
        }
        if !(0.0..90.0).contains(&swipe.max_variance_angle_deg) {
            return Err(ConfigError::Invalid(
                "swipe.max_variance_angle_deg must be within [0, 90)",
            ));
        }
        if !(swipe.variance_dpi_factor.is_finite() && swipe.variance_dpi_factor >= 0.0) {
            return Err(ConfigError::Invalid(
                "swipe.variance_dpi_factor must not be negative",
            ));
        }

        Ok(())
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "touchgesture", "TouchGesture")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default configuration file path.
pub fn default_config_path() -> PathBuf {
    get_data_dir().join("gestures.toml")
}

/// Load configuration from `path`, falling back to defaults if it does not exist.
pub fn load_config(path: &Path) -> Result<GestureConfig, ConfigError> {
    if !path.exists() {
        tracing::info!("No gesture config at {}, using defaults", path.display());
        return Ok(GestureConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    let config = GestureConfig::from_toml_str(&content)?;

    tracing::info!("Loaded gesture config from {}", path.display());
    Ok(config)
}

/// Save configuration to `path`.
pub fn save_config(path: &Path, config: &GestureConfig) -> Result<(), ConfigError> {
    config.validate()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
