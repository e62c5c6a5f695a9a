//! Engine configuration
//!
//! Loaded from RON or JSON; missing fields fall back to the defaults.

use std::fmt;
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Game title, used in logs
    pub title: String,
    /// Target update rate
    pub ticks_per_second: u32,
    /// Target render rate (0 renders after every tick)
    pub frames_per_second: u32,
    /// Viewport size in world units
    pub viewport: Vec2,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
    /// Start with the debug overlay enabled
    pub debug_overlay: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Engine"),
            ticks_per_second: 100,
            frames_per_second: 60,
            viewport: Vec2::new(800.0, 600.0),
            max_ticks: None,
            debug_overlay: false,
        }
    }
}

impl EngineConfig {
    /// Create a new config with a title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the target tick rate
    #[must_use]
    pub fn with_ticks_per_second(mut self, tps: u32) -> Self {
        self.ticks_per_second = tps;
        self
    }

    /// Set the target render rate
    #[must_use]
    pub fn with_frames_per_second(mut self, fps: u32) -> Self {
        self.frames_per_second = fps;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Vec2::new(width, height);
        self
    }

    /// Stop the loop after a fixed number of ticks
    #[must_use]
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    #[must_use]
    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay = enabled;
        self
    }

    /// Parse a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Load the config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, text).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Load the config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Save the config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, text).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Load by file extension: `.json` as JSON, anything else as RON
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::load_json(path)?,
            _ => Self::load_ron(path)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that rates and viewport are usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::InvalidValue("ticks_per_second"));
        }
        if self.max_ticks == Some(0) {
            return Err(ConfigError::InvalidValue("max_ticks"));
        }
        if !(self.viewport.is_finite() && self.viewport.x > 0.0 && self.viewport.y > 0.0) {
            return Err(ConfigError::InvalidValue("viewport"));
        }
        Ok(())
    }
}

/// Errors that can occur while loading or saving configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// A field holds an unusable value
    InvalidValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::InvalidValue(field) => write!(f, "Invalid config value: {field}"),
        }
    }
}

impl std::error::Error for ConfigError {}
