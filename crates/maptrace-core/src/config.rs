use crate::error::{MaptraceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Where a configuration value came from. Declaration order is precedence
/// order: a later source overrides an earlier one, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigSource {
    Default,
    File,
    Environment,
    Cli,
}

/// A configuration value paired with the source that set it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Take the new value only when `source` outranks the current one
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source > self.source {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for maptrace calibration tunables
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Local-search iteration count
    pub iterations: ConfigValue<u32>,
    /// Initial neighborhood step in degrees
    pub initial_step_deg: ConfigValue<f64>,
    /// Per-iteration step shrink factor
    pub step_decay: ConfigValue<f64>,
    /// Smallest fitted scale accepted before the fit is considered degenerate
    pub scale_floor: ConfigValue<f64>,
    /// Renderer zoom level assumed when none is given
    pub zoom: ConfigValue<u8>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            iterations: ConfigValue::new(50, ConfigSource::Default),
            initial_step_deg: ConfigValue::new(1e-4, ConfigSource::Default),
            step_decay: ConfigValue::new(0.9, ConfigSource::Default),
            scale_floor: ConfigValue::new(1e-3, ConfigSource::Default),
            zoom: ConfigValue::new(15, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| MaptraceError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| MaptraceError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        // Update values from file
        if let Some(iterations) = file_config.iterations {
            self.iterations.update(iterations, ConfigSource::File);
        }

        if let Some(step) = file_config.initial_step_deg {
            self.initial_step_deg.update(step, ConfigSource::File);
        }

        if let Some(decay) = file_config.step_decay {
            self.step_decay.update(decay, ConfigSource::File);
        }

        if let Some(floor) = file_config.scale_floor {
            self.scale_floor.update(floor, ConfigSource::File);
        }

        if let Some(zoom) = file_config.zoom {
            self.zoom.update(zoom, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // MAPTRACE_ITERATIONS
        if let Ok(raw) = env::var("MAPTRACE_ITERATIONS") {
            match raw.parse::<u32>() {
                Ok(v) => self.iterations.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid MAPTRACE_ITERATIONS value '{}': expected positive integer",
                    raw
                ),
            }
        }

        // MAPTRACE_STEP
        if let Ok(raw) = env::var("MAPTRACE_STEP") {
            match raw.parse::<f64>() {
                Ok(v) if v > 0.0 => self.initial_step_deg.update(v, ConfigSource::Environment),
                _ => tracing::warn!(
                    "Invalid MAPTRACE_STEP value '{}': expected positive degrees",
                    raw
                ),
            }
        }

        // MAPTRACE_STEP_DECAY
        if let Ok(raw) = env::var("MAPTRACE_STEP_DECAY") {
            match raw.parse::<f64>() {
                Ok(v) if v > 0.0 && v < 1.0 => self.step_decay.update(v, ConfigSource::Environment),
                _ => tracing::warn!(
                    "Invalid MAPTRACE_STEP_DECAY value '{}': expected factor in (0, 1)",
                    raw
                ),
            }
        }

        // MAPTRACE_SCALE_FLOOR
        if let Ok(raw) = env::var("MAPTRACE_SCALE_FLOOR") {
            match raw.parse::<f64>() {
                Ok(v) if v > 0.0 => self.scale_floor.update(v, ConfigSource::Environment),
                _ => tracing::warn!(
                    "Invalid MAPTRACE_SCALE_FLOOR value '{}': expected positive number",
                    raw
                ),
            }
        }

        // MAPTRACE_ZOOM
        if let Ok(raw) = env::var("MAPTRACE_ZOOM") {
            match raw.parse::<u8>() {
                Ok(v) => self.zoom.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid MAPTRACE_ZOOM value '{}': expected integer zoom level",
                    raw
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(iterations) = overrides.iterations {
            self.iterations.update(iterations, ConfigSource::Cli);
        }

        if let Some(step) = overrides.initial_step_deg {
            self.initial_step_deg.update(step, ConfigSource::Cli);
        }

        if let Some(decay) = overrides.step_decay {
            self.step_decay.update(decay, ConfigSource::Cli);
        }

        if let Some(floor) = overrides.scale_floor {
            self.scale_floor.update(floor, ConfigSource::Cli);
        }

        if let Some(zoom) = overrides.zoom {
            self.zoom.update(zoom, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "iterations".to_string(),
            (self.iterations.value.to_string(), self.iterations.source),
        );

        map.insert(
            "initial_step_deg".to_string(),
            (self.initial_step_deg.value.to_string(), self.initial_step_deg.source),
        );

        map.insert(
            "step_decay".to_string(),
            (self.step_decay.value.to_string(), self.step_decay.source),
        );

        map.insert(
            "scale_floor".to_string(),
            (self.scale_floor.value.to_string(), self.scale_floor.source),
        );

        map.insert("zoom".to_string(), (self.zoom.value.to_string(), self.zoom.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    iterations: Option<u32>,
    initial_step_deg: Option<f64>,
    step_decay: Option<f64>,
    scale_floor: Option<f64>,
    zoom: Option<u8>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub iterations: Option<u32>,
    pub initial_step_deg: Option<f64>,
    pub step_decay: Option<f64>,
    pub scale_floor: Option<f64>,
    pub zoom: Option<u8>,
}
