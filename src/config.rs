//! Startup configuration.
//!
//! Read once at launch from the JSON file named by `ELECTRO_BENCH_CONFIG`.
//! Any field may be omitted; missing fields take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dsp::preview::DEFAULT_PHASE_STEP;
use crate::dsp::SignalParams;

/// Environment variable holding the config file path.
pub const CONFIG_ENV_VAR: &str = "ELECTRO_BENCH_CONFIG";

/// Errors reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value outside its allowed range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Milliseconds between preview redraw ticks.
    pub redraw_interval_ms: u64,
    /// Preview phase advance per redraw tick.
    pub phase_step: f64,
    /// Initial window size in logical pixels.
    pub window_size: [f32; 2],
    /// Case-insensitive substring of the output device to prefer.
    pub output_device: Option<String>,
    /// Generator settings at launch.
    pub initial_params: SignalParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            redraw_interval_ms: 33,
            phase_step: DEFAULT_PHASE_STEP,
            window_size: [1100.0, 720.0],
            output_device: None,
            initial_params: SignalParams::default(),
        }
    }
}

impl AppConfig {
    /// Load from `ELECTRO_BENCH_CONFIG`, falling back to defaults.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::load_or_default(path.as_deref())
    }

    /// Load from `path` if given. Errors are logged and replaced by defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.redraw_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "redraw_interval_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.phase_step.is_finite() || self.phase_step < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "phase_step",
                reason: format!("{} is not a non-negative number", self.phase_step),
            });
        }
        if self.window_size.iter().any(|v| !v.is_finite() || *v < 100.0) {
            return Err(ConfigError::InvalidValue {
                field: "window_size",
                reason: "each side must be at least 100".to_string(),
            });
        }
        validate_params(&self.initial_params)
    }
}

/// Generator settings must stay within what the controls can set.
fn validate_params(params: &SignalParams) -> Result<(), ConfigError> {
    if !params.frequency.is_finite() {
        return Err(ConfigError::InvalidValue {
            field: "initial_params.frequency",
            reason: format!("{} is not a finite number", params.frequency),
        });
    }
    if !(0.0..=1.0).contains(&params.duty_cycle) {
        return Err(ConfigError::InvalidValue {
            field: "initial_params.duty_cycle",
            reason: format!("{} is outside 0..=1", params.duty_cycle),
        });
    }
    let amplitudes = [
        ("initial_params.amplitude_positive", params.amplitude_positive),
        ("initial_params.amplitude_negative", params.amplitude_negative),
    ];
    for (field, amplitude) in amplitudes {
        if !(0.0..=1.0).contains(&amplitude) {
            return Err(ConfigError::InvalidValue {
                field,
                reason: format!("{} is outside 0..=1", amplitude),
            });
        }
    }
    if params.timebase == 0 {
        return Err(ConfigError::InvalidValue {
            field: "initial_params.timebase",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Save a config to a JSON file.
pub fn save_to_file(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load and validate a config from a JSON file.
pub fn load_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&json)?;
    config.validate()?;
    Ok(config)
}
