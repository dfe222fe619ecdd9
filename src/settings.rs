//! Engine settings
//!
//! Persisted as JSON next to the host's own config. Missing fields take
//! their defaults so older files keep loading.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_ENTITIES, REFERENCE_HZ};
use crate::reference_ticks;

/// How per-tick rates react to the tick's elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DecayMode {
    /// Rates apply once per tick regardless of dt (the shipped balance)
    #[default]
    PerTick,
    /// Rates are scaled by dt relative to the 60 Hz reference tick
    Scaled,
}

impl DecayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecayMode::PerTick => "per-tick",
            DecayMode::Scaled => "scaled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "per-tick" | "per_tick" | "tick" => Some(DecayMode::PerTick),
            "scaled" | "time" => Some(DecayMode::Scaled),
            _ => None,
        }
    }

    /// Multiplier applied to continuous per-tick rates
    pub fn step_scale(&self, dt: Duration) -> f64 {
        match self {
            DecayMode::PerTick => 1.0,
            DecayMode::Scaled => reference_ticks(dt),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine-wide settings shared by every session a host starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Tick coupling of continuous rates
    pub decay_mode: DecayMode,
    /// Base seed for per-session random sources (None = time-derived)
    pub seed: Option<u64>,
    /// Tick rate the demo runner drives sessions at
    pub tick_rate_hz: f64,
    /// Cap on live diving entities
    pub max_entities: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            decay_mode: DecayMode::PerTick,
            seed: None,
            tick_rate_hz: REFERENCE_HZ,
            max_entities: MAX_ENTITIES,
        }
    }
}

impl EngineSettings {
    /// Tick duration for the configured rate (falls back to 60 Hz)
    pub fn tick_duration(&self) -> Duration {
        let hz = if self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0 {
            self.tick_rate_hz
        } else {
            REFERENCE_HZ
        };
        Duration::from_secs_f64(1.0 / hz)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded engine settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default engine settings ({})", e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Engine settings saved to {}", path.display());
        Ok(())
    }
}
