//! Configuration system

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::raycast::executor::DEFAULT_BATCH_SIZE;

/// Configuration trait with file load/save support
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// How often the host loop triggers steps
///
/// The original benchmark disabled the fixed-rate scheduler as a side
/// effect; here cadence is an explicit option instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepRate {
    /// Step as fast as the previous step completes (benchmark mode)
    Unbounded,
    /// Step at a fixed interval
    Fixed {
        /// Interval between step starts, in milliseconds
        interval_ms: u64,
    },
}

impl StepRate {
    /// The fixed interval, or `None` when unbounded
    pub fn interval(&self) -> Option<Duration> {
        match self {
            Self::Unbounded => None,
            Self::Fixed { interval_ms } => Some(Duration::from_millis(*interval_ms)),
        }
    }
}

/// Startup configuration for the raycast system
///
/// `entity_count` is fixed for the lifetime of a run; buffers are sized from
/// it exactly once and never resized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycastConfig {
    /// Number of pooled entities (N); the system casts N×(N-1) rays per step
    pub entity_count: usize,

    /// Queries handed to a worker at a time
    pub batch_size: usize,

    /// Entities scatter within `[-spawn_half_extent, spawn_half_extent]`
    /// per axis
    pub spawn_half_extent: f32,

    /// Base seed for the per-worker random streams
    pub rng_seed: u64,

    /// Step cadence for the host loop
    pub step_rate: StepRate,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            entity_count: 145,
            batch_size: DEFAULT_BATCH_SIZE,
            spawn_half_extent: 1000.0,
            rng_seed: 0x5EED_0CA5_7E11_F00D,
            step_rate: StepRate::Unbounded,
        }
    }
}

impl Config for RaycastConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = RaycastConfig::default();
        assert_eq!(config.entity_count, 145);
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.spawn_half_extent, 1000.0);
        assert_eq!(config.step_rate, StepRate::Unbounded);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: RaycastConfig = toml::from_str("entity_count = 8").expect("parse");
        assert_eq!(config.entity_count, 8);
        assert_eq!(config.batch_size, 4);
    }

    #[test]
    fn toml_round_trip() {
        let mut config = RaycastConfig::default();
        config.step_rate = StepRate::Fixed { interval_ms: 16 };

        let text = toml::to_string_pretty(&config).expect("serialize");
        let parsed: RaycastConfig = toml::from_str(&text).expect("parse");
        assert_eq!(parsed.step_rate.interval(), Some(Duration::from_millis(16)));
        assert_eq!(parsed.entity_count, config.entity_count);
    }

    #[test]
    fn unbounded_rate_has_no_interval() {
        assert_eq!(StepRate::Unbounded.interval(), None);
    }
}
