//! Simulation configuration.
//!
//! Everything tunable lives in [`SimulationConfig`], which can be loaded
//! from a TOML file. Missing keys fall back to their defaults, so a config
//! file only needs the values it changes:
//!
//! ```toml
//! difficulty = "hard"
//!
//! [movement]
//! move_speed = 6.0
//!
//! [movement.drop]
//! gravity = -100.0
//! terminal_fall_speed = -70.0
//! ```

use std::path::{Path, PathBuf};

use plunge_physics::{BodyShape, MovementConfig, ProbeConfig, ShapeError, TuningError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contact::StompConfig;
use crate::difficulty::Difficulty;
use crate::npc::{DaggerConfig, PatrolConfig, SpawnerConfig};
use crate::props::{BouncerConfig, PropConfig};

/// Configuration that could not be loaded or does not make sense.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Tuning(#[from] TuningError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Complete simulation tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed physics steps per second.
    pub tick_rate: f32,

    /// Cap on fixed steps run for one rendered frame.
    pub max_steps_per_frame: u32,

    pub difficulty: Difficulty,

    /// Player body.
    pub body: BodyShape,

    pub skin_width: f32,

    /// Explicit probe checks. Derived from `body` and `skin_width` when
    /// absent.
    pub probe: Option<ProbeConfig>,

    pub movement: MovementConfig,
    pub stomp: StompConfig,
    pub patrol: PatrolConfig,
    pub dagger: DaggerConfig,
    pub spawner: SpawnerConfig,
    pub bouncer: BouncerConfig,
    pub props: PropConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_steps_per_frame: 5,
            difficulty: Difficulty::default(),
            body: BodyShape::UNIT,
            skin_width: 0.05,
            probe: None,
            movement: MovementConfig::default(),
            stomp: StompConfig::default(),
            patrol: PatrolConfig::default(),
            dagger: DaggerConfig::default(),
            spawner: SpawnerConfig::default(),
            bouncer: BouncerConfig::default(),
            props: PropConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Probe configuration for the player.
    pub fn probe_config(&self) -> ProbeConfig {
        self.probe
            .unwrap_or_else(|| ProbeConfig::for_body(&self.body, self.skin_width))
    }

    /// Length of one fixed step (seconds).
    #[inline]
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 {
            return Err(ConfigError::invalid(
                "tick_rate",
                format!("must be positive, got {}", self.tick_rate),
            ));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::invalid("max_steps_per_frame", "must be at least 1"));
        }

        let probe = self.probe_config();
        probe.validate()?;
        self.movement.validate()?;
        self.stomp.validate(probe.skin_width)?;
        self.patrol.validate()?;
        self.dagger.validate()?;
        self.spawner.validate()?;
        self.bouncer.validate()?;
        self.props.validate()?;

        if self.delta_time() > self.movement.max_delta_time {
            log::warn!(
                "fixed step {:.4}s exceeds max_delta_time {:.4}s and will be clamped",
                self.delta_time(),
                self.movement.max_delta_time
            );
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.delta_time() - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(config.probe_config(), ProbeConfig::default());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let text = r#"
            difficulty = "hard"
            skin_width = 0.02

            [movement]
            move_speed = 7.5

            [movement.drop]
            gravity = -100.0
            terminal_fall_speed = -70.0

            [body]
            half_extents = [0.4, 0.9]
            offset = [0.0, 0.9]

            [patrol.speed]
            easy = 1.0
            medium = 2.0
            hard = 4.0
        "#;
        let config = SimulationConfig::from_toml_str(text).unwrap();

        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.movement.move_speed, 7.5);
        assert_eq!(config.movement.jump_force, 10.0);
        assert_eq!(config.movement.drop.terminal_fall_speed, -70.0);
        assert_eq!(config.body.half_extents(), glam::Vec2::new(0.4, 0.9));
        assert_eq!(config.patrol.speed.hard, 4.0);
        assert_eq!(config.probe_config().skin_width, 0.02);
    }

    #[test]
    fn test_rejects_positive_terminal_speed() {
        let text = r#"
            [movement.normal]
            gravity = -20.0
            terminal_fall_speed = 5.0
        "#;
        assert!(matches!(
            SimulationConfig::from_toml_str(text),
            Err(ConfigError::Tuning(TuningError::NotNegative { .. }))
        ));
    }

    #[test]
    fn test_rejects_zero_size_body() {
        let text = r#"
            [body]
            half_extents = [0.0, 0.5]
        "#;
        assert!(matches!(
            SimulationConfig::from_toml_str(text),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_margin_inside_skin() {
        let config = SimulationConfig {
            skin_width: 0.2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "stomp.contact_margin", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let config = SimulationConfig {
            tick_rate: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_file_matches_defaults() {
        let text = include_str!("../../../config/plunge.toml");
        let config = SimulationConfig::from_toml_str(text).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let result = SimulationConfig::load("/nonexistent/plunge.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
