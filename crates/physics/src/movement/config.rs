//! Movement tuning.
//!
//! Vertical values are signed with y up: gravity and terminal fall speeds
//! are negative.

use serde::{Deserialize, Serialize};

use super::state::AirborneMode;
use crate::error::{require_negative, require_non_negative, require_positive, TuningError};

/// Gravity and fall-speed clamp for one airborne sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityRegime {
    /// Vertical acceleration (units/second², negative).
    pub gravity: f32,

    /// Lowest allowed vertical velocity (units/second, negative).
    pub terminal_fall_speed: f32,
}

impl GravityRegime {
    pub const fn new(gravity: f32, terminal_fall_speed: f32) -> Self {
        Self {
            gravity,
            terminal_fall_speed,
        }
    }

    /// Integrate one step of gravity and apply the terminal clamp.
    #[inline]
    pub fn integrate(&self, vertical_velocity: f32, delta_time: f32) -> f32 {
        (vertical_velocity + self.gravity * delta_time).max(self.terminal_fall_speed)
    }

    fn validate(
        &self,
        gravity_field: &'static str,
        terminal_field: &'static str,
    ) -> Result<(), TuningError> {
        require_negative(gravity_field, self.gravity)?;
        require_negative(terminal_field, self.terminal_fall_speed)
    }
}

/// Configuration for actor motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Speeds
    // ========================================================================
    /// Horizontal speed while a direction is held (units/second).
    pub move_speed: f32,

    /// Upward velocity applied on a jump (units/second).
    pub jump_force: f32,

    // ========================================================================
    // Gravity regimes
    // ========================================================================
    /// Plain falling or rising.
    pub normal: GravityRegime,

    /// Hover held while falling.
    pub hover: GravityRegime,

    /// Drop held.
    pub drop: GravityRegime,

    // ========================================================================
    // Time
    // ========================================================================
    /// Upper bound for a single tick's delta time (seconds).
    pub max_delta_time: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_force: 10.0,

            normal: GravityRegime::new(-20.0, -20.0),
            hover: GravityRegime::new(-8.0, -5.0),
            drop: GravityRegime::new(-80.0, -60.0),

            max_delta_time: 0.1,
        }
    }
}

impl MovementConfig {
    /// Low gravity and a long hover glide.
    pub fn floaty() -> Self {
        Self {
            jump_force: 8.0,
            normal: GravityRegime::new(-12.0, -12.0),
            hover: GravityRegime::new(-4.0, -2.5),
            drop: GravityRegime::new(-60.0, -40.0),
            ..Default::default()
        }
    }

    /// Snappy jumps and a fast drop.
    pub fn heavy() -> Self {
        Self {
            move_speed: 6.0,
            jump_force: 14.0,
            normal: GravityRegime::new(-35.0, -30.0),
            hover: GravityRegime::new(-15.0, -8.0),
            drop: GravityRegime::new(-120.0, -80.0),
            ..Default::default()
        }
    }

    /// Gravity regime for an airborne sub-mode.
    pub fn regime(&self, mode: AirborneMode) -> &GravityRegime {
        match mode {
            AirborneMode::Normal => &self.normal,
            AirborneMode::Hovering => &self.hover,
            AirborneMode::Dropping => &self.drop,
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        require_non_negative("movement.move_speed", self.move_speed)?;
        require_non_negative("movement.jump_force", self.jump_force)?;
        self.normal
            .validate("movement.normal.gravity", "movement.normal.terminal_fall_speed")?;
        self.hover
            .validate("movement.hover.gravity", "movement.hover.terminal_fall_speed")?;
        self.drop
            .validate("movement.drop.gravity", "movement.drop.terminal_fall_speed")?;
        require_positive("movement.max_delta_time", self.max_delta_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MovementConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.move_speed > 0.0);
        // Hover falls slower than normal, drop faster.
        assert!(config.hover.terminal_fall_speed > config.normal.terminal_fall_speed);
        assert!(config.drop.terminal_fall_speed < config.normal.terminal_fall_speed);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(MovementConfig::floaty().validate().is_ok());
        assert!(MovementConfig::heavy().validate().is_ok());
    }

    #[test]
    fn test_integrate_clamps_to_terminal() {
        let regime = GravityRegime::new(-20.0, -20.0);

        assert!((regime.integrate(0.0, 0.5) + 10.0).abs() < 1e-6);
        // A whole second of gravity from -15 would reach -35.
        assert_eq!(regime.integrate(-15.0, 1.0), -20.0);
    }

    #[test]
    fn test_validate_rejects_upward_gravity() {
        let config = MovementConfig {
            hover: GravityRegime::new(5.0, -5.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TuningError::NotNegative { field: "movement.hover.gravity", .. })
        ));
    }
}
