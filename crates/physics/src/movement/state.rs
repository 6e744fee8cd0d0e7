//! Actor state and motion intents.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Airborne sub-mode, selecting the gravity regime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirborneMode {
    #[default]
    Normal,
    Hovering,
    Dropping,
}

/// Motion mode of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionMode {
    Grounded,
    Airborne(AirborneMode),
}

impl Default for MotionMode {
    fn default() -> Self {
        Self::Airborne(AirborneMode::Normal)
    }
}

impl MotionMode {
    #[inline]
    pub fn is_grounded(self) -> bool {
        matches!(self, Self::Grounded)
    }

    #[inline]
    pub fn is_airborne(self) -> bool {
        !self.is_grounded()
    }

    #[inline]
    pub fn is_dropping(self) -> bool {
        matches!(self, Self::Airborne(AirborneMode::Dropping))
    }

    #[inline]
    pub fn is_hovering(self) -> bool {
        matches!(self, Self::Airborne(AirborneMode::Hovering))
    }
}

/// Complete motion state of one actor.
///
/// Position is only ever written from a probe-resolved displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    /// Actor origin in world space.
    pub position: Vec2,

    /// Velocity (units/second).
    pub velocity: Vec2,

    pub mode: MotionMode,

    /// Set when a jump is honoured, cleared on landing.
    pub jump_consumed: bool,

    /// Sign of the last non-zero horizontal velocity.
    pub facing: f32,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            mode: MotionMode::default(),
            jump_consumed: false,
            facing: 1.0,
        }
    }
}

impl ActorState {
    /// Create a state at rest at the given position.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.mode.is_grounded()
    }

    /// Update facing from the horizontal velocity.
    pub fn update_facing(&mut self) {
        if self.velocity.x > 0.0 {
            self.facing = 1.0;
        } else if self.velocity.x < 0.0 {
            self.facing = -1.0;
        }
    }
}

/// What the actor wants to do this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionIntent {
    /// Horizontal direction. Only the sign is used.
    pub horizontal: f32,

    /// Jump latch: a jump was requested and not yet honoured.
    pub jump: bool,

    /// Hover button held.
    pub hover: bool,

    /// Drop button held. Wins over hover.
    pub drop: bool,
}

impl MotionIntent {
    /// Intent that only walks.
    pub fn walk(horizontal: f32) -> Self {
        Self {
            horizontal,
            ..Default::default()
        }
    }

    /// Horizontal direction as -1, 0 or +1.
    #[inline]
    pub fn direction(&self) -> f32 {
        if self.horizontal > 0.0 {
            1.0
        } else if self.horizontal < 0.0 {
            -1.0
        } else {
            0.0
        }
    }

    /// Airborne sub-mode requested by the held buttons.
    ///
    /// Hover only applies while falling.
    pub fn airborne_mode(&self, vertical_velocity: f32) -> AirborneMode {
        if self.drop {
            AirborneMode::Dropping
        } else if self.hover && vertical_velocity < 0.0 {
            AirborneMode::Hovering
        } else {
            AirborneMode::Normal
        }
    }
}
