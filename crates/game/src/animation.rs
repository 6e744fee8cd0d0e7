//! Presentation mirror of an actor's motion state.

use plunge_physics::ActorState;
use serde::{Deserialize, Serialize};

/// Flags an animator needs, derived from the actor state each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub grounded: bool,
    pub running: bool,
    pub dropping: bool,
    pub hovering: bool,
    /// -1 for left, +1 for right.
    pub facing: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            grounded: false,
            running: false,
            dropping: false,
            hovering: false,
            facing: 1.0,
        }
    }
}

impl AnimationState {
    pub fn from_actor(state: &ActorState) -> Self {
        Self {
            grounded: state.mode.is_grounded(),
            running: state.mode.is_grounded() && state.velocity.x != 0.0,
            dropping: state.mode.is_dropping(),
            hovering: state.mode.is_hovering(),
            facing: state.facing,
        }
    }
}
