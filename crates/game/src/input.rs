//! Player input handling.
//!
//! This module converts raw per-frame input into motion intents for the
//! physics system. Input is sampled at the frame rate; the motion controller
//! runs at the fixed rate, so the jump request is held in a latch between
//! the two.

use plunge_physics::{ActorState, MotionIntent};
use serde::{Deserialize, Serialize};

/// Raw player input for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    /// Horizontal axis, negative for left.
    pub move_axis: f32,

    /// Jump was pressed during this frame.
    pub jump_triggered: bool,

    pub hover_held: bool,

    pub drop_held: bool,
}

impl RawInput {
    /// Build from digital left/right keys.
    pub fn from_keys(left: bool, right: bool) -> Self {
        let mut move_axis = 0.0;
        if right {
            move_axis += 1.0;
        }
        if left {
            move_axis -= 1.0;
        }
        Self {
            move_axis,
            ..Default::default()
        }
    }
}

/// Turns raw frames into fixed-step intents.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    held: MotionIntent,
    jump_latch: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame of input.
    ///
    /// The jump latch only arms while the actor is grounded and its jump is
    /// not consumed; a press at any other time is dropped.
    pub fn sample(&mut self, raw: &RawInput, actor: &ActorState) {
        self.held = MotionIntent {
            horizontal: raw.move_axis,
            jump: false,
            hover: raw.hover_held,
            drop: raw.drop_held,
        };

        if raw.jump_triggered && actor.is_grounded() && !actor.jump_consumed {
            self.jump_latch = true;
        }
    }

    /// Intent for the next fixed step.
    pub fn intent(&self) -> MotionIntent {
        MotionIntent {
            jump: self.jump_latch,
            ..self.held
        }
    }

    /// Update the latch after a fixed step.
    ///
    /// The latch is released once the jump was consumed or the actor left
    /// the ground.
    pub fn settle(&mut self, actor: &ActorState) {
        if actor.jump_consumed || !actor.is_grounded() {
            self.jump_latch = false;
        }
    }

    #[inline]
    pub fn jump_armed(&self) -> bool {
        self.jump_latch
    }

    /// Forget all held input.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
