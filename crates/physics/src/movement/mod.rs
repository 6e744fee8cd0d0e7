//! Actor movement.
//!
//! This module implements kinematic platformer movement with:
//!
//! - Constant-speed horizontal movement stopped by walls
//! - Grounded jumps gated by a consumed flag
//! - Normal, hover and drop gravity regimes with terminal fall speeds
//! - Ceiling stops
//!
//! # Design
//!
//! Movement is controlled by the [`MotionController`] which takes a
//! [`MotionIntent`] and updates the actor's [`ActorState`] through its
//! [`CollisionProbe`](crate::probe::CollisionProbe). Position is never written
//! except from a probe-resolved displacement.

mod config;
mod controller;
mod state;

pub use config::{GravityRegime, MovementConfig};
pub use controller::{MotionController, TickReport};
pub use state::{ActorState, AirborneMode, MotionIntent, MotionMode};
