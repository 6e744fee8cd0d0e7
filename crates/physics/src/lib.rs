//! Plunge Physics Engine
//!
//! Kinematic movement and collision resolution for axis-aligned 2D actors.
//! Actors are never simulated as rigid bodies: each tick a desired
//! displacement is swept through a collision world the actor does not own,
//! and the actor stops a skin width short of whatever it hits.
//!
//! # Architecture
//!
//! The physics engine is split into three systems:
//!
//! - **Collision**: Stores level geometry and answers overlap, ray, box-sweep
//!   and contact queries
//! - **Probe**: Ground, wall and ceiling checks plus movement resolution for
//!   one actor body
//! - **Movement**: Uses the probe to implement platformer motion modes
//!
//! # Design Principles
//!
//! 1. **Determinism**: Same inputs always produce same outputs
//! 2. **No penetration**: Resolved positions keep the skin width clearance
//! 3. **Validation up front**: Shapes and tuning are checked once, at assembly

pub mod collision;
pub mod error;
pub mod movement;
pub mod probe;

// Re-export commonly used types
pub use collision::{
    ColliderId, CollisionLayers, CollisionWorld, ContactResult, SpatialQuery,
};
pub use error::{ShapeError, TuningError};
pub use movement::{
    ActorState, AirborneMode, GravityRegime, MotionController, MotionIntent, MotionMode,
    MovementConfig, TickReport,
};
pub use probe::{BodyShape, CollisionCheck, CollisionProbe, ProbeConfig, SweepOutcome, WallSide};
