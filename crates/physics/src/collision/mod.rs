//! Collision detection for kinematic actors.
//!
//! This module provides the collision world and the query interface the
//! probes are written against.
//!
//! # Key Types
//!
//! - [`SpatialQuery`]: Overlap, ray, box-sweep and contact queries
//! - [`CollisionWorld`]: parry2d-backed world implementing [`SpatialQuery`]
//! - [`ContactResult`]: Output from a single query
//! - [`CollisionLayers`]: Category bits used for layers and masks

mod contact;
mod flags;
mod query;
mod world;

pub use contact::{ColliderId, ContactResult};
pub use flags::CollisionLayers;
pub use query::SpatialQuery;
pub use world::{Collider, CollisionWorld};
