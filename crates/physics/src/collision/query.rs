//! The query interface the probes need from a collision world.

use glam::Vec2;

use super::contact::{ColliderId, ContactResult};
use super::flags::CollisionLayers;

/// Shape queries against a world owned by someone else.
///
/// All queries are synchronous and side-effect free. Boxes are axis-aligned
/// and given by their center and half extents.
pub trait SpatialQuery {
    /// First enabled collider on `mask` overlapping the box, if any.
    fn overlap_box(&self, center: Vec2, half_extents: Vec2, mask: CollisionLayers)
        -> Option<ColliderId>;

    /// Closest hit of a ray from `origin` along `direction` within
    /// `max_distance`. A ray starting inside a collider hits at distance 0.
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> ContactResult;

    /// Sweep a box along `direction` (unit length) for `max_distance` and
    /// report the first obstruction.
    fn cast_box(
        &self,
        center: Vec2,
        half_extents: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> ContactResult;

    /// Every collider on `mask` within `margin` of the box, ordered by
    /// collider id.
    fn contacts(
        &self,
        center: Vec2,
        half_extents: Vec2,
        margin: f32,
        mask: CollisionLayers,
    ) -> Vec<ContactResult>;
}
