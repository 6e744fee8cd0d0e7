//! Contact results produced by world queries.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::flags::CollisionLayers;

/// Handle to a collider stored in a [`CollisionWorld`](super::CollisionWorld).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// Result of a single world query.
///
/// Produced transiently by ray casts, box sweeps and contact queries. Nothing
/// holds on to these between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactResult {
    /// Collider that was hit, `None` if nothing was hit.
    pub collider: Option<ColliderId>,

    /// Point of impact in world space.
    ///
    /// For a miss this is the end of the query path.
    pub point: Vec2,

    /// Distance travelled along the query direction before the hit.
    ///
    /// For direct contact queries this is the separation between the two
    /// shapes, negative when they overlap.
    pub distance: f32,

    /// Surface normal of the hit collider, pointing away from it.
    pub normal: Vec2,

    /// Layers of the hit collider.
    pub layers: CollisionLayers,
}

impl ContactResult {
    /// A query that found nothing.
    pub fn no_hit(end_point: Vec2, distance: f32) -> Self {
        Self {
            collider: None,
            point: end_point,
            distance,
            normal: Vec2::ZERO,
            layers: CollisionLayers::NONE,
        }
    }

    /// A query that hit `collider`.
    pub fn hit(
        collider: ColliderId,
        point: Vec2,
        distance: f32,
        normal: Vec2,
        layers: CollisionLayers,
    ) -> Self {
        Self {
            collider: Some(collider),
            point,
            distance,
            normal,
            layers,
        }
    }

    /// Check if this query hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.collider.is_some()
    }

    /// Check if the hit surface faces up, i.e. was approached from above.
    #[inline]
    pub fn faces_up(&self, min_normal_y: f32) -> bool {
        self.hit_something() && self.normal.y >= min_normal_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_hit() {
        let result = ContactResult::no_hit(Vec2::new(3.0, 0.0), 3.0);
        assert!(!result.hit_something());
        assert!(!result.faces_up(0.0));
        assert_eq!(result.layers, CollisionLayers::NONE);
    }

    #[test]
    fn test_hit_faces_up() {
        let result = ContactResult::hit(
            ColliderId(4),
            Vec2::ZERO,
            0.5,
            Vec2::Y,
            CollisionLayers::SOLID,
        );
        assert!(result.hit_something());
        assert!(result.faces_up(0.7));

        let wall = ContactResult { normal: Vec2::X, ..result };
        assert!(!wall.faces_up(0.7));
    }
}
