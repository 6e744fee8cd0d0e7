//! Collision world containing all static and moving level geometry.
//!
//! The world stores colliders and answers [`SpatialQuery`] requests through
//! parry2d. Actors are not colliders here: they only query.

use glam::Vec2;
use parry2d::math::{Isometry, Point, Real, Vector};
use parry2d::query::{self, Ray, RayCast, ShapeCastOptions};
use parry2d::shape::{Cuboid, SharedShape};

use super::contact::{ColliderId, ContactResult};
use super::flags::CollisionLayers;
use super::query::SpatialQuery;

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct Collider {
    /// Unique identifier for this collider.
    pub id: ColliderId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position in world space.
    pub transform: Isometry<Real>,
    /// Layers used for mask filtering.
    pub layers: CollisionLayers,
    /// Disabled colliders are invisible to every query.
    pub enabled: bool,
}

/// The collision world containing all geometry.
///
/// Supports boxes, convex hulls and balls. Colliders can be moved, disabled
/// and removed between ticks; they are never moved in the middle of a query.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            colliders: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the box in world space
    /// * `half_extents` - Half-size along x and y
    /// * `layers` - Layers for query filtering
    pub fn add_box(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        layers: CollisionLayers,
    ) -> ColliderId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y);
        self.push(shape, Isometry::translation(center.x, center.y), layers)
    }

    /// Add a ball to the world.
    pub fn add_ball(&mut self, center: Vec2, radius: f32, layers: CollisionLayers) -> ColliderId {
        let shape = SharedShape::ball(radius);
        self.push(shape, Isometry::translation(center.x, center.y), layers)
    }

    /// Add a convex hull of world-space points.
    ///
    /// Returns `None` if the hull is degenerate.
    pub fn add_convex_hull(
        &mut self,
        points: &[Vec2],
        layers: CollisionLayers,
    ) -> Option<ColliderId> {
        // Needs an area. parry asserts on fewer than two points.
        if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
            return None;
        }
        let parry_points: Vec<Point<Real>> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
        let shape = SharedShape::convex_hull(&parry_points)?;
        Some(self.push(shape, Isometry::identity(), layers))
    }

    fn push(
        &mut self,
        shape: SharedShape,
        transform: Isometry<Real>,
        layers: CollisionLayers,
    ) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;

        self.colliders.push(Collider {
            id,
            shape,
            transform,
            layers,
            enabled: true,
        });

        id
    }

    /// Remove a collider. Returns `false` if it did not exist.
    pub fn remove(&mut self, id: ColliderId) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|c| c.id != id);
        self.colliders.len() != before
    }

    /// Move a collider so that its origin sits at `center`.
    pub fn set_position(&mut self, id: ColliderId, center: Vec2) -> bool {
        match self.get_mut(id) {
            Some(collider) => {
                collider.transform = Isometry::translation(center.x, center.y);
                true
            }
            None => false,
        }
    }

    /// Enable or disable a collider without removing it.
    pub fn set_enabled(&mut self, id: ColliderId, enabled: bool) -> bool {
        match self.get_mut(id) {
            Some(collider) => {
                collider.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.iter_mut().find(|c| c.id == id)
    }

    pub fn is_enabled(&self, id: ColliderId) -> bool {
        self.get(id).is_some_and(|c| c.enabled)
    }

    /// World-space origin of a collider.
    pub fn position(&self, id: ColliderId) -> Option<Vec2> {
        self.get(id).map(|c| {
            let t = c.transform.translation.vector;
            Vec2::new(t.x, t.y)
        })
    }

    /// Get the number of colliders, enabled or not.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    fn candidates(&self, mask: CollisionLayers) -> impl Iterator<Item = &Collider> {
        self.colliders
            .iter()
            .filter(move |c| c.enabled && mask.intersects(c.layers))
    }
}

impl SpatialQuery for CollisionWorld {
    fn overlap_box(
        &self,
        center: Vec2,
        half_extents: Vec2,
        mask: CollisionLayers,
    ) -> Option<ColliderId> {
        let probe = Cuboid::new(Vector::new(half_extents.x, half_extents.y));
        let probe_pos = Isometry::translation(center.x, center.y);

        self.candidates(mask)
            .find(|collider| {
                matches!(
                    query::intersection_test(
                        &probe_pos,
                        &probe,
                        &collider.transform,
                        collider.shape.as_ref(),
                    ),
                    Ok(true)
                )
            })
            .map(|collider| collider.id)
    }

    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> ContactResult {
        let dir = direction.normalize_or_zero();
        if dir == Vec2::ZERO {
            return ContactResult::no_hit(origin, 0.0);
        }

        let ray = Ray::new(Point::new(origin.x, origin.y), Vector::new(dir.x, dir.y));

        let mut closest: Option<ContactResult> = None;

        for collider in self.candidates(mask) {
            let Some(hit) = collider
                .shape
                .cast_ray_and_get_normal(&collider.transform, &ray, max_distance, true)
            else {
                continue;
            };

            let is_closer = closest
                .as_ref()
                .map_or(true, |best| hit.time_of_impact < best.distance);

            if is_closer {
                closest = Some(ContactResult::hit(
                    collider.id,
                    origin + dir * hit.time_of_impact,
                    hit.time_of_impact,
                    Vec2::new(hit.normal.x, hit.normal.y),
                    collider.layers,
                ));
            }
        }

        closest.unwrap_or_else(|| ContactResult::no_hit(origin + dir * max_distance, max_distance))
    }

    fn cast_box(
        &self,
        center: Vec2,
        half_extents: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> ContactResult {
        let dir = direction.normalize_or_zero();
        if dir == Vec2::ZERO {
            return ContactResult::no_hit(center, 0.0);
        }

        let mover = Cuboid::new(Vector::new(half_extents.x, half_extents.y));
        let mover_pos = Isometry::translation(center.x, center.y);
        let mover_vel = Vector::new(dir.x, dir.y);
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            target_distance: 0.0,
            // Let an actor that already touches a surface move away from it.
            stop_at_penetration: false,
            compute_impact_geometry_on_penetration: true,
        };

        let mut closest: Option<ContactResult> = None;

        for collider in self.candidates(mask) {
            let Ok(Some(hit)) = query::cast_shapes(
                &mover_pos,
                &mover_vel,
                &mover,
                &collider.transform,
                &Vector::zeros(),
                collider.shape.as_ref(),
                options,
            ) else {
                continue;
            };

            let is_closer = closest
                .as_ref()
                .map_or(true, |best| hit.time_of_impact < best.distance);

            if is_closer {
                let point = collider.transform * hit.witness2;
                let normal = collider.transform * hit.normal2.into_inner();
                closest = Some(ContactResult::hit(
                    collider.id,
                    Vec2::new(point.x, point.y),
                    hit.time_of_impact,
                    Vec2::new(normal.x, normal.y),
                    collider.layers,
                ));
            }
        }

        closest.unwrap_or_else(|| ContactResult::no_hit(center + dir * max_distance, max_distance))
    }

    fn contacts(
        &self,
        center: Vec2,
        half_extents: Vec2,
        margin: f32,
        mask: CollisionLayers,
    ) -> Vec<ContactResult> {
        let probe = Cuboid::new(Vector::new(half_extents.x, half_extents.y));
        let probe_pos = Isometry::translation(center.x, center.y);

        self.candidates(mask)
            .filter_map(|collider| {
                let contact = query::contact(
                    &probe_pos,
                    &probe,
                    &collider.transform,
                    collider.shape.as_ref(),
                    margin,
                )
                .ok()??;

                Some(ContactResult::hit(
                    collider.id,
                    Vec2::new(contact.point2.x, contact.point2.y),
                    contact.dist,
                    Vec2::new(contact.normal2.x, contact.normal2.y),
                    collider.layers,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor with its top at y=0
        world.add_box(Vec2::new(0.0, -0.5), Vec2::new(50.0, 0.5), CollisionLayers::SOLID);

        // Wall with its left face at x=9.5
        world.add_box(Vec2::new(10.0, 5.0), Vec2::new(0.5, 5.0), CollisionLayers::SOLID);

        world
    }

    #[test]
    fn test_raycast_hit() {
        let world = create_test_world();

        let result = world.raycast(Vec2::new(0.0, 1.0), Vec2::X, 100.0, CollisionLayers::SOLID);

        assert!(result.hit_something());
        assert!((result.distance - 9.5).abs() < 0.01);
        assert!((result.point.x - 9.5).abs() < 0.01);
        assert!((result.normal.x + 1.0).abs() < 0.01);
    }

    #[test]
    fn test_raycast_miss() {
        let world = create_test_world();

        let result = world.raycast(Vec2::new(0.0, 1.0), -Vec2::X, 100.0, CollisionLayers::SOLID);

        assert!(!result.hit_something());
        assert_eq!(result.distance, 100.0);
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let world = create_test_world();

        let result = world.raycast(Vec2::new(0.0, 1.0), Vec2::X, 5.0, CollisionLayers::SOLID);

        assert!(!result.hit_something());
    }

    #[test]
    fn test_cast_box_hits_floor() {
        let world = create_test_world();

        let result = world.cast_box(
            Vec2::new(0.0, 2.0),
            Vec2::splat(0.5),
            -Vec2::Y,
            10.0,
            CollisionLayers::SOLID,
        );

        assert!(result.hit_something());
        // Box bottom starts at 1.5 above the floor
        assert!((result.distance - 1.5).abs() < 0.001, "distance={}", result.distance);
        assert!(result.normal.y > 0.99);
    }

    #[test]
    fn test_overlap_box() {
        let world = create_test_world();

        assert!(world
            .overlap_box(Vec2::new(0.0, -0.05), Vec2::new(0.5, 0.05), CollisionLayers::SOLID)
            .is_some());
        assert!(world
            .overlap_box(Vec2::new(0.0, 1.0), Vec2::new(0.5, 0.05), CollisionLayers::SOLID)
            .is_none());
    }

    #[test]
    fn test_layer_mask_filtering() {
        let mut world = CollisionWorld::new();

        world.add_box(Vec2::new(5.0, 1.0), Vec2::new(0.5, 1.0), CollisionLayers::SOLID);
        world.add_box(Vec2::new(3.0, 1.0), Vec2::new(0.5, 1.0), CollisionLayers::TRIGGER);

        // Ray with the SOLID mask ignores the trigger at x=2.5
        let result = world.raycast(Vec2::new(0.0, 1.0), Vec2::X, 100.0, CollisionLayers::SOLID);

        assert!(result.hit_something());
        assert!((result.point.x - 4.5).abs() < 0.01);
    }

    #[test]
    fn test_disabled_and_removed_colliders_are_ignored() {
        let mut world = CollisionWorld::new();
        let block = world.add_box(Vec2::new(3.0, 0.0), Vec2::splat(0.5), CollisionLayers::SOLID);

        world.set_enabled(block, false);
        assert!(!world.raycast(Vec2::ZERO, Vec2::X, 10.0, CollisionLayers::SOLID).hit_something());

        world.set_enabled(block, true);
        assert!(world.raycast(Vec2::ZERO, Vec2::X, 10.0, CollisionLayers::SOLID).hit_something());

        assert!(world.remove(block));
        assert!(!world.remove(block));
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn test_set_position_moves_collider() {
        let mut world = CollisionWorld::new();
        let block = world.add_box(Vec2::new(3.0, 0.0), Vec2::splat(0.5), CollisionLayers::SOLID);

        world.set_position(block, Vec2::new(6.0, 0.0));

        let result = world.raycast(Vec2::ZERO, Vec2::X, 10.0, CollisionLayers::SOLID);
        assert!((result.distance - 5.5).abs() < 0.01);
        assert_eq!(world.position(block), Some(Vec2::new(6.0, 0.0)));
    }

    #[test]
    fn test_contacts_report_upward_normal_from_above() {
        let mut world = CollisionWorld::new();
        let enemy = world.add_box(
            Vec2::ZERO,
            Vec2::splat(0.5),
            CollisionLayers::HAZARD | CollisionLayers::STOMPABLE,
        );

        // Actor box sitting 0.02 above the enemy's top face.
        let contacts = world.contacts(
            Vec2::new(0.0, 1.02),
            Vec2::splat(0.5),
            0.1,
            CollisionLayers::MASK_INTERACT,
        );

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].collider, Some(enemy));
        assert!(contacts[0].normal.y > 0.9);
        assert!((contacts[0].distance - 0.02).abs() < 0.001);
    }

    #[test]
    fn test_convex_hull() {
        let mut world = CollisionWorld::new();
        let ramp = world.add_convex_hull(
            &[Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(4.0, 2.0)],
            CollisionLayers::SOLID,
        );
        assert!(ramp.is_some());

        let degenerate = world.add_convex_hull(&[Vec2::ZERO], CollisionLayers::SOLID);
        assert!(degenerate.is_none());
        assert!(world.add_convex_hull(&[], CollisionLayers::SOLID).is_none());
        assert!(world
            .add_convex_hull(&[Vec2::ZERO, Vec2::X], CollisionLayers::SOLID)
            .is_none());
        assert_eq!(world.collider_count(), 1);
    }
}
