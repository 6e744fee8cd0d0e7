//! Collision probe: the contact checks and the movement resolver every actor
//! is built on.
//!
//! A [`CollisionProbe`] pairs an actor's [`BodyShape`] with a [`ProbeConfig`]
//! and answers four questions against any [`SpatialQuery`] world:
//!
//! - Is the actor standing on ground?
//! - Is it touching a wall on a given side?
//! - Is it touching a ceiling?
//! - Where does a desired displacement actually take it?
//!
//! The probe keeps no state between calls. The optional [`SweepOutcome`]
//! exposes the details of the last resolution for debug drawing only.

mod body;
mod config;

pub use body::BodyShape;
pub use config::{CollisionCheck, ProbeConfig};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::collision::{ColliderId, ContactResult, SpatialQuery};

/// Side of the actor for horizontal checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    /// Side matching the sign of a horizontal direction, `None` for zero.
    pub fn from_direction(direction: f32) -> Option<Self> {
        if direction > 0.0 {
            Some(Self::Right)
        } else if direction < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    #[inline]
    pub fn vector(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Details of one movement resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepOutcome {
    /// Resolved actor position.
    pub position: Vec2,
    /// Displacement that was asked for.
    pub desired: Vec2,
    /// Displacement that was granted.
    pub adjusted: Vec2,
    /// Obstruction found by the sweep, if any.
    pub hit: Option<ContactResult>,
}

impl SweepOutcome {
    fn stationary(position: Vec2) -> Self {
        Self {
            position,
            desired: Vec2::ZERO,
            adjusted: Vec2::ZERO,
            hit: None,
        }
    }

    /// Check if the sweep was shortened by an obstruction.
    #[inline]
    pub fn was_blocked(&self) -> bool {
        self.hit.is_some()
    }
}

/// Shape queries for one actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionProbe {
    pub config: ProbeConfig,
    pub body: BodyShape,
}

impl CollisionProbe {
    pub fn new(body: BodyShape, config: ProbeConfig) -> Self {
        Self { config, body }
    }

    /// Probe with checks derived from the body via [`ProbeConfig::for_body`].
    pub fn for_body(body: BodyShape, skin_width: f32) -> Self {
        Self::new(body, ProbeConfig::for_body(&body, skin_width))
    }

    // ========================================================================
    // Contact checks
    // ========================================================================

    /// Check for ground directly under the body.
    pub fn is_grounded<W: SpatialQuery + ?Sized>(&self, position: Vec2, world: &W) -> bool {
        self.ground_under(position, world).is_some()
    }

    /// Collider supporting the actor, if any.
    pub fn ground_under<W: SpatialQuery + ?Sized>(
        &self,
        position: Vec2,
        world: &W,
    ) -> Option<ColliderId> {
        let check = &self.config.ground;
        let half = self.body.half_extents();

        let mut center = self.body.center(position) + check.offset;
        center.y -= half.y + check.distance / 2.0;
        let extents = Vec2::new(half.x, check.distance / 2.0);

        let ground = world.overlap_box(center, extents, check.mask);
        log::trace!("ground check at {:?}: {:?}", center, ground);
        ground
    }

    /// Check for a wall on one side.
    pub fn is_touching_wall<W: SpatialQuery + ?Sized>(
        &self,
        position: Vec2,
        side: WallSide,
        world: &W,
    ) -> bool {
        let check = &self.config.wall;
        world
            .raycast(position + check.offset, side.vector(), check.distance, check.mask)
            .hit_something()
    }

    /// Check for a wall on either side.
    pub fn is_touching_any_wall<W: SpatialQuery + ?Sized>(
        &self,
        position: Vec2,
        world: &W,
    ) -> bool {
        self.is_touching_wall(position, WallSide::Left, world)
            || self.is_touching_wall(position, WallSide::Right, world)
    }

    pub fn is_touching_ceiling<W: SpatialQuery + ?Sized>(&self, position: Vec2, world: &W) -> bool {
        let check = &self.config.ceiling;
        world
            .raycast(position + check.offset, Vec2::Y, check.distance, check.mask)
            .hit_something()
    }

    /// Check for ground below the leading bottom corner on `side`, within
    /// `depth` of the body's bottom face.
    pub fn has_ground_ahead<W: SpatialQuery + ?Sized>(
        &self,
        position: Vec2,
        side: WallSide,
        depth: f32,
        world: &W,
    ) -> bool {
        let center = self.body.center(position);
        let corner = Vec2::new(
            center.x + side.sign() * self.body.half_extents().x,
            self.body.bottom(position),
        );
        world
            .raycast(corner, -Vec2::Y, depth, self.config.ground.mask)
            .hit_something()
    }

    // ========================================================================
    // Movement resolution
    // ========================================================================

    /// Resolve a desired displacement into a collision-safe position.
    pub fn new_position<W: SpatialQuery + ?Sized>(
        &self,
        position: Vec2,
        displacement: Vec2,
        world: &W,
    ) -> Vec2 {
        self.sweep(position, displacement, world).position
    }

    /// Resolve a desired displacement and report how it was resolved.
    ///
    /// The body is swept along the displacement direction for its length
    /// plus the skin width. On a hit the body stops `skin_width` short of the
    /// obstruction. Remaining motion is discarded, not slid along the surface.
    pub fn sweep<W: SpatialQuery + ?Sized>(
        &self,
        position: Vec2,
        displacement: Vec2,
        world: &W,
    ) -> SweepOutcome {
        let distance = displacement.length();
        if distance == 0.0 {
            return SweepOutcome::stationary(position);
        }

        let direction = displacement / distance;
        let skin = self.config.skin_width;

        let hit = world.cast_box(
            self.body.center(position),
            self.body.half_extents(),
            direction,
            distance + skin,
            self.config.movement_mask,
        );

        if hit.hit_something() {
            let travel = (hit.distance - skin).max(0.0);
            let adjusted = direction * travel;
            SweepOutcome {
                position: position + adjusted,
                desired: displacement,
                adjusted,
                hit: Some(hit),
            }
        } else {
            SweepOutcome {
                position: position + displacement,
                desired: displacement,
                adjusted: displacement,
                hit: None,
            }
        }
    }
}

impl Default for CollisionProbe {
    fn default() -> Self {
        Self::new(BodyShape::UNIT, ProbeConfig::default())
    }
}
