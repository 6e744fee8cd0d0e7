//! Collision layers for query filtering.
//!
//! Every collider in the world carries a set of layers, and every query
//! carries a mask. A collider is considered by a query when the two share at
//! least one layer.

use serde::{Deserialize, Serialize};

/// Category bits describing what a collider is.
///
/// Used both as the layer set of a collider and as the mask of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionLayers(pub u32);

impl CollisionLayers {
    /// No layers.
    pub const NONE: Self = Self(0);

    /// Level geometry that blocks movement: floors, walls, ceilings.
    pub const SOLID: Self = Self(1 << 0);

    /// Lethal on contact.
    pub const HAZARD: Self = Self(1 << 1);

    /// Can be stomped by an actor dropping onto it.
    pub const STOMPABLE: Self = Self(1 << 2);

    /// Collectable on contact.
    pub const PICKUP: Self = Self(1 << 3);

    /// Body of an NPC.
    pub const ENEMY: Self = Self(1 << 4);

    /// Body of the player.
    pub const PLAYER: Self = Self(1 << 5);

    /// Non-blocking volume that only reports overlaps.
    pub const TRIGGER: Self = Self(1 << 6);

    /// Mask for actor movement sweeps.
    pub const MASK_MOVEMENT: Self = Self::SOLID;

    /// Mask for the ground, wall and ceiling checks.
    pub const MASK_TERRAIN: Self = Self::SOLID;

    /// Mask for the downward stomp rays cast while dropping.
    pub const MASK_STOMP: Self = Self::STOMPABLE;

    /// Mask for direct contacts the player reacts to.
    pub const MASK_INTERACT: Self =
        Self(Self::HAZARD.0 | Self::STOMPABLE.0 | Self::PICKUP.0 | Self::TRIGGER.0);

    /// Check if these layers contain every bit of `other`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given layers are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for CollisionLayers {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for CollisionLayers {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::ops::BitOrAssign for CollisionLayers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
