//! Interactable tags attached to colliders.
//!
//! The collision world only knows layers. The registry maps a collider back
//! to the entity that owns it and to its stomp behaviour.

use std::collections::BTreeMap;

use plunge_physics::{ColliderId, CollisionLayers};
use serde::{Deserialize, Serialize};

use crate::events::EntityId;

/// Entity kinds that own colliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    PatrolEnemy,
    Dagger,
    BreakableBlock,
    Bouncer,
    Pickup,
    Spike,
    Goal,
}

/// How an entity reacts to being stomped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stompable {
    /// Stomping launches the stomper upward.
    pub bouncy: bool,

    /// Vertical velocity given to the stomper when bouncy (units/second).
    pub bounce_force: f32,
}

impl Stompable {
    pub const PLAIN: Self = Self {
        bouncy: false,
        bounce_force: 0.0,
    };

    pub fn bouncy(bounce_force: f32) -> Self {
        Self {
            bouncy: true,
            bounce_force,
        }
    }

    /// Bounce velocity, if any.
    #[inline]
    pub fn bounce(&self) -> Option<f32> {
        self.bouncy.then_some(self.bounce_force)
    }
}

/// Registry entry for one collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    pub entity: EntityId,
    pub kind: EntityKind,
    pub layers: CollisionLayers,
    /// Present only for stompable entities.
    pub stomp: Option<Stompable>,
}

impl Interactable {
    #[inline]
    pub fn is_hazard(&self) -> bool {
        self.layers.contains(CollisionLayers::HAZARD)
    }

    #[inline]
    pub fn is_stompable(&self) -> bool {
        self.stomp.is_some() && self.layers.contains(CollisionLayers::STOMPABLE)
    }

    #[inline]
    pub fn is_pickup(&self) -> bool {
        self.layers.contains(CollisionLayers::PICKUP)
    }

    /// Finish zone.
    #[inline]
    pub fn is_goal(&self) -> bool {
        self.kind == EntityKind::Goal && self.layers.contains(CollisionLayers::TRIGGER)
    }
}

/// Collider to entity lookup.
#[derive(Debug, Default)]
pub struct InteractableRegistry {
    by_collider: BTreeMap<ColliderId, Interactable>,
}

impl InteractableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, collider: ColliderId, interactable: Interactable) {
        self.by_collider.insert(collider, interactable);
    }

    pub fn unregister(&mut self, collider: ColliderId) -> Option<Interactable> {
        self.by_collider.remove(&collider)
    }

    pub fn get(&self, collider: ColliderId) -> Option<&Interactable> {
        self.by_collider.get(&collider)
    }

    /// Collider owned by `entity`, if registered.
    pub fn collider_of(&self, entity: EntityId) -> Option<ColliderId> {
        self.by_collider
            .iter()
            .find(|(_, interactable)| interactable.entity == entity)
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.by_collider.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_collider.is_empty()
    }
}
