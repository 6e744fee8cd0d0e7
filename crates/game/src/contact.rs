//! Hazard and interactable contact resolution.
//!
//! Runs after the player has moved. While the tick was driven by the drop
//! regime, a row of short downward rays looks for something to stomp; the
//! leftmost ray with a stompable hit wins. Direct contacts within the
//! contact margin then decide hazard deaths, pickups and goals. A hazard that is
//! being stomped never kills.

use glam::Vec2;
use plunge_physics::{ActorState, ColliderId, CollisionLayers, CollisionProbe, SpatialQuery};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::events::EntityId;
use crate::interactable::InteractableRegistry;

/// Tuning for stomp rays and direct contacts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StompConfig {
    /// Number of parallel downward rays across the footprint.
    pub ray_count: usize,

    /// Length of each ray below the body's bottom face.
    pub ray_length: f32,

    /// Minimum contact normal y for a hazard contact to count as approached
    /// from above.
    pub min_normal_y: f32,

    /// Distance within which a collider counts as touching. Must exceed the
    /// skin width, which is the closest a sweep ever gets.
    pub contact_margin: f32,

    pub stomp_mask: CollisionLayers,

    pub interact_mask: CollisionLayers,
}

impl Default for StompConfig {
    fn default() -> Self {
        Self {
            ray_count: 5,
            ray_length: 0.25,
            min_normal_y: 0.7,
            contact_margin: 0.1,
            stomp_mask: CollisionLayers::MASK_STOMP,
            interact_mask: CollisionLayers::MASK_INTERACT,
        }
    }
}

impl StompConfig {
    pub fn validate(&self, skin_width: f32) -> Result<(), ConfigError> {
        if self.ray_count == 0 {
            return Err(ConfigError::invalid("stomp.ray_count", "at least one ray is required"));
        }
        if !self.ray_length.is_finite() || self.ray_length <= 0.0 {
            return Err(ConfigError::invalid(
                "stomp.ray_length",
                format!("must be positive, got {}", self.ray_length),
            ));
        }
        if !(-1.0..=1.0).contains(&self.min_normal_y) {
            return Err(ConfigError::invalid(
                "stomp.min_normal_y",
                format!("must be within [-1, 1], got {}", self.min_normal_y),
            ));
        }
        if !self.contact_margin.is_finite() || self.contact_margin <= skin_width {
            return Err(ConfigError::invalid(
                "stomp.contact_margin",
                format!(
                    "must be greater than the skin width {}, got {}",
                    skin_width, self.contact_margin
                ),
            ));
        }
        Ok(())
    }
}

/// The entity chosen for a stomp this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StompHit {
    pub target: EntityId,
    pub collider: ColliderId,
    /// Velocity the stomper bounces with, if the target is bouncy.
    pub bounce: Option<f32>,
}

/// Everything the player touched this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactReport {
    pub stomp: Option<StompHit>,
    /// First hazard that was not excused by a stomp.
    pub lethal: Option<EntityId>,
    /// Pickups within reach, in collider order.
    pub pickups: Vec<EntityId>,
    /// First goal zone touched.
    pub goal: Option<EntityId>,
}

impl ContactReport {
    #[inline]
    pub fn is_lethal(&self) -> bool {
        self.lethal.is_some()
    }
}

/// Stomp and hazard resolution for one actor.
#[derive(Debug, Clone, Default)]
pub struct ContactResolver {
    pub config: StompConfig,
}

impl ContactResolver {
    pub fn new(config: StompConfig) -> Self {
        Self { config }
    }

    /// Ray origins along the bottom face, left to right.
    pub fn ray_origins(&self, probe: &CollisionProbe, position: Vec2) -> Vec<Vec2> {
        let center = probe.body.center(position);
        let half_width = probe.body.half_extents().x;
        let bottom = probe.body.bottom(position);
        let count = self.config.ray_count;

        if count <= 1 {
            return vec![Vec2::new(center.x, bottom)];
        }

        let spacing = 2.0 * half_width / (count - 1) as f32;
        (0..count)
            .map(|i| Vec2::new(center.x - half_width + spacing * i as f32, bottom))
            .collect()
    }

    /// Leftmost stompable under the actor, if any.
    pub fn find_stomp_target<W: SpatialQuery + ?Sized>(
        &self,
        probe: &CollisionProbe,
        position: Vec2,
        world: &W,
        registry: &InteractableRegistry,
    ) -> Option<StompHit> {
        for origin in self.ray_origins(probe, position) {
            let hit = world.raycast(
                origin,
                -Vec2::Y,
                self.config.ray_length,
                self.config.stomp_mask,
            );
            let Some(collider) = hit.collider else {
                continue;
            };

            match registry.get(collider) {
                Some(interactable) if interactable.is_stompable() => {
                    return Some(StompHit {
                        target: interactable.entity,
                        collider,
                        bounce: interactable.stomp.and_then(|s| s.bounce()),
                    });
                }
                Some(_) => continue,
                None => {
                    log::warn!("stomp ray hit unregistered collider {:?}", collider);
                    continue;
                }
            }
        }
        None
    }

    /// Resolve all contacts for an actor that has finished moving.
    ///
    /// `dropping` is whether the drop regime drove this tick. A stomp also
    /// requires the actor to be descending.
    pub fn resolve<W: SpatialQuery + ?Sized>(
        &self,
        actor: &ActorState,
        dropping: bool,
        probe: &CollisionProbe,
        world: &W,
        registry: &InteractableRegistry,
    ) -> ContactReport {
        let can_stomp = dropping && actor.velocity.y <= 0.0;
        let mut report = ContactReport::default();

        if can_stomp {
            report.stomp = self.find_stomp_target(probe, actor.position, world, registry);
        }

        let contacts = world.contacts(
            probe.body.center(actor.position),
            probe.body.half_extents(),
            self.config.contact_margin,
            self.config.interact_mask,
        );

        for contact in contacts {
            let Some(collider) = contact.collider else {
                continue;
            };
            let Some(interactable) = registry.get(collider) else {
                log::warn!("contact with unregistered collider {:?}", collider);
                continue;
            };

            if interactable.is_pickup() && !report.pickups.contains(&interactable.entity) {
                report.pickups.push(interactable.entity);
            }

            if interactable.is_goal() && report.goal.is_none() {
                report.goal = Some(interactable.entity);
            }

            if !interactable.is_hazard() {
                continue;
            }

            if report.stomp.is_some_and(|s| s.target == interactable.entity) {
                continue;
            }

            let from_above = contact.faces_up(self.config.min_normal_y);
            if can_stomp && interactable.is_stompable() && from_above {
                if report.stomp.is_none() {
                    report.stomp = Some(StompHit {
                        target: interactable.entity,
                        collider,
                        bounce: interactable.stomp.and_then(|s| s.bounce()),
                    });
                }
                continue;
            }

            if report.lethal.is_none() {
                report.lethal = Some(interactable.entity);
            }
        }

        report
    }

    /// Overwrite vertical velocity with the stomp bounce, if any.
    ///
    /// Returns the applied velocity.
    pub fn apply_bounce(report: &ContactReport, actor: &mut ActorState) -> Option<f32> {
        let bounce = report.stomp.and_then(|s| s.bounce)?;
        actor.velocity.y = bounce;
        Some(bounce)
    }
}
