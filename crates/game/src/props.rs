//! Level props: breakable blocks, bouncers, pickups, spikes and goals.
//!
//! Props own no physics of their own. The level keeps their colliders in
//! the world in sync with what these structs report.

use glam::Vec2;
use plunge_physics::ColliderId;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::difficulty::{AllowedTiers, Difficulty, DifficultyConfigurable, Tiered};
use crate::events::{EntityId, EventQueue, GameEvent};
use crate::timer::{tick_optional, Countdown};

/// Timings and values shared by blocks and pickups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropConfig {
    /// Break animation length before a stomped block is removed (seconds).
    pub break_duration: f32,

    /// Points per pickup, per tier.
    pub pickup_points: Tiered<u32>,

    /// Collection animation length before a pickup is removed (seconds).
    pub pickup_despawn: f32,
}

impl Default for PropConfig {
    fn default() -> Self {
        Self {
            break_duration: 0.25,
            pickup_points: Tiered::new(100, 200, 300),
            pickup_despawn: 0.2,
        }
    }
}

impl PropConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.break_duration.is_finite() || self.break_duration < 0.0 {
            return Err(ConfigError::invalid("props.break_duration", "must be non-negative"));
        }
        if !self.pickup_despawn.is_finite() || self.pickup_despawn < 0.0 {
            return Err(ConfigError::invalid("props.pickup_despawn", "must be non-negative"));
        }
        Ok(())
    }
}

/// A solid block that breaks when stomped.
#[derive(Debug, Clone)]
pub struct BreakableBlock {
    pub id: EntityId,
    pub collider: ColliderId,
    pub position: Vec2,
    pub allowed: AllowedTiers,
    break_duration: f32,
    breaking: Option<Countdown>,
}

impl BreakableBlock {
    pub fn new(id: EntityId, collider: ColliderId, position: Vec2, break_duration: f32) -> Self {
        Self {
            id,
            collider,
            position,
            allowed: AllowedTiers::ALL,
            break_duration,
            breaking: None,
        }
    }

    #[inline]
    pub fn is_intact(&self) -> bool {
        self.breaking.is_none()
    }

    /// Start breaking. Returns `false` if the block is already breaking.
    pub fn on_stomp(&mut self, events: &mut EventQueue) -> bool {
        if !self.is_intact() {
            return false;
        }
        self.breaking = Some(Countdown::new(self.break_duration));
        log::info!("block {} breaking", self.id);
        events.push(GameEvent::BlockBroken { entity: self.id });
        true
    }

    /// Returns `true` once the break animation is over.
    pub fn tick_timers(&mut self, delta_time: f32) -> bool {
        tick_optional(&mut self.breaking, delta_time)
    }
}

impl DifficultyConfigurable for BreakableBlock {
    fn allowed_tiers(&self) -> AllowedTiers {
        self.allowed
    }

    fn set_allowed_tiers(&mut self, tiers: AllowedTiers) {
        self.allowed = tiers;
    }

    fn apply_difficulty(&mut self, _difficulty: Difficulty) {}
}

/// Motion of a bouncer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BouncerConfig {
    /// Peak height above the origin.
    pub height: f32,

    /// Seconds per full arc.
    pub cycle_duration: f32,

    /// Phase offset (seconds).
    pub offset: f32,

    /// Upward velocity given to a player that stomps it.
    pub bounce_force: f32,
}

impl Default for BouncerConfig {
    fn default() -> Self {
        Self {
            height: 2.0,
            cycle_duration: 2.0,
            offset: 0.0,
            bounce_force: 100.0,
        }
    }
}

impl BouncerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(ConfigError::invalid("bouncer.height", "must be non-negative"));
        }
        if !self.cycle_duration.is_finite() || self.cycle_duration <= 0.0 {
            return Err(ConfigError::invalid("bouncer.cycle_duration", "must be positive"));
        }
        if !self.offset.is_finite() {
            return Err(ConfigError::invalid("bouncer.offset", "must be finite"));
        }
        if !self.bounce_force.is_finite() || self.bounce_force <= 0.0 {
            return Err(ConfigError::invalid("bouncer.bounce_force", "must be positive"));
        }
        Ok(())
    }
}

/// A bouncy platform hopping along a parabola.
#[derive(Debug, Clone)]
pub struct Bouncer {
    pub id: EntityId,
    pub collider: ColliderId,
    pub origin: Vec2,
    pub config: BouncerConfig,
    pub allowed: AllowedTiers,
    elapsed: f32,
}

impl Bouncer {
    pub fn new(id: EntityId, collider: ColliderId, origin: Vec2, config: BouncerConfig) -> Self {
        Self {
            id,
            collider,
            origin,
            config,
            allowed: AllowedTiers::ALL,
            elapsed: 0.0,
        }
    }

    /// Position along the arc after `elapsed` seconds.
    pub fn position_at(&self, elapsed: f32) -> Vec2 {
        let cycle = self.config.cycle_duration;
        let t = (elapsed + self.config.offset).rem_euclid(cycle) / cycle;
        let height = 4.0 * self.config.height * t * (1.0 - t);
        self.origin + Vec2::new(0.0, height)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position_at(self.elapsed)
    }

    /// Advance along the arc and return the new position.
    pub fn update(&mut self, delta_time: f32) -> Vec2 {
        self.elapsed += delta_time;
        self.position()
    }
}

impl DifficultyConfigurable for Bouncer {
    fn allowed_tiers(&self) -> AllowedTiers {
        self.allowed
    }

    fn set_allowed_tiers(&mut self, tiers: AllowedTiers) {
        self.allowed = tiers;
    }

    fn apply_difficulty(&mut self, _difficulty: Difficulty) {}
}

/// A collectible worth tiered points.
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: EntityId,
    pub collider: ColliderId,
    pub position: Vec2,
    pub points: Tiered<u32>,
    pub value: u32,
    pub allowed: AllowedTiers,
    despawn_duration: f32,
    despawn: Option<Countdown>,
}

impl Pickup {
    pub fn new(
        id: EntityId,
        collider: ColliderId,
        position: Vec2,
        points: Tiered<u32>,
        despawn_duration: f32,
    ) -> Self {
        Self {
            id,
            collider,
            position,
            points,
            value: points.resolve(Difficulty::default()),
            allowed: AllowedTiers::ALL,
            despawn_duration,
            despawn: None,
        }
    }

    #[inline]
    pub fn is_collected(&self) -> bool {
        self.despawn.is_some()
    }

    /// Collect on behalf of `by`. Returns the points awarded, or `None` if
    /// it was already collected.
    pub fn collect(&mut self, by: EntityId, events: &mut EventQueue) -> Option<u32> {
        if self.is_collected() {
            return None;
        }
        self.despawn = Some(Countdown::new(self.despawn_duration));
        events.push(GameEvent::Collected {
            entity: self.id,
            by,
            points: self.value,
        });
        Some(self.value)
    }

    pub fn tick_timers(&mut self, delta_time: f32) -> bool {
        tick_optional(&mut self.despawn, delta_time)
    }
}

impl DifficultyConfigurable for Pickup {
    fn allowed_tiers(&self) -> AllowedTiers {
        self.allowed
    }

    fn set_allowed_tiers(&mut self, tiers: AllowedTiers) {
        self.allowed = tiers;
    }

    fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.value = self.points.resolve(difficulty);
    }
}

/// Static lethal geometry.
#[derive(Debug, Clone)]
pub struct Spike {
    pub id: EntityId,
    pub collider: ColliderId,
    pub position: Vec2,
    pub allowed: AllowedTiers,
}

impl Spike {
    pub fn new(id: EntityId, collider: ColliderId, position: Vec2) -> Self {
        Self {
            id,
            collider,
            position,
            allowed: AllowedTiers::ALL,
        }
    }
}

impl DifficultyConfigurable for Spike {
    fn allowed_tiers(&self) -> AllowedTiers {
        self.allowed
    }

    fn set_allowed_tiers(&mut self, tiers: AllowedTiers) {
        self.allowed = tiers;
    }

    fn apply_difficulty(&mut self, _difficulty: Difficulty) {}
}

/// Finish zone. Counts once, for the first grounded player inside it.
#[derive(Debug, Clone)]
pub struct Goal {
    pub id: EntityId,
    pub collider: ColliderId,
    pub position: Vec2,
    pub reached_by: Option<EntityId>,
    pub allowed: AllowedTiers,
}

impl Goal {
    pub fn new(id: EntityId, collider: ColliderId, position: Vec2) -> Self {
        Self {
            id,
            collider,
            position,
            reached_by: None,
            allowed: AllowedTiers::ALL,
        }
    }

    #[inline]
    pub fn is_reached(&self) -> bool {
        self.reached_by.is_some()
    }

    /// Mark the goal reached by `by`. Returns `false` if it already was.
    pub fn reach(&mut self, by: EntityId) -> bool {
        if self.is_reached() {
            return false;
        }
        self.reached_by = Some(by);
        true
    }
}

impl DifficultyConfigurable for Goal {
    fn allowed_tiers(&self) -> AllowedTiers {
        self.allowed
    }

    fn set_allowed_tiers(&mut self, tiers: AllowedTiers) {
        self.allowed = tiers;
    }

    fn apply_difficulty(&mut self, _difficulty: Difficulty) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_block_breaks_once() {
        let mut block = BreakableBlock::new(3, ColliderId(1), Vec2::ZERO, 0.25);
        let mut events = EventQueue::new();

        assert!(block.on_stomp(&mut events));
        assert!(!block.on_stomp(&mut events));
        assert_eq!(events.pop(), Some(GameEvent::BlockBroken { entity: 3 }));
        assert!(events.is_empty());

        assert!(!block.tick_timers(0.1));
        assert!(!block.tick_timers(0.1));
        assert!(block.tick_timers(0.1));
        assert!(!block.tick_timers(0.1));
    }

    #[test]
    fn test_bouncer_arc() {
        let bouncer = Bouncer::new(4, ColliderId(2), Vec2::new(1.0, 1.0), BouncerConfig::default());

        assert!((bouncer.position_at(0.0).y - 1.0).abs() < EPSILON);
        // Peak at half the cycle.
        assert!((bouncer.position_at(1.0).y - 3.0).abs() < EPSILON);
        assert!((bouncer.position_at(0.5).y - 2.5).abs() < EPSILON);
        // Wraps around.
        assert!((bouncer.position_at(3.0).y - 3.0).abs() < EPSILON);
        assert_eq!(bouncer.position_at(1.0).x, 1.0);
    }

    #[test]
    fn test_bouncer_offset_shifts_phase() {
        let config = BouncerConfig {
            offset: 1.0,
            ..Default::default()
        };
        let mut bouncer = Bouncer::new(4, ColliderId(2), Vec2::ZERO, config);

        assert!((bouncer.position().y - 2.0).abs() < EPSILON);
        let next = bouncer.update(1.0);
        assert!(next.y.abs() < EPSILON);
    }

    #[test]
    fn test_pickup_collects_once() {
        let mut pickup = Pickup::new(5, ColliderId(3), Vec2::ZERO, Tiered::new(100, 200, 300), 0.2);
        pickup.apply_difficulty(Difficulty::Hard);
        let mut events = EventQueue::new();

        assert_eq!(pickup.collect(1, &mut events), Some(300));
        assert_eq!(pickup.collect(1, &mut events), None);
        assert_eq!(
            events.pop(),
            Some(GameEvent::Collected {
                entity: 5,
                by: 1,
                points: 300
            })
        );
        assert!(events.is_empty());
        assert!(pickup.tick_timers(0.5));
    }

    #[test]
    fn test_bouncer_config_validation() {
        assert!(BouncerConfig::default().validate().is_ok());
        let config = BouncerConfig {
            cycle_duration: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_goal_reached_once() {
        let mut goal = Goal::new(6, ColliderId(3), Vec2::new(5.0, 1.0));
        assert!(!goal.is_reached());

        assert!(goal.reach(1));
        assert!(!goal.reach(2));
        assert_eq!(goal.reached_by, Some(1));
    }
}
