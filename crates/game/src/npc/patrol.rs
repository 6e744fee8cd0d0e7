//! Patrol enemy: walks back and forth, turning at walls.

use glam::Vec2;
use plunge_physics::{BodyShape, ColliderId, CollisionProbe, SpatialQuery, WallSide};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::difficulty::{AllowedTiers, Difficulty, DifficultyConfigurable, Tiered};
use crate::events::{DeathCause, EntityId, EventQueue, GameEvent};
use crate::timer::{tick_optional, Countdown};

/// Patrol tuning shared by every patrol enemy in a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    /// Walking speed per tier (units/second).
    pub speed: Tiered<f32>,

    pub body: BodyShape,

    /// Also turn when there is no ground ahead.
    pub turn_at_ledges: bool,

    /// How far below the leading corner ground must be to keep walking.
    pub ledge_probe_depth: f32,

    /// Time between death and removal (seconds).
    pub death_duration: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            speed: Tiered::new(1.5, 2.0, 3.0),
            body: BodyShape::UNIT,
            turn_at_ledges: false,
            ledge_probe_depth: 0.5,
            death_duration: 0.5,
        }
    }
}

impl PatrolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed.all(|s| s.is_finite() && s >= 0.0) {
            return Err(ConfigError::invalid("patrol.speed", "speeds must be non-negative"));
        }
        if !self.ledge_probe_depth.is_finite() || self.ledge_probe_depth <= 0.0 {
            return Err(ConfigError::invalid("patrol.ledge_probe_depth", "must be positive"));
        }
        if !self.death_duration.is_finite() || self.death_duration < 0.0 {
            return Err(ConfigError::invalid("patrol.death_duration", "must be non-negative"));
        }
        Ok(())
    }
}

/// A walking enemy.
#[derive(Debug, Clone)]
pub struct PatrolEnemy {
    pub id: EntityId,
    pub collider: ColliderId,
    pub probe: CollisionProbe,
    pub position: Vec2,
    pub direction: WallSide,
    pub config: PatrolConfig,
    /// Resolved from the tiered speed; zero once dead.
    pub speed: f32,
    pub allowed: AllowedTiers,
    death: Option<Countdown>,
}

impl PatrolEnemy {
    /// Assemble a patrol enemy walking right from `position`.
    pub fn new(
        id: EntityId,
        collider: ColliderId,
        position: Vec2,
        probe: CollisionProbe,
        config: PatrolConfig,
    ) -> Self {
        Self {
            id,
            collider,
            probe,
            position,
            direction: WallSide::Right,
            config,
            speed: config.speed.resolve(Difficulty::default()),
            allowed: AllowedTiers::ALL,
            death: None,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// World-space center of the collider.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.probe.body.center(self.position)
    }

    /// Turn around if blocked, then walk.
    pub fn update<W: SpatialQuery + ?Sized>(&mut self, world: &W, delta_time: f32) {
        if !self.is_alive() {
            return;
        }

        if self.should_turn(world) {
            self.direction = self.direction.opposite();
            log::trace!("patrol {} turned {:?}", self.id, self.direction);
        }

        let displacement = self.direction.vector() * self.speed * delta_time;
        self.position = self.probe.new_position(self.position, displacement, world);
    }

    fn should_turn<W: SpatialQuery + ?Sized>(&self, world: &W) -> bool {
        if self.probe.is_touching_wall(self.position, self.direction, world) {
            return true;
        }
        self.config.turn_at_ledges
            && !self.probe.has_ground_ahead(
                self.position,
                self.direction,
                self.config.ledge_probe_depth,
                world,
            )
    }

    /// Handle a stomp notification. Returns `false` if already dead.
    pub fn on_stomp(&mut self, by: EntityId, events: &mut EventQueue) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.speed = 0.0;
        self.death = Some(Countdown::new(self.config.death_duration));
        log::info!("patrol {} stomped by {}", self.id, by);
        events.push(GameEvent::Died {
            entity: self.id,
            cause: DeathCause::Stomped { by },
        });
        true
    }

    /// Advance the death countdown. Returns `true` when it is time to despawn.
    pub fn tick_timers(&mut self, delta_time: f32) -> bool {
        tick_optional(&mut self.death, delta_time)
    }
}

impl DifficultyConfigurable for PatrolEnemy {
    fn allowed_tiers(&self) -> AllowedTiers {
        self.allowed
    }

    fn set_allowed_tiers(&mut self, tiers: AllowedTiers) {
        self.allowed = tiers;
    }

    fn apply_difficulty(&mut self, difficulty: Difficulty) {
        if self.is_alive() {
            self.speed = self.config.speed.resolve(difficulty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plunge_physics::{CollisionLayers, CollisionWorld};

    const DT: f32 = 1.0 / 60.0;

    /// Floor from x=-10 to x=10 with walls whose inner faces are at x=-4
    /// and x=4.
    fn create_corridor() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(Vec2::new(0.0, -0.5), Vec2::new(10.0, 0.5), CollisionLayers::SOLID);
        world.add_box(Vec2::new(-4.5, 2.0), Vec2::new(0.5, 2.0), CollisionLayers::SOLID);
        world.add_box(Vec2::new(4.5, 2.0), Vec2::new(0.5, 2.0), CollisionLayers::SOLID);
        world
    }

    fn create_enemy(position: Vec2, config: PatrolConfig) -> PatrolEnemy {
        PatrolEnemy::new(
            7,
            ColliderId(99),
            position,
            CollisionProbe::for_body(config.body, 0.05),
            config,
        )
    }

    #[test]
    fn test_walks_in_current_direction() {
        let world = create_corridor();
        let mut enemy = create_enemy(Vec2::new(0.0, 0.55), PatrolConfig::default());

        enemy.update(&world, 0.5);

        assert!((enemy.position.x - 1.0).abs() < 1e-4);
        assert_eq!(enemy.direction, WallSide::Right);
    }

    #[test]
    fn test_turns_at_wall() {
        let world = create_corridor();
        let mut enemy = create_enemy(Vec2::new(0.0, 0.55), PatrolConfig::default());

        let mut turned = false;
        for _ in 0..600 {
            enemy.update(&world, DT);
            assert!(enemy.position.x + 0.5 <= 4.0, "walked into the wall");
            if enemy.direction == WallSide::Left {
                turned = true;
                break;
            }
        }

        assert!(turned);
    }

    #[test]
    fn test_ledge_turning_is_optional() {
        let mut world = CollisionWorld::new();
        // Platform from x=-2 to x=2, no walls
        world.add_box(Vec2::new(0.0, -0.5), Vec2::new(2.0, 0.5), CollisionLayers::SOLID);

        let mut careful = create_enemy(
            Vec2::new(1.8, 0.55),
            PatrolConfig {
                turn_at_ledges: true,
                ..Default::default()
            },
        );
        careful.update(&world, DT);
        assert_eq!(careful.direction, WallSide::Left);

        let mut reckless = create_enemy(Vec2::new(1.8, 0.55), PatrolConfig::default());
        reckless.update(&world, DT);
        assert_eq!(reckless.direction, WallSide::Right);
    }

    #[test]
    fn test_stomp_kills_once() {
        let world = create_corridor();
        let mut enemy = create_enemy(Vec2::new(0.0, 0.55), PatrolConfig::default());
        let mut events = EventQueue::new();

        assert!(enemy.on_stomp(1, &mut events));
        assert!(!enemy.on_stomp(1, &mut events));
        assert_eq!(events.len(), 1);
        assert_eq!(enemy.speed, 0.0);

        let before = enemy.position;
        enemy.update(&world, DT);
        assert_eq!(enemy.position, before);

        let mut despawn = false;
        for _ in 0..60 {
            if enemy.tick_timers(DT) {
                despawn = true;
                break;
            }
        }
        assert!(despawn);
    }

    #[test]
    fn test_difficulty_sets_speed() {
        let mut enemy = create_enemy(Vec2::ZERO, PatrolConfig::default());

        enemy.apply_difficulty(Difficulty::Hard);
        assert_eq!(enemy.speed, 3.0);

        enemy.set_allowed_tiers(AllowedTiers::only(&[Difficulty::Easy]));
        assert!(!enemy.is_allowed(Difficulty::Hard));
    }
}
