//! Daggers and the spawners that keep them coming.
//!
//! A dagger hangs at its spawn point until the player has been within range
//! for its wait time, then flies in a straight line toward where the player
//! was. It dies on the first wall it hits. A spawner produces one dagger at a
//! time and starts timing the next one only after the current one launched.

use glam::Vec2;
use plunge_physics::{BodyShape, ColliderId, CollisionLayers, CollisionProbe, SpatialQuery};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::difficulty::{AllowedTiers, Difficulty, DifficultyConfigurable, Tiered};
use crate::events::{DeathCause, EntityId, EventQueue, GameEvent};
use crate::timer::{tick_optional, Countdown};

/// Dagger tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaggerConfig {
    /// Flight speed per tier (units/second).
    pub speed: Tiered<f32>,

    /// Time the player must stay in range before launch, per tier (seconds).
    pub wait_time: Tiered<f32>,

    /// Distance at which the dagger notices the player.
    pub range: f32,

    pub body: BodyShape,

    /// Layers that stop a flying dagger.
    pub wall_mask: CollisionLayers,

    /// Time between death and removal (seconds).
    pub death_duration: f32,
}

impl Default for DaggerConfig {
    fn default() -> Self {
        Self {
            speed: Tiered::new(6.0, 9.0, 12.0),
            wait_time: Tiered::new(1.5, 1.0, 0.5),
            range: 8.0,
            body: BodyShape::UNIT,
            wall_mask: CollisionLayers::SOLID,
            death_duration: 0.3,
        }
    }
}

impl DaggerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed.all(|s| s.is_finite() && s > 0.0) {
            return Err(ConfigError::invalid("dagger.speed", "speeds must be positive"));
        }
        if !self.wait_time.all(|t| t.is_finite() && t >= 0.0) {
            return Err(ConfigError::invalid("dagger.wait_time", "wait times must be non-negative"));
        }
        if !self.range.is_finite() || self.range <= 0.0 {
            return Err(ConfigError::invalid("dagger.range", "must be positive"));
        }
        if !self.death_duration.is_finite() || self.death_duration < 0.0 {
            return Err(ConfigError::invalid("dagger.death_duration", "must be non-negative"));
        }
        Ok(())
    }
}

/// Lifecycle of a dagger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DaggerPhase {
    /// Hanging in place, counting time with the player in range.
    Waiting { in_range_for: f32 },
    Flying { velocity: Vec2 },
    Dead,
}

/// A dagger that launches at the player.
#[derive(Debug, Clone)]
pub struct Dagger {
    pub id: EntityId,
    pub collider: ColliderId,
    pub probe: CollisionProbe,
    pub position: Vec2,
    pub phase: DaggerPhase,
    pub config: DaggerConfig,
    /// Spawner to tell about the launch.
    pub spawner: Option<EntityId>,
    pub speed: f32,
    pub wait_time: f32,
    pub allowed: AllowedTiers,
    death: Option<Countdown>,
}

impl Dagger {
    pub fn new(
        id: EntityId,
        collider: ColliderId,
        position: Vec2,
        config: DaggerConfig,
        skin_width: f32,
    ) -> Self {
        let mut probe = CollisionProbe::for_body(config.body, skin_width);
        probe.config.movement_mask = config.wall_mask;

        let difficulty = Difficulty::default();
        Self {
            id,
            collider,
            probe,
            position,
            phase: DaggerPhase::Waiting { in_range_for: 0.0 },
            config,
            spawner: None,
            speed: config.speed.resolve(difficulty),
            wait_time: config.wait_time.resolve(difficulty),
            allowed: AllowedTiers::ALL,
            death: None,
        }
    }

    pub fn with_spawner(mut self, spawner: EntityId) -> Self {
        self.spawner = Some(spawner);
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !matches!(self.phase, DaggerPhase::Dead)
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        matches!(self.phase, DaggerPhase::Flying { .. })
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.probe.body.center(self.position)
    }

    /// Advance one tick.
    ///
    /// `target` is the player position, `None` if there is no live player.
    pub fn update<W: SpatialQuery + ?Sized>(
        &mut self,
        world: &W,
        target: Option<Vec2>,
        delta_time: f32,
        events: &mut EventQueue,
    ) {
        match self.phase {
            DaggerPhase::Waiting { in_range_for } => {
                let range = self.config.range;
                let Some(target) = target.filter(|t| t.distance(self.position) < range) else {
                    self.phase = DaggerPhase::Waiting { in_range_for: 0.0 };
                    return;
                };

                let in_range_for = in_range_for + delta_time;
                if in_range_for >= self.wait_time {
                    self.launch(target, events);
                } else {
                    self.phase = DaggerPhase::Waiting { in_range_for };
                }
            }
            DaggerPhase::Flying { velocity } => {
                let sweep = self.probe.sweep(self.position, velocity * delta_time, world);
                self.position = sweep.position;
                if sweep.was_blocked() {
                    self.die(DeathCause::Wall, events);
                }
            }
            DaggerPhase::Dead => {}
        }
    }

    fn launch(&mut self, target: Vec2, events: &mut EventQueue) {
        let direction = (target - self.position).try_normalize().unwrap_or(-Vec2::Y);
        self.phase = DaggerPhase::Flying {
            velocity: direction * self.speed,
        };
        log::debug!("dagger {} launched toward {:?}", self.id, target);
        events.push(GameEvent::DaggerLaunched {
            dagger: self.id,
            spawner: self.spawner,
            direction,
        });
    }

    fn die(&mut self, cause: DeathCause, events: &mut EventQueue) {
        self.phase = DaggerPhase::Dead;
        self.death = Some(Countdown::new(self.config.death_duration));
        events.push(GameEvent::Died {
            entity: self.id,
            cause,
        });
    }

    /// Handle a stomp notification. Returns `false` if already dead.
    pub fn on_stomp(&mut self, by: EntityId, events: &mut EventQueue) -> bool {
        if !self.is_alive() {
            return false;
        }
        log::info!("dagger {} stomped by {}", self.id, by);
        self.die(DeathCause::Stomped { by }, events);
        true
    }

    /// Advance the death countdown. Returns `true` when it is time to despawn.
    pub fn tick_timers(&mut self, delta_time: f32) -> bool {
        tick_optional(&mut self.death, delta_time)
    }
}

impl DifficultyConfigurable for Dagger {
    fn allowed_tiers(&self) -> AllowedTiers {
        self.allowed
    }

    fn set_allowed_tiers(&mut self, tiers: AllowedTiers) {
        self.allowed = tiers;
    }

    fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.speed = self.config.speed.resolve(difficulty);
        self.wait_time = self.config.wait_time.resolve(difficulty);
    }
}

/// Spawner tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Time between a launch and the next spawn, per tier (seconds).
    pub interval: Tiered<f32>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            interval: Tiered::new(4.0, 3.0, 2.0),
        }
    }
}

impl SpawnerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.interval.all(|t| t.is_finite() && t >= 0.0) {
            return Err(ConfigError::invalid("spawner.interval", "intervals must be non-negative"));
        }
        Ok(())
    }
}

/// Produces daggers at a fixed point.
#[derive(Debug, Clone)]
pub struct DaggerSpawner {
    pub id: EntityId,
    pub position: Vec2,
    pub config: SpawnerConfig,
    pub interval: f32,
    pub difficulty: Difficulty,
    pub allowed: AllowedTiers,
    elapsed: f32,
    /// Dagger spawned and not yet launched.
    pending: Option<EntityId>,
}

impl DaggerSpawner {
    pub fn new(id: EntityId, position: Vec2, config: SpawnerConfig) -> Self {
        let difficulty = Difficulty::default();
        Self {
            id,
            position,
            config,
            interval: config.interval.resolve(difficulty),
            difficulty,
            allowed: AllowedTiers::ALL,
            elapsed: 0.0,
            pending: None,
        }
    }

    /// Advance the spawn timer. Returns `true` if a dagger should be spawned
    /// now; the caller reports it back with [`DaggerSpawner::spawned`].
    pub fn update(&mut self, delta_time: f32) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.elapsed += delta_time;
        self.elapsed >= self.interval
    }

    pub fn spawned(&mut self, dagger: EntityId) {
        log::debug!("spawner {} produced dagger {}", self.id, dagger);
        self.pending = Some(dagger);
        self.elapsed = 0.0;
    }

    /// The pending dagger launched or went away; start timing the next one.
    pub fn release(&mut self, dagger: EntityId) {
        if self.pending == Some(dagger) {
            self.pending = None;
            self.elapsed = 0.0;
        }
    }

    #[inline]
    pub fn pending(&self) -> Option<EntityId> {
        self.pending
    }
}

impl DifficultyConfigurable for DaggerSpawner {
    fn allowed_tiers(&self) -> AllowedTiers {
        self.allowed
    }

    fn set_allowed_tiers(&mut self, tiers: AllowedTiers) {
        self.allowed = tiers;
    }

    fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.interval = self.config.interval.resolve(difficulty);
        self.difficulty = difficulty;
    }
}
