//! Player entity and state.

use glam::Vec2;
use plunge_physics::{
    ActorState, BodyShape, CollisionProbe, MotionController, MovementConfig, ProbeConfig,
    SpatialQuery, TickReport,
};

use crate::animation::AnimationState;
use crate::config::{ConfigError, SimulationConfig};
use crate::events::{DeathCause, EntityId, EventQueue, GameEvent};
use crate::input::{InputSampler, RawInput};

/// The player-controlled actor.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique player ID.
    pub id: EntityId,

    /// Motion state, written only by the controller.
    pub state: ActorState,

    pub controller: MotionController,

    pub input: InputSampler,

    /// Presentation snapshot as of the last tick.
    pub animation: AnimationState,

    /// Total score.
    pub score: u32,

    /// Deaths this session.
    pub deaths: u32,

    alive: bool,
}

impl Player {
    /// Build a player from explicit parts.
    ///
    /// Fails if the probe or movement tuning is out of range.
    pub fn assemble(
        id: EntityId,
        spawn_position: Vec2,
        body: BodyShape,
        probe: ProbeConfig,
        movement: MovementConfig,
    ) -> Result<Self, ConfigError> {
        probe.validate()?;
        movement.validate()?;

        let state = ActorState::new(spawn_position);
        Ok(Self {
            id,
            state,
            controller: MotionController::new(movement, CollisionProbe::new(body, probe)),
            input: InputSampler::new(),
            animation: AnimationState::from_actor(&state),
            score: 0,
            deaths: 0,
            alive: true,
        })
    }

    /// Build a player from the simulation config.
    pub fn from_config(
        id: EntityId,
        spawn_position: Vec2,
        config: &SimulationConfig,
    ) -> Result<Self, ConfigError> {
        Self::assemble(
            id,
            spawn_position,
            config.body,
            config.probe_config(),
            config.movement,
        )
    }

    /// Get the player's current position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    #[inline]
    pub fn probe(&self) -> &CollisionProbe {
        &self.controller.probe
    }

    /// Check if the player is alive.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Place the player at `position` and settle it onto the ground below.
    pub fn spawn<W: SpatialQuery + ?Sized>(&mut self, position: Vec2, max_drop: f32, world: &W) {
        self.controller.spawn_at(&mut self.state, position, max_drop, world);
        self.input.reset();
        self.animation = AnimationState::from_actor(&self.state);
        self.alive = true;
        log::info!("player {} spawned at {:?}", self.id, self.state.position);
    }

    /// Record one rendered frame of input.
    pub fn sample_input(&mut self, raw: &RawInput) {
        self.input.sample(raw, &self.state);
    }

    /// Run one fixed step of motion and report what changed.
    pub fn tick<W: SpatialQuery + ?Sized>(
        &mut self,
        world: &W,
        delta_time: f32,
        events: &mut EventQueue,
    ) -> TickReport {
        let intent = self.input.intent();
        let report = self.controller.tick(&mut self.state, &intent, world, delta_time);
        self.input.settle(&self.state);

        if report.jumped {
            events.push(GameEvent::Jumped {
                entity: self.id,
                position: self.state.position,
            });
        }
        if report.landed {
            events.push(GameEvent::Landed {
                entity: self.id,
                position: self.state.position,
            });
        }

        self.animation = AnimationState::from_actor(&self.state);
        if report.mode_changed() {
            events.push(GameEvent::ModeChanged {
                entity: self.id,
                from: report.previous_mode,
                to: report.mode,
                animation: self.animation,
            });
        }

        report
    }

    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Kill the player. Returns `false` if already dead.
    pub fn kill(&mut self, cause: DeathCause, events: &mut EventQueue) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.deaths += 1;
        self.state.velocity = Vec2::ZERO;
        self.input.reset();
        log::info!("player {} died: {:?}", self.id, cause);
        events.push(GameEvent::Died {
            entity: self.id,
            cause,
        });
        true
    }
}
