//! Game simulation - the main game loop.
//!
//! Input is sampled once per rendered frame; physics runs in fixed steps.
//! Each step updates the level, moves the player, resolves the player's
//! contacts and then drains the event queue, delivering stomp notifications
//! on the way out. The first grounded touch of a goal finishes the run. The
//! simulation is deterministic for a given config, level and input sequence.

use plunge_physics::ActorState;

use crate::config::{ConfigError, SimulationConfig};
use crate::contact::ContactResolver;
use crate::events::{DeathCause, EntityId, EventQueue, GameEvent};
use crate::input::RawInput;
use crate::level::Level;
use crate::player::Player;

/// Entity id of the player.
pub const PLAYER_ID: EntityId = 1;

/// How far below its spawn point the player may be settled.
const SPAWN_DROP: f32 = 50.0;

/// Converts variable frame times into a whole number of fixed steps.
#[derive(Debug, Clone)]
pub struct FixedStep {
    /// Length of one step (seconds).
    pub step: f32,

    pub max_steps_per_frame: u32,

    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32, max_steps_per_frame: u32) -> Self {
        Self {
            step,
            max_steps_per_frame,
            accumulator: 0.0,
        }
    }

    /// Add a frame's worth of time and return how many steps to run.
    ///
    /// Time beyond `max_steps_per_frame` steps is dropped.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.accumulator += frame_time.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            log::warn!(
                "dropping {:.3}s of simulation time after {} steps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.step;
        }
        steps
    }

    /// Fraction of a step left in the accumulator, for interpolation.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}

/// The main game simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Fixed steps run so far.
    pub frame: u64,

    /// Simulated seconds so far.
    pub elapsed: f32,

    /// Time at which a goal was reached.
    pub finished: Option<f32>,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    pub player: Player,

    pub resolver: ContactResolver,

    clock: FixedStep,
    queue: EventQueue,
}

impl Simulation {
    /// Create a simulation for `level`.
    ///
    /// Validates the config, applies its difficulty to the level and spawns
    /// the player at the level's spawn point.
    pub fn new(config: SimulationConfig, mut level: Level) -> Result<Self, ConfigError> {
        config.validate()?;
        level.apply_difficulty(config.difficulty);

        let mut player = Player::from_config(PLAYER_ID, level.player_spawn, &config)?;
        player.spawn(level.player_spawn, SPAWN_DROP, &level.world);

        Ok(Self {
            frame: 0,
            elapsed: 0.0,
            finished: None,
            clock: FixedStep::new(config.delta_time(), config.max_steps_per_frame),
            resolver: ContactResolver::new(config.stomp),
            queue: EventQueue::new(),
            config,
            level,
            player,
        })
    }

    /// Create a simulation running the demo level.
    pub fn demo(config: SimulationConfig) -> Result<Self, ConfigError> {
        let level = Level::demo(&config);
        Self::new(config, level)
    }

    /// Get the delta time for this simulation.
    #[inline]
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }

    /// Sample one rendered frame of input and run the fixed steps it covers.
    pub fn frame(&mut self, raw: &RawInput, frame_time: f32) -> Vec<GameEvent> {
        self.player.sample_input(raw);

        let steps = self.clock.advance(frame_time);
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(self.tick());
        }
        events
    }

    /// Advance the simulation by one fixed step.
    ///
    /// Returns every event raised during the step, in order.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let delta_time = self.delta_time();
        let target = self.player.is_alive().then(|| self.player.position());
        self.elapsed += delta_time;

        self.level.update(target, delta_time, &mut self.queue);

        if self.player.is_alive() {
            let report = self.player.tick(&self.level.world, delta_time, &mut self.queue);
            self.resolve_contacts(report.was_dropping());
        }

        let mut events = Vec::new();
        while let Some(event) = self.queue.pop() {
            self.level.handle_event(&event, &mut self.queue);
            events.push(event);
        }

        self.frame += 1;
        events
    }

    fn resolve_contacts(&mut self, dropping: bool) {
        let player = &mut self.player;
        let report = self.resolver.resolve(
            &player.state,
            dropping,
            player.probe(),
            &self.level.world,
            &self.level.registry,
        );

        if let Some(stomp) = report.stomp {
            if let Some(velocity) = ContactResolver::apply_bounce(&report, &mut player.state) {
                self.queue.push(GameEvent::Bounced {
                    entity: player.id,
                    velocity,
                });
            }
            log::info!("player {} stomped {}", player.id, stomp.target);
            self.queue.push(GameEvent::Stomped {
                stomper: player.id,
                target: stomp.target,
            });
        }

        for &pickup in &report.pickups {
            if let Some(points) = self.level.collect(pickup, player.id, &mut self.queue) {
                player.award(points);
            }
        }

        if let Some(source) = report.lethal {
            player.kill(DeathCause::Hazard { source }, &mut self.queue);
            return;
        }

        if let Some(goal) = report.goal {
            if self.finished.is_none()
                && player.state.is_grounded()
                && self.level.reach_goal(goal, player.id)
            {
                log::info!(
                    "player {} finished in {:.2}s with {} points",
                    player.id,
                    self.elapsed,
                    player.score
                );
                self.finished = Some(self.elapsed);
                self.queue.push(GameEvent::Finished {
                    by: player.id,
                    elapsed: self.elapsed,
                    score: player.score,
                });
            }
        }
    }

    /// Put a dead player back at the spawn point.
    pub fn respawn_player(&mut self) {
        let spawn = self.level.player_spawn;
        self.player.spawn(spawn, SPAWN_DROP, &self.level.world);
    }

    /// Current player motion state.
    #[inline]
    pub fn player_state(&self) -> &ActorState {
        &self.player.state
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use plunge_physics::{MotionMode, WallSide};

    const EPS: f32 = 1e-4;

    /// Empty floor from x=-20 to x=20, player spawned at the origin.
    fn create_sim(config: SimulationConfig, build: impl FnOnce(&mut Level)) -> Simulation {
        let mut level = Level::new("test", &config);
        level.add_solid(Vec2::new(0.0, -0.5), Vec2::new(20.0, 0.5));
        level.player_spawn = Vec2::new(0.0, 0.55);
        build(&mut level);
        Simulation::new(config, level).unwrap()
    }

    fn drop_from(sim: &mut Simulation, position: Vec2) {
        sim.player.state = ActorState::new(position);
        sim.player.sample_input(&RawInput {
            drop_held: true,
            ..Default::default()
        });
    }

    fn run(sim: &mut Simulation, ticks: usize) -> Vec<GameEvent> {
        (0..ticks).flat_map(|_| sim.tick()).collect()
    }

    #[test]
    fn test_fixed_step_counts_steps() {
        let mut clock = FixedStep::new(0.01, 5);

        assert_eq!(clock.advance(0.025), 2);
        assert!((clock.alpha() - 0.5).abs() < 1e-3);
        assert_eq!(clock.advance(0.006), 1);
        assert_eq!(clock.advance(-1.0), 0);
    }

    #[test]
    fn test_fixed_step_caps_steps() {
        let mut clock = FixedStep::new(0.01, 5);

        assert_eq!(clock.advance(1.0), 5);
        // The backlog is gone.
        assert!(clock.alpha() < 1.0);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_player_spawns_grounded() {
        let sim = create_sim(SimulationConfig::default(), |_| {});

        assert_eq!(sim.player_state().mode, MotionMode::Grounded);
        assert!(sim.player.is_alive());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimulationConfig {
            max_steps_per_frame: 0,
            ..Default::default()
        };
        let level = Level::new("test", &config);
        assert!(Simulation::new(config, level).is_err());
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut sim = create_sim(SimulationConfig::default(), |_| {});

        sim.tick();
        assert_eq!(sim.frame, 1);

        sim.frame(&RawInput::default(), 1.0 / 30.0 + 1e-4);
        assert_eq!(sim.frame, 3);
    }

    #[test]
    fn test_stomp_beats_hazard() {
        let mut patrol = 0;
        let mut sim = create_sim(SimulationConfig::default(), |level| {
            patrol = level.add_patrol(Vec2::new(0.0, 0.55));
        });
        drop_from(&mut sim, Vec2::new(0.0, 3.0));

        let events = run(&mut sim, 30);

        assert!(sim.player.is_alive());
        assert!(events.contains(&GameEvent::Stomped {
            stomper: PLAYER_ID,
            target: patrol
        }));
        assert!(events.contains(&GameEvent::Died {
            entity: patrol,
            cause: DeathCause::Stomped { by: PLAYER_ID }
        }));
        let stomps = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Stomped { .. }))
            .count();
        assert_eq!(stomps, 1);
    }

    #[test]
    fn test_falling_onto_enemy_without_drop_kills() {
        let mut sim = create_sim(SimulationConfig::default(), |level| {
            level.add_patrol(Vec2::new(0.0, 0.55));
        });
        sim.player.state = ActorState::new(Vec2::new(0.0, 3.0));

        let events = run(&mut sim, 60);

        assert!(!sim.player.is_alive());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Died { entity: PLAYER_ID, .. })));
    }

    #[test]
    fn test_walking_into_spike_kills() {
        let mut spike = 0;
        let mut sim = create_sim(SimulationConfig::default(), |level| {
            spike = level.add_spike(Vec2::new(3.0, 0.5), Vec2::splat(0.5));
        });

        let mut died = Vec::new();
        for _ in 0..120 {
            let events = sim.frame(&RawInput::from_keys(false, true), 1.0 / 60.0 + 1e-5);
            died.extend(events.into_iter().filter(|e| matches!(e, GameEvent::Died { .. })));
        }

        assert_eq!(
            died,
            vec![GameEvent::Died {
                entity: PLAYER_ID,
                cause: DeathCause::Hazard { source: spike }
            }]
        );
        // Never inside the spike.
        assert!(sim.player.position().x + 0.5 <= 2.5);
    }

    #[test]
    fn test_wall_stop() {
        let mut sim = create_sim(SimulationConfig::default(), |level| {
            level.add_solid(Vec2::new(1.05, 2.0), Vec2::new(0.5, 2.0));
        });
        let start = sim.player.position();

        sim.player.sample_input(&RawInput::from_keys(false, true));
        sim.tick();

        assert_eq!(sim.player_state().velocity.x, 0.0);
        assert!((sim.player.position().x - start.x).abs() < EPS);
        assert!(sim
            .player
            .probe()
            .is_touching_wall(sim.player.position(), WallSide::Right, &sim.level.world));
    }

    #[test]
    fn test_bouncer_overrides_velocity() {
        let config = SimulationConfig {
            bouncer: crate::props::BouncerConfig {
                height: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut bouncer = 0;
        let mut sim = create_sim(config, |level| {
            bouncer = level.add_bouncer(Vec2::new(0.0, 0.25), Vec2::new(0.75, 0.25));
        });
        drop_from(&mut sim, Vec2::new(0.0, 3.0));

        for _ in 0..30 {
            let events = sim.tick();
            if events.contains(&GameEvent::Stomped {
                stomper: PLAYER_ID,
                target: bouncer,
            }) {
                assert_eq!(sim.player_state().velocity.y, 100.0);
                assert!(events.contains(&GameEvent::Bounced {
                    entity: PLAYER_ID,
                    velocity: 100.0
                }));
                assert!(sim.player.is_alive());
                return;
            }
        }
        panic!("never bounced");
    }

    #[test]
    fn test_breaking_block_drops_player() {
        let mut block = 0;
        let mut sim = create_sim(SimulationConfig::default(), |level| {
            level.player_spawn = Vec2::new(-5.0, 0.55);
            block = level.add_block(Vec2::new(0.0, 0.5), Vec2::splat(0.5));
        });
        drop_from(&mut sim, Vec2::new(0.0, 4.0));

        let events = run(&mut sim, 60);

        assert!(events.contains(&GameEvent::BlockBroken { entity: block }));
        assert!(events.contains(&GameEvent::Despawned { entity: block }));
        // Fell through to the floor.
        assert!(sim.player_state().is_grounded());
        assert!(sim.player.position().y < 0.7);
    }

    #[test]
    fn test_pickup_scores() {
        let mut sim = create_sim(SimulationConfig::default(), |level| {
            level.add_pickup(Vec2::new(2.0, 0.55), 0.25);
        });

        let mut collected = 0;
        for _ in 0..60 {
            let events = sim.frame(&RawInput::from_keys(false, true), 1.0 / 60.0 + 1e-5);
            collected += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Collected { .. }))
                .count();
        }

        assert_eq!(collected, 1);
        assert_eq!(sim.player.score, 200);
    }

    #[test]
    fn test_grounded_goal_finishes_once() {
        let mut sim = create_sim(SimulationConfig::default(), |level| {
            level.add_pickup(Vec2::new(1.5, 0.55), 0.25);
            level.add_goal(Vec2::new(4.0, 1.0), Vec2::new(0.5, 1.0));
        });

        let mut finished = Vec::new();
        for _ in 0..90 {
            let events = sim.frame(&RawInput::from_keys(false, true), 1.0 / 60.0 + 1e-5);
            finished.extend(
                events
                    .into_iter()
                    .filter(|e| matches!(e, GameEvent::Finished { .. })),
            );
        }

        assert_eq!(finished.len(), 1);
        let GameEvent::Finished { by, elapsed, score } = finished[0] else {
            unreachable!()
        };
        assert_eq!(by, PLAYER_ID);
        assert_eq!(score, 200);
        assert!(elapsed > 0.3 && elapsed < 1.0, "elapsed={}", elapsed);
        assert_eq!(sim.finished, Some(elapsed));
        // Walked through the zone without being stopped.
        assert!(sim.player.position().x > 5.0);
    }

    #[test]
    fn test_airborne_goal_contact_does_not_finish() {
        let mut sim = create_sim(SimulationConfig::default(), |level| {
            // Floating zone, the player lands well below it.
            level.add_goal(Vec2::new(0.0, 4.0), Vec2::new(1.0, 1.0));
        });
        sim.player.state = ActorState::new(Vec2::new(0.0, 4.0));

        let events = run(&mut sim, 120);

        assert!(sim.player_state().is_grounded());
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::Finished { .. })));
        assert!(sim.finished.is_none());
    }

    #[test]
    fn test_determinism() {
        let inputs: Vec<_> = (0..240)
            .map(|i| RawInput {
                move_axis: if i % 90 < 60 { 1.0 } else { -1.0 },
                jump_triggered: i % 45 == 0,
                hover_held: i % 7 < 3,
                drop_held: i % 50 > 40,
            })
            .collect();

        let run_once = || {
            let mut sim = Simulation::demo(SimulationConfig::default()).unwrap();
            let mut events = Vec::new();
            for input in &inputs {
                events.extend(sim.frame(input, 1.0 / 60.0 + 1e-5));
            }
            (sim.player.position(), events)
        };

        let (pos1, events1) = run_once();
        let (pos2, events2) = run_once();

        assert_eq!(pos1, pos2);
        assert_eq!(events1, events2);
    }
}
