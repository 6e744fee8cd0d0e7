//! Actor motion controller.
//!
//! This is the main entry point for actor movement. It takes a motion intent
//! and updates the actor state through the collision probe.

use glam::Vec2;

use crate::collision::SpatialQuery;
use crate::probe::{CollisionProbe, SweepOutcome, WallSide};

use super::config::MovementConfig;
use super::state::{ActorState, AirborneMode, MotionIntent, MotionMode};

/// What happened during one controller tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub previous_mode: MotionMode,
    pub mode: MotionMode,
    /// A jump impulse was applied.
    pub jumped: bool,
    /// Airborne to Grounded this tick.
    pub landed: bool,
    /// Grounded to Airborne this tick, by jumping or walking off a ledge.
    pub left_ground: bool,
    /// Horizontal velocity was cancelled by a wall in the travel direction.
    pub wall_blocked: bool,
    /// Vertical velocity was zeroed by a ceiling contact.
    pub ceiling_hit: bool,
    /// Sub-mode whose gravity was integrated, `None` if the tick started
    /// on the ground.
    pub regime: Option<AirborneMode>,
    pub sweep: SweepOutcome,
}

impl TickReport {
    #[inline]
    pub fn mode_changed(&self) -> bool {
        self.previous_mode != self.mode
    }

    /// Check if the drop regime drove this tick, even if it ended on ground.
    #[inline]
    pub fn was_dropping(&self) -> bool {
        self.regime == Some(AirborneMode::Dropping)
    }
}

/// Actor motion controller.
///
/// Handles:
/// - Horizontal movement with wall stops
/// - Jumping with a consumed flag reset on landing
/// - Normal, hover and drop gravity regimes with terminal fall speeds
/// - Ceiling stops
///
/// # Example
///
/// ```ignore
/// let controller = MotionController::new(MovementConfig::default(), probe);
/// let mut state = ActorState::new(spawn_position);
///
/// // Each fixed step:
/// let report = controller.tick(&mut state, &intent, &world, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct MotionController {
    /// Movement configuration.
    pub config: MovementConfig,
    /// Probe used for every contact check and sweep.
    pub probe: CollisionProbe,
}

impl MotionController {
    pub fn new(config: MovementConfig, probe: CollisionProbe) -> Self {
        Self { config, probe }
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(MovementConfig::default(), CollisionProbe::default())
    }

    /// Settle a freshly spawned actor onto the ground below it.
    ///
    /// Sweeps down at most `max_drop` and sets the mode from the ground
    /// check at the resolved position.
    pub fn spawn_at<W: SpatialQuery + ?Sized>(
        &self,
        state: &mut ActorState,
        spawn_position: Vec2,
        max_drop: f32,
        world: &W,
    ) {
        *state = ActorState::new(spawn_position);

        let sweep = self.probe.sweep(spawn_position, Vec2::new(0.0, -max_drop), world);
        if sweep.was_blocked() {
            state.position = sweep.position;
        }

        if self.probe.is_grounded(state.position, world) {
            state.mode = MotionMode::Grounded;
        }
    }

    /// Advance the actor by one fixed step.
    ///
    /// # Arguments
    ///
    /// * `state` - The actor's motion state (will be modified)
    /// * `intent` - What the actor wants to do this tick
    /// * `world` - The collision world
    /// * `delta_time` - Time step in seconds, clamped to `max_delta_time`
    pub fn tick<W: SpatialQuery + ?Sized>(
        &self,
        state: &mut ActorState,
        intent: &MotionIntent,
        world: &W,
        delta_time: f32,
    ) -> TickReport {
        let delta_time = delta_time.clamp(0.0, self.config.max_delta_time);
        let previous_mode = state.mode;

        // Contact state before moving
        let grounded = self.probe.is_grounded(state.position, world);
        let direction = intent.direction();
        let wall_blocked = WallSide::from_direction(direction)
            .is_some_and(|side| self.probe.is_touching_wall(state.position, side, world));

        // Horizontal
        state.velocity.x = if wall_blocked {
            0.0
        } else {
            direction * self.config.move_speed
        };

        // Vertical
        let mut jumped = false;
        let mut ceiling_hit = false;
        let mut regime = None;

        if grounded {
            Self::enter_mode(state, MotionMode::Grounded);

            if intent.jump && !state.jump_consumed {
                state.velocity.y = self.config.jump_force;
                state.jump_consumed = true;
                state.mode = MotionMode::Airborne(AirborneMode::Normal);
                jumped = true;
                log::debug!("jump at {:?}", state.position);
            } else {
                state.velocity.y = 0.0;
            }
        } else {
            let sub_mode = intent.airborne_mode(state.velocity.y);

            if self.probe.is_touching_ceiling(state.position, world) {
                state.velocity.y = 0.0;
                ceiling_hit = true;
            }

            state.velocity.y = self
                .config
                .regime(sub_mode)
                .integrate(state.velocity.y, delta_time);
            state.mode = MotionMode::Airborne(sub_mode);
            regime = Some(sub_mode);
        }

        // Resolve the displacement and commit
        let sweep = self
            .probe
            .sweep(state.position, state.velocity * delta_time, world);
        state.position = sweep.position;
        state.update_facing();

        // Mode from the post-move ground check
        if self.probe.is_grounded(state.position, world) {
            let landed = Self::enter_mode(state, MotionMode::Grounded);
            if landed && !jumped {
                state.velocity.y = 0.0;
            }
        } else if state.mode.is_grounded() {
            Self::enter_mode(
                state,
                MotionMode::Airborne(intent.airborne_mode(state.velocity.y)),
            );
        }

        let report = TickReport {
            previous_mode,
            mode: state.mode,
            jumped,
            landed: previous_mode.is_airborne() && state.mode.is_grounded(),
            left_ground: previous_mode.is_grounded() && state.mode.is_airborne(),
            wall_blocked,
            ceiling_hit,
            regime,
            sweep,
        };

        if report.landed {
            log::debug!("landed at {:?}", state.position);
        } else if report.mode_changed() {
            log::debug!("mode {:?} -> {:?}", previous_mode, state.mode);
        }

        report
    }

    /// Switch mode, clearing the jump flag on Airborne to Grounded.
    ///
    /// Returns `true` if this was a landing.
    fn enter_mode(state: &mut ActorState, mode: MotionMode) -> bool {
        let landed = state.mode.is_airborne() && mode.is_grounded();
        if landed {
            state.jump_consumed = false;
        }
        state.mode = mode;
        landed
    }
}
