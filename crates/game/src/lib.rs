//! Plunge Game Logic
//!
//! This crate contains the platformer simulation built on `plunge_physics`:
//!
//! - Player assembly, input latching and presentation state
//! - Enemies (patrols, daggers and their spawners) and props
//! - Stomp and hazard contact resolution
//! - Difficulty tiers, TOML configuration and the fixed-step loop
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        Simulation::tick                        │
//! │  ┌───────────┐   ┌──────────────┐   ┌───────────────────────┐  │
//! │  │ Level     │──►│ Player       │──►│ ContactResolver       │  │
//! │  │ (enemies, │   │ (controller, │   │ (stomp rays, hazards, │  │
//! │  │  props)   │   │  probe)      │   │  pickups)             │  │
//! │  └───────────┘   └──────────────┘   └───────────┬───────────┘  │
//! │        ▲                                        │              │
//! │        └───────────── EventQueue ◄──────────────┘              │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod animation;
pub mod config;
pub mod contact;
pub mod difficulty;
pub mod events;
pub mod input;
pub mod interactable;
pub mod level;
pub mod npc;
pub mod player;
pub mod props;
pub mod simulation;
pub mod timer;

// Re-export main types
pub use animation::AnimationState;
pub use config::{ConfigError, SimulationConfig};
pub use contact::{ContactReport, ContactResolver, StompConfig, StompHit};
pub use difficulty::{AllowedTiers, Difficulty, DifficultyConfigurable, Tiered};
pub use events::{DeathCause, EntityId, EventQueue, GameEvent};
pub use input::{InputSampler, RawInput};
pub use interactable::{EntityKind, Interactable, InteractableRegistry, Stompable};
pub use level::Level;
pub use player::Player;
pub use simulation::{FixedStep, Simulation, PLAYER_ID};
pub use timer::Countdown;

// Re-export physics types for convenience
pub use plunge_physics::{
    ActorState, BodyShape, CollisionLayers, CollisionProbe, CollisionWorld, MotionIntent,
    MotionMode, MovementConfig, ProbeConfig,
};
