//! Enemies.

mod dagger;
mod patrol;

pub use dagger::{Dagger, DaggerConfig, DaggerPhase, DaggerSpawner, SpawnerConfig};
pub use patrol::{PatrolConfig, PatrolEnemy};
