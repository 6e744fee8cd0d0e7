//! Plunge - Headless Runner
//!
//! Runs the demo level with a scripted input sequence and logs every game
//! event. Usage:
//!
//! ```text
//! plunge [CONFIG.toml] [FRAMES]
//! ```
//!
//! Set `RUST_LOG=debug` to also see landings, jumps and mode changes.

use anyhow::{Context, Result};
use plunge_game::{GameEvent, RawInput, Simulation, SimulationConfig};

/// Frames to run when no count is given.
const DEFAULT_FRAMES: u32 = 900;

/// Rendered frame length. Slightly off the fixed step so the accumulator
/// occasionally runs two steps in one frame.
const FRAME_TIME: f32 = 1.0 / 59.0;

/// Input for a given frame of the demo run.
///
/// Walks right the whole time, jumps over the spike, drops onto the block
/// and the patrol, and hovers after the second jump.
fn scripted_input(frame: u32) -> RawInput {
    let mut input = RawInput::from_keys(false, true);
    input.jump_triggered = matches!(frame, 50 | 170 | 300 | 420);
    input.hover_held = (180..230).contains(&frame);
    input.drop_held = (70..110).contains(&frame) || (310..360).contains(&frame);
    input
}

fn load_config(path: Option<&str>) -> Result<SimulationConfig> {
    match path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path)),
        None => {
            log::info!("no configuration given, using defaults");
            Ok(SimulationConfig::default())
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = load_config(args.next().as_deref())?;
    let frames = match args.next() {
        Some(count) => count
            .parse::<u32>()
            .with_context(|| format!("invalid frame count '{}'", count))?,
        None => DEFAULT_FRAMES,
    };

    let mut sim = Simulation::demo(config).context("failed to build the demo level")?;
    log::info!(
        "running '{}' on {:?} for {} frames",
        sim.level.name,
        sim.level.difficulty,
        frames
    );

    for frame in 0..frames {
        for event in sim.frame(&scripted_input(frame), FRAME_TIME) {
            match event {
                GameEvent::ModeChanged { .. }
                | GameEvent::Landed { .. }
                | GameEvent::Jumped { .. } => log::debug!("[{}] {:?}", sim.frame, event),
                _ => log::info!("[{}] {:?}", sim.frame, event),
            }
        }

        if !sim.player.is_alive() {
            log::info!("player died on frame {}, respawning", frame);
            sim.respawn_player();
        }
    }

    match sim.finished {
        Some(elapsed) => println!("finished after {:.2}s", elapsed),
        None => println!("goal not reached"),
    }

    let player = &sim.player;
    println!(
        "{} ticks: score {}, deaths {}, final position ({:.2}, {:.2}), {} entities left",
        sim.frame,
        player.score,
        player.deaths,
        player.position().x,
        player.position().y,
        sim.level.entity_count()
    );

    Ok(())
}
