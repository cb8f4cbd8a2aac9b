//! # Fall Headless Runner
//!
//! Populates a world and plays a scripted walk through it without a
//! window. Draws go into a [`DrawList`] that is cleared every frame.
//!
//! ```bash
//! # Production defaults
//! RUST_LOG=info fall_headless
//!
//! # Tunables from a file, with streaming logs
//! RUST_LOG=fall=debug fall_headless world.toml
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use fall::{spawn, FallResult, GameContext, ModelLibrary, World, WorldConfig};
use fall_core::DrawList;
use tracing::{error, info};

/// Simulated frames, ten seconds at 60 Hz.
const FRAMES: u64 = 600;
const FRAME_TIME: Duration = Duration::from_micros(16_667);

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn load_config() -> FallResult<WorldConfig> {
    match std::env::args().nth(1) {
        Some(path) => WorldConfig::load(path),
        None => Ok(WorldConfig::production()),
    }
}

fn run() -> FallResult<()> {
    let config = load_config()?;
    info!(seed = config.seed, tick_rate_hz = config.tick_rate_hz, "Starting headless world");

    let mut world = World::with_noise_terrain(config, Arc::new(ModelLibrary::placeholder()))?;
    let player = spawn::populate(&mut world);
    let mut game = GameContext::new(world, player);
    let mut draws = DrawList::new();

    game.input.cursor_grabbed = true;
    for frame in 0..FRAMES {
        // Walk forward while slowly turning, punching whatever is ahead.
        game.input.forward = frame % 240 < 180;
        game.input.move_mouse(2.0, 0.0);
        match frame % 20 {
            0 => game.input.primary = true,
            10 => game.input.pickup = true,
            _ => {}
        }

        draws.clear();
        let stats = game.frame(FRAME_TIME, &mut draws);
        if frame % 60 == 0 {
            info!(
                frame,
                activated = stats.activated,
                entities = stats.entities_rendered,
                chunks = stats.chunks_rendered,
                triangles = draws.triangles(),
                hit = ?game.hit().kind(),
                "Frame"
            );
        }
    }

    game.stats().log_summary();
    info!(
        live = game.world().entities().len(),
        chunks = game.world().chunk_count(),
        pool_capacity = game.world().pool().capacity(),
        "Headless run finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "Headless run failed");
            ExitCode::FAILURE
        }
    }
}
