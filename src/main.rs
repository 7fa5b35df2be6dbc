//! Tile Platformer Demo
//!
//! Loads a level, drives it with a scripted input sequence at an uneven host
//! frame rate, then replays the recorded input and checks that the replay
//! lands on the same state hash.
//!
//! Usage: `tile-platformer [LEVEL.json] [STEPS]`

use anyhow::{ensure, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tile_platformer::{
    TICK_RATE, VERSION,
    game::{
        events::GameEventData,
        input::{InputFrame, InputRecording},
        level::{LevelConfig, Viewport},
        state::World,
        tick::replay,
    },
};

/// Level used when no path is given.
const DEMO_LEVEL: &str = include_str!("../levels/demo.json");

/// Host drawing area for the demo.
const VIEWPORT: Viewport = Viewport::new(1024.0, 768.0);

/// Default number of fixed steps to simulate (10 seconds).
const DEFAULT_STEPS: u64 = 600;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Tile Platformer v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(path) => LevelConfig::from_path(&path)
            .with_context(|| format!("failed to load level {path}"))?,
        None => LevelConfig::from_json_str(DEMO_LEVEL).context("embedded demo level is invalid")?,
    };
    let steps = match args.next() {
        Some(arg) => arg.parse::<u64>().with_context(|| format!("invalid step count {arg:?}"))?,
        None => DEFAULT_STEPS,
    };

    demo_run(&level, steps)
}

/// Scripted input: run right, hop every second, turn back near the end.
fn scripted_input(step: u64) -> InputFrame {
    let jump = step % 60 < 4;
    let left = step > 450 && step % 200 < 60;
    let right = !left && step % 120 < 100;
    InputFrame::held(jump, left, right)
}

/// Uneven host frame lengths: 1, 1.5 and 0.75 steps.
fn frame_seconds(frame: u64) -> f64 {
    let step = 1.0 / TICK_RATE as f64;
    match frame % 3 {
        0 => step,
        1 => step * 1.5,
        _ => step * 0.75,
    }
}

fn demo_run(level: &LevelConfig, steps: u64) -> Result<()> {
    info!("=== Starting Demo Run ===");

    let mut world = World::load(level, VIEWPORT)?;
    let mut recording = InputRecording::new();
    let mut frame = 0u64;
    let mut total_events = 0;
    let mut last_report = 0;

    info!("Running {} steps...", steps);

    while world.step_count < steps {
        let input = scripted_input(world.step_count);
        let ran = world.step(frame_seconds(frame), input);
        recording.record_for(input, u64::from(ran));
        frame += 1;
        total_events += world.events().len();

        for event in world.events() {
            match event.data {
                GameEventData::MonsterStomped { monster } => {
                    info!("Step {}: {} stomped", event.step, monster);
                }
                GameEventData::PlayerPunished { monster } => {
                    info!("Step {}: caught by {}, back to start", event.step, monster);
                }
                GameEventData::TreasureCollected { treasure } => {
                    info!("Step {}: {} collected", event.step, treasure);
                }
                GameEventData::PlayerJumped | GameEventData::PlayerLanded => {}
            }
        }

        if world.step_count - last_report >= 120 {
            let (x, y) = world.player.body.position.to_floats();
            info!(
                "Step {}: player at ({:.1}, {:.1}), {} monsters left, {} treasures left, {} events so far",
                world.step_count,
                x,
                y,
                world.live_monster_count(),
                world.remaining_treasure_count(),
                total_events
            );
            last_report = world.step_count;
        }
    }

    info!("=== Run Results ===");
    info!("Host frames: {}", frame);
    info!("Fixed steps: {}", world.step_count);
    info!("Collected: {}", world.player.collected);
    info!("Killed: {}", world.player.killed);

    let hash = world.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Input Hash: {}", hex::encode(recording.compute_hash()));
    info!("Input deltas: {} for {} steps", recording.deltas().len(), recording.step_count());

    // Verify determinism via replay
    info!("=== Verifying Determinism ===");
    let replayed = replay(level, VIEWPORT, &recording, recording.step_count())?;
    let replay_hash = replayed.compute_hash();
    info!("Replay Hash: {}", hex::encode(replay_hash));

    ensure!(hash == replay_hash, "replay diverged from the live run");
    info!("✓ Determinism verified!");

    let snapshot = world.snapshot();
    info!("Final snapshot: {} entities, {} active", snapshot.entities.len(), snapshot.active().count());

    Ok(())
}
