//! Fixed-Step Simulation Loop
//!
//! Host frames arrive with arbitrary durations. The scheduler banks them in a
//! fixed-point accumulator measured in steps (`FIXED_ONE` = one 1/60 s step)
//! and runs whole fixed steps. A step is 100% deterministic: integer
//! arithmetic only, vectors walked in load order.
//!
//! Host seconds are summed as given and the running total is rounded to step
//! units, so the conversion error never builds up across calls: a thousand
//! 1 ms frames drain exactly like one 1 s frame.
//!
//! Per step: input → monsters (integrate, tiles, patrol, encounter) →
//! player (integrate, tiles) → treasures.

use tracing::debug;
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::fixed::{Fixed, FIXED_ONE, TICK_DURATION};
use crate::game::collision::{resolve_tiles, Resolution};
use crate::game::events::GameEvent;
use crate::game::grid::TileGrid;
use crate::game::input::{InputFrame, InputRecording};
use crate::game::level::{LevelConfig, LoadError, Viewport};
use crate::game::physics::integrate;
use crate::game::rules::{collect_treasures, patrol_direction, resolve_encounter};
use crate::game::state::{Body, EntityKind, World};
use crate::game::tuning::FPS;

/// One fixed step in accumulator units.
pub const STEP: Fixed = FIXED_ONE;

/// Accumulator units per host second.
pub const UNITS_PER_SECOND: f64 = (STEP * FPS as Fixed) as f64;

/// Simulated seconds integrated per step (Q48.16, 1/60 s).
pub const DT: Fixed = TICK_DURATION;

/// Result of advancing one body.
#[derive(Clone, Copy, Debug, Default)]
struct Advance {
    jumped: bool,
    resolution: Resolution,
}

/// Integrate, resolve against tiles and apply kind-specific post-resolution
/// behaviour.
fn advance_body(
    body: &mut Body,
    kind: EntityKind,
    wants_jump: bool,
    grid: &TileGrid,
    dt: Fixed,
) -> Advance {
    let jumped = integrate(body, wants_jump, dt);
    let resolution = resolve_tiles(body, grid);

    match kind {
        EntityKind::Monster => body.dir = patrol_direction(body.dir, &resolution.cells),
        EntityKind::Player | EntityKind::Treasure => {}
    }

    #[cfg(feature = "debug-tracing")]
    trace!(
        ?kind,
        x = body.position.x,
        y = body.position.y,
        dx = body.velocity.x,
        dy = body.velocity.y,
        falling = body.falling,
        "body advanced"
    );

    Advance { jumped, resolution }
}

impl World {
    /// Advance by a host frame duration in seconds.
    ///
    /// Returns the number of fixed steps run. Negative or non-finite
    /// durations are ignored. Events from this call replace the previous
    /// call's events.
    pub fn step(&mut self, delta_seconds: f64, input: InputFrame) -> u32 {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            self.events.clear();
            return 0;
        }

        self.host_seconds += delta_seconds;
        let total = (self.host_seconds * UNITS_PER_SECOND).round() as Fixed;
        let delta = total.saturating_sub(self.host_units).max(0);
        self.host_units = total;
        self.step_fixed(delta, input)
    }

    /// Advance by a frame duration already in accumulator units
    /// (`STEP` per fixed step).
    pub fn step_fixed(&mut self, delta: Fixed, input: InputFrame) -> u32 {
        self.events.clear();
        if delta < 0 {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(delta);
        let mut steps = 0;
        while self.accumulator > STEP {
            self.accumulator -= STEP;
            self.run_fixed_step(input);
            steps += 1;
        }
        steps
    }

    /// Run exactly one fixed step, appending its events.
    pub fn run_fixed_step(&mut self, input: InputFrame) {
        self.step_count += 1;
        let step = self.step_count;

        let World { grid, monsters, treasures, player, events, .. } = self;

        player.jump = input.jump_held();
        player.body.dir = input.direction();

        // Every live monster is checked, even after the player was sent home.
        for monster in monsters.iter_mut().filter(|m| !m.dead) {
            advance_body(&mut monster.body, EntityKind::Monster, false, grid, DT);
            if let Some(event) = resolve_encounter(player, monster, step) {
                events.push(event);
            }
        }

        let was_falling = player.body.falling;
        let wants_jump = player.jump && !player.jumping;
        let advance = advance_body(&mut player.body, EntityKind::Player, wants_jump, grid, DT);

        if advance.jumped {
            player.jumping = true;
            debug!(step, "player jumped");
            events.push(GameEvent::player_jumped(step));
        }
        if advance.resolution.landed {
            player.jumping = false;
            if was_falling {
                debug!(step, "player landed");
                events.push(GameEvent::player_landed(step));
            }
        }

        collect_treasures(player, treasures, step, events);
    }
}

/// Replay recorded input on a freshly loaded level.
///
/// Runs exactly `steps` fixed steps, feeding the recorded frame for each step
/// index (idle past the end of the recording). The returned world holds every
/// event of the replay.
pub fn replay(
    level: &LevelConfig,
    viewport: Viewport,
    inputs: &InputRecording,
    steps: u64,
) -> Result<World, LoadError> {
    let mut world = World::load(level, viewport)?;

    for step in 0..steps {
        let frame = if step < inputs.step_count() {
            inputs.input_at(step)
        } else {
            InputFrame::new()
        };
        world.run_fixed_step(frame);
    }

    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::from_int;
    use crate::core::vec2::FixedVec2;
    use crate::game::events::GameEventData;
    use crate::game::level::{EntityConfig, EntityProperties, GridSize, TileSize};
    use crate::game::state::{Direction, EntityId};

    const FRAME: f64 = 1.0 / 60.0;
    const IDLE: InputFrame = InputFrame::new();
    const RIGHT: InputFrame = InputFrame::held(false, false, true);
    const LEFT: InputFrame = InputFrame::held(false, true, false);
    const JUMP: InputFrame = InputFrame::held(true, false, false);

    fn entity(kind: &str, column: u32, row: u32) -> EntityConfig {
        EntityConfig {
            kind: kind.to_string(),
            x: column as f64 * 32.0,
            y: row as f64 * 32.0,
            width: 32.0,
            height: 32.0,
            properties: EntityProperties::default(),
        }
    }

    /// 8x6 level of 32-unit tiles; `floor` picks the solid columns of row 5.
    fn level(floor: impl Fn(usize) -> bool, entities: Vec<EntityConfig>) -> LevelConfig {
        let (width, height) = (8, 6);
        let mut tiles = vec![0u8; width * height];
        for column in 0..width {
            if floor(column) {
                tiles[column + 5 * width] = 2;
            }
        }
        LevelConfig {
            grid: GridSize { width, height },
            tile: TileSize { width: 32.0, height: 32.0 },
            tiles,
            entities,
        }
    }

    fn load(level: &LevelConfig) -> World {
        World::load(level, Viewport::new(256.0, 192.0)).unwrap()
    }

    fn resting_player() -> World {
        load(&level(|_| true, vec![entity("player", 1, 4)]))
    }

    /// Step one fixed step at a time, collecting all events.
    fn run(world: &mut World, input: InputFrame, steps: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..steps {
            world.run_fixed_step(input);
            events.extend(world.events.drain(..));
        }
        events
    }

    #[test]
    fn test_step_constants() {
        assert_eq!(STEP, FIXED_ONE);
        assert_eq!(UNITS_PER_SECOND, 3_932_160.0);
        assert_eq!(DT, 1092);
    }

    #[test]
    fn test_two_and_a_half_steps_runs_two() {
        let mut world = resting_player();
        let steps = world.step(2.5 * FRAME, IDLE);
        assert_eq!(steps, 2);
        assert_eq!(world.step_count, 2);
        assert_eq!(world.accumulator, STEP / 2);
    }

    #[test]
    fn test_exact_step_waits_for_more_time() {
        let mut world = resting_player();
        assert_eq!(world.step_fixed(STEP, IDLE), 0);
        assert_eq!(world.accumulator, STEP);
        assert_eq!(world.step_fixed(1, IDLE), 1);
        assert_eq!(world.accumulator, 1);
    }

    #[test]
    fn test_small_deltas_match_one_large() {
        let mut a = resting_player();
        let mut b = resting_player();

        let mut total = 0;
        for _ in 0..4 {
            total += a.step(1.0 / 64.0, RIGHT);
        }
        let single = b.step(1.0 / 16.0, RIGHT);

        assert_eq!(total, single);
        assert_eq!(a.accumulator, b.accumulator);
        assert_eq!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_millisecond_frames_match_one_second() {
        let mut split = resting_player();
        let mut single = resting_player();

        let split_steps: u32 = (0..1000).map(|_| split.step(0.001, RIGHT)).sum();
        let single_steps = single.step(1.0, RIGHT);

        // 60 steps of time; the strict test leaves the last one banked.
        assert_eq!(single_steps, 59);
        assert_eq!(split_steps, single_steps);
        assert_eq!(split.accumulator, STEP);
        assert_eq!(split.accumulator, single.accumulator);
        assert_eq!(split.compute_hash(), single.compute_hash());
    }

    #[test]
    fn test_144hz_minute_matches_one_frame() {
        let mut split = resting_player();
        let mut single = resting_player();

        let split_steps: u32 = (0..144 * 60).map(|_| split.step(1.0 / 144.0, IDLE)).sum();
        let single_steps = single.step(60.0, IDLE);

        assert_eq!(single_steps, 3599);
        assert_eq!(split_steps, single_steps);
        assert_eq!(split.accumulator, single.accumulator);
        assert_eq!(split.step_count, single.step_count);
    }

    #[test]
    fn test_uneven_frames_do_not_drift() {
        let mut world = resting_player();
        let frames = [0.007, 0.0131, 0.0219, 0.0043];
        let mut seconds = 0.0;
        let mut steps = 0u64;
        for i in 0..4000 {
            let dt = frames[i % frames.len()];
            seconds += dt;
            steps += u64::from(world.step(dt, IDLE));
        }
        let expected = (seconds * 60.0).floor() as u64;
        assert!(steps == expected || steps + 1 == expected, "{steps} steps for {seconds}s");
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut world = resting_player();
        world.step(0.5 * FRAME, IDLE);
        let before = world.accumulator;

        assert_eq!(world.step(-1.0, IDLE), 0);
        assert_eq!(world.step(f64::NAN, IDLE), 0);
        assert_eq!(world.step(f64::INFINITY, IDLE), 0);
        assert_eq!(world.step_fixed(-5, IDLE), 0);
        assert_eq!(world.accumulator, before);
        assert_eq!(world.step_count, 0);
    }

    #[test]
    fn test_input_sets_player_intent() {
        let mut world = resting_player();
        world.run_fixed_step(InputFrame::held(true, true, true));
        assert!(world.player.jump);
        assert_eq!(world.player.body.dir, Direction::Left);

        world.run_fixed_step(IDLE);
        assert!(!world.player.jump);
        assert_eq!(world.player.body.dir, Direction::None);
    }

    #[test]
    fn test_player_rests_on_floor() {
        let mut world = resting_player();
        let events = run(&mut world, IDLE, 120);

        assert_eq!(world.player.body.position, FixedVec2::from_ints(48, 144));
        assert_eq!(world.player.body.velocity, FixedVec2::ZERO);
        assert!(!world.player.body.falling);
        assert!(events.is_empty());
    }

    #[test]
    fn test_fall_lands_once_without_passing_floor() {
        let mut world = load(&level(|_| true, vec![entity("player", 1, 0)]));
        let events = run(&mut world, IDLE, 180);

        assert_eq!(world.player.body.position.y, from_int(144));
        assert!(!world.player.body.falling);
        let landings = events.iter().filter(|e| e.data == GameEventData::PlayerLanded).count();
        assert_eq!(landings, 1);
    }

    #[test]
    fn test_jump_then_land() {
        let mut world = resting_player();
        let events = run(&mut world, JUMP, 1);
        assert_eq!(events, vec![GameEvent::player_jumped(1)]);
        assert!(world.player.jumping);
        assert!(world.player.body.velocity.y < 0);

        // Still holding jump mid-air does not re-trigger.
        let events = run(&mut world, JUMP, 5);
        assert!(events.is_empty());

        let events = run(&mut world, IDLE, 240);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, GameEventData::PlayerLanded);
        assert!(!world.player.jumping);
        assert_eq!(world.player.body.position.y, from_int(144));
    }

    #[test]
    fn test_long_frame_keeps_every_event() {
        let mut stepped = resting_player();
        let mut framed = stepped.clone();

        let steps = framed.step(4.0, JUMP);
        assert_eq!(steps, 239);

        let expected = run(&mut stepped, JUMP, steps as usize);
        assert_eq!(framed.events, expected);
        assert!(expected.contains(&GameEvent::player_jumped(1)));
        assert!(expected.iter().any(|e| e.data == GameEventData::PlayerLanded));
    }

    #[test]
    fn test_monster_turns_at_ledge_in_same_step() {
        let mut walker = entity("monster", 1, 4);
        walker.properties.dir = Some(Direction::Left);
        let mut world = load(&level(|c| c != 0, vec![entity("player", 6, 4), walker]));

        world.run_fixed_step(IDLE);
        assert_eq!(world.monsters[0].body.dir, Direction::Left);

        // Second step carries it past column 1's aligned x, over the gap.
        world.run_fixed_step(IDLE);
        let monster = &world.monsters[0].body;
        assert!(monster.position.x < from_int(48));
        assert_eq!(monster.dir, Direction::Right);
        assert!(!monster.falling);
    }

    #[test]
    fn test_monster_turns_at_wall() {
        let mut walker = entity("monster", 3, 4);
        walker.properties.dir = Some(Direction::Right);
        let mut config = level(|_| true, vec![entity("player", 0, 4), walker]);
        config.tiles[5 + 4 * 8] = 1;
        let mut world = load(&config);

        let mut turned = false;
        for _ in 0..120 {
            world.run_fixed_step(IDLE);
            let body = &world.monsters[0].body;
            assert!(body.position.x <= from_int(144));
            if body.dir == Direction::Left {
                turned = true;
                break;
            }
        }
        assert!(turned);
    }

    #[test]
    fn test_stomp_from_above() {
        let mut world = load(&level(
            |_| true,
            vec![entity("player", 3, 0), entity("monster", 3, 4)],
        ));
        let events = run(&mut world, IDLE, 120);

        assert_eq!(
            events.iter().filter(|e| matches!(e.data, GameEventData::MonsterStomped { .. })).count(),
            1
        );
        assert!(world.monsters[0].dead);
        assert_eq!(world.player.killed, 1);
        assert_eq!(world.live_monster_count(), 0);
        // The dead monster no longer blocks or punishes.
        assert_eq!(world.player.body.position.y, from_int(144));
    }

    #[test]
    fn test_walking_into_monster_punishes() {
        let mut world = load(&level(
            |_| true,
            vec![entity("player", 0, 4), entity("monster", 3, 4)],
        ));
        let origin = world.player.origin;

        for _ in 0..240 {
            world.run_fixed_step(RIGHT);
            let punished = world
                .events
                .iter()
                .any(|e| e.data == GameEventData::PlayerPunished { monster: EntityId::monster(0) });
            if punished {
                assert_eq!(world.player.body.position, origin);
                assert!(!world.monsters[0].dead);
                assert_eq!(world.player.killed, 0);
                return;
            }
            world.events.clear();
        }
        panic!("player never reached the monster");
    }

    #[test]
    fn test_treasure_collected_once() {
        let mut world = load(&level(
            |_| true,
            vec![entity("player", 0, 4), entity("treasure", 3, 4)],
        ));
        let events = run(&mut world, RIGHT, 240);

        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].data,
            GameEventData::TreasureCollected { treasure: EntityId::treasure(0) }
        );
        assert_eq!(world.player.collected, 1);
        assert_eq!(world.remaining_treasure_count(), 0);
    }

    #[test]
    fn test_edges_of_grid_are_safe() {
        let mut world = resting_player();
        run(&mut world, LEFT, 300);
        assert!(world.player.body.position.x < 0);
        assert!(world.player.body.falling);

        let mut world = load(&level(|_| true, vec![entity("player", 7, 4)]));
        run(&mut world, RIGHT, 300);
        assert!(world.player.body.position.x > from_int(256));
        assert!(world.player.body.falling);
    }

    #[test]
    fn test_step_determinism() {
        let config = level(
            |c| c != 4,
            vec![
                entity("player", 0, 2),
                entity("monster", 2, 4),
                entity("monster", 6, 4),
                entity("treasure", 5, 3),
            ],
        );
        let mut a = load(&config);
        let mut b = load(&config);

        for i in 0..300u32 {
            let input = InputFrame::held(i % 50 < 5, i % 90 > 60, i % 90 < 40);
            let dt = FRAME * (1.0 + (i % 3) as f64 * 0.25);
            assert_eq!(a.step(dt, input), b.step(dt, input));
            assert_eq!(a.events, b.events);
            assert_eq!(a.compute_hash(), b.compute_hash());
        }
    }

    #[test]
    fn test_replay_matches_live_run() {
        let config = level(
            |_| true,
            vec![entity("player", 0, 4), entity("monster", 5, 4), entity("treasure", 2, 3)],
        );
        let mut live = load(&config);
        let mut recording = InputRecording::new();

        for i in 0..200u32 {
            let input = InputFrame::held(i % 40 == 0, false, i < 150);
            let ran = live.step(FRAME * 1.5, input);
            recording.record_for(input, ran as u64);
        }

        let replayed = replay(&config, Viewport::new(256.0, 192.0), &recording, recording.step_count())
            .unwrap();
        assert_eq!(replayed.step_count, live.step_count);
        assert_eq!(replayed.compute_hash(), live.compute_hash());
    }

    #[test]
    fn test_replay_past_recording_is_idle() {
        let config = level(|_| true, vec![entity("player", 1, 4)]);
        let mut recording = InputRecording::new();
        recording.record_for(RIGHT, 10);

        let world = replay(&config, Viewport::new(256.0, 192.0), &recording, 60).unwrap();
        assert_eq!(world.step_count, 60);
        assert_eq!(world.player.body.velocity.x, 0);
    }
}
