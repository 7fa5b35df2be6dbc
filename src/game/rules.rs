//! Gameplay Rules
//!
//! Player-vs-monster combat, treasure pickup and monster patrol turning.
//! Dead monsters and collected treasures are skipped by the callers and by
//! these helpers; nothing is ever removed from storage.

use tracing::debug;

use crate::game::collision::{overlaps, Neighborhood};
use crate::game::events::GameEvent;
use crate::game::state::{Body, Direction, Monster, Player, Treasure};

/// Outcome of a player touching a live monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encounter {
    /// Player came down on the monster from above: monster dies
    Stomp,
    /// Any other contact: player returns to spawn
    Punish,
}

/// Whether a descending player is high enough above the monster to kill it.
///
/// The player must be moving down and the monster's center must be more than
/// half the monster's height below the player's center.
#[inline]
pub fn is_stomp(player: &Body, monster: &Body) -> bool {
    player.velocity.y > 0 && monster.position.y - player.position.y > monster.size.y / 2
}

/// Classify contact between the player and a monster, if any.
pub fn encounter(player: &Player, monster: &Monster) -> Option<Encounter> {
    if monster.dead || !overlaps(&player.body, &monster.body) {
        return None;
    }
    if is_stomp(&player.body, &monster.body) {
        Some(Encounter::Stomp)
    } else {
        Some(Encounter::Punish)
    }
}

/// Apply player-vs-monster rules for one monster.
///
/// Returns the event describing the outcome, if the two touched.
pub fn resolve_encounter(player: &mut Player, monster: &mut Monster, step: u64) -> Option<GameEvent> {
    match encounter(player, monster)? {
        Encounter::Stomp => {
            monster.dead = true;
            player.killed += 1;
            debug!(step, monster = %monster.id, killed = player.killed, "monster stomped");
            Some(GameEvent::monster_stomped(step, monster.id))
        }
        Encounter::Punish => {
            player.reset_to_origin();
            debug!(step, monster = %monster.id, "player caught, back to origin");
            Some(GameEvent::player_punished(step, monster.id))
        }
    }
}

/// Collect every uncollected treasure the player overlaps.
///
/// Pushes one event per pickup into `events`.
pub fn collect_treasures(
    player: &mut Player,
    treasures: &mut [Treasure],
    step: u64,
    events: &mut Vec<GameEvent>,
) {
    for treasure in treasures.iter_mut() {
        if treasure.collected || !overlaps(&player.body, &treasure.body) {
            continue;
        }
        treasure.collected = true;
        player.collected += 1;
        debug!(step, treasure = %treasure.id, collected = player.collected, "treasure collected");
        events.push(GameEvent::treasure_collected(step, treasure.id));
    }
}

/// Patrol turn for a monster after tile resolution.
///
/// Walking left into a solid cell or off the floor's edge turns right;
/// walking right into a wall or toward a missing diagonal floor turns left.
#[inline]
pub fn patrol_direction(dir: Direction, cells: &Neighborhood) -> Direction {
    match dir {
        Direction::Left if cells.cell || !cells.down => Direction::Right,
        Direction::Right if cells.right || !cells.diag => Direction::Left,
        other => other,
    }
}
