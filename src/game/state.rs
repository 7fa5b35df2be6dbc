//! Simulation State Definitions
//!
//! Bodies, the three entity kinds and the world that owns them.
//! Entities are never removed: `dead` / `collected` flags are terminal states,
//! so ids and vector indices stay stable for the lifetime of a level.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;
use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::game::events::GameEvent;
use crate::game::grid::TileGrid;
use crate::game::palette::Color;
use crate::game::tuning::Tuning;

// =============================================================================
// DIRECTION
// =============================================================================

/// Horizontal intent of a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Direction {
    Left = 0,
    Right = 1,
    #[default]
    None = 2,
}

impl Direction {
    /// Direction from held keys. Left wins when both are held.
    #[inline]
    pub fn from_held(left: bool, right: bool) -> Self {
        if left {
            Direction::Left
        } else if right {
            Direction::Right
        } else {
            Direction::None
        }
    }

}

// =============================================================================
// ENTITY KIND & ID
// =============================================================================

/// Kind tag of a dynamic entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EntityKind {
    Player = 0,
    Monster = 1,
    Treasure = 2,
}

impl EntityKind {
    /// Parse the `type` string used in level files.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "player" => Some(EntityKind::Player),
            "monster" => Some(EntityKind::Monster),
            "treasure" => Some(EntityKind::Treasure),
            _ => None,
        }
    }

    /// Display color for this kind.
    pub fn color(self) -> Color {
        match self {
            EntityKind::Player => Color::WHITE,
            EntityKind::Monster => Color::SLATE,
            EntityKind::Treasure => Color::PURPLE,
        }
    }
}

/// Identifier unique within an entity kind.
///
/// Monsters and treasures are numbered from 0 in level file order; the player
/// always has index 0 and displays as `player`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    pub kind: EntityKind,
    pub index: u32,
}

impl EntityId {
    /// The single player's id.
    pub const PLAYER: Self = Self { kind: EntityKind::Player, index: 0 };

    /// Id of the n-th monster.
    pub const fn monster(index: u32) -> Self {
        Self { kind: EntityKind::Monster, index }
    }

    /// Id of the n-th treasure.
    pub const fn treasure(index: u32) -> Self {
        Self { kind: EntityKind::Treasure, index }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntityKind::Player => write!(f, "player"),
            EntityKind::Monster => write!(f, "monster-{}", self.index),
            EntityKind::Treasure => write!(f, "treasure-{}", self.index),
        }
    }
}

// =============================================================================
// BODY (shared kinematic record)
// =============================================================================

/// Axis-aligned kinematic body. `position` is the box center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub position: FixedVec2,
    pub size: FixedVec2,
    /// dx, dy in units/s
    pub velocity: FixedVec2,
    /// ddx, ddy in units/s²
    pub acceleration: FixedVec2,
    pub tuning: Tuning,
    pub dir: Direction,
    /// True when nothing solid supports the body from below
    pub falling: bool,
}

impl Body {
    /// Body at rest facing nowhere.
    pub fn new(position: FixedVec2, size: FixedVec2, tuning: Tuning) -> Self {
        Self {
            position,
            size,
            velocity: FixedVec2::ZERO,
            acceleration: FixedVec2::ZERO,
            tuning,
            dir: Direction::None,
            falling: false,
        }
    }

    /// Builder-style facing override.
    pub fn facing(mut self, dir: Direction) -> Self {
        self.dir = dir;
        self
    }

    /// Left edge x.
    #[inline]
    pub fn left(&self) -> Fixed {
        self.position.x - self.size.x / 2
    }

    /// Top edge y.
    #[inline]
    pub fn top(&self) -> Fixed {
        self.position.y - self.size.y / 2
    }

    /// Hash this body's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_vec2(self.position);
        hasher.update_vec2(self.size);
        hasher.update_vec2(self.velocity);
        hasher.update_vec2(self.acceleration);
        hasher.update_u8(self.dir as u8);
        hasher.update_bool(self.falling);
    }
}

// =============================================================================
// PLAYER / MONSTER / TREASURE
// =============================================================================

/// The single player-controlled entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub body: Body,
    /// Jump held during the current step
    pub jump: bool,
    /// Latched on takeoff, cleared on landing
    pub jumping: bool,
    pub collected: u32,
    pub killed: u32,
    /// Spawn position, restored when a monster catches the player
    pub origin: FixedVec2,
}

impl Player {
    /// Create a player spawning at the body's position.
    pub fn new(body: Body) -> Self {
        Self {
            id: EntityId::PLAYER,
            origin: body.position,
            body,
            jump: false,
            jumping: false,
            collected: 0,
            killed: 0,
        }
    }

    /// Teleport back to the spawn point and stop.
    pub fn reset_to_origin(&mut self) {
        self.body.position = self.origin;
        self.body.velocity = FixedVec2::ZERO;
    }

    /// Hash this player's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        self.body.hash_into(hasher);
        hasher.update_bool(self.jump);
        hasher.update_bool(self.jumping);
        hasher.update_u32(self.collected);
        hasher.update_u32(self.killed);
    }
}

/// A patrolling enemy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Monster {
    pub id: EntityId,
    pub body: Body,
    pub dead: bool,
}

impl Monster {
    /// Create a live monster.
    pub fn new(index: u32, body: Body) -> Self {
        Self {
            id: EntityId::monster(index),
            body,
            dead: false,
        }
    }
}

/// A collectible.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Treasure {
    pub id: EntityId,
    pub body: Body,
    pub collected: bool,
}

impl Treasure {
    /// Create an uncollected treasure.
    pub fn new(index: u32, body: Body) -> Self {
        Self {
            id: EntityId::treasure(index),
            body,
            collected: false,
        }
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// Complete simulation state of one loaded level.
#[derive(Clone, Debug)]
pub struct World {
    /// Leftover time not yet consumed by a fixed step, in fixed steps
    /// (`FIXED_ONE` is one step)
    pub accumulator: Fixed,

    /// Host seconds fed to `step` since load
    pub host_seconds: f64,

    /// `host_seconds` already credited to the accumulator, in step units
    pub host_units: Fixed,

    /// Number of fixed steps executed since load
    pub step_count: u64,

    /// Static level geometry
    pub grid: TileGrid,

    /// Monsters in level file order
    pub monsters: Vec<Monster>,

    /// Treasures in level file order
    pub treasures: Vec<Treasure>,

    pub player: Player,

    /// Events produced by the most recent `step` call
    pub events: Vec<GameEvent>,
}

impl World {
    /// Assemble a world from loaded parts.
    pub fn new(
        grid: TileGrid,
        player: Player,
        monsters: Vec<Monster>,
        treasures: Vec<Treasure>,
    ) -> Self {
        // Worst case per fixed step: one event per monster and per treasure,
        // plus a jump or a landing. Room for four steps per call; frames that
        // drain more grow the buffer once.
        let events_per_step = monsters.len() + treasures.len() + 1;
        Self {
            accumulator: 0,
            host_seconds: 0.0,
            host_units: 0,
            step_count: 0,
            grid,
            monsters,
            treasures,
            player,
            events: Vec::with_capacity(events_per_step * 4),
        }
    }

    /// Monsters still in play.
    pub fn live_monster_count(&self) -> usize {
        self.monsters.iter().filter(|m| !m.dead).count()
    }

    /// Treasures still waiting to be picked up.
    pub fn remaining_treasure_count(&self) -> usize {
        self.treasures.iter().filter(|t| !t.collected).count()
    }

    /// Events produced by the most recent `step` call.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Compute hash of current state for verification.
    ///
    /// Excludes the accumulator; a replay runs whole steps only.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.step_count, |hasher| {
            self.player.hash_into(hasher);

            for monster in &self.monsters {
                hasher.update_u32(monster.id.index);
                monster.body.hash_into(hasher);
                hasher.update_bool(monster.dead);
            }

            for treasure in &self.treasures {
                hasher.update_u32(treasure.id.index);
                treasure.body.hash_into(hasher);
                hasher.update_bool(treasure.collected);
            }
        })
    }
}
