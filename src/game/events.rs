//! Game Events
//!
//! Gameplay outcomes recorded during a `step` call so hosts can react
//! (sounds, HUD, analytics) without diffing snapshots. Events are plain
//! `Copy` data; the world reuses one buffer across calls.

use serde::{Serialize, Deserialize};
use crate::game::state::EntityId;

/// Game event data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventData {
    /// Player landed on a monster from above and killed it
    MonsterStomped { monster: EntityId },

    /// Player touched a monster any other way and was sent back to spawn
    PlayerPunished { monster: EntityId },

    /// Player picked up a treasure
    TreasureCollected { treasure: EntityId },

    /// Player left the ground on a jump
    PlayerJumped,

    /// Player came to rest on a tile after falling
    PlayerLanded,
}

/// A game event stamped with the fixed step it happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Fixed step index (1-based count of steps executed)
    pub step: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(step: u64, data: GameEventData) -> Self {
        Self { step, data }
    }

    /// Create monster stomped event.
    pub fn monster_stomped(step: u64, monster: EntityId) -> Self {
        Self::new(step, GameEventData::MonsterStomped { monster })
    }

    /// Create player punished event.
    pub fn player_punished(step: u64, monster: EntityId) -> Self {
        Self::new(step, GameEventData::PlayerPunished { monster })
    }

    /// Create treasure collected event.
    pub fn treasure_collected(step: u64, treasure: EntityId) -> Self {
        Self::new(step, GameEventData::TreasureCollected { treasure })
    }

    /// Create player jumped event.
    pub fn player_jumped(step: u64) -> Self {
        Self::new(step, GameEventData::PlayerJumped)
    }

    /// Create player landed event.
    pub fn player_landed(step: u64) -> Self {
        Self::new(step, GameEventData::PlayerLanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::monster_stomped(12, EntityId::monster(2));
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["step"], 12);
        assert_eq!(json["data"]["type"], "monster_stomped");
        assert_eq!(json["data"]["monster"]["index"], 2);
        assert_eq!(json["data"]["monster"]["kind"], "monster");
    }
}
