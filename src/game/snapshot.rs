//! Render Snapshot
//!
//! Read-only view of the world for hosts to draw. Ordering is fixed:
//! player, monsters in load order, treasures in load order. Dead monsters and
//! collected treasures stay in the list with `active == false`.

use serde::Serialize;

use crate::core::vec2::FixedVec2;
use crate::game::grid::Tile;
use crate::game::palette::Color;
use crate::game::state::{Body, EntityId, EntityKind, World};

/// One entity as seen by a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Box center
    pub position: FixedVec2,
    pub size: FixedVec2,
    pub color: Color,
    /// False once a monster is dead or a treasure is collected
    pub active: bool,
}

impl EntityView {
    fn new(id: EntityId, body: &Body, active: bool) -> Self {
        Self {
            id,
            kind: id.kind,
            position: body.position,
            size: body.size,
            color: id.kind.color(),
            active,
        }
    }

    /// Top-left corner and size as floats, ready for a draw call.
    pub fn rect(&self) -> [f32; 4] {
        let (x, y) = (self.position - self.size.half()).to_floats();
        let (w, h) = self.size.to_floats();
        [x, y, w, h]
    }
}

/// Everything a host needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Fixed steps executed so far
    pub step: u64,
    pub entities: Vec<EntityView>,
    /// Treasures the player has picked up
    pub collected: u32,
    /// Monsters the player has stomped
    pub killed: u32,
}

impl Snapshot {
    /// Overwrite this snapshot with the world's current state, reusing the
    /// entity buffer.
    pub fn refresh(&mut self, world: &World) {
        self.step = world.step_count;
        self.collected = world.player.collected;
        self.killed = world.player.killed;

        self.entities.clear();
        self.entities.push(EntityView::new(world.player.id, &world.player.body, true));
        self.entities.extend(
            world.monsters.iter().map(|m| EntityView::new(m.id, &m.body, !m.dead)),
        );
        self.entities.extend(
            world.treasures.iter().map(|t| EntityView::new(t.id, &t.body, !t.collected)),
        );
    }

    /// Views still in play.
    pub fn active(&self) -> impl Iterator<Item = &EntityView> + '_ {
        self.entities.iter().filter(|e| e.active)
    }
}

impl World {
    /// Take a render snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot {
            entities: Vec::with_capacity(1 + self.monsters.len() + self.treasures.len()),
            ..Snapshot::default()
        };
        snapshot.refresh(self);
        snapshot
    }

    /// Solid tiles for rendering, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.grid.tiles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::TileGrid;
    use crate::game::state::{Monster, Player, Treasure};
    use crate::game::tuning::Tuning;

    fn body_at(x: i64, y: i64) -> Body {
        Body::new(FixedVec2::from_ints(x, y), FixedVec2::from_ints(32, 32), Tuning::default())
    }

    fn world() -> World {
        let mut grid = TileGrid::new(4, 4, FixedVec2::from_ints(32, 32));
        grid.set(0, 3, Some(crate::game::grid::TileKind::Brick));
        World::new(
            grid,
            Player::new(body_at(48, 80)),
            vec![Monster::new(0, body_at(16, 16)), Monster::new(1, body_at(80, 16))],
            vec![Treasure::new(0, body_at(112, 16))],
        )
    }

    #[test]
    fn test_snapshot_ordering() {
        let mut world = world();
        world.monsters[0].dead = true;
        world.player.killed = 1;

        let snapshot = world.snapshot();
        let ids: Vec<String> = snapshot.entities.iter().map(|e| e.id.to_string()).collect();
        assert_eq!(ids, vec!["player", "monster-0", "monster-1", "treasure-0"]);
        assert!(!snapshot.entities[1].active);
        assert!(snapshot.entities[2].active);
        assert_eq!(snapshot.active().count(), 3);
        assert_eq!(snapshot.killed, 1);
        assert_eq!(snapshot.collected, 0);
        assert_eq!(snapshot.entities[0].color, Color::WHITE);
        assert_eq!(snapshot.entities[3].kind, EntityKind::Treasure);
    }

    #[test]
    fn test_refresh_reuses_buffer() {
        let mut world = world();
        let mut snapshot = world.snapshot();
        let capacity = snapshot.entities.capacity();

        world.treasures[0].collected = true;
        world.player.collected = 1;
        snapshot.refresh(&world);

        assert_eq!(snapshot.entities.len(), 4);
        assert_eq!(snapshot.entities.capacity(), capacity);
        assert!(!snapshot.entities[3].active);
        assert_eq!(snapshot.collected, 1);
    }

    #[test]
    fn test_rect_is_top_left() {
        let snapshot = world().snapshot();
        assert_eq!(snapshot.entities[0].rect(), [32.0, 64.0, 32.0, 32.0]);
    }

    #[test]
    fn test_tiles_for_rendering() {
        let world = world();
        let tiles: Vec<&Tile> = world.tiles().collect();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].position, FixedVec2::from_ints(16, 112));
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_value(world().snapshot()).unwrap();
        assert_eq!(json["entities"][0]["kind"], "player");
        assert_eq!(json["entities"][1]["active"], true);
    }
}
