//! Level Loading
//!
//! Turns an external level description into a ready-to-step `World`.
//!
//! Level coordinates are in level pixels (grid cells of `tile` size); the
//! loader scales them per axis into the host's viewport:
//! `scale = viewport / (grid * tile)`. This is the only place floats are
//! used; everything is converted to fixed-point before the first step.

use std::io::Read;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::fixed::{to_fixed, to_float};
use crate::core::vec2::FixedVec2;
use crate::game::grid::TileGrid;
use crate::game::state::{Body, Direction, EntityKind, Monster, Player, Treasure, World};
use crate::game::tuning::Tuning;

// =============================================================================
// ERRORS
// =============================================================================

/// Fatal level load failures.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("player not found in level config")]
    MissingPlayer,

    #[error("unexpected entity type {kind:?} (entity #{index})")]
    UnknownEntityType { index: usize, kind: String },

    #[error("level grid must be at least 1x1")]
    EmptyGrid,

    #[error("level grid {width}x{height} is too large")]
    GridTooLarge { width: usize, height: usize },

    #[error("expected {expected} tile codes for the grid, found {actual}")]
    TileCountMismatch { expected: usize, actual: usize },

    #[error("unknown tile type {code} at column {column}, row {row}")]
    UnknownTileType { column: usize, row: usize, code: u8 },

    #[error("viewport and tile sizes must be positive and finite")]
    InvalidViewport,

    #[error("entity #{index} has invalid {field}: must be positive and finite")]
    InvalidTuning { index: usize, field: &'static str },

    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read level: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// LEVEL CONFIGURATION
// =============================================================================

/// Grid dimensions in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

/// Tile dimensions in level pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileSize {
    pub width: f64,
    pub height: f64,
}

/// Optional per-entity tuning overrides, in level units.
///
/// `accel` and `friction` are seconds to reach / lose `maxdx`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxdx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxdy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impulse: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accel: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<Direction>,
}

/// One entity descriptor. `x`/`y` is the top-left corner in level pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub properties: EntityProperties,
}

/// External level description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub grid: GridSize,
    pub tile: TileSize,
    /// Tile codes indexed `column + row * grid.width`, 0 = empty
    pub tiles: Vec<u8>,
    #[serde(default)]
    pub entities: Vec<EntityConfig>,
}

impl LevelConfig {
    /// Parse a level from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a level from a JSON reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse a level JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }
}

/// Host drawing area the level is scaled into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a viewport.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Per-axis level-to-viewport scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    /// Scale that maps the whole level onto the viewport.
    pub fn fit(level: &LevelConfig, viewport: Viewport) -> Result<Self, LoadError> {
        if level.grid.width == 0 || level.grid.height == 0 {
            return Err(LoadError::EmptyGrid);
        }
        let dims = [viewport.width, viewport.height, level.tile.width, level.tile.height];
        if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(LoadError::InvalidViewport);
        }
        Ok(Self {
            x: viewport.width / (level.grid.width as f64 * level.tile.width),
            y: viewport.height / (level.grid.height as f64 * level.tile.height),
        })
    }
}

/// Sequential id assignment for one load call.
#[derive(Debug, Default)]
struct IdAllocator {
    monsters: u32,
    treasures: u32,
}

impl IdAllocator {
    fn next_monster(&mut self) -> u32 {
        let id = self.monsters;
        self.monsters += 1;
        id
    }

    fn next_treasure(&mut self) -> u32 {
        let id = self.treasures;
        self.treasures += 1;
        id
    }
}

fn validate_properties(index: usize, props: &EntityProperties) -> Result<(), LoadError> {
    let positive = [("accel", props.accel), ("friction", props.friction)];
    for (field, value) in positive {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(LoadError::InvalidTuning { index, field });
            }
        }
    }

    let finite = [
        ("maxdx", props.maxdx),
        ("maxdy", props.maxdy),
        ("gravity", props.gravity),
        ("impulse", props.impulse),
    ];
    for (field, value) in finite {
        if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
            return Err(LoadError::InvalidTuning { index, field });
        }
    }
    Ok(())
}

fn build_body(config: &EntityConfig, scale: Scale) -> Body {
    let width = config.width * scale.x;
    let height = config.height * scale.y;
    let position = FixedVec2::new(
        to_fixed(config.x * scale.x + width / 2.0),
        to_fixed(config.y * scale.y + height / 2.0),
    );
    let size = FixedVec2::new(to_fixed(width), to_fixed(height));
    let tuning = Tuning::from_properties(&config.properties, scale.x, scale.y);

    Body::new(position, size, tuning).facing(config.properties.dir.unwrap_or_default())
}

/// Build a world from a level description scaled into `viewport`.
pub fn load_world(level: &LevelConfig, viewport: Viewport) -> Result<World, LoadError> {
    let scale = Scale::fit(level, viewport)?;
    let tile_size = FixedVec2::new(
        to_fixed(level.tile.width * scale.x),
        to_fixed(level.tile.height * scale.y),
    );
    if tile_size.x <= 0 || tile_size.y <= 0 {
        return Err(LoadError::InvalidViewport);
    }

    let grid = TileGrid::from_codes(level.grid.width, level.grid.height, tile_size, &level.tiles)?;

    let mut ids = IdAllocator::default();
    let mut player: Option<Player> = None;
    let mut monsters = Vec::new();
    let mut treasures = Vec::new();

    for (index, config) in level.entities.iter().enumerate() {
        let kind = EntityKind::parse(&config.kind).ok_or_else(|| LoadError::UnknownEntityType {
            index,
            kind: config.kind.clone(),
        })?;
        validate_properties(index, &config.properties)?;
        let body = build_body(config, scale);

        match kind {
            EntityKind::Player => {
                if player.is_some() {
                    warn!(index, "extra player descriptor ignored");
                } else {
                    player = Some(Player::new(body));
                }
            }
            EntityKind::Monster => monsters.push(Monster::new(ids.next_monster(), body)),
            EntityKind::Treasure => treasures.push(Treasure::new(ids.next_treasure(), body)),
        }
    }

    let player = player.ok_or(LoadError::MissingPlayer)?;

    info!(
        grid_width = grid.width(),
        grid_height = grid.height(),
        tile_width = to_float(tile_size.x),
        tile_height = to_float(tile_size.y),
        scale_x = scale.x,
        scale_y = scale.y,
        solid_tiles = grid.solid_count(),
        monsters = monsters.len(),
        treasures = treasures.len(),
        "level loaded"
    );

    Ok(World::new(grid, player, monsters, treasures))
}

impl World {
    /// Load a level into a fresh world.
    pub fn load(level: &LevelConfig, viewport: Viewport) -> Result<Self, LoadError> {
        load_world(level, viewport)
    }
}
