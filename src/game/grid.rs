//! Tile Grid
//!
//! Static per-level store of solid tiles plus the conversions between
//! continuous positions and tile coordinates.
//!
//! Cells are stored column-major (`[column][row]`). Every lookup takes signed
//! coordinates and answers "no tile" outside `[0, width) × [0, height)`, so the
//! resolver can probe one cell past the edge without any special casing.

use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;
use crate::game::level::LoadError;
use crate::game::palette::Color;

/// Kind of a solid tile. Code 0 in level data means "no tile".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    Yellow = 1,
    Brick = 2,
    Pink = 3,
    Purple = 4,
    Grey = 5,
}

impl TileKind {
    /// Decode a level tile code. `None` for unknown codes (and for 0).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(TileKind::Yellow),
            2 => Some(TileKind::Brick),
            3 => Some(TileKind::Pink),
            4 => Some(TileKind::Purple),
            5 => Some(TileKind::Grey),
            _ => None,
        }
    }

    /// Display color for this tile kind.
    pub fn color(self) -> Color {
        match self {
            TileKind::Yellow => Color::YELLOW,
            TileKind::Brick => Color::BRICK,
            TileKind::Pink => Color::PINK,
            TileKind::Purple => Color::PURPLE,
            TileKind::Grey => Color::GREY,
        }
    }
}

/// One solid cell of the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    /// Center of the tile in viewport units
    pub position: FixedVec2,
    pub size: FixedVec2,
    pub color: Color,
}

/// Fixed-size grid of optional tiles.
#[derive(Clone, Debug)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_size: FixedVec2,
    cells: Vec<Option<Tile>>,
}

impl TileGrid {
    /// Create an empty grid.
    ///
    /// # Panics
    /// If `width * height` overflows `usize`. Level data goes through
    /// `from_codes`, which reports that as an error instead.
    pub fn new(width: usize, height: usize, tile_size: FixedVec2) -> Self {
        Self {
            width,
            height,
            tile_size,
            cells: vec![None; width * height],
        }
    }

    /// Build a grid from level tile codes indexed `column + row * width`.
    pub fn from_codes(
        width: usize,
        height: usize,
        tile_size: FixedVec2,
        codes: &[u8],
    ) -> Result<Self, LoadError> {
        let expected = width
            .checked_mul(height)
            .ok_or(LoadError::GridTooLarge { width, height })?;
        if codes.len() != expected {
            return Err(LoadError::TileCountMismatch {
                expected,
                actual: codes.len(),
            });
        }

        let mut grid = Self::new(width, height, tile_size);
        for row in 0..height {
            for column in 0..width {
                let code = codes[column + row * width];
                if code == 0 {
                    continue;
                }
                let kind = TileKind::from_code(code)
                    .ok_or(LoadError::UnknownTileType { column, row, code })?;
                grid.set(column, row, Some(kind));
            }
        }
        Ok(grid)
    }

    /// Place or clear a tile. Out-of-range coordinates are ignored.
    pub fn set(&mut self, column: usize, row: usize, kind: Option<TileKind>) {
        if column >= self.width || row >= self.height {
            return;
        }
        let tile = kind.map(|kind| Tile {
            kind,
            position: FixedVec2::new(self.column_center(column as i64), self.row_center(row as i64)),
            size: self.tile_size,
            color: kind.color(),
        });
        self.cells[column * self.height + row] = tile;
    }

    /// Grid width in tiles.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in tiles.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile size in viewport units.
    #[inline]
    pub fn tile_size(&self) -> FixedVec2 {
        self.tile_size
    }

    /// Tile at a signed coordinate, `None` when empty or outside the grid.
    #[inline]
    pub fn get(&self, column: i64, row: i64) -> Option<&Tile> {
        if column < 0 || row < 0 {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        if column >= self.width || row >= self.height {
            return None;
        }
        self.cells[column * self.height + row].as_ref()
    }

    /// Whether a solid tile occupies the coordinate.
    #[inline]
    pub fn is_solid(&self, column: i64, row: i64) -> bool {
        self.get(column, row).is_some()
    }

    /// Column holding a center x: `floor((x - w/2) / w)`.
    #[inline]
    pub fn column_of(&self, x: Fixed) -> i64 {
        (x - self.tile_size.x / 2).div_euclid(self.tile_size.x)
    }

    /// Row holding a center y: `floor((y - h/2) / h)`.
    #[inline]
    pub fn row_of(&self, y: Fixed) -> i64 {
        (y - self.tile_size.y / 2).div_euclid(self.tile_size.y)
    }

    /// Horizontal distance of a center x past its column's aligned position.
    #[inline]
    pub fn column_offset(&self, x: Fixed) -> Fixed {
        (x - self.tile_size.x / 2).rem_euclid(self.tile_size.x)
    }

    /// Vertical distance of a center y past its row's aligned position.
    #[inline]
    pub fn row_offset(&self, y: Fixed) -> Fixed {
        (y - self.tile_size.y / 2).rem_euclid(self.tile_size.y)
    }

    /// Center x of a column.
    #[inline]
    pub fn column_center(&self, column: i64) -> Fixed {
        column * self.tile_size.x + self.tile_size.x / 2
    }

    /// Center y of a row.
    #[inline]
    pub fn row_center(&self, row: i64) -> Fixed {
        row * self.tile_size.y + self.tile_size.y / 2
    }

    /// Solid tiles in paint order (row by row).
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width).filter_map(move |column| self.cells[column * self.height + row].as_ref())
        })
    }

    /// Number of solid tiles.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
