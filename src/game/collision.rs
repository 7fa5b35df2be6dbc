//! Collision Detection
//!
//! Tile collision resolution for bodies and box overlap between entities.
//!
//! The resolver is discrete: it only looks at the four cells around a body's
//! center-derived tile (current, right, below, diagonal), so bodies are
//! expected to be no larger than one tile and to move less than a tile per
//! step. Vertical correction runs first; if it pushes the body down out of a
//! ceiling the neighbourhood is shifted one row before the horizontal check.

use crate::core::fixed::{Fixed, FIXED_ONE};
use crate::game::grid::TileGrid;
use crate::game::state::Body;

/// Edge tolerance for entity overlap. Boxes that only touch are not overlapping.
pub const OVERLAP_TOLERANCE: Fixed = FIXED_ONE;

/// Solidity of the four cells around a body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighborhood {
    /// The body's own tile
    pub cell: bool,
    /// One column right
    pub right: bool,
    /// One row down
    pub down: bool,
    /// One column right, one row down
    pub diag: bool,
}

impl Neighborhood {
    /// Sample the grid around `(column, row)`.
    #[inline]
    pub fn sample(grid: &TileGrid, column: i64, row: i64) -> Self {
        Self {
            cell: grid.is_solid(column, row),
            right: grid.is_solid(column + 1, row),
            down: grid.is_solid(column, row + 1),
            diag: grid.is_solid(column + 1, row + 1),
        }
    }

    /// Neighbourhood after the body was pushed down one row out of a ceiling.
    ///
    /// The top pair takes the old bottom pair; the bottom pair is not
    /// resampled.
    #[inline]
    pub fn shift_down(self) -> Self {
        Self {
            cell: self.down,
            right: self.diag,
            down: self.down,
            diag: self.diag,
        }
    }
}

/// What the resolver changed on a body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Neighbourhood used for the horizontal check (shifted after a ceiling hit)
    pub cells: Neighborhood,
    /// Snapped onto a floor while moving down
    pub landed: bool,
    /// Snapped under a ceiling while moving up
    pub hit_ceiling: bool,
    /// Snapped against a wall while moving sideways
    pub hit_wall: bool,
}

/// Resolve a provisionally integrated body against the tile grid.
///
/// Corrects position and velocity on each axis and recomputes `falling`.
pub fn resolve_tiles(body: &mut Body, grid: &TileGrid) -> Resolution {
    let mut result = Resolution::default();

    let tx = grid.column_of(body.position.x);
    let ty = grid.row_of(body.position.y);
    let nx = grid.column_offset(body.position.x) != 0;
    let mut ny = grid.row_offset(body.position.y) != 0;
    let mut cells = Neighborhood::sample(grid, tx, ty);

    if body.velocity.y > 0 {
        if (cells.down && !cells.cell) || (cells.diag && !cells.right && nx) {
            body.position.y = grid.row_center(ty);
            body.velocity.y = 0;
            body.falling = false;
            result.landed = true;
            ny = false;
        }
    } else if body.velocity.y < 0 {
        if (cells.cell && !cells.down) || (cells.right && !cells.diag && nx) {
            body.position.y = grid.row_center(ty + 1);
            body.velocity.y = 0;
            cells = cells.shift_down();
            result.hit_ceiling = true;
            ny = false;
        }
    }

    if body.velocity.x > 0 {
        if (cells.right && !cells.cell) || (cells.diag && !cells.down && ny) {
            body.position.x = grid.column_center(tx);
            body.velocity.x = 0;
            result.hit_wall = true;
        }
    } else if body.velocity.x < 0 {
        if (cells.cell && !cells.right) || (cells.down && !cells.diag && ny) {
            body.position.x = grid.column_center(tx + 1);
            body.velocity.x = 0;
            result.hit_wall = true;
        }
    }

    // Supported squarely by the tile below, or straddling onto the diagonal one.
    body.falling = !(cells.down || (nx && cells.diag));

    result.cells = cells;
    result
}

/// Axis-aligned overlap of two bodies with the one-unit edge tolerance.
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    let left_a = a.left();
    let left_b = b.left();
    let top_a = a.top();
    let top_b = b.top();

    !((left_a + a.size.x - OVERLAP_TOLERANCE < left_b)
        || (left_b + b.size.x - OVERLAP_TOLERANCE < left_a)
        || (top_a + a.size.y - OVERLAP_TOLERANCE < top_b)
        || (top_b + b.size.y - OVERLAP_TOLERANCE < top_a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::from_int;
    use crate::core::vec2::FixedVec2;
    use crate::game::grid::TileKind;
    use crate::game::tuning::Tuning;

    const TILE: i64 = 32;

    /// 6x6 grid of 32-unit tiles with a full floor on row 5.
    fn floor_grid() -> TileGrid {
        let mut grid = TileGrid::new(6, 6, FixedVec2::from_ints(TILE, TILE));
        for column in 0..6 {
            grid.set(column, 5, Some(TileKind::Brick));
        }
        grid
    }

    fn body_at(x: i64, y: i64) -> Body {
        Body::new(FixedVec2::from_ints(x, y), FixedVec2::from_ints(TILE, TILE), Tuning::default())
    }

    #[test]
    fn test_landing_snaps_to_row_top() {
        let grid = floor_grid();
        // Row 4 center is 144; the body sank 5 units into the floor.
        let mut body = body_at(48, 149);
        body.velocity.y = from_int(100);
        body.falling = true;

        let result = resolve_tiles(&mut body, &grid);
        assert!(result.landed);
        assert_eq!(body.position.y, from_int(144));
        assert_eq!(body.velocity.y, 0);
        assert!(!body.falling);
    }

    #[test]
    fn test_landing_on_diagonal_while_straddling() {
        let mut grid = TileGrid::new(6, 6, FixedVec2::from_ints(TILE, TILE));
        grid.set(2, 5, Some(TileKind::Grey));
        // Column 1 with 10 units of overhang into column 2.
        let mut body = body_at(58, 149);
        body.velocity.y = from_int(50);
        body.falling = true;

        let result = resolve_tiles(&mut body, &grid);
        assert!(result.landed);
        assert_eq!(body.position.y, from_int(144));
        assert!(!body.falling);
    }

    #[test]
    fn test_ceiling_pushes_down_and_shifts_cells() {
        let mut grid = floor_grid();
        grid.set(1, 0, Some(TileKind::Pink));
        // Row 1 center is 48; the body rose 5 units into row 0.
        let mut body = body_at(48, 43);
        body.velocity.y = from_int(-100);

        let result = resolve_tiles(&mut body, &grid);
        assert!(result.hit_ceiling);
        assert_eq!(body.position.y, from_int(48));
        assert_eq!(body.velocity.y, 0);
        assert!(!result.cells.cell);
        assert!(body.falling);
    }

    #[test]
    fn test_wall_blocks_moving_right() {
        let mut grid = floor_grid();
        grid.set(3, 4, Some(TileKind::Yellow));
        let mut body = body_at(85, 144);
        body.velocity.x = from_int(50);

        let result = resolve_tiles(&mut body, &grid);
        assert!(result.hit_wall);
        assert_eq!(body.position.x, from_int(80));
        assert_eq!(body.velocity.x, 0);
        assert!(!body.falling);
    }

    #[test]
    fn test_wall_blocks_moving_left() {
        let mut grid = floor_grid();
        grid.set(0, 4, Some(TileKind::Yellow));
        let mut body = body_at(43, 144);
        body.velocity.x = from_int(-50);

        let result = resolve_tiles(&mut body, &grid);
        assert!(result.hit_wall);
        assert_eq!(body.position.x, from_int(48));
        assert_eq!(body.velocity.x, 0);
    }

    #[test]
    fn test_falling_without_support() {
        let grid = TileGrid::new(6, 6, FixedVec2::from_ints(TILE, TILE));
        let mut body = body_at(48, 80);
        body.velocity.y = from_int(10);

        let result = resolve_tiles(&mut body, &grid);
        assert!(!result.landed);
        assert!(body.falling);
        assert_eq!(body.position.y, from_int(80));
    }

    #[test]
    fn test_probes_past_grid_edge_are_empty() {
        let grid = floor_grid();
        // Far right column: right/diag probes fall outside the grid.
        let mut body = body_at(176, 144);
        body.velocity.x = from_int(60);
        let result = resolve_tiles(&mut body, &grid);
        assert!(!result.hit_wall);
        assert!(!body.falling);

        // Past the bottom edge entirely.
        let mut body = body_at(48, 500);
        body.velocity.y = from_int(60);
        let result = resolve_tiles(&mut body, &grid);
        assert!(!result.landed);
        assert!(body.falling);

        // Left of column 0.
        let mut body = body_at(-40, 144);
        body.velocity.x = from_int(-60);
        resolve_tiles(&mut body, &grid);
        assert!(body.falling);
    }

    #[test]
    fn test_overlap_tolerance() {
        let a = body_at(100, 100);
        // Touching edges exactly: not overlapping.
        assert!(!overlaps(&a, &body_at(132, 100)));
        assert!(!overlaps(&a, &body_at(100, 132)));
        // One unit inside the tolerance still does not count.
        assert!(!overlaps(&a, &Body { position: FixedVec2::new(from_int(131) + 1, from_int(100)), ..a }));
        // Two units of real overlap.
        assert!(overlaps(&a, &body_at(130, 100)));
        assert!(overlaps(&a, &body_at(100, 100)));
        assert!(!overlaps(&a, &body_at(200, 100)));
    }
}
