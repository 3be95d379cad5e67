//! Occupancy grid and placement rendering for cube-shaped targets.
//!
//! Cells are stored in a flat vector in x-major order:
//! `idx = x * side * side + y * side + z`. The same order is the canonical
//! scan order for search roots.

use crate::geometry::{in_bounds, Coord};

/// Largest supported cube side.
///
/// Keeps every chain index of a placement representable as `u16`.
pub const MAX_SIDE: usize = 32;

/// Converts (x, y, z) coordinates to a linear cell index.
#[inline(always)]
pub const fn coord_to_idx(side: usize, (x, y, z): Coord) -> usize {
    (x as usize) * side * side + (y as usize) * side + (z as usize)
}

/// Converts a linear cell index to (x, y, z) coordinates.
#[inline(always)]
pub const fn idx_to_coord(side: usize, cell_index: usize) -> Coord {
    (
        (cell_index / (side * side)) as i32,
        ((cell_index / side) % side) as i32,
        (cell_index % side) as i32,
    )
}

/// Which cells of a `side^3` cube are currently filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    side: usize,
    cells: Vec<bool>,
    filled: usize,
}

impl Grid {
    /// An empty grid.
    pub fn new(side: usize) -> Self {
        Self {
            side,
            cells: vec![false; side * side * side],
            filled: 0,
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// True when `cell` is inside the cube and not yet occupied.
    #[inline]
    pub fn is_free(&self, cell: Coord) -> bool {
        in_bounds(cell, self.side) && !self.cells[coord_to_idx(self.side, cell)]
    }

    #[inline]
    pub fn is_occupied(&self, cell: Coord) -> bool {
        in_bounds(cell, self.side) && self.cells[coord_to_idx(self.side, cell)]
    }

    /// Marks an in-bounds, free cell as filled.
    #[inline]
    pub fn occupy(&mut self, cell: Coord) {
        let idx = coord_to_idx(self.side, cell);
        debug_assert!(!self.cells[idx], "cell {cell:?} occupied twice");
        self.cells[idx] = true;
        self.filled += 1;
    }

    /// Clears a previously filled cell.
    #[inline]
    pub fn release(&mut self, cell: Coord) {
        let idx = coord_to_idx(self.side, cell);
        debug_assert!(self.cells[idx], "cell {cell:?} released while free");
        self.cells[idx] = false;
        self.filled -= 1;
    }

    /// All cells in canonical scan order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let side = self.side;
        (0..self.cells.len()).map(move |idx| idx_to_coord(side, idx))
    }
}

/// Lays out a placement as a flat grid of 1-based chain indices, 0 = empty.
///
/// # Panics
///
/// Panics if a position lies outside the `side^3` cube.
pub fn placement_to_grid(side: usize, positions: &[Coord]) -> Vec<u16> {
    let mut grid = vec![0u16; side * side * side];
    for (chain_index, &cell) in positions.iter().enumerate() {
        grid[coord_to_idx(side, cell)] = (chain_index + 1) as u16;
    }
    grid
}

/// Formats a placement as a human-readable string.
///
/// Displays `side` z-slices side by side, each cell showing which cube of the
/// chain (1-based) sits there. Empty cells show as '.'.
///
/// # Panics
///
/// Panics if a position lies outside the `side^3` cube.
pub fn format_placement(side: usize, positions: &[Coord]) -> String {
    let grid = placement_to_grid(side, positions);
    let cubes = side * side * side;
    // single base-36 digits while they suffice, padded numbers otherwise
    let width = if cubes < 36 { 1 } else { cubes.to_string().len() };
    let separator = if width == 1 { "" } else { " " };

    let mut output = String::new();
    for z in 0..side {
        if z > 0 {
            output.push_str("  ");
        }
        let slice_width = side * width + (side - 1) * separator.len();
        output.push_str(&format!("z={:<w$}", z, w = slice_width.saturating_sub(2)));
    }
    let header_len = output.trim_end().len();
    output.truncate(header_len);
    output.push('\n');

    // rows from top (y = side - 1) to bottom (y = 0)
    for y in (0..side).rev() {
        for z in 0..side {
            if z > 0 {
                output.push_str("  ");
            }
            for x in 0..side {
                if x > 0 {
                    output.push_str(separator);
                }
                let chain_index = grid[coord_to_idx(side, (x as i32, y as i32, z as i32))];
                if chain_index == 0 {
                    output.push_str(&format!("{:>width$}", "."));
                } else if width == 1 {
                    output.push(
                        char::from_digit(u32::from(chain_index), 36)
                            .map_or('?', |digit| digit.to_ascii_uppercase()),
                    );
                } else {
                    output.push_str(&format!("{:>width$}", chain_index));
                }
            }
        }
        output.push('\n');
    }

    output
}
