//! Symmetry reduction of foldings.
//!
//! A cube has 48 symmetries: 24 rotations, each optionally combined with a
//! reflection. Every symmetric image of a folding is itself a folding, so the
//! raw search reports each physical arrangement many times. Two foldings are
//! considered the same when some symmetry maps the cube index of every cell
//! of one onto the other.

use rustc_hash::FxHashSet;

use crate::geometry::{in_bounds, Coord, Symmetry, SYMMETRIES};
use crate::grid::placement_to_grid;
use crate::solver::{Puzzle, Solution, Solutions, Violation};

/// Canonical form of a placement: a grid of 1-based chain indices.
pub type PlacementKey = Vec<u16>;

/// Maps every cell through one symmetry of a `side^3` cube.
///
/// Uses doubled coordinates centred on the cube so even sides have integer
/// centres: `c = 2 * x - (side - 1)`.
fn transform(side: usize, positions: &[Coord], symmetry: Symmetry) -> Vec<Coord> {
    let offset = side as i32 - 1;
    positions
        .iter()
        .map(|&(x, y, z)| {
            let (rx, ry, rz) = symmetry.apply((2 * x - offset, 2 * y - offset, 2 * z - offset));
            ((rx + offset) / 2, (ry + offset) / 2, (rz + offset) / 2)
        })
        .collect()
}

/// Computes the canonical form of a placement under rotations and reflections.
///
/// `positions[i]` is the cell of cube `i`. The key is the lexicographically
/// smallest index grid over all 48 symmetric images.
///
/// # Panics
///
/// Panics if a position lies outside the `side^3` cube. Use
/// [`Puzzle::canonical_key`] for foldings that have not been verified.
pub fn canonical_key(side: usize, positions: &[Coord]) -> PlacementKey {
    if let Some(cell) = positions.iter().find(|&&cell| !in_bounds(cell, side)) {
        panic!("cell {cell:?} lies outside the {side}x{side}x{side} cube");
    }

    SYMMETRIES
        .iter()
        .map(|&symmetry| placement_to_grid(side, &transform(side, positions, symmetry)))
        .min()
        .unwrap_or_else(|| placement_to_grid(side, positions))
}

/// Filters a folding sequence down to one representative per symmetry class.
///
/// The first folding of each class in the underlying order is kept.
pub struct Distinct<I> {
    inner: I,
    side: usize,
    seen: FxHashSet<PlacementKey>,
}

impl<I> Distinct<I> {
    pub fn new(inner: I, side: usize) -> Self {
        Self {
            inner,
            side,
            seen: FxHashSet::default(),
        }
    }
}

impl<I: Iterator<Item = Solution>> Iterator for Distinct<I> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        let side = self.side;
        let seen = &mut self.seen;
        self.inner
            .by_ref()
            .find(|solution| seen.insert(canonical_key(side, &solution.positions())))
    }
}

impl Puzzle {
    /// Lazily enumerates foldings, skipping symmetric duplicates.
    pub fn distinct_solutions(&self) -> Distinct<Solutions<'_>> {
        Distinct::new(self.solutions(), self.side())
    }

    /// Computes the canonical key of a folding of this puzzle.
    ///
    /// The folding is verified first, so a folding that leaves the cube is
    /// reported instead of indexing outside the grid.
    pub fn canonical_key(&self, solution: &Solution) -> Result<PlacementKey, Violation> {
        solution.verify(self)?;
        Ok(canonical_key(self.side(), &solution.positions()))
    }
}
