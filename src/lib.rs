//! Snake Cube Solver Library
//!
//! Folds a rigid chain of unit cubes, joined straight or at right angles,
//! into a solid cube. Provides the cube-grid geometry, chain descriptions and
//! a lazy backtracking search over all foldings.

pub mod chain;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod solver;
pub mod symmetry;

pub use chain::{Chain, Segment};
pub use error::{GeometryError, PuzzleError, Result};
pub use geometry::{Coord, Direction, Move};
pub use solver::{FanOut, Puzzle, Solution, Solutions, Violation};
