//! Error types for puzzle configuration and geometry queries.

use thiserror::Error;

use crate::geometry::Coord;

/// Errors reported before any search begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// A chain description contained a symbol that is not a segment.
    #[error("Unknown segment symbol {symbol:?} at position {index}")]
    UnknownSegment {
        /// The offending character.
        symbol: char,
        /// Character offset in the chain text.
        index: usize,
    },

    /// The cube side is zero or too large for the occupancy grid.
    #[error("Cube side {0} is out of range (must be 1..={max})", max = crate::grid::MAX_SIDE)]
    SideOutOfRange(usize),

    /// The chain does not hold exactly `side^3` cubes.
    #[error("A {side}x{side}x{side} cube needs {expected} segments, chain has {actual}")]
    LengthMismatch {
        /// Requested cube side.
        side: usize,
        /// Segment count implied by the side.
        expected: usize,
        /// Segment count of the chain.
        actual: usize,
    },

    /// The side was derived from a chain whose cube count is not a cube number.
    #[error("Chain of {0} cubes cannot fill a cube")]
    NotACube(usize),
}

/// Errors from converting raw vectors into geometry values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The vector is not one of the six axis-aligned unit vectors.
    #[error("{0:?} is not an axis-aligned unit direction")]
    InvalidDirection(Coord),

    /// Two positions that should be neighbours are not.
    #[error("{from:?} and {to:?} are not adjacent cells")]
    NotAdjacent {
        /// Cell the step starts from.
        from: Coord,
        /// Cell the step ends on.
        to: Coord,
    },
}

/// Result type for puzzle configuration.
pub type Result<T> = std::result::Result<T, PuzzleError>;
