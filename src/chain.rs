//! Chain descriptions: the joint types between consecutive cubes.
//!
//! A chain of `n` cubes has `n - 1` joints. Text form uses one symbol per
//! joint: `S` or `F` for a straight joint, `T` for a turn (case-insensitive).
//! Whitespace, `,` and `_` are separators and are skipped.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::error::PuzzleError;

/// The joint between cube `i` and cube `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The next cube continues in the current heading.
    Straight,
    /// The next cube leaves at a right angle.
    Turn,
}

impl Segment {
    /// Parses a single segment symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'S' | 'F' => Some(Segment::Straight),
            'T' => Some(Segment::Turn),
            _ => None,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Segment::Straight => 'S',
            Segment::Turn => 'T',
        }
    }
}

/// An ordered sequence of joints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Chain(Vec<Segment>);

impl Chain {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Number of cubes in the chain (one more than the joints).
    pub fn cube_count(&self) -> usize {
        self.0.len() + 1
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

impl Deref for Chain {
    type Target = [Segment];

    fn deref(&self) -> &[Segment] {
        &self.0
    }
}

impl From<Vec<Segment>> for Chain {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl From<&[Segment]> for Chain {
    fn from(segments: &[Segment]) -> Self {
        Self(segments.to_vec())
    }
}

impl FromIterator<Segment> for Chain {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for Chain {
    type Err = PuzzleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.chars()
            .enumerate()
            .filter(|(_, symbol)| !(symbol.is_whitespace() || matches!(symbol, ',' | '_')))
            .map(|(index, symbol)| {
                Segment::from_symbol(symbol).ok_or(PuzzleError::UnknownSegment { symbol, index })
            })
            .collect()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "{}", segment.symbol())?;
        }
        Ok(())
    }
}

use Segment::{Straight as S, Turn as T};

/// The 64-cube snake folding into a 4x4x4 cube.
pub const SNAKE_CUBE: [Segment; 63] = [
    S, S, T, T, S, T, T, T, //
    S, S, T, T, S, T, T, S, //
    T, T, S, T, T, T, T, T, //
    T, T, T, T, S, T, S, T, //
    T, T, T, T, T, S, T, S, //
    S, T, T, T, T, S, S, T, //
    T, S, T, T, T, T, T, T, //
    T, T, T, T, S, S, T, //
];

/// An 8-cube chain that folds into a 2x2x2 cube.
pub const TOY_CUBE: [Segment; 7] = [S, T, T, T, T, T, T];

/// A 27-cube serpentine chain that folds into a 3x3x3 cube.
pub const SERPENTINE_CUBE: [Segment; 26] = [
    S, S, T, T, S, T, T, S, T, T, S, T, T, //
    S, T, T, S, T, T, S, T, T, S, T, T, S, //
];
