//! Cube-grid geometry: cells, unit directions, turns and move labels.
//!
//! Everything here is pure. Directions are enumerated in one canonical order
//! (`+x, -x, +y, -y, +z, -z`) and every derived table preserves it, because
//! that order decides which solution the search reports first.

use std::fmt;

use crate::chain::Segment;
use crate::error::GeometryError;

/// A 3D integer coordinate: a grid cell or a unit offset.
pub type Coord = (i32, i32, i32);

/// One of the six axis-aligned unit vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    /// All six directions in canonical order.
    pub const ALL: [Direction; 6] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
        Direction::PosZ,
        Direction::NegZ,
    ];

    /// The unit vector of this direction.
    #[inline]
    pub const fn offset(self) -> Coord {
        match self {
            Direction::PosX => (1, 0, 0),
            Direction::NegX => (-1, 0, 0),
            Direction::PosY => (0, 1, 0),
            Direction::NegY => (0, -1, 0),
            Direction::PosZ => (0, 0, 1),
            Direction::NegZ => (0, 0, -1),
        }
    }

    /// Position of this direction in [`Direction::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Dot product of the two unit vectors.
    #[inline]
    pub const fn dot(self, other: Direction) -> i32 {
        let (ax, ay, az) = self.offset();
        let (bx, by, bz) = other.offset();
        ax * bx + ay * by + az * bz
    }

    #[inline]
    pub const fn is_orthogonal(self, other: Direction) -> bool {
        self.dot(other) == 0
    }
}

impl TryFrom<Coord> for Direction {
    type Error = GeometryError;

    fn try_from(vector: Coord) -> Result<Self, Self::Error> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.offset() == vector)
            .ok_or(GeometryError::InvalidDirection(vector))
    }
}

/// The six unit directions in canonical order.
pub const fn directions() -> [Direction; 6] {
    Direction::ALL
}

/// Candidate headings after a straight joint, indexed by current heading.
const STRAIGHT_OPTIONS: [[Direction; 1]; 6] = [
    [Direction::PosX],
    [Direction::NegX],
    [Direction::PosY],
    [Direction::NegY],
    [Direction::PosZ],
    [Direction::NegZ],
];

/// Candidate headings after a turning joint, indexed by current heading.
///
/// Each row lists the four orthogonal directions in canonical order.
const TURN_OPTIONS: [[Direction; 4]; 6] = [
    [Direction::PosY, Direction::NegY, Direction::PosZ, Direction::NegZ],
    [Direction::PosY, Direction::NegY, Direction::PosZ, Direction::NegZ],
    [Direction::PosX, Direction::NegX, Direction::PosZ, Direction::NegZ],
    [Direction::PosX, Direction::NegX, Direction::PosZ, Direction::NegZ],
    [Direction::PosX, Direction::NegX, Direction::PosY, Direction::NegY],
    [Direction::PosX, Direction::NegX, Direction::PosY, Direction::NegY],
];

/// Headings the chain may take after `segment` when it currently points `current`.
///
/// A straight joint keeps the heading; a turn allows the four orthogonal ones.
#[inline]
pub fn turn_options(segment: Segment, current: Direction) -> &'static [Direction] {
    match segment {
        Segment::Straight => &STRAIGHT_OPTIONS[current.index()],
        Segment::Turn => &TURN_OPTIONS[current.index()],
    }
}

/// Moves one cell from `cell` along `direction`.
#[inline(always)]
pub const fn step(cell: Coord, direction: Direction) -> Coord {
    let (dx, dy, dz) = direction.offset();
    (cell.0 + dx, cell.1 + dy, cell.2 + dz)
}

/// True when every coordinate lies in `0..side`.
#[inline(always)]
pub fn in_bounds(cell: Coord, side: usize) -> bool {
    let side = side as i32;
    (0..side).contains(&cell.0) && (0..side).contains(&cell.1) && (0..side).contains(&cell.2)
}

/// Human-facing label of a single step.
///
/// Fixed axis convention: `+x` Forward, `-x` Backward, `+y` Right,
/// `-y` Left, `+z` Up, `-z` Down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Move {
    /// Label for a step taken along `direction`.
    pub const fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::PosX => Move::Forward,
            Direction::NegX => Move::Backward,
            Direction::PosY => Move::Right,
            Direction::NegY => Move::Left,
            Direction::PosZ => Move::Up,
            Direction::NegZ => Move::Down,
        }
    }

    /// The direction this label stands for.
    pub const fn direction(self) -> Direction {
        match self {
            Move::Forward => Direction::PosX,
            Move::Backward => Direction::NegX,
            Move::Right => Direction::PosY,
            Move::Left => Direction::NegY,
            Move::Up => Direction::PosZ,
            Move::Down => Direction::NegZ,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Move::Forward => "Forward",
            Move::Backward => "Backward",
            Move::Left => "Left",
            Move::Right => "Right",
            Move::Up => "Up",
            Move::Down => "Down",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies the step between two adjacent cells.
pub fn try_move_label(from: Coord, to: Coord) -> Result<Move, GeometryError> {
    let delta = (to.0 - from.0, to.1 - from.1, to.2 - from.2);
    Direction::try_from(delta)
        .map(Move::from_direction)
        .map_err(|_| GeometryError::NotAdjacent { from, to })
}

/// Classifies the step between two adjacent cells.
///
/// # Panics
///
/// Panics when the cells are not neighbours. The search only ever steps to
/// neighbouring cells, so this indicates a broken invariant, not a puzzle
/// property.
pub fn move_label(from: Coord, to: Coord) -> Move {
    match try_move_label(from, to) {
        Ok(label) => label,
        Err(err) => panic!("invariant violated: {err}"),
    }
}

/// A symmetry of the cube about its centre: an axis permutation with a sign per axis.
///
/// Output axis `i` reads input axis `axes[i]` and multiplies it by `signs[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symmetry {
    axes: [usize; 3],
    signs: [i32; 3],
}

impl Symmetry {
    /// Applies the symmetry to a centred coordinate.
    #[inline]
    pub const fn apply(self, (x, y, z): Coord) -> Coord {
        let input = [x, y, z];
        (
            self.signs[0] * input[self.axes[0]],
            self.signs[1] * input[self.axes[1]],
            self.signs[2] * input[self.axes[2]],
        )
    }

    /// True for proper rotations, false for mirror images.
    pub const fn is_rotation(self) -> bool {
        let [a, b, c] = self.axes;
        // even permutations are the cyclic shifts of (0, 1, 2)
        let parity = if (a + 1) % 3 == b && (b + 1) % 3 == c { 1 } else { -1 };
        parity * self.signs[0] * self.signs[1] * self.signs[2] == 1
    }
}

/// The six axis permutations.
const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Builds all 48 cube symmetries at compile time.
///
/// Ordered by permutation, then by sign pattern with bit `i` of the pattern
/// negating axis `i`. Index 0 is the identity.
const fn build_symmetries() -> [Symmetry; 48] {
    let mut table = [Symmetry {
        axes: [0, 1, 2],
        signs: [1, 1, 1],
    }; 48];

    let mut perm = 0;
    while perm < PERMUTATIONS.len() {
        let mut pattern = 0;
        while pattern < 8 {
            let mut signs = [1; 3];
            let mut axis = 0;
            while axis < 3 {
                if pattern & (1 << axis) != 0 {
                    signs[axis] = -1;
                }
                axis += 1;
            }
            table[perm * 8 + pattern] = Symmetry {
                axes: PERMUTATIONS[perm],
                signs,
            };
            pattern += 1;
        }
        perm += 1;
    }
    table
}

/// Every rotation and reflection of a cube.
pub const SYMMETRIES: [Symmetry; 48] = build_symmetries();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_are_distinct_unit_vectors() {
        let dirs = directions();
        for (i, a) in dirs.iter().enumerate() {
            assert_eq!(a.dot(*a), 1, "{a:?} is not a unit vector");
            assert_eq!(a.index(), i);
            for b in &dirs[i + 1..] {
                assert_ne!(a.offset(), b.offset());
            }
        }
    }

    #[test]
    fn test_straight_keeps_heading() {
        for dir in directions() {
            assert_eq!(turn_options(Segment::Straight, dir), &[dir]);
        }
    }

    #[test]
    fn test_turn_offers_four_orthogonal_headings_in_canonical_order() {
        for dir in directions() {
            let options = turn_options(Segment::Turn, dir);
            let expected: Vec<Direction> = directions()
                .into_iter()
                .filter(|d| d.is_orthogonal(dir))
                .collect();
            assert_eq!(options, expected.as_slice(), "turn options for {dir:?}");
        }
    }

    #[test]
    fn test_try_from_rejects_non_unit_vectors() {
        assert_eq!(Direction::try_from((0, 0, -1)), Ok(Direction::NegZ));
        for bad in [(0, 0, 0), (1, 1, 0), (2, 0, 0), (-1, 0, 1)] {
            assert_eq!(
                Direction::try_from(bad),
                Err(GeometryError::InvalidDirection(bad))
            );
        }
    }

    #[test]
    fn test_bounds() {
        assert!(in_bounds((0, 0, 0), 4));
        assert!(in_bounds((3, 3, 3), 4));
        assert!(!in_bounds((4, 0, 0), 4));
        assert!(!in_bounds((0, -1, 0), 4));
        assert!(!in_bounds((0, 0, 0), 0));
    }

    #[test]
    fn test_move_labels_follow_axis_convention() {
        let origin = (1, 1, 1);
        let expected = [
            Move::Forward,
            Move::Backward,
            Move::Right,
            Move::Left,
            Move::Up,
            Move::Down,
        ];
        for (dir, label) in directions().into_iter().zip(expected) {
            assert_eq!(move_label(origin, step(origin, dir)), label);
            assert_eq!(label.direction(), dir);
        }
        assert_eq!(Move::Left.to_string(), "Left");
    }

    #[test]
    fn test_try_move_label_reports_non_adjacent_cells() {
        assert_eq!(
            try_move_label((0, 0, 0), (2, 0, 0)),
            Err(GeometryError::NotAdjacent {
                from: (0, 0, 0),
                to: (2, 0, 0)
            })
        );
    }

    #[test]
    #[should_panic(expected = "invariant violated")]
    fn test_move_label_panics_on_diagonal_step() {
        move_label((0, 0, 0), (1, 1, 0));
    }

    #[test]
    fn test_symmetries_are_distinct_and_preserve_length() {
        let point = (1, 2, 3);
        let mut images: Vec<Coord> = SYMMETRIES.iter().map(|sym| sym.apply(point)).collect();
        for &(x, y, z) in &images {
            assert_eq!(x * x + y * y + z * z, 14);
        }
        images.sort();
        images.dedup();
        assert_eq!(images.len(), 48, "symmetries must be pairwise distinct");
        assert_eq!(SYMMETRIES[0].apply(point), point, "index 0 must be the identity");
    }

    #[test]
    fn test_half_of_the_symmetries_are_rotations() {
        let rotations: Vec<&Symmetry> = SYMMETRIES.iter().filter(|sym| sym.is_rotation()).collect();
        assert_eq!(rotations.len(), 24);

        // a quarter turn about z keeps handedness, a single mirror flips it
        let quarter = Symmetry {
            axes: [1, 0, 2],
            signs: [-1, 1, 1],
        };
        assert_eq!(quarter.apply((1, 0, 0)), (0, 1, 0));
        assert!(quarter.is_rotation());
        let mirror = Symmetry {
            axes: [0, 1, 2],
            signs: [-1, 1, 1],
        };
        assert!(!mirror.is_rotation());
    }
}
