//! Backtracking search that folds a chain into a cube.
//!
//! The search is depth-first over (root cell, root heading) pairs in
//! canonical order: cells in x-major scan order, headings in the order of
//! [`directions`](crate::geometry::directions). Below each root, candidate
//! headings come from [`turn_options`] in the same canonical order.
//!
//! Solutions are produced lazily by [`Solutions`], an explicit-stack
//! iterator that suspends after each solution, so callers only pay for the
//! part of the search space they consume.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::chain::{Chain, Segment};
use crate::error::{PuzzleError, Result};
use crate::geometry::{in_bounds, move_label, step, turn_options, Coord, Direction, Move};
use crate::grid::{idx_to_coord, Grid, MAX_SIDE};

/// A chain together with the cube it must fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    chain: Chain,
    side: usize,
}

impl Puzzle {
    /// Creates a puzzle, checking that the chain fills a `side^3` cube exactly.
    pub fn new(chain: impl Into<Chain>, side: usize) -> Result<Self> {
        let chain = chain.into();
        if side == 0 || side > MAX_SIDE {
            return Err(PuzzleError::SideOutOfRange(side));
        }
        let expected = side * side * side - 1;
        if chain.len() != expected {
            return Err(PuzzleError::LengthMismatch {
                side,
                expected,
                actual: chain.len(),
            });
        }
        Ok(Self { chain, side })
    }

    /// Creates a puzzle whose side is the integer cube root of the cube count.
    pub fn from_chain(chain: impl Into<Chain>) -> Result<Self> {
        let chain = chain.into();
        let cubes = chain.cube_count();
        let side = (1..=MAX_SIDE)
            .find(|side| side * side * side >= cubes)
            .filter(|side| side * side * side == cubes)
            .ok_or(PuzzleError::NotACube(cubes))?;
        Self::new(chain, side)
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of cubes in the chain (`side^3`).
    pub fn cube_count(&self) -> usize {
        self.chain.cube_count()
    }

    /// Lazily enumerates every folding in canonical order.
    pub fn solutions(&self) -> Solutions<'_> {
        Solutions::new(&self.chain, self.side)
    }

    /// The first folding in canonical order, if any.
    pub fn first_solution(&self) -> Option<Solution> {
        self.solutions().next()
    }

    /// Counts every folding without keeping them.
    pub fn count_solutions(&self) -> usize {
        self.solutions().count()
    }

    /// Collects foldings on the rayon pool, in canonical order.
    ///
    /// Every root is its own task and each forked branch works on its own
    /// copy of the grid. With a `limit`, roots after the first root whose
    /// prefix already holds `limit` solutions are skipped or cancelled.
    pub fn par_solutions(&self, fan_out: FanOut, limit: Option<usize>) -> Vec<Solution> {
        self.par_search(fan_out, limit.unwrap_or(usize::MAX)).0
    }

    /// Capped parallel search; also returns how many roots started searching.
    fn par_search(&self, fan_out: FanOut, limit: usize) -> (Vec<Solution>, usize) {
        if limit == 0 {
            return (Vec::new(), 0);
        }
        let cap = Cap::new(limit, root_count(self.side));

        let found: Vec<Vec<Solution>> = (0..cap.found.len())
            .into_par_iter()
            .map(|root_index| {
                if cap.is_cancelled(root_index) {
                    return Vec::new();
                }
                cap.started.fetch_add(1, Ordering::Relaxed);
                let stop = StopSignal {
                    cutoff: &cap.cutoff,
                    root_index,
                };
                let solutions =
                    self.expand(Seed::root(self.side, root_index), fan_out, limit, stop);
                cap.finish(root_index, solutions.len());
                solutions
            })
            .collect();
        let solutions: Vec<Solution> = found.into_iter().flatten().take(limit).collect();

        let started = cap.started.load(Ordering::Relaxed);
        info!(
            solutions = solutions.len(),
            roots = started,
            ?fan_out,
            "parallel search finished"
        );
        (solutions, started)
    }

    /// Counts every folding on the rayon pool.
    pub fn par_count(&self, fan_out: FanOut) -> usize {
        let count = (0..root_count(self.side))
            .into_par_iter()
            .map(|root_index| self.count_from(Seed::root(self.side, root_index), fan_out))
            .sum();
        info!(count, ?fan_out, "parallel count finished");
        count
    }

    /// Runs one subtree, forking sibling branches while within the fan-out depth.
    fn expand(
        &self,
        seed: Seed,
        fan_out: FanOut,
        limit: usize,
        stop: StopSignal<'_>,
    ) -> Vec<Solution> {
        if !fan_out.forks_at(seed.moves.len(), self.chain.len()) {
            return Solutions::from_seed(&self.chain, seed, Some(stop))
                .take(limit)
                .collect();
        }
        let branches: Vec<Vec<Solution>> = seed
            .children(&self.chain)
            .into_par_iter()
            .map(|child| self.expand(child, fan_out, limit, stop))
            .collect();
        branches.into_iter().flatten().take(limit).collect()
    }

    fn count_from(&self, seed: Seed, fan_out: FanOut) -> usize {
        if !fan_out.forks_at(seed.moves.len(), self.chain.len()) {
            return Solutions::from_seed(&self.chain, seed, None).count();
        }
        seed.children(&self.chain)
            .into_par_iter()
            .map(|child| self.count_from(child, fan_out))
            .sum()
    }
}

/// How far the parallel search forks work onto separate tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOut {
    /// One task per root; everything below a root runs sequentially.
    #[default]
    Roots,
    /// Additionally fork each candidate heading for the first `n` joints.
    ///
    /// Straight joints have a single candidate, so in practice this splits
    /// turns only.
    Branches(usize),
}

impl FanOut {
    fn forks_at(self, depth: usize, chain_len: usize) -> bool {
        match self {
            FanOut::Roots => false,
            FanOut::Branches(max_depth) => depth < max_depth && depth < chain_len,
        }
    }
}

/// A complete folding: where the chain starts and each step it takes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution {
    /// Cell of the first cube.
    pub root: Coord,
    /// Heading the first joint is measured against.
    pub heading: Direction,
    /// One move per joint, in chain order.
    pub moves: Vec<Move>,
}

impl Solution {
    /// The heading of every step, in chain order.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.moves.iter().map(|mv| mv.direction())
    }

    /// Replays the moves from the root: one cell per cube.
    pub fn positions(&self) -> Vec<Coord> {
        let mut positions = Vec::with_capacity(self.moves.len() + 1);
        positions.push(self.root);
        let mut cell = self.root;
        for direction in self.directions() {
            cell = step(cell, direction);
            positions.push(cell);
        }
        positions
    }

    /// Checks that this folding really solves `puzzle`.
    pub fn verify(&self, puzzle: &Puzzle) -> std::result::Result<(), Violation> {
        if self.moves.len() != puzzle.chain.len() {
            return Err(Violation::WrongLength {
                expected: puzzle.chain.len(),
                actual: self.moves.len(),
            });
        }

        let mut grid = Grid::new(puzzle.side);
        for (cube, cell) in self.positions().into_iter().enumerate() {
            if !in_bounds(cell, puzzle.side) {
                return Err(Violation::OutOfBounds { cube, cell });
            }
            if grid.is_occupied(cell) {
                return Err(Violation::Collision { cube, cell });
            }
            grid.occupy(cell);
        }

        let mut previous = self.heading;
        for (joint, (segment, heading)) in puzzle.chain.iter().zip(self.directions()).enumerate() {
            let complies = match segment {
                Segment::Straight => heading == previous,
                Segment::Turn => heading.is_orthogonal(previous),
            };
            if !complies {
                return Err(Violation::Joint {
                    joint,
                    segment: *segment,
                });
            }
            previous = heading;
        }
        Ok(())
    }
}

/// Why a candidate folding does not solve a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("expected {expected} moves, found {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("cube {cube} lands outside the cube at {cell:?}")]
    OutOfBounds { cube: usize, cell: Coord },

    #[error("cube {cube} collides at {cell:?}")]
    Collision { cube: usize, cell: Coord },

    #[error("joint {joint} is {segment:?} but the fold disagrees")]
    Joint { joint: usize, segment: Segment },
}

/// Number of (cell, heading) roots of a `side^3` cube.
fn root_count(side: usize) -> usize {
    side * side * side * Direction::ALL.len()
}

/// The root at `root_index` in canonical order.
fn root_at(side: usize, root_index: usize) -> (Coord, Direction) {
    let per_cell = Direction::ALL.len();
    (
        idx_to_coord(side, root_index / per_cell),
        Direction::ALL[root_index % per_cell],
    )
}

/// Marker for a root whose solution count is not known yet.
const PENDING: usize = usize::MAX;

/// Shared bookkeeping of a capped parallel search.
struct Cap {
    limit: usize,
    /// Solutions found per root, `PENDING` until the root finishes.
    found: Vec<AtomicUsize>,
    /// Lowest root whose prefix of roots holds `limit` solutions.
    cutoff: AtomicUsize,
    started: AtomicUsize,
}

impl Cap {
    fn new(limit: usize, roots: usize) -> Self {
        Self {
            limit,
            found: (0..roots).map(|_| AtomicUsize::new(PENDING)).collect(),
            cutoff: AtomicUsize::new(usize::MAX),
            started: AtomicUsize::new(0),
        }
    }

    fn is_cancelled(&self, root_index: usize) -> bool {
        root_index > self.cutoff.load(Ordering::Acquire)
    }

    /// Records a finished root and moves the cutoff if a prefix is now full.
    fn finish(&self, root_index: usize, count: usize) {
        self.found[root_index].store(count, Ordering::Release);
        let mut total = 0usize;
        for (index, found) in self.found.iter().enumerate() {
            let count = found.load(Ordering::Acquire);
            if count == PENDING {
                return;
            }
            total = total.saturating_add(count);
            if total >= self.limit {
                self.cutoff.fetch_min(index, Ordering::AcqRel);
                return;
            }
        }
    }
}

/// Lets a running subtree notice that its root is past the cutoff.
#[derive(Clone, Copy)]
struct StopSignal<'a> {
    cutoff: &'a AtomicUsize,
    root_index: usize,
}

impl StopSignal<'_> {
    #[inline]
    fn is_raised(self) -> bool {
        self.root_index > self.cutoff.load(Ordering::Relaxed)
    }
}

/// Search steps between two polls of the stop signal.
const STOP_POLL_INTERVAL: u32 = 1024;

/// A partial folding handed to a forked task, with its own grid.
struct Seed {
    grid: Grid,
    root: Coord,
    root_heading: Direction,
    cell: Coord,
    heading: Direction,
    moves: Vec<Move>,
}

impl Seed {
    fn root(side: usize, root_index: usize) -> Self {
        let (cell, heading) = root_at(side, root_index);
        let mut grid = Grid::new(side);
        grid.occupy(cell);
        Self {
            grid,
            root: cell,
            root_heading: heading,
            cell,
            heading,
            moves: Vec::new(),
        }
    }

    /// One seed per viable next step, each with a copied grid.
    fn children(&self, chain: &[Segment]) -> Vec<Seed> {
        turn_options(chain[self.moves.len()], self.heading)
            .iter()
            .filter_map(|&heading| {
                let cell = step(self.cell, heading);
                if !self.grid.is_free(cell) {
                    return None;
                }
                let mut grid = self.grid.clone();
                grid.occupy(cell);
                let mut moves = self.moves.clone();
                moves.push(move_label(self.cell, cell));
                Some(Seed {
                    grid,
                    root: self.root,
                    root_heading: self.root_heading,
                    cell,
                    heading,
                    moves,
                })
            })
            .collect()
    }
}

/// One placed cube on the search stack.
#[derive(Clone, Copy)]
struct Frame {
    cell: Coord,
    heading: Direction,
    /// Index of the next candidate heading to try from this cube.
    next_option: usize,
}

/// Lazy depth-first enumeration of foldings.
///
/// The occupancy grid is mutated in place: a cell is filled when the search
/// steps onto it and cleared when the search backtracks past it, so the grid
/// is empty again whenever a root has been exhausted.
pub struct Solutions<'a> {
    chain: &'a [Segment],
    grid: Grid,
    /// Placed cubes of the current branch; the last one is the chain's head.
    frames: Vec<Frame>,
    moves: Vec<Move>,
    /// Root of the branch being explored.
    origin: (Coord, Direction),
    next_root: usize,
    root_count: usize,
    emitted: usize,
    stop: Option<StopSignal<'a>>,
    steps: u32,
}

impl<'a> Solutions<'a> {
    fn new(chain: &'a [Segment], side: usize) -> Self {
        Self {
            chain,
            grid: Grid::new(side),
            frames: Vec::with_capacity(chain.len() + 1),
            moves: Vec::with_capacity(chain.len()),
            origin: ((0, 0, 0), Direction::PosX),
            next_root: 0,
            root_count: root_count(side),
            emitted: 0,
            stop: None,
            steps: 0,
        }
    }

    /// Enumerates only the subtree below a partial folding.
    fn from_seed(chain: &'a [Segment], seed: Seed, stop: Option<StopSignal<'a>>) -> Self {
        let mut frames = Vec::with_capacity(chain.len() + 1 - seed.moves.len());
        frames.push(Frame {
            cell: seed.cell,
            heading: seed.heading,
            next_option: 0,
        });
        Self {
            chain,
            grid: seed.grid,
            frames,
            moves: seed.moves,
            origin: (seed.root, seed.root_heading),
            next_root: 0,
            root_count: 0,
            emitted: 0,
            stop,
            steps: 0,
        }
    }

    /// The live occupancy grid of the search.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Places the next root, or returns false when every root is used.
    fn start_next_root(&mut self) -> bool {
        if self.next_root >= self.root_count {
            return false;
        }
        let (cell, heading) = root_at(self.grid.side(), self.next_root);
        self.next_root += 1;
        trace!(?cell, ?heading, "starting root");

        self.origin = (cell, heading);
        self.grid.occupy(cell);
        self.frames.push(Frame {
            cell,
            heading,
            next_option: 0,
        });
        true
    }

    /// Removes the chain's head cube, restoring the grid for its siblings.
    fn backtrack(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.grid.release(frame.cell);
            if self.frames.is_empty() {
                trace!(root = ?self.origin, "root exhausted");
            } else {
                self.moves.pop();
            }
        }
    }
}

impl Iterator for Solutions<'_> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        loop {
            if let Some(stop) = self.stop {
                self.steps = self.steps.wrapping_add(1);
                if self.steps % STOP_POLL_INTERVAL == 0 && stop.is_raised() {
                    trace!(root = ?self.origin, "subtree cancelled");
                    self.frames.clear();
                    return None;
                }
            }

            let Some(head) = self.frames.last_mut() else {
                if self.start_next_root() {
                    continue;
                }
                return None;
            };

            let depth = self.moves.len();
            if depth == self.chain.len() {
                let (root, heading) = self.origin;
                let solution = Solution {
                    root,
                    heading,
                    moves: self.moves.clone(),
                };
                self.emitted += 1;
                debug!(index = self.emitted, ?root, ?heading, "solution found");
                self.backtrack();
                return Some(solution);
            }

            let options = turn_options(self.chain[depth], head.heading);
            let mut advance = None;
            while let Some(&heading) = options.get(head.next_option) {
                head.next_option += 1;
                let cell = step(head.cell, heading);
                if self.grid.is_free(cell) {
                    advance = Some((cell, heading, move_label(head.cell, cell)));
                    break;
                }
            }

            match advance {
                Some((cell, heading, label)) => {
                    self.grid.occupy(cell);
                    self.moves.push(label);
                    self.frames.push(Frame {
                        cell,
                        heading,
                        next_option: 0,
                    });
                }
                None => self.backtrack(),
            }
        }
    }
}
