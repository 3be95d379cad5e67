//! End-to-end folding scenarios.

use std::collections::HashSet;

use snake_cube::chain::{Chain, Segment, SERPENTINE_CUBE, SNAKE_CUBE, TOY_CUBE};
use snake_cube::geometry::{step, Coord};
use snake_cube::{Direction, FanOut, Move, Puzzle, PuzzleError, Solution};

/// Asserts well-formedness, adjacency and joint compliance of a folding.
fn assert_valid(puzzle: &Puzzle, solution: &Solution) {
    let positions = solution.positions();
    let side = puzzle.side() as i32;

    assert_eq!(positions.len(), puzzle.cube_count());
    let distinct: HashSet<Coord> = positions.iter().copied().collect();
    assert_eq!(distinct.len(), positions.len(), "cells overlap");
    for &(x, y, z) in &positions {
        assert!(
            [x, y, z].iter().all(|c| (0..side).contains(c)),
            "({x}, {y}, {z}) is outside the cube"
        );
    }

    for (i, mv) in solution.moves.iter().enumerate() {
        assert_eq!(positions[i + 1], step(positions[i], mv.direction()));
    }

    let mut previous = solution.heading;
    for (segment, heading) in puzzle.chain().iter().zip(solution.directions()) {
        match segment {
            Segment::Straight => assert_eq!(heading, previous),
            Segment::Turn => assert_eq!(heading.dot(previous), 0),
        }
        previous = heading;
    }

    assert_eq!(solution.verify(puzzle), Ok(()));
}

#[test]
fn test_toy_cube_exhaustive() {
    let puzzle = Puzzle::new(&TOY_CUBE[..], 2).unwrap();
    let solutions: Vec<Solution> = puzzle.solutions().collect();

    // every directed Hamiltonian path of the 2x2x2 cube, once per root
    assert_eq!(solutions.len(), 144);
    for solution in &solutions {
        assert_valid(&puzzle, solution);
    }
}

#[test]
fn test_chain_with_straight_run_cannot_fill_2x2x2() {
    let chain: Chain = "STTSTTS".parse().unwrap();
    let puzzle = Puzzle::new(chain, 2).unwrap();
    assert_eq!(puzzle.solutions().next(), None);
}

#[test]
fn test_all_straight_chain_has_no_solution() {
    for side in 2..=3 {
        let chain = vec![Segment::Straight; side * side * side - 1];
        let puzzle = Puzzle::new(chain, side).unwrap();
        assert_eq!(puzzle.count_solutions(), 0, "side {side}");
        assert!(puzzle.par_solutions(FanOut::Branches(3), None).is_empty());
    }
}

#[test]
fn test_search_is_deterministic() {
    let puzzle = Puzzle::new(&SERPENTINE_CUBE[..], 3).unwrap();
    let first: Vec<Solution> = puzzle.solutions().take(50).collect();
    let second: Vec<Solution> = puzzle.solutions().take(50).collect();
    assert_eq!(first, second);
    for solution in &first {
        assert_valid(&puzzle, solution);
    }
}

#[test]
fn test_wrong_chain_length_fails_before_searching() {
    assert_eq!(
        Puzzle::new(&TOY_CUBE[..], 4),
        Err(PuzzleError::LengthMismatch {
            side: 4,
            expected: 63,
            actual: 7
        })
    );
}

#[test]
fn test_reference_snake_first_solution() {
    use Move::{Backward as B, Down as D, Forward as F, Left as L, Right as R, Up as U};

    let puzzle = Puzzle::from_chain(&SNAKE_CUBE[..]).unwrap();
    assert_eq!(puzzle.side(), 4);

    let first = puzzle.first_solution().expect("the snake cube is solvable");
    assert_valid(&puzzle, &first);
    assert_eq!(first.root, (0, 0, 0));
    assert_eq!(first.heading, Direction::PosX);

    let expected = [
        F, F, R, B, B, U, L, F, F, F, D, R, R, B, U, U, //
        B, D, D, B, R, F, U, F, D, F, U, L, L, B, B, U, //
        B, R, D, R, U, U, L, L, L, D, F, U, R, R, R, D, //
        F, F, L, U, L, D, B, L, F, U, B, R, R, R, F, //
    ];
    assert_eq!(first.moves, expected);
}
