//! Snake Cube Solver
//!
//! Folds a chain of 64 unit cubes, each joined to the next either straight or
//! at a right angle, into a 4x4x4 cube, and prints the moves of the first
//! folding found. Other chains and cube sizes can be given on the command line.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use snake_cube::chain::{Chain, SNAKE_CUBE};
use snake_cube::grid::format_placement;
use snake_cube::{FanOut, Puzzle, PuzzleError, Solution, Violation};

/// Solves snake cube folding puzzles.
#[derive(Parser)]
#[command(name = "snake-cube")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    puzzle: PuzzleArgs,

    /// Log search progress at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct PuzzleArgs {
    /// Chain joints: S or F for straight, T for turn. Defaults to the 4x4x4 snake.
    #[arg(long, global = true)]
    chain: Option<String>,

    /// Cube side; derived from the chain length when omitted.
    #[arg(long, global = true)]
    side: Option<usize>,

    /// Fork sibling branches onto worker threads for this many joints (0 = roots only).
    #[arg(long, global = true, default_value_t = 0)]
    jobs_depth: usize,

    /// Search on the current thread only.
    #[arg(long, global = true)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the moves of the first foldings.
    Solve {
        /// Number of foldings to print.
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Count every folding.
    Count {
        /// Count foldings distinct under rotation and reflection.
        #[arg(long)]
        distinct: bool,
    },
    /// Show the first folding as z-slices of cube numbers.
    Show,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let puzzle = match cli.puzzle.build() {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("Invalid puzzle: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        cubes = puzzle.cube_count(),
        side = puzzle.side(),
        chain = %puzzle.chain(),
        "puzzle"
    );

    match cli.command.unwrap_or(Command::Solve { count: 1 }) {
        Command::Solve { count } => {
            let solutions = cli.puzzle.first_solutions(&puzzle, count);
            match render_solutions(&puzzle, &solutions) {
                Ok(output) => print!("{}", output),
                Err(e) => return internal_error(e),
            }
        }
        Command::Count { distinct: true } => {
            println!("{} distinct solutions", puzzle.distinct_solutions().count());
        }
        Command::Count { distinct: false } => {
            println!("{} solutions", cli.puzzle.count(&puzzle));
        }
        Command::Show => match cli.puzzle.first_solutions(&puzzle, 1).first() {
            Some(solution) => match solution.verify(&puzzle) {
                Ok(()) => print!("{}", format_placement(puzzle.side(), &solution.positions())),
                Err(e) => return internal_error(e),
            },
            None => println!("No solution"),
        },
    }
    ExitCode::SUCCESS
}

/// Reports a folding the search should never have produced.
fn internal_error(violation: Violation) -> ExitCode {
    tracing::error!(%violation, "search produced an invalid folding");
    eprintln!("Internal error: {}", violation);
    ExitCode::FAILURE
}

impl PuzzleArgs {
    fn build(&self) -> Result<Puzzle, PuzzleError> {
        let chain = match &self.chain {
            Some(text) => text.parse::<Chain>()?,
            None => Chain::from(&SNAKE_CUBE[..]),
        };
        match self.side {
            Some(side) => Puzzle::new(chain, side),
            None => Puzzle::from_chain(chain),
        }
    }

    fn fan_out(&self) -> FanOut {
        match self.jobs_depth {
            0 => FanOut::Roots,
            depth => FanOut::Branches(depth),
        }
    }

    fn first_solutions(&self, puzzle: &Puzzle, count: usize) -> Vec<Solution> {
        if self.sequential {
            puzzle.solutions().take(count).collect()
        } else {
            puzzle.par_solutions(self.fan_out(), Some(count))
        }
    }

    fn count(&self, puzzle: &Puzzle) -> usize {
        if self.sequential {
            puzzle.count_solutions()
        } else {
            puzzle.par_count(self.fan_out())
        }
    }
}

/// Checks every solution against the puzzle, then renders them all.
fn render_solutions(puzzle: &Puzzle, solutions: &[Solution]) -> Result<String, Violation> {
    if solutions.is_empty() {
        return Ok("No solution\n".to_string());
    }
    let mut output = String::new();
    for (i, solution) in solutions.iter().enumerate() {
        solution.verify(puzzle)?;
        output.push_str(&format_moves(i + 1, solution));
    }
    Ok(output)
}

/// Renders one solution as numbered move labels.
fn format_moves(number: usize, solution: &Solution) -> String {
    let mut output = format!("Solution {}:\n", number);
    for (step, mv) in solution.moves.iter().enumerate() {
        output.push_str(&format!("{:>3}. {}\n", step + 1, mv));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_cube::chain::TOY_CUBE;

    #[test]
    fn test_first_toy_solution_snapshot() {
        let puzzle = Puzzle::new(&TOY_CUBE[..], 2).unwrap();
        let solution = puzzle.first_solution().unwrap();

        insta::assert_snapshot!(format_moves(1, &solution), @r"
        Solution 1:
          1. Forward
          2. Right
          3. Backward
          4. Up
          5. Forward
          6. Left
          7. Backward
        ");
    }

    #[test]
    fn test_render_rejects_invalid_foldings() {
        let puzzle = Puzzle::new(&TOY_CUBE[..], 2).unwrap();
        let mut solution = puzzle.first_solution().unwrap();
        assert!(render_solutions(&puzzle, std::slice::from_ref(&solution))
            .unwrap()
            .starts_with("Solution 1:\n"));

        solution.moves[6] = snake_cube::Move::Down;
        assert!(matches!(
            render_solutions(&puzzle, &[solution]),
            Err(Violation::Collision { cube: 7, .. })
        ));
        assert_eq!(render_solutions(&puzzle, &[]).unwrap(), "No solution\n");
    }

    #[test]
    fn test_default_puzzle_is_the_4x4x4_snake() {
        let args = PuzzleArgs {
            chain: None,
            side: None,
            jobs_depth: 0,
            sequential: true,
        };
        let puzzle = args.build().unwrap();
        assert_eq!(puzzle.side(), 4);
        assert_eq!(puzzle.cube_count(), 64);
    }

    #[test]
    fn test_chain_text_and_side_are_validated() {
        let args = PuzzleArgs {
            chain: Some("STTTTTT".into()),
            side: Some(3),
            jobs_depth: 2,
            sequential: false,
        };
        assert!(matches!(
            args.build(),
            Err(PuzzleError::LengthMismatch { expected: 26, .. })
        ));
        assert_eq!(args.fan_out(), FanOut::Branches(2));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["snake-cube", "solve", "--count", "3", "--chain", "STTTTTT"]);
        assert!(matches!(cli.command, Some(Command::Solve { count: 3 })));
        assert_eq!(cli.puzzle.chain.as_deref(), Some("STTTTTT"));
    }
}
