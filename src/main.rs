#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]

// #![warn(clippy::restriction)]

use std::process::ExitCode;
use std::time::{Duration, Instant};

use cli_table::{Cell, Style, Table};
#[cfg(not(feature = "no-jobs"))]
use rayon::prelude::*;

use doku::board::Board;
use doku::solver::{SolveError, Solver};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

const DEFAULT_DATASETS: [&str; 2] = ["test_data/easy50_solved", "test_data/curated20_solved"];

struct RunStats {
    dataset: String,
    puzzles: usize,
    solved: usize,
    failed: usize,
    elapsed: Duration,
}

fn main() -> ExitCode {
    #[cfg(feature = "dhat-heap")]
    let _heap_profiler = dhat::Profiler::new_heap();
    #[cfg(feature = "dhat-ad-hoc")]
    let _ad_hoc_profiler = dhat::Profiler::new_ad_hoc();

    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if let [single] = args.as_slice() {
        if looks_like_puzzle(single) {
            return solve_one(single);
        }
    }

    if args.is_empty() {
        let paths: Vec<String> = DEFAULT_DATASETS.iter().map(|&path| path.to_owned()).collect();
        run_batch(&paths)
    } else {
        run_batch(&args)
    }
}

fn looks_like_puzzle(arg: &str) -> bool {
    arg.len() == 81 && arg.bytes().all(|byte| byte.is_ascii_digit() || byte == b'.')
}

fn solve_one(line: &str) -> ExitCode {
    let board = match line.parse::<Board>() {
        Ok(board) => board,
        Err(err) => {
            log::error!("invalid puzzle: {err}");
            return ExitCode::from(2);
        }
    };

    let mut solver = Solver::new(board);
    let started = Instant::now();
    match solver.solve() {
        Ok(solved) => {
            log::info!("solved {} clue puzzle in {:?}", board.clue_count(), started.elapsed());
            print!("{solved}");
            ExitCode::SUCCESS
        }
        Err(SolveError::AlreadySolved) => {
            log::warn!("puzzle came in already solved");
            print!("{board}");
            ExitCode::SUCCESS
        }
        Err(err @ SolveError::Unsolvable) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_batch(paths: &[String]) -> ExitCode {
    let mut runs = Vec::with_capacity(paths.len());
    for path in paths {
        match run_dataset(path) {
            Ok(stats) => runs.push(stats),
            Err(err) => {
                log::error!("could not load {path}: {err}");
                return ExitCode::from(2);
            }
        }
    }

    print_summary(&runs);

    if runs.iter().all(|stats| stats.failed == 0) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_dataset(path: &str) -> std::io::Result<RunStats> {
    let raw = std::fs::read_to_string(path)?;
    let pairs = parse_pairs(path, &raw);
    let total = pairs.len();

    let started = Instant::now();

    #[cfg(not(feature = "no-jobs"))]
    let outcomes: Vec<bool> = pairs
        .into_par_iter()
        .enumerate()
        .map(|(index, (puzzle, solution))| solve_entry(path, index, total, puzzle, solution))
        .collect();

    #[cfg(feature = "no-jobs")]
    let outcomes: Vec<bool> = pairs
        .into_iter()
        .enumerate()
        .map(|(index, (puzzle, solution))| solve_entry(path, index, total, puzzle, solution))
        .collect();

    let elapsed = started.elapsed();
    let solved = outcomes.iter().filter(|&&ok| ok).count();

    Ok(RunStats {
        dataset: path.to_owned(),
        puzzles: total,
        solved,
        failed: total - solved,
        elapsed,
    })
}

fn parse_pairs(path: &str, raw: &str) -> Vec<(Board, Option<Board>)> {
    let mut pairs = Vec::new();
    for (number, line) in raw.lines().enumerate() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (puzzle_part, solution_part) = match line.split_once(';') {
            Some((puzzle, solution)) => (puzzle, Some(solution)),
            None => (line, None),
        };
        let puzzle = match puzzle_part.parse::<Board>() {
            Ok(board) => board,
            Err(err) => {
                log::warn!("{path}:{}: skipping puzzle: {err}", number + 1);
                continue;
            }
        };
        let solution = match solution_part.map(str::parse::<Board>) {
            Some(Ok(board)) => Some(board),
            Some(Err(err)) => {
                log::warn!("{path}:{}: ignoring recorded solution: {err}", number + 1);
                None
            }
            None => None,
        };
        pairs.push((puzzle, solution));
    }
    pairs
}

fn solve_entry(
    path: &str,
    index: usize,
    total: usize,
    puzzle: Board,
    solution: Option<Board>,
) -> bool {
    let started = Instant::now();
    let mut solver = Solver::new(puzzle);
    let result = solver.solve();
    let elapsed = started.elapsed();

    match result {
        Ok(solved) => {
            let matches_recorded = solution.map_or(true, |expected| solved == expected);
            if solved.is_solved() && matches_recorded {
                log::info!("{path} {}/{total}: solved in {elapsed:?}", index + 1);
                true
            } else {
                log::error!("{path} {}/{total}: wrong completion", index + 1);
                false
            }
        }
        Err(err) => {
            log::error!("{path} {}/{total}: {err}", index + 1);
            false
        }
    }
}

fn print_summary(runs: &[RunStats]) {
    let rows: Vec<_> = runs
        .iter()
        .map(|stats| {
            let mean = if stats.puzzles == 0 {
                Duration::ZERO
            } else {
                stats.elapsed / stats.puzzles as u32
            };
            vec![
                stats.dataset.as_str().cell(),
                stats.puzzles.cell(),
                stats.solved.cell(),
                stats.failed.cell(),
                format!("{:?}", stats.elapsed).cell(),
                format!("{mean:?}").cell(),
            ]
        })
        .collect();

    let table = rows.table().title(vec![
        "dataset".cell().bold(true),
        "puzzles".cell().bold(true),
        "solved".cell().bold(true),
        "failed".cell().bold(true),
        "total".cell().bold(true),
        "mean".cell().bold(true),
    ]);

    println!("\n{}", table.display().unwrap());
}
