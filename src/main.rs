//! # sat-explorer
//!
//! `sat-explorer` runs three complete decision procedures for propositional
//! satisfiability on CNF formulas and compares their running time and memory:
//!
//! 1.  **Resolution**: saturates the clause set with resolvents until the
//!     empty clause appears or nothing new can be derived. Always run under a
//!     deadline in a worker process.
//! 2.  **DP**: splits on a literal, simplifies, and backtracks.
//! 3.  **DPLL**: DP with unit propagation before every split.
//!
//! ## Usage
//!
//! ```sh
//! # Run the built-in sweep of random 3-SAT instances
//! sat-explorer experiment
//!
//! # A custom sweep with a 2 second deadline and a fixed seed
//! sat-explorer experiment --sizes 5x15,20x80 --timeout 2 --seed 7
//!
//! # Solve a DIMACS file (or every .cnf file below a directory) with all three
//! sat-explorer file --path problem.cnf --verify
//!
//! # Solve with one procedure only
//! sat-explorer problem.cnf --algorithm dpll --print-solution
//!
//! # Solve a formula given inline
//! sat-explorer text --input "1 -2 0\n2 3 0"
//!
//! # Write a random instance
//! sat-explorer generate --vars 20 --clauses 85 --seed 1 > random.cnf
//!
//! # Shell completions
//! sat-explorer completions zsh
//! ```
//!
//! Set `RUST_LOG` (or pass `--debug`) for log output on stderr.

mod command_line;

use crate::command_line::cli::{Cli, Commands, print_record, solve_and_report, solve_path};
use clap::{CommandFactory, Parser};
use log::LevelFilter;
use sat_explorer::experiment::{Experiment, ExperimentConfig};
use sat_explorer::sat::bounded::Harness;
use sat_explorer::sat::dimacs::parse_str;
use sat_explorer::sat::generator::random_cnf;
use sat_explorer::sat::worker::run_worker;
use std::io;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// statistics.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Main entry point of the sat-explorer application.
///
/// Parses command-line arguments and dispatches to the appropriate command
/// handler. Errors are printed and end the process with status 1.
fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Some(Commands::Experiment(args)) => {
            init_logging(args.debug);
            let config = ExperimentConfig::from(args);
            let harness = Harness::current_exe()
                .map_err(|e| format!("Cannot locate the running executable: {e}"))?;

            Experiment::new(config, harness)
                .run_with(print_record)
                .map_err(|e| e.to_string())?;
            println!("\nAll experiments completed!");
        }

        Some(Commands::File { path, common }) => {
            init_logging(common.debug);
            solve_path(&path, &common)?;
        }

        Some(Commands::Text { input, common }) => {
            init_logging(common.debug);
            let time = std::time::Instant::now();
            let cnf = parse_str(&input.replace("\\n", "\n")).map_err(|e| e.to_string())?;
            let elapsed = time.elapsed();

            solve_and_report(&cnf, &common, None, elapsed);
        }

        Some(Commands::Generate {
            vars,
            clauses,
            clause_size,
            seed,
        }) => {
            let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
            let seed = rng.get_seed();
            let cnf = random_cnf(vars, clauses, clause_size, &mut rng).map_err(|e| e.to_string())?;
            println!("c random {clause_size}-CNF, seed {seed}");
            print!("{cnf}");
        }

        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "sat-explorer",
                &mut io::stdout(),
            );
        }

        Some(Commands::Worker { algorithm }) => {
            init_logging(false);
            run_worker(algorithm, io::stdin().lock(), io::stdout().lock())
                .map_err(|e| e.to_string())?;
        }

        None => {
            init_logging(cli.common.debug);
            let Some(path) = cli.path else {
                return Err("No command provided. Use --help for more information.".to_string());
            };
            solve_path(&path, &cli.common)?;
        }
    }

    Ok(())
}
