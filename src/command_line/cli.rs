#![allow(clippy::cast_precision_loss)]

use sat_explorer::experiment::{
    DEFAULT_CLAUSE_SIZE, DEFAULT_RESOLUTION_MAX_VARS, ExperimentConfig, Record, Run,
};
use sat_explorer::sat::assignment::Assignment;
use sat_explorer::sat::bounded::{Outcome, run_bounded_report};
use sat_explorer::sat::cnf::Cnf;
use sat_explorer::sat::dimacs::parse_file;
use sat_explorer::sat::measure::{Measurement, measure};
use sat_explorer::sat::solver::{Algorithm, SolutionStats};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Defines the command-line interface for the sat explorer application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sat-explorer",
    version,
    about = "Compare resolution, DP and DPLL on CNF formulas",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    /// An optional path argument. If provided without a subcommand,
    /// it's treated as a DIMACS .cnf file (or a directory of them) to solve.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `experiment`, `file`, `text`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable when solving a path directly.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Run every procedure on random instances of growing size.
    Experiment(ExperimentArgs),

    /// Solve a CNF file in DIMACS format, or every .cnf file under a directory.
    File {
        /// Path to the DIMACS .cnf file or directory.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula provided as plain text.
    Text {
        /// Literal CNF input as a string (e.g. "1 -2 0\n2 3 0").
        /// Literals are space-separated and 0 terminates a clause.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Print a random CNF instance in DIMACS format.
    Generate {
        /// Number of variables.
        #[arg(long)]
        vars: usize,

        /// Number of clauses.
        #[arg(long)]
        clauses: usize,

        /// Literals per clause.
        #[arg(long, default_value_t = DEFAULT_CLAUSE_SIZE)]
        clause_size: usize,

        /// Seed of the generator.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Solve one DIMACS formula read from stdin and answer on stdout.
    #[command(hide = true)]
    Worker {
        #[arg(long, value_enum)]
        algorithm: Algorithm,
    },
}

/// Options of the `experiment` subcommand.
#[derive(Args, Debug, Clone)]
pub(crate) struct ExperimentArgs {
    /// Instance sizes as VARSxCLAUSES, comma separated (e.g. "5x15,10x20").
    /// Defaults to the built-in sweep.
    #[arg(long, value_parser = parse_size, value_delimiter = ',')]
    pub sizes: Vec<(usize, usize)>,

    /// Deadline of every bounded run, in seconds.
    #[arg(long, value_parser = parse_seconds, default_value = "5")]
    pub timeout: Duration,

    /// Skip resolution on instances with more variables than this.
    #[arg(long, default_value_t = DEFAULT_RESOLUTION_MAX_VARS)]
    pub resolution_max_vars: usize,

    /// Literals per generated clause.
    #[arg(long, default_value_t = DEFAULT_CLAUSE_SIZE)]
    pub clause_size: usize,

    /// Seed of the instance generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run DP and DPLL under the deadline as well.
    #[arg(long, default_value_t = false)]
    pub bound_all: bool,

    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,
}

impl From<ExperimentArgs> for ExperimentConfig {
    fn from(args: ExperimentArgs) -> Self {
        let defaults = Self::default();
        Self {
            sizes: if args.sizes.is_empty() {
                defaults.sizes
            } else {
                args.sizes
            },
            clause_size: args.clause_size,
            timeout: args.timeout,
            resolution_max_vars: args.resolution_max_vars,
            bound_all: args.bound_all,
            seed: args.seed,
        }
    }
}

/// Defines common command-line options shared across the solving subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check every satisfying assignment against the original CNF.
    #[arg(short, long, default_value_t = false)]
    pub(crate) verify: bool,

    /// Print performance and problem statistics after solving.
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print the satisfying assignment (model) if the formula is satisfiable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// The procedure to use. All three run in turn when omitted.
    #[arg(short, long, value_enum)]
    pub(crate) algorithm: Option<Algorithm>,

    /// Deadline of resolution runs, in seconds.
    #[arg(long, value_parser = parse_seconds, default_value = "5")]
    pub(crate) timeout: Duration,
}

/// Parses `VARSxCLAUSES`.
pub(crate) fn parse_size(s: &str) -> Result<(usize, usize), String> {
    let (vars, clauses) = s
        .split_once(['x', 'X', ':'])
        .ok_or_else(|| format!("expected VARSxCLAUSES, got '{s}'"))?;
    let vars = vars
        .trim()
        .parse()
        .map_err(|e| format!("invalid variable count '{vars}': {e}"))?;
    let clauses = clauses
        .trim()
        .parse()
        .map_err(|e| format!("invalid clause count '{clauses}': {e}"))?;
    Ok((vars, clauses))
}

/// Parses a non-negative number of seconds.
pub(crate) fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid number of seconds '{s}': {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid timeout '{s}': {e}"))
}

/// Solves a directory of CNF files.
/// This function iterates over all `.cnf` files in the directory, parses each file,
/// solves it, and reports the results.
///
/// # Errors
///
/// If the path is not a directory or a file cannot be parsed.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Provided path is not a directory: {}", path.display()));
    }

    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        if file_path.extension().is_none_or(|ext| ext != "cnf") {
            log::info!("Skipping non-CNF file: {}", file_path.display());
            continue;
        }

        solve_path(file_path, common)?;
    }

    Ok(())
}

/// Solves a single DIMACS file, or every `.cnf` file below a directory.
///
/// # Errors
///
/// If the path does not exist or a file cannot be parsed.
pub(crate) fn solve_path(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if path.is_dir() {
        return solve_dir(path, common);
    }
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    let time = std::time::Instant::now();
    let cnf = parse_file(path).map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
    let parse_time = time.elapsed();

    solve_and_report(&cnf, common, Some(path), parse_time);
    Ok(())
}

/// Verifies a given model against a CNF formula.
///
/// Prints whether the verification was successful. If verification fails, it panics.
pub(crate) fn verify_solution(cnf: &Cnf, model: &Assignment) {
    let ok = cnf.verify(model);
    println!("Verified: {ok:?}");
    assert!(ok, "Solution failed verification!");
}

/// Runs the selected procedures on `cnf` and reports each of them.
///
/// Resolution runs in a bounded worker under `common.timeout`; DP and DPLL
/// run in this process.
pub(crate) fn solve_and_report(
    cnf: &Cnf,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }
    log::debug!(
        "Variables: {}, clauses: {}, literals: {}",
        cnf.num_vars,
        cnf.len(),
        cnf.num_literals()
    );

    let algorithms = common
        .algorithm
        .map_or_else(|| Algorithm::ALL.to_vec(), |algorithm| vec![algorithm]);

    for algorithm in algorithms {
        println!("\n[{algorithm}]");

        if algorithm == Algorithm::Resolution {
            let report = run_bounded_report(algorithm, cnf, common.timeout);
            if common.stats {
                print_stats(&Report {
                    parse_time,
                    measurement: report.measurement(),
                    cnf,
                    stats: None,
                });
            }
            println!("\n{}", report.outcome);
            continue;
        }

        let ((verdict, stats, model), measurement) = measure(|| algorithm.solve(cnf));

        if common.stats {
            print_stats(&Report {
                parse_time,
                measurement,
                cnf,
                stats: Some(&stats),
            });
        }

        if let Some(model) = &model {
            if common.verify {
                verify_solution(cnf, model);
            }
            if common.print_solution {
                println!("Solutions: {model}");
            }
        }

        println!("\n{verdict}");
    }
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

fn mib(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |mib| format!("{mib:.2}"))
}

/// What one procedure produced on one formula.
pub(crate) struct Report<'a> {
    pub parse_time: Duration,
    pub measurement: Measurement,
    pub cnf: &'a Cnf,
    /// Only available for runs in this process.
    pub stats: Option<&'a SolutionStats>,
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats(report: &Report<'_>) {
    let elapsed_secs = report.measurement.elapsed.as_secs_f64();

    println!("=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", report.parse_time.as_secs_f64()));
    stat_line("Variables", report.cnf.num_vars);
    stat_line("Clauses", report.cnf.len());
    stat_line("Literals", report.cnf.num_literals());

    println!("========================[ Search Statistics ]========================");
    if let Some(s) = report.stats {
        stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
        stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
        stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
        if s.rounds > 0 {
            stat_line("Resolution rounds", s.rounds);
            stat_line_with_rate("Resolvents", s.resolvents, elapsed_secs);
            stat_line("Peak clauses", s.peak_clauses);
        }
    }
    stat_line("Memory allocated (MiB)", mib(report.measurement.allocated_mib()));
    stat_line("Resident memory (MiB)", mib(report.measurement.resident_mib()));
    stat_line("Wall time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

/// Prints one row of the experiment table, with a header before each size.
pub(crate) fn print_record(record: &Record) {
    if record.algorithm == Algorithm::ALL[0] {
        println!(
            "\n=== {} variables, {} clauses ===",
            record.num_vars, record.num_clauses
        );
    }

    match &record.run {
        Run::Skipped => println!("|  {:<12} {:>40}  |", record.algorithm, "skipped (too large)"),
        Run::Finished {
            outcome,
            measurement,
            verified,
            ..
        } => {
            let outcome = match (outcome, verified) {
                (Outcome::Satisfiable, Some(false)) => "SATISFIABLE (bad model)".to_string(),
                (outcome, _) => outcome.to_string(),
            };
            println!(
                "|  {:<12} {outcome:>15} {:>10.4} s {:>10} MiB  |",
                record.algorithm,
                measurement.elapsed.as_secs_f64(),
                mib(measurement.allocated_mib())
            );
        }
    }
}
