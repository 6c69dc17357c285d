#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Compares the decision procedures on random instances.
//!
//! For every size in the sweep one instance is generated and handed to each
//! procedure in turn. Resolution always runs in a bounded worker, because its
//! clause set can grow exponentially; it is skipped outright above a variable
//! threshold. DP and DPLL run in process unless `bound_all` is set.

use crate::sat::bounded::{Harness, Outcome};
use crate::sat::cnf::Cnf;
use crate::sat::error::CnfError;
use crate::sat::generator::random_cnf;
use crate::sat::log::targets::EXPERIMENT as LOG_EXPERIMENT;
use crate::sat::measure::{Measurement, measure};
use crate::sat::solver::{Algorithm, SolutionStats};
use std::time::Duration;

/// `(variables, clauses)` pairs swept by default.
pub const DEFAULT_SIZES: [(usize, usize); 8] = [
    (5, 15),
    (10, 20),
    (20, 40),
    (30, 60),
    (40, 60),
    (50, 100),
    (100, 200),
    (1000, 10000),
];
pub const DEFAULT_CLAUSE_SIZE: usize = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RESOLUTION_MAX_VARS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentConfig {
    pub sizes: Vec<(usize, usize)>,
    pub clause_size: usize,
    /// Deadline of every bounded run.
    pub timeout: Duration,
    /// Resolution is skipped on instances with more variables than this.
    pub resolution_max_vars: usize,
    /// Run DP and DPLL in bounded workers too.
    pub bound_all: bool,
    /// Seed of the instance generator; a random seed when `None`.
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            clause_size: DEFAULT_CLAUSE_SIZE,
            timeout: DEFAULT_TIMEOUT,
            resolution_max_vars: DEFAULT_RESOLUTION_MAX_VARS,
            bound_all: false,
            seed: None,
        }
    }
}

/// How one procedure fared on one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    /// The instance was above the resolution threshold.
    Skipped,
    Finished {
        outcome: Outcome,
        /// Wall time and allocations of the run; resident memory only for
        /// runs in this process.
        measurement: Measurement,
        /// Only known for runs in this process.
        stats: Option<SolutionStats>,
        /// Whether the witness satisfies the formula, for in-process SAT runs.
        verified: Option<bool>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub num_vars: usize,
    pub num_clauses: usize,
    pub algorithm: Algorithm,
    pub run: Run,
}

/// Runs the sweep of an `ExperimentConfig`.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: ExperimentConfig,
    harness: Harness,
}

impl Experiment {
    #[must_use]
    pub const fn new(config: ExperimentConfig, harness: Harness) -> Self {
        Self { config, harness }
    }

    /// Runs the whole sweep and collects every record.
    ///
    /// # Errors
    ///
    /// `CnfError::Generator` if a size cannot be generated with the
    /// configured clause size.
    pub fn run(&self) -> Result<Vec<Record>, CnfError> {
        let mut records = Vec::new();
        self.run_with(|record| records.push(record.clone()))?;
        Ok(records)
    }

    /// Runs the whole sweep, handing each record to `on_record` as soon as it
    /// is available.
    ///
    /// # Errors
    ///
    /// See [`Experiment::run`].
    pub fn run_with(&self, mut on_record: impl FnMut(&Record)) -> Result<(), CnfError> {
        let mut rng = self
            .config
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        log::info!(target: LOG_EXPERIMENT, "Generator seed {}.", rng.get_seed());

        for &(num_vars, num_clauses) in &self.config.sizes {
            let cnf = random_cnf(num_vars, num_clauses, self.config.clause_size, &mut rng)?;
            log::info!(
                target: LOG_EXPERIMENT,
                "Generated {num_clauses} clauses over {num_vars} variables."
            );

            for algorithm in Algorithm::ALL {
                let run = self.run_one(algorithm, &cnf);
                on_record(&Record {
                    num_vars,
                    num_clauses,
                    algorithm,
                    run,
                });
            }
        }
        Ok(())
    }

    fn run_one(&self, algorithm: Algorithm, cnf: &Cnf) -> Run {
        if algorithm == Algorithm::Resolution && cnf.num_vars > self.config.resolution_max_vars {
            log::info!(
                target: LOG_EXPERIMENT,
                "Skipping resolution on {} variables (limit {}).",
                cnf.num_vars,
                self.config.resolution_max_vars
            );
            return Run::Skipped;
        }

        if algorithm == Algorithm::Resolution || self.config.bound_all {
            let report = self.harness.run(algorithm, cnf, self.config.timeout);
            return Run::Finished {
                measurement: report.measurement(),
                outcome: report.outcome,
                stats: None,
                verified: None,
            };
        }

        let ((verdict, stats, model), measurement) = measure(|| algorithm.solve(cnf));
        Run::Finished {
            outcome: verdict.into(),
            measurement,
            stats: Some(stats),
            verified: model.map(|model| cnf.verify(&model)),
        }
    }
}
