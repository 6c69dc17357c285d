//! The interface shared by the three decision procedures.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use clap::ValueEnum;
use std::fmt::{self, Display, Formatter};

/// The answer of a decision procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Satisfiable,
    Unsatisfiable,
}

impl Verdict {
    #[must_use]
    pub const fn is_sat(self) -> bool {
        matches!(self, Self::Satisfiable)
    }
}

impl From<bool> for Verdict {
    fn from(sat: bool) -> Self {
        if sat {
            Self::Satisfiable
        } else {
            Self::Unsatisfiable
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
        }
    }
}

/// Counters collected while solving. Each procedure fills the fields that
/// apply to it and leaves the rest at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Branching decisions (DP, DPLL).
    pub decisions: usize,
    /// Literals forced by unit propagation (DPLL).
    pub propagations: usize,
    /// Branches closed by an empty clause or conflicting units.
    pub conflicts: usize,
    /// Saturation rounds (resolution).
    pub rounds: usize,
    /// Resolvents computed, duplicates included (resolution).
    pub resolvents: usize,
    /// Largest clause set held at once (resolution).
    pub peak_clauses: usize,
}

pub trait Solver {
    /// Takes its own copy of the formula; nothing is shared between solvers.
    fn new(cnf: Cnf) -> Self
    where
        Self: Sized;

    fn solve(&mut self) -> Verdict;

    /// The satisfying assignment found by the last `solve`, if the procedure
    /// produces one.
    fn model(&self) -> Option<&Assignment>;

    fn stats(&self) -> SolutionStats;
}

/// Names a decision procedure, so it can be chosen on the command line and
/// sent to a bounded worker process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    Resolution,
    Dp,
    Dpll,
}

impl Algorithm {
    pub const ALL: [Self; 3] = [Self::Resolution, Self::Dp, Self::Dpll];

    /// Runs the procedure on a copy of `cnf`.
    #[must_use]
    pub fn solve(self, cnf: &Cnf) -> (Verdict, SolutionStats, Option<Assignment>) {
        match self {
            Self::Resolution => run::<crate::sat::resolution::Resolution>(cnf),
            Self::Dp => run::<crate::sat::dp::Dp>(cnf),
            Self::Dpll => run::<crate::sat::dpll::Dpll>(cnf),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Resolution => "resolution",
            Self::Dp => "dp",
            Self::Dpll => "dpll",
        }
    }
}

fn run<S: Solver>(cnf: &Cnf) -> (Verdict, SolutionStats, Option<Assignment>) {
    let mut solver = S::new(cnf.clone());
    let verdict = solver.solve();
    (verdict, solver.stats(), solver.model().cloned())
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Satisfiable.to_string(), "SATISFIABLE");
        assert_eq!(Verdict::from(false), Verdict::Unsatisfiable);
    }

    #[test]
    fn test_algorithm_names_round_trip_through_clap() {
        for algorithm in Algorithm::ALL {
            let parsed = Algorithm::from_str(algorithm.name(), false).unwrap();
            assert_eq!(parsed, algorithm);
        }
    }

    #[test]
    fn test_every_algorithm_agrees_on_small_formula() {
        let cnf = Cnf::new(vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]).unwrap();
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.solve(&cnf).0, Verdict::Unsatisfiable, "{algorithm}");
        }
    }
}
