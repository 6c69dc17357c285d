//! Defines the DPLL (Davis-Putnam-Logemann-Loveland) decision procedure.
//!
//! The `Dpll` solver works like [`crate::sat::dp::Dp`], simplifying the
//! formula under a growing assignment, but adds unit propagation before it
//! ever branches:
//! 1.  **Simplify:** drop satisfied clauses and falsified literals. An empty
//!     clause closes the branch; an empty formula means the assignment
//!     satisfies it.
//! 2.  **Unit Propagation:** if some clauses are unit clauses, all of their
//!     literals are added to the assignment in one step and the loop starts
//!     again from 1. Two unit clauses of opposite polarity in the same step are
//!     a conflict that closes the branch.
//! 3.  **Decision:** with no unit clause left, the first literal of the first
//!     clause is tried true, then false.
//!
//! Backtracking is implicit: each branch owns its assignment, and the
//! pending branches sit on an explicit stack, so deep searches are not bound
//! by the call stack.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::dp::{Branch, push_branches};
use crate::sat::log::targets::DPLL as LOG_DPLL;
use crate::sat::solver::{SolutionStats, Solver, Verdict};
use itertools::Itertools;
use std::rc::Rc;

/// Represents a DPLL SAT solver.
///
/// The solver keeps its own copy of the formula; every call to `solve`
/// starts from a fresh, empty assignment.
#[derive(Debug, Clone)]
pub struct Dpll {
    /// The Conjunctive Normal Form (CNF) formula being solved.
    pub cnf: Cnf,
    /// The satisfying assignment found by the last successful `solve`.
    model: Option<Assignment>,
    stats: SolutionStats,
}

impl Solver for Dpll {
    /// Creates a new DPLL solver instance for the given CNF formula.
    fn new(cnf: Cnf) -> Self {
        Self {
            cnf,
            model: None,
            stats: SolutionStats::default(),
        }
    }

    /// Attempts to solve the SAT formula.
    ///
    /// # Returns
    ///
    /// * `Verdict::Satisfiable`: the witness is then available from `model`.
    /// * `Verdict::Unsatisfiable`: every branch ended in a conflict.
    fn solve(&mut self) -> Verdict {
        self.stats = SolutionStats::default();
        self.model = None;

        let mut stack: Vec<Branch> = vec![(Rc::new(self.cnf.clone()), Assignment::new())];

        while let Some((cnf, assignment)) = stack.pop() {
            let cnf = cnf.simplify(&assignment);

            if cnf.has_empty_clause() {
                self.stats.conflicts += 1;
                log::trace!(target: LOG_DPLL, "Conflict under {assignment}.");
                continue;
            }

            let Some(literal) = cnf.branch_literal() else {
                log::debug!(
                    target: LOG_DPLL,
                    "Satisfied after {} decisions and {} propagations.",
                    self.stats.decisions,
                    self.stats.propagations
                );
                self.model = Some(assignment);
                return Verdict::Satisfiable;
            };

            let units = cnf.unit_literals().unique().collect_vec();
            if !units.is_empty() {
                match assignment.extended(units.iter().copied()) {
                    Ok(propagated) => {
                        self.stats.propagations += units.len();
                        log::trace!(target: LOG_DPLL, "Propagating {}.", units.iter().join(" "));
                        stack.push((Rc::new(cnf), propagated));
                    }
                    Err(conflict) => {
                        self.stats.conflicts += 1;
                        log::trace!(
                            target: LOG_DPLL,
                            "Unit clauses {} and {} conflict.",
                            conflict.literal,
                            conflict.literal.negated()
                        );
                    }
                }
                continue;
            }

            log::trace!(target: LOG_DPLL, "Branching on {literal}.");
            push_branches(&mut stack, Rc::new(cnf), &assignment, literal, &mut self.stats);
        }

        log::debug!(
            target: LOG_DPLL,
            "Refuted after {} decisions, {} propagations and {} conflicts.",
            self.stats.decisions,
            self.stats.propagations,
            self.stats.conflicts
        );
        Verdict::Unsatisfiable
    }

    /// Returns the satisfying assignment of the last `solve`, if any.
    ///
    /// The assignment may be partial: variables that only occur in clauses
    /// already satisfied are left unassigned.
    fn model(&self) -> Option<&Assignment> {
        self.model.as_ref()
    }

    /// Returns statistics about the solving process.
    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

/// Decides `cnf` with DPLL.
#[must_use]
pub fn dpll(cnf: &Cnf) -> Verdict {
    Dpll::new(cnf.clone()).solve()
}
