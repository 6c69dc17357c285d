#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Saturation by resolution.
//!
//! The clause set is closed under resolution: every round resolves each pair
//! of distinct clauses on each complementary literal pair they share. Deriving
//! the empty clause proves the formula unsatisfiable. A round that yields no
//! clause outside the set reaches the fixed point, and a closed set without
//! the empty clause is satisfiable.
//!
//! Tautological resolvents, which hold both a literal and its negation, are
//! dropped. They are satisfied by every assignment and never take part in a
//! refutation, but keeping them lets the closure grow towards `4^n` clauses
//! instead of `3^n`.
//!
//! A round only resolves pairs with at least one clause added by the previous
//! round; pairs of older clauses were already resolved and cannot produce
//! anything new. The verdict does not depend on this, only the running time.
//!
//! The number of distinct clauses over `n` variables is finite, so this
//! terminates, but the bound is exponential. No cancellation is checked while
//! saturating; callers needing a time limit run it through
//! [`crate::sat::bounded`].

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::log::targets::RESOLUTION as LOG_RESOLUTION;
use crate::sat::solver::{SolutionStats, Solver, Verdict};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// A clause as a set: sorted, without duplicate literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct SetClause(SmallVec<[Literal; 8]>);

impl SetClause {
    fn from_clause(clause: &Clause) -> Self {
        let mut literals: SmallVec<[Literal; 8]> = clause.iter().copied().collect();
        literals.sort_unstable();
        literals.dedup();
        Self(literals)
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn contains(&self, literal: Literal) -> bool {
        self.0.binary_search(&literal).is_ok()
    }

    fn is_tautology(&self) -> bool {
        self.0.iter().any(|&lit| self.contains(lit.negated()))
    }

    /// Every non-tautological resolvent of `self` and `other`, one per literal
    /// of `self` whose negation occurs in `other`.
    fn resolvents<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = Self> + 'a {
        self.0
            .iter()
            .copied()
            .filter(move |&lit| other.contains(lit.negated()))
            .map(move |lit| {
                let pivot = lit.negated();
                Self(
                    self.0
                        .iter()
                        .filter(|&&l| l != lit)
                        .merge(other.0.iter().filter(|&&l| l != pivot))
                        .dedup()
                        .copied()
                        .collect(),
                )
            })
            .filter(|resolvent| !resolvent.is_tautology())
    }
}

/// The resolution decision procedure.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub cnf: Cnf,
    stats: SolutionStats,
}

impl Solver for Resolution {
    fn new(cnf: Cnf) -> Self {
        Self {
            cnf,
            stats: SolutionStats::default(),
        }
    }

    fn solve(&mut self) -> Verdict {
        self.stats = SolutionStats::default();

        let mut seen: FxHashSet<SetClause> = FxHashSet::default();
        let mut known: Vec<SetClause> = Vec::new();
        for clause in self.cnf.iter().map(SetClause::from_clause) {
            if seen.insert(clause.clone()) {
                known.push(clause);
            }
        }

        if known.iter().any(SetClause::is_empty) {
            log::debug!(target: LOG_RESOLUTION, "Formula contains the empty clause.");
            return Verdict::Unsatisfiable;
        }

        self.stats.peak_clauses = known.len();
        let mut frontier = 0;

        loop {
            self.stats.rounds += 1;
            log::trace!(
                target: LOG_RESOLUTION,
                "Round {}: {} clauses, {} new.",
                self.stats.rounds,
                known.len(),
                known.len() - frontier
            );

            let mut fresh = Vec::new();

            for i in frontier..known.len() {
                for j in 0..known.len() {
                    // Pairs inside the frontier are visited once, as (lower, higher).
                    if j == i || (j >= frontier && j < i) {
                        continue;
                    }

                    for resolvent in known[i].resolvents(&known[j]) {
                        self.stats.resolvents += 1;

                        if resolvent.is_empty() {
                            log::debug!(
                                target: LOG_RESOLUTION,
                                "Empty clause derived in round {} after {} resolvents.",
                                self.stats.rounds,
                                self.stats.resolvents
                            );
                            return Verdict::Unsatisfiable;
                        }

                        if seen.insert(resolvent.clone()) {
                            fresh.push(resolvent);
                        }
                    }
                }
            }

            if fresh.is_empty() {
                log::debug!(
                    target: LOG_RESOLUTION,
                    "Saturated after {} rounds with {} clauses.",
                    self.stats.rounds,
                    known.len()
                );
                return Verdict::Satisfiable;
            }

            frontier = known.len();
            known.extend(fresh);
            self.stats.peak_clauses = self.stats.peak_clauses.max(known.len());
        }
    }

    fn model(&self) -> Option<&Assignment> {
        None
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

/// Decides `cnf` by resolution closure.
#[must_use]
pub fn resolve(cnf: &Cnf) -> Verdict {
    Resolution::new(cnf.clone()).solve()
}
