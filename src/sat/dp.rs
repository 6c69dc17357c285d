#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The Davis–Putnam splitting procedure.
//!
//! Each step simplifies the formula under the current assignment. An empty
//! clause closes the branch, an empty formula means the assignment satisfies
//! it. Otherwise the first literal of the first clause is tried true, then
//! false. There is no unit propagation; compare [`crate::sat::dpll`].
//!
//! The search runs on an explicit stack rather than the call stack, visiting
//! branches in the same depth-first order as the recursive formulation.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::log::targets::DP as LOG_DP;
use crate::sat::solver::{SolutionStats, Solver, Verdict};
use std::rc::Rc;

/// A pending branch: the formula as simplified by the parent, shared by both
/// children, and the assignment to continue from.
pub(crate) type Branch = (Rc<Cnf>, Assignment);

/// Pushes the two branches on `literal` so that the one setting it true is
/// explored first.
pub(crate) fn push_branches(
    stack: &mut Vec<Branch>,
    cnf: Rc<Cnf>,
    assignment: &Assignment,
    literal: Literal,
    stats: &mut SolutionStats,
) {
    stats.decisions += 1;
    let mut branches = [literal.negated(), literal]
        .into_iter()
        .filter_map(|lit| assignment.with(lit).ok());

    if let Some(false_branch) = branches.next() {
        stack.push((Rc::clone(&cnf), false_branch));
    }
    if let Some(true_branch) = branches.next() {
        stack.push((cnf, true_branch));
    }
}

#[derive(Debug, Clone)]
pub struct Dp {
    pub cnf: Cnf,
    model: Option<Assignment>,
    stats: SolutionStats,
}

impl Solver for Dp {
    fn new(cnf: Cnf) -> Self {
        Self {
            cnf,
            model: None,
            stats: SolutionStats::default(),
        }
    }

    fn solve(&mut self) -> Verdict {
        self.stats = SolutionStats::default();
        self.model = None;

        let mut stack: Vec<Branch> = vec![(Rc::new(self.cnf.clone()), Assignment::new())];

        while let Some((cnf, assignment)) = stack.pop() {
            let cnf = cnf.simplify(&assignment);

            if cnf.has_empty_clause() {
                self.stats.conflicts += 1;
                log::trace!(target: LOG_DP, "Conflict under {assignment}.");
                continue;
            }

            let Some(literal) = cnf.branch_literal() else {
                log::debug!(
                    target: LOG_DP,
                    "Satisfied after {} decisions.",
                    self.stats.decisions
                );
                self.model = Some(assignment);
                return Verdict::Satisfiable;
            };

            log::trace!(target: LOG_DP, "Branching on {literal}.");
            push_branches(&mut stack, Rc::new(cnf), &assignment, literal, &mut self.stats);
        }

        log::debug!(
            target: LOG_DP,
            "Refuted after {} decisions and {} conflicts.",
            self.stats.decisions,
            self.stats.conflicts
        );
        Verdict::Unsatisfiable
    }

    fn model(&self) -> Option<&Assignment> {
        self.model.as_ref()
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

/// Decides `cnf` with the DP splitting procedure.
#[must_use]
pub fn dp(cnf: &Cnf) -> Verdict {
    Dp::new(cnf.clone()).solve()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cnf(clauses: Vec<Vec<i32>>) -> Cnf {
        Cnf::new(clauses).unwrap()
    }

    #[test]
    fn test_all_polarities_unsat() {
        let f = cnf(vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]);
        assert_eq!(dp(&f), Verdict::Unsatisfiable);
    }

    #[test]
    fn test_satisfiable_with_witness() {
        let f = cnf(vec![vec![1, 2], vec![-1, 3]]);
        let mut solver = Dp::new(f.clone());
        assert_eq!(solver.solve(), Verdict::Satisfiable);
        let model = solver.model().unwrap();
        assert!(f.verify(model));
    }

    #[test]
    fn test_conflicting_units_need_a_decision() {
        let mut solver = Dp::new(cnf(vec![vec![1], vec![-1]]));
        assert_eq!(solver.solve(), Verdict::Unsatisfiable);
        assert_eq!(solver.stats().decisions, 1);
        assert_eq!(solver.stats().conflicts, 2);
        assert_eq!(solver.stats().propagations, 0);
    }

    #[test]
    fn test_empty_formula_is_sat() {
        let mut solver = Dp::new(Cnf::default());
        assert_eq!(solver.solve(), Verdict::Satisfiable);
        assert!(solver.model().unwrap().is_empty());
    }

    #[test]
    fn test_empty_clause_is_unsat() {
        assert_eq!(dp(&cnf(vec![vec![1], vec![]])), Verdict::Unsatisfiable);
    }

    #[test]
    fn test_true_branch_explored_first() {
        let mut solver = Dp::new(cnf(vec![vec![1, 2]]));
        assert_eq!(solver.solve(), Verdict::Satisfiable);
        assert_eq!(solver.model().unwrap().solutions(), vec![1]);
    }

    #[test]
    fn test_long_implication_chain() {
        // x1 and xi -> x(i+1); DP has to decide every variable in turn.
        let n = 400;
        let mut clauses = vec![vec![1]];
        clauses.extend((1..n).map(|i| vec![-i, i + 1]));
        let f = cnf(clauses);
        let mut solver = Dp::new(f.clone());
        assert_eq!(solver.solve(), Verdict::Satisfiable);
        assert!(f.verify(solver.model().unwrap()));
    }

    #[test]
    fn test_model_cleared_between_calls() {
        let mut solver = Dp::new(cnf(vec![vec![1], vec![-1]]));
        assert_eq!(solver.solve(), Verdict::Unsatisfiable);
        assert!(solver.model().is_none());
        assert_eq!(solver.solve(), Verdict::Unsatisfiable);
        assert_eq!(solver.stats().decisions, 1);
    }
}
