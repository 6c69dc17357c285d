#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Formulas in conjunctive normal form.
//!
//! A `Cnf` is an ordered list of clauses read as their conjunction. The empty
//! formula is trivially satisfiable; a formula containing the empty clause is
//! unsatisfiable.
//!
//! [`Cnf::simplify`] is the reduction DP and DPLL apply at every step: under an
//! assignment, satisfied clauses disappear and falsified literals are removed
//! from the clauses that remain.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::error::CnfError;
use crate::sat::literal::Literal;
use core::ops::Index;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    pub clauses: Vec<Clause>,
    /// Number of variables: the largest index mentioned by any clause, or the
    /// declared count for generated instances.
    pub num_vars: usize,
}

impl Cnf {
    /// Builds a formula from clauses of signed integers.
    ///
    /// # Errors
    ///
    /// `CnfError::ZeroLiteral` naming the first clause that contains a 0.
    pub fn new<I, C>(clauses: I) -> Result<Self, CnfError>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = i32>,
    {
        let clauses = clauses
            .into_iter()
            .enumerate()
            .map(|(i, c)| Clause::from_i32s(c).map_err(|e| e.in_clause(i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_clauses(clauses))
    }

    #[must_use]
    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        let num_vars = clauses
            .iter()
            .flat_map(Clause::iter)
            .map(|lit| lit.variable() as usize)
            .max()
            .unwrap_or(0);
        Self { clauses, num_vars }
    }

    /// Reduces the formula under `assignment`.
    ///
    /// Clauses containing an assigned literal are dropped. From every other
    /// clause, literals whose negation is assigned are removed. The result
    /// never has more clauses than `self`, and `self` is left untouched.
    #[must_use]
    pub fn simplify(&self, assignment: &Assignment) -> Self {
        let clauses = self
            .clauses
            .iter()
            .filter(|clause| !clause.iter().any(|&lit| assignment.contains(lit)))
            .map(|clause| {
                clause
                    .iter()
                    .copied()
                    .filter(|&lit| !assignment.falsifies(lit))
                    .collect::<Clause>()
            })
            .collect();

        Self {
            clauses,
            num_vars: self.num_vars,
        }
    }

    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    /// `true` when no clauses remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// The literals of every unit clause, in clause order.
    pub fn unit_literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.clauses
            .iter()
            .filter(|clause| clause.is_unit())
            .filter_map(Clause::first)
    }

    /// The branching literal: first literal of the first clause.
    #[must_use]
    pub fn branch_literal(&self) -> Option<Literal> {
        self.clauses.first().and_then(Clause::first)
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// `true` if every clause has at least one literal in `assignment`.
    #[must_use]
    pub fn verify(&self, assignment: &Assignment) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.iter().any(|&lit| assignment.contains(lit)))
    }
}

impl Index<usize> for Cnf {
    type Output = Clause;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

impl From<Vec<Clause>> for Cnf {
    fn from(clauses: Vec<Clause>) -> Self {
        Self::from_clauses(clauses)
    }
}

/// Writes the formula in DIMACS CNF format.
impl Display for Cnf {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            writeln!(f, "{clause}")?;
        }
        Ok(())
    }
}
