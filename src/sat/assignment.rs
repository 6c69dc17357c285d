use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt::{self, Display, Formatter};

/// Returned when an assignment would hold a literal and its complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    /// The literal whose complement was already assigned.
    pub literal: Literal,
}

/// A consistent set of literals fixed to true.
///
/// A positive literal sets its variable true, a negative one sets it false.
/// The set never holds a literal together with its negation: `assign` rejects
/// the second polarity with a [`Conflict`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(FxHashSet<Literal>);

impl Assignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `literal`. Re-adding an assigned literal is a no-op.
    ///
    /// # Errors
    ///
    /// A [`Conflict`] if the negation of `literal` is already assigned; the
    /// assignment is left unchanged.
    pub fn assign(&mut self, literal: Literal) -> Result<(), Conflict> {
        if self.0.contains(&literal.negated()) {
            return Err(Conflict { literal });
        }
        self.0.insert(literal);
        Ok(())
    }

    /// A copy of `self` extended with `literal`, leaving `self` untouched.
    ///
    /// # Errors
    ///
    /// See [`Assignment::assign`].
    pub fn with(&self, literal: Literal) -> Result<Self, Conflict> {
        self.extended([literal])
    }

    /// A copy of `self` extended with every literal of `literals`.
    ///
    /// # Errors
    ///
    /// A [`Conflict`] on the first literal whose complement is assigned,
    /// either before the call or earlier in `literals`.
    pub fn extended(&self, literals: impl IntoIterator<Item = Literal>) -> Result<Self, Conflict> {
        let mut next = self.clone();
        for literal in literals {
            next.assign(literal)?;
        }
        Ok(next)
    }

    /// `true` if `literal` is assigned, i.e. it is satisfied.
    #[must_use]
    pub fn contains(&self, literal: Literal) -> bool {
        self.0.contains(&literal)
    }

    /// `true` if the negation of `literal` is assigned, i.e. it is false.
    #[must_use]
    pub fn falsifies(&self, literal: Literal) -> bool {
        self.0.contains(&literal.negated())
    }

    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        let positive = Literal::new(var, true).ok()?;
        if self.contains(positive) {
            Some(true)
        } else if self.falsifies(positive) {
            Some(false)
        } else {
            None
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }

    /// The assigned literals ordered by variable.
    #[must_use]
    pub fn solutions(&self) -> Vec<i32> {
        self.0
            .iter()
            .sorted_by_key(|lit| lit.variable())
            .map(|lit| lit.to_i32())
            .collect()
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.solutions().iter().join(" "))
    }
}
