#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Signed-integer literals.
//!
//! A literal is a non-zero `i32`: `v` asserts variable `v`, `-v` asserts its
//! negation. Zero is rejected at construction, so every `Literal` value in the
//! crate refers to a real variable.

use core::ops::{Neg, Not};
use std::fmt::{self, Display, Formatter};
use std::num::NonZeroI32;

use crate::sat::error::CnfError;

/// Variable identifiers, starting at 1.
pub type Variable = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(NonZeroI32);

impl Literal {
    /// Builds the literal of `var` with the given polarity.
    ///
    /// # Errors
    ///
    /// `CnfError::ZeroLiteral` if `var` is 0, `CnfError::VariableOutOfRange`
    /// if it does not fit a signed 32-bit literal.
    pub fn new(var: Variable, polarity: bool) -> Result<Self, CnfError> {
        let value = i32::try_from(var).map_err(|_| CnfError::VariableOutOfRange(var))?;
        let value = if polarity { value } else { -value };
        Self::from_i32(value)
    }

    /// # Errors
    ///
    /// `CnfError::ZeroLiteral` if `value` is 0. `i32::MIN` has no negation and
    /// is rejected as out of range.
    pub fn from_i32(value: i32) -> Result<Self, CnfError> {
        if value == i32::MIN {
            return Err(CnfError::VariableOutOfRange(value.unsigned_abs()));
        }
        NonZeroI32::new(value)
            .map(Self)
            .ok_or(CnfError::ZeroLiteral { clause: None })
    }

    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0.get().unsigned_abs()
    }

    /// `true` for a positive literal.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0.get().is_positive()
    }

    #[must_use]
    pub const fn is_negated(self) -> bool {
        !self.polarity()
    }

    #[must_use]
    pub fn negated(self) -> Self {
        Self(-self.0)
    }

    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0.get()
    }
}

impl TryFrom<i32> for Literal {
    type Error = CnfError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_i32(value)
    }
}

impl From<Literal> for i32 {
    fn from(literal: Literal) -> Self {
        literal.to_i32()
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Neg for &Literal {
    type Output = Literal;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_neg() {
        let lit = Literal::from_i32(3).unwrap();
        assert_eq!(-lit, Literal::from_i32(-3).unwrap());
        assert_eq!(!-lit, lit);
    }

    #[test]
    fn test_variable_and_polarity() {
        let lit = Literal::new(7, false).unwrap();
        assert_eq!(lit.variable(), 7);
        assert!(!lit.polarity());
        assert!(lit.is_negated());
        assert_eq!(lit.to_i32(), -7);
    }

    #[test]
    fn test_zero_is_rejected() {
        assert!(matches!(
            Literal::try_from(0),
            Err(CnfError::ZeroLiteral { .. })
        ));
        assert!(Literal::new(0, true).is_err());
    }

    #[test]
    fn test_out_of_range_variable() {
        assert!(matches!(
            Literal::new(u32::MAX, true),
            Err(CnfError::VariableOutOfRange(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Literal::from_i32(-12).unwrap().to_string(), "-12");
    }
}
