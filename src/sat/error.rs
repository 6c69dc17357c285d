use std::fmt::{self, Display, Formatter};
use std::io;

use crate::sat::literal::Variable;

/// Errors raised while building or reading formulas.
///
/// None of these are solving outcomes: a formula that reaches the empty clause
/// is simply unsatisfiable. These report input that breaks the model's
/// invariants, so the caller sees the problem instead of a wrong verdict.
#[derive(Debug)]
pub enum CnfError {
    /// A literal with value 0. `clause` is the index of the offending clause
    /// when known.
    ZeroLiteral { clause: Option<usize> },
    /// A variable index that does not fit a signed 32-bit literal.
    VariableOutOfRange(Variable),
    /// A DIMACS token that is not an integer.
    InvalidToken { line: usize, token: String },
    /// Parameters for which no random instance exists.
    Generator(String),
    Io(io::Error),
}

impl CnfError {
    /// Attaches the clause index to a `ZeroLiteral` error.
    #[must_use]
    pub fn in_clause(self, index: usize) -> Self {
        match self {
            Self::ZeroLiteral { clause: None } => Self::ZeroLiteral {
                clause: Some(index),
            },
            other => other,
        }
    }
}

impl Display for CnfError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLiteral { clause: Some(index) } => {
                write!(f, "literal 0 in clause {index} is not a valid literal")
            }
            Self::ZeroLiteral { clause: None } => write!(f, "literal 0 is not a valid literal"),
            Self::VariableOutOfRange(var) => {
                write!(f, "variable {var} is outside the supported literal range")
            }
            Self::InvalidToken { line, token } => {
                write!(f, "line {line}: failed to parse literal '{token}' as i32")
            }
            Self::Generator(reason) => write!(f, "cannot generate instance: {reason}"),
            Self::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for CnfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CnfError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_clause_only_fills_missing_index() {
        let e = CnfError::ZeroLiteral { clause: None }.in_clause(4);
        assert_eq!(e.to_string(), "literal 0 in clause 4 is not a valid literal");

        let e = CnfError::ZeroLiteral { clause: Some(1) }.in_clause(4);
        assert_eq!(e.to_string(), "literal 0 in clause 1 is not a valid literal");
    }

    #[test]
    fn test_io_source() {
        use std::error::Error;
        let e = CnfError::from(io::Error::other("boom"));
        assert!(e.source().is_some());
        assert!(e.to_string().contains("boom"));
    }
}
