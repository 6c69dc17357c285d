use crate::sat::error::CnfError;
use crate::sat::literal::Literal;
use core::ops::Index;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};

/// A disjunction of literals.
///
/// Literal order is kept as given and duplicates are not removed; order has
/// no meaning for satisfaction. The empty clause is unsatisfiable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Clause {
    pub literals: SmallVec<[Literal; 8]>,
}

impl Clause {
    #[must_use]
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: literals.into_iter().collect(),
        }
    }

    /// Builds a clause from signed integers.
    ///
    /// # Errors
    ///
    /// `CnfError::ZeroLiteral` if any value is 0.
    pub fn from_i32s(values: impl IntoIterator<Item = i32>) -> Result<Self, CnfError> {
        values
            .into_iter()
            .map(Literal::from_i32)
            .collect::<Result<SmallVec<_>, _>>()
            .map(|literals| Self { literals })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    #[must_use]
    pub fn contains(&self, literal: Literal) -> bool {
        self.literals.contains(&literal)
    }

    #[must_use]
    pub fn first(&self) -> Option<Literal> {
        self.literals.first().copied()
    }

    pub fn to_i32s(&self) -> impl Iterator<Item = i32> + '_ {
        self.iter().map(|lit| lit.to_i32())
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl TryFrom<Vec<i32>> for Clause {
    type Error = CnfError;

    fn try_from(values: Vec<i32>) -> Result<Self, Self::Error> {
        Self::from_i32s(values)
    }
}

impl TryFrom<&[i32]> for Clause {
    type Error = CnfError;

    fn try_from(values: &[i32]) -> Result<Self, Self::Error> {
        Self::from_i32s(values.iter().copied())
    }
}

/// DIMACS clause line: literals followed by the terminating `0`.
impl Display for Clause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "0");
        }
        write!(f, "{} 0", self.iter().join(" "))
    }
}
