//! Uniform random CNF instances.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::error::CnfError;
use crate::sat::literal::{Literal, Variable};
use smallvec::SmallVec;

/// Generates `num_clauses` random clauses over variables `1..=num_vars`.
///
/// Every clause holds `clause_size` distinct literals. Each literal is drawn by
/// picking a variable uniformly and a polarity by a fair coin, redrawing when
/// the literal is already in the clause. A clause may therefore contain a
/// variable in both polarities.
///
/// # Errors
///
/// `CnfError::Generator` if `num_vars` is 0 while clauses are requested, or if
/// `clause_size` exceeds the `2 * num_vars` distinct literals available.
/// `CnfError::VariableOutOfRange` if `num_vars` does not fit a literal.
pub fn random_cnf(
    num_vars: usize,
    num_clauses: usize,
    clause_size: usize,
    rng: &mut fastrand::Rng,
) -> Result<Cnf, CnfError> {
    if num_clauses > 0 && num_vars == 0 {
        return Err(CnfError::Generator(
            "at least one variable is needed to build clauses".to_string(),
        ));
    }
    if clause_size > num_vars.saturating_mul(2) {
        return Err(CnfError::Generator(format!(
            "clause size {clause_size} exceeds the {} distinct literals over {num_vars} variables",
            num_vars.saturating_mul(2)
        )));
    }
    let max_var = Variable::try_from(num_vars)
        .map_err(|_| CnfError::VariableOutOfRange(Variable::MAX))?;
    Literal::new(max_var.max(1), true)?;

    let clauses = (0..num_clauses)
        .map(|_| random_clause(max_var, clause_size, rng))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Cnf {
        clauses,
        num_vars,
    })
}

fn random_clause(
    max_var: Variable,
    clause_size: usize,
    rng: &mut fastrand::Rng,
) -> Result<Clause, CnfError> {
    let mut literals: SmallVec<[Literal; 8]> = SmallVec::with_capacity(clause_size);
    while literals.len() < clause_size {
        let literal = Literal::new(rng.u32(1..=max_var), rng.bool())?;
        if !literals.contains(&literal) {
            literals.push(literal);
        }
    }
    Ok(Clause { literals })
}
