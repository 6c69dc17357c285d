//! This crate provides three complete decision procedures for propositional
//! satisfiability (resolution, DP and DPLL) and a harness that runs them under
//! a wall-clock deadline in a separate process.

/// The `sat` module holds the CNF model, the decision procedures and the
/// bounded harness.
pub mod sat;

/// The `experiment` module compares the decision procedures on generated
/// random instances.
pub mod experiment;
