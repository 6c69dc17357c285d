#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod assignment;
pub mod bounded;
pub mod clause;
pub mod cnf;
pub mod dimacs;
pub mod dp;
pub mod dpll;
pub mod error;
pub mod generator;
pub mod literal;
pub mod log;
pub mod measure;
pub mod resolution;
pub mod solver;
pub mod worker;
