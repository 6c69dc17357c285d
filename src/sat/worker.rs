//! The child side of the bounded harness.
//!
//! A worker reads one DIMACS formula from its input, decides it with the
//! requested procedure and answers in the style of SAT competition output:
//!
//! ```text
//! c allocated 183296
//! s UNSATISFIABLE
//! ```
//!
//! `c` lines carry measurements; the single `s` line carries the verdict.

use crate::sat::dimacs::parse_dimacs;
use crate::sat::error::CnfError;
use crate::sat::log::targets::WORKER as LOG_WORKER;
use crate::sat::measure::measure;
use crate::sat::solver::{Algorithm, Verdict};
use std::io::{BufRead, Write};

const ALLOCATED_PREFIX: &str = "c allocated ";
const SOLUTION_PREFIX: &str = "s ";

/// What a worker reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    pub verdict: Verdict,
    pub allocated_bytes: Option<u64>,
}

/// Reads a formula from `input`, solves it and writes the answer to `output`.
///
/// # Errors
///
/// Any `CnfError` from parsing the formula, or `CnfError::Io` if the answer
/// cannot be written.
pub fn run_worker<R: BufRead, W: Write>(
    algorithm: Algorithm,
    input: R,
    mut output: W,
) -> Result<Verdict, CnfError> {
    let cnf = parse_dimacs(input)?;
    log::debug!(
        target: LOG_WORKER,
        "Solving {} clauses over {} variables with {algorithm}.",
        cnf.len(),
        cnf.num_vars
    );

    let ((verdict, stats, _), measurement) = measure(|| algorithm.solve(&cnf));
    log::debug!(target: LOG_WORKER, "{verdict} in {:?}: {stats:?}", measurement.elapsed);

    if let Some(bytes) = measurement.allocated_bytes {
        writeln!(output, "{ALLOCATED_PREFIX}{bytes}")?;
    }
    writeln!(output, "{SOLUTION_PREFIX}{verdict}")?;
    output.flush()?;

    Ok(verdict)
}

/// Parses the output of a worker.
///
/// # Errors
///
/// A description of the problem if there is no `s` line or it names no
/// verdict.
pub fn parse_answer(text: &str) -> Result<Answer, String> {
    let mut verdict = None;
    let mut allocated_bytes = None;

    for line in text.lines().map(str::trim) {
        if let Some(bytes) = line.strip_prefix(ALLOCATED_PREFIX) {
            allocated_bytes = bytes.trim().parse().ok();
        } else if let Some(answer) = line.strip_prefix(SOLUTION_PREFIX) {
            verdict = match answer.trim() {
                "SATISFIABLE" => Some(Verdict::Satisfiable),
                "UNSATISFIABLE" => Some(Verdict::Unsatisfiable),
                other => return Err(format!("worker answered '{other}'")),
            };
        }
    }

    verdict
        .map(|verdict| Answer {
            verdict,
            allocated_bytes,
        })
        .ok_or_else(|| "worker produced no verdict".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_of(algorithm: Algorithm, dimacs: &str) -> (Verdict, String) {
        let mut out = Vec::new();
        let verdict = run_worker(algorithm, dimacs.as_bytes(), &mut out).unwrap();
        (verdict, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_worker_answers_unsat() {
        let (verdict, text) = answer_of(Algorithm::Dp, "p cnf 1 2\n1 0\n-1 0\n");
        assert_eq!(verdict, Verdict::Unsatisfiable);
        assert!(text.ends_with("s UNSATISFIABLE\n"));
        assert_eq!(parse_answer(&text).unwrap().verdict, Verdict::Unsatisfiable);
    }

    #[test]
    fn test_worker_answers_sat_for_every_algorithm() {
        for algorithm in Algorithm::ALL {
            let (verdict, text) = answer_of(algorithm, "1 2 0\n-1 3 0\n");
            assert_eq!(verdict, Verdict::Satisfiable, "{algorithm}");
            assert_eq!(parse_answer(&text).unwrap().verdict, Verdict::Satisfiable);
        }
    }

    #[test]
    fn test_worker_rejects_bad_input() {
        let mut out = Vec::new();
        let err = run_worker(Algorithm::Dpll, "1 x 0\n".as_bytes(), &mut out).unwrap_err();
        assert!(matches!(err, CnfError::InvalidToken { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_parse_answer_with_measurement() {
        let answer = parse_answer("c allocated 2048\ns SATISFIABLE\n").unwrap();
        assert_eq!(answer, Answer {
            verdict: Verdict::Satisfiable,
            allocated_bytes: Some(2048),
        });
    }

    #[test]
    fn test_parse_answer_failures() {
        assert!(parse_answer("").is_err());
        assert!(parse_answer("c allocated 12\n").is_err());
        assert!(parse_answer("s UNKNOWN\n").is_err());
    }
}
