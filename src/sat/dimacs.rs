#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the DIMACS CNF file format.
//!
//! The format is line based:
//! - Comment lines start with `c`.
//! - The problem line `p cnf <num_variables> <num_clauses>` is skipped; counts
//!   are derived from the clauses actually read.
//! - Clauses are whitespace-separated literals terminated by `0`. A clause may
//!   span several lines, and a `0` on its own is the empty clause.
//! - A `%` line marks the end of data.
//!
//! `Cnf`'s `Display` impl writes the same format, which is how formulas are
//! handed to bounded workers.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::error::CnfError;
use crate::sat::literal::Literal;
use std::io::{self, BufRead};
use std::path::Path;

/// Parses DIMACS data from a `BufRead` source.
///
/// Literals left pending at end of input without a terminating `0` form a
/// final clause.
///
/// # Errors
///
/// `CnfError::Io` if reading fails, `CnfError::InvalidToken` for a token that
/// is not an `i32`.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf, CnfError> {
    let mut clauses = Vec::new();
    let mut pending: Vec<Literal> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None => {}
            Some(first) if first.starts_with('c') || first.starts_with('p') => {}
            Some(_) => {
                for token in parts {
                    let value = token.parse::<i32>().map_err(|_| CnfError::InvalidToken {
                        line: index + 1,
                        token: token.to_string(),
                    })?;

                    if value == 0 {
                        clauses.push(Clause::new(pending.drain(..)));
                    } else {
                        pending.push(Literal::from_i32(value)?);
                    }
                }
            }
        }
    }

    if !pending.is_empty() {
        clauses.push(Clause::new(pending));
    }

    Ok(Cnf::from_clauses(clauses))
}

/// Parses DIMACS text held in memory.
///
/// # Errors
///
/// See [`parse_dimacs`].
pub fn parse_str(input: &str) -> Result<Cnf, CnfError> {
    parse_dimacs(input.as_bytes())
}

/// Parses a DIMACS CNF file.
///
/// # Errors
///
/// `CnfError::Io` if the file cannot be opened, otherwise see [`parse_dimacs`].
pub fn parse_file(file_path: impl AsRef<Path>) -> Result<Cnf, CnfError> {
    let file = std::fs::File::open(file_path)?;
    parse_dimacs(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::io::Cursor;

    fn as_i32s(cnf: &Cnf) -> Vec<Vec<i32>> {
        cnf.iter().map(|c| c.to_i32s().collect_vec()).collect()
    }

    #[test]
    fn test_parse_simple_dimacs() {
        let dimacs_content = "c This is a comment\n\
                              p cnf 3 2\n\
                              1 -2 0\n\
                              2 3 0\n";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).unwrap();

        assert_eq!(cnf.len(), 2, "Should parse 2 clauses");
        assert_eq!(cnf.num_vars, 3, "Number of variables mismatch");
        assert_eq!(as_i32s(&cnf), vec![vec![1, -2], vec![2, 3]]);
    }

    #[test]
    fn test_parse_dimacs_with_empty_lines_and_end_marker() {
        let dimacs_content = "p cnf 2 2\n\
                              \n\
                              1 0\n\
                              \n\
                              -2 0\n\
                              %\n\
                              c this should be ignored\n\
                              5 0\n";
        let cnf = parse_str(dimacs_content).unwrap();
        assert_eq!(as_i32s(&cnf), vec![vec![1], vec![-2]]);
    }

    #[test]
    fn test_parse_dimacs_empty_clause() {
        let cnf = parse_str("p cnf 1 2\n1 0\n0\n").unwrap();
        assert_eq!(cnf.len(), 2);
        assert!(cnf.has_empty_clause());
    }

    #[test]
    fn test_clause_spanning_lines_and_several_per_line() {
        let cnf = parse_str("1 2\n3 0 -1 0\n4").unwrap();
        assert_eq!(as_i32s(&cnf), vec![vec![1, 2, 3], vec![-1], vec![4]]);
    }

    #[test]
    fn test_parse_dimacs_malformed_literal() {
        let err = parse_str("1 abc 0\n").unwrap_err();
        assert!(matches!(err, CnfError::InvalidToken { line: 1, ref token } if token == "abc"));
    }

    #[test]
    fn test_parse_dimacs_no_clauses() {
        let cnf = parse_str("p cnf 0 0\n").unwrap();
        assert!(cnf.is_empty());
        assert_eq!(cnf.num_vars, 0);
    }

    #[test]
    fn test_display_is_parsed_back() {
        let cnf = Cnf::new(vec![vec![1, -3], vec![], vec![2]]).unwrap();
        assert_eq!(parse_str(&cnf.to_string()).unwrap(), cnf);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            parse_file("/definitely/not/here.cnf"),
            Err(CnfError::Io(_))
        ));
    }
}
