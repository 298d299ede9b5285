#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the DIMACS CNF file format.
//!
//! The format is line based:
//! - Comment lines start with 'c'.
//! - A problem line 'p cnf <`num_variables`> <`num_clauses`>' may appear; its
//!   counts are ignored and derived from the clauses actually present.
//! - Everything else is a stream of integer literals, positive for a variable
//!   and negative for its negation, with '0' terminating each clause. A clause
//!   may span lines; a lone '0' is the empty clause.
//! - A '%' line ends the data (some benchmark suites append junk after it).
//!
//! Integer variables become named variables: literal `-3` is `not 3`.

use crate::sat::error::ParseError;
use crate::sat::formula::Formula;
use crate::sat::literal::Literal;
use std::io::{self, BufRead};
use std::path::Path;

/// Parses DIMACS data into raw clauses.
///
/// # Errors
///
/// [`ParseError::Io`] if reading fails, [`ParseError::InvalidLiteral`] for a
/// token that is not an integer.
pub fn parse_clauses<R: BufRead>(reader: R) -> Result<Vec<Vec<Literal>>, ParseError> {
    let mut clauses = Vec::new();
    let mut current = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None | Some(&"c" | &"p") => {}
            Some(_) => {
                for token in parts {
                    let value = token
                        .parse::<i64>()
                        .map_err(|_| ParseError::InvalidLiteral {
                            line: index + 1,
                            token: token.to_string(),
                        })?;
                    if value == 0 {
                        clauses.push(std::mem::take(&mut current));
                    } else {
                        current.push(Literal::new(value.unsigned_abs().to_string(), value > 0));
                    }
                }
            }
        }
    }

    if !current.is_empty() {
        clauses.push(current);
    }
    Ok(clauses)
}

/// Parses DIMACS data into a [`Formula`].
///
/// # Errors
///
/// See [`parse_clauses`]; additionally [`ParseError::Contradiction`] when a
/// clause contains a literal and its negation.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Formula, ParseError> {
    Ok(Formula::build(parse_clauses(reader)?)?)
}

/// Parses CNF given inline, e.g. `"1 -2 0\n2 3 0"`.
///
/// # Errors
///
/// See [`parse_dimacs`].
pub fn parse_text(input: &str) -> Result<Formula, ParseError> {
    parse_dimacs(io::Cursor::new(input))
}

/// Opens and parses a DIMACS file.
///
/// # Errors
///
/// See [`parse_dimacs`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Formula, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}
