//! JSON clause lists: `[[["a", true], ["b", false]], [["c", true]]]`.
//!
//! Each clause is an array of `[variable, value]` pairs. This is the format the
//! large regression formulas are stored in.

use crate::sat::error::ParseError;
use crate::sat::formula::Formula;
use std::io::{self, Read};
use std::path::Path;

pub type RawClauses = Vec<Vec<(String, bool)>>;

/// # Errors
///
/// [`ParseError::Json`] if the input is not a list of lists of `[string, bool]`
/// pairs, [`ParseError::Contradiction`] if a clause is self-contradictory.
pub fn parse_json<R: Read>(reader: R) -> Result<Formula, ParseError> {
    let raw: RawClauses = serde_json::from_reader(reader)?;
    Ok(Formula::build(raw)?)
}

/// # Errors
///
/// See [`parse_json`].
pub fn parse_json_str(input: &str) -> Result<Formula, ParseError> {
    let raw: RawClauses = serde_json::from_str(input)?;
    Ok(Formula::build(raw)?)
}

/// # Errors
///
/// [`ParseError::Io`] if the file cannot be opened; otherwise see [`parse_json`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Formula, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_json(io::BufReader::new(file))
}

/// Renders a formula back into the JSON clause list format.
///
/// # Errors
///
/// Only if serialisation itself fails, which plain strings and booleans never do.
pub fn to_json(formula: &Formula) -> Result<String, serde_json::Error> {
    let raw: Vec<Vec<(&str, bool)>> = formula
        .iter()
        .map(|clause| {
            clause
                .iter()
                .map(|lit| (lit.variable().as_ref(), lit.polarity()))
                .collect()
        })
        .collect();
    serde_json::to_string(&raw)
}
