//! Error types raised by the SAT engine.
//!
//! An unsatisfiable formula is not an error: searches report it as `Ok(None)`.
//! The errors below signal malformed input or a broken branching strategy.

use crate::sat::literal::Variable;
use thiserror::Error;

/// A clause was asked to hold a literal and its negation at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("contradiction on variable {variable}")]
pub struct ContradictionError {
    pub variable: Variable,
}

/// A search aborted before reaching a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The branching strategy returned a variable that no live clause mentions,
    /// or nothing at all, while the formula was still open.
    #[error(
        "branching strategy picked {}, which no remaining clause contains",
        .variable.as_deref().unwrap_or("nothing")
    )]
    HeuristicContract { variable: Option<Variable> },
}

/// A formula file could not be read.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON clause list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}: '{token}' is not a literal")]
    InvalidLiteral { line: usize, token: String },
    #[error(transparent)]
    Contradiction(#[from] ContradictionError),
}
