use crate::combinatorics::CombinationError;
use crate::grid::GridError;
use crate::queens::board::{Coord, RegionId};
use crate::sat::error::{ContradictionError, SolveError};
use thiserror::Error;

/// The board could not be turned into clauses, or the search aborted.
///
/// A board with no solution is not an error; see [`QueensSolver::solve`](crate::queens::solver::QueensSolver::solve).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("region {region} has no cells")]
    EmptyRegion { region: RegionId },
    #[error("encoder produced a contradictory clause: {0}")]
    Contradiction(#[from] ContradictionError),
    #[error(transparent)]
    Combination(#[from] CombinationError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("failed to read board: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: '{token}' is not a region id")]
    InvalidCell { line: usize, token: String },
    #[error("board has no rows")]
    Empty,
    #[error(transparent)]
    Shape(#[from] GridError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a \"row,col\" cell name")]
pub struct CoordParseError(pub String);

/// A rule broken by a marked board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("row {row} has {count} marked cells")]
    Row { row: usize, count: usize },
    #[error("column {column} has {count} marked cells")]
    Column { column: usize, count: usize },
    #[error("region {region} has {count} marked cells")]
    Region { region: RegionId, count: usize },
    #[error("marked cells {first} and {second} touch")]
    Adjacent { first: Coord, second: Coord },
}
