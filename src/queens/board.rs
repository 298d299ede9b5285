//! Queens boards: cells tagged with a colour region, some of them marked.
//!
//! Boards are stored as text, one row per line, region ids separated by
//! whitespace. A trailing `*` marks a cell; lines starting with `#` are comments.
//!
//! ```text
//! # 4x4, solved
//! 0  0* 1  1
//! 2  0  1  1*
//! 2* 3  3  1
//! 2  3  3* 3
//! ```

use crate::grid::Grid;
use crate::queens::error::{BoardError, CoordParseError, Violation};
use crate::sat::literal::Variable;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

pub type RegionId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QueensCell {
    pub marked: bool,
    pub region: RegionId,
}

impl QueensCell {
    #[must_use]
    pub const fn new(region: RegionId) -> Self {
        Self {
            marked: false,
            region,
        }
    }
}

pub type Board = Grid<QueensCell>;

/// A cell position. Its variable name is `"{row},{col}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub fn variable(self) -> Variable {
        Variable::from(self.to_string())
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CoordParseError(s.to_string());
        let (row, col) = s.split_once(',').ok_or_else(err)?;
        Ok(Self {
            row: row.trim().parse().map_err(|_| err())?,
            col: col.trim().parse().map_err(|_| err())?,
        })
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Builds an unmarked board from a rectangular table of region ids.
///
/// # Errors
///
/// [`BoardError::Empty`] for zero rows, [`BoardError::Shape`] for ragged rows.
pub fn board_from_regions<R: AsRef<[RegionId]>>(regions: &[R]) -> Result<Board, BoardError> {
    if regions.is_empty() {
        return Err(BoardError::Empty);
    }
    let rows = regions
        .iter()
        .map(|row| row.as_ref().iter().copied().map(QueensCell::new).collect())
        .collect();
    Ok(Grid::from_rows(rows)?)
}

/// # Errors
///
/// [`BoardError::InvalidCell`] for tokens that are not region ids,
/// [`BoardError::Empty`] without any rows, [`BoardError::Shape`] for ragged rows.
pub fn parse_board(input: &str) -> Result<Board, BoardError> {
    let mut rows = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                let (digits, marked) = token
                    .strip_suffix('*')
                    .map_or((token, false), |digits| (digits, true));
                digits
                    .parse::<RegionId>()
                    .map(|region| QueensCell { marked, region })
                    .map_err(|_| BoardError::InvalidCell {
                        line: index + 1,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(BoardError::Empty);
    }
    Ok(Grid::from_rows(rows)?)
}

/// # Errors
///
/// [`BoardError::Io`] if the file cannot be read; otherwise see [`parse_board`].
pub fn parse_board_file(path: impl AsRef<Path>) -> Result<Board, BoardError> {
    parse_board(&std::fs::read_to_string(path)?)
}

/// Coordinates of every marked cell, in row-major order.
pub fn marked_cells(board: &Board) -> impl Iterator<Item = Coord> + '_ {
    board
        .iter()
        .filter(|(_, _, cell)| cell.marked)
        .map(|(row, col, _)| Coord::new(row, col))
}

/// Checks the puzzle rules on a marked board: exactly one mark per row, per
/// column and per region, and no two marks touching, diagonals included.
///
/// # Errors
///
/// The first [`Violation`] found, in that order.
pub fn validate(board: &Board) -> Result<(), Violation> {
    let marks: Vec<Coord> = marked_cells(board).collect();

    for row in 0..board.rows() {
        let count = marks.iter().filter(|c| c.row == row).count();
        if count != 1 {
            return Err(Violation::Row { row, count });
        }
    }
    for column in 0..board.columns() {
        let count = marks.iter().filter(|c| c.col == column).count();
        if count != 1 {
            return Err(Violation::Column { column, count });
        }
    }

    let mut per_region: FxHashMap<RegionId, usize> = FxHashMap::default();
    for (_, _, cell) in board.iter() {
        *per_region.entry(cell.region).or_default() += usize::from(cell.marked);
    }
    if let Some((&region, &count)) = per_region
        .iter()
        .sorted()
        .find(|&(_, &count)| count != 1)
    {
        return Err(Violation::Region { region, count });
    }

    for &first in &marks {
        if let Some((row, col)) = board
            .neighbors(first.row, first.col)
            .find(|&(r, c)| board.get(r, c).marked)
        {
            let second = Coord::new(row, col);
            return Err(Violation::Adjacent {
                first: first.min(second),
                second: first.max(second),
            });
        }
    }
    Ok(())
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = self
            .iter()
            .map(|(_, _, cell)| cell.region.to_string().len())
            .max()
            .unwrap_or(1)
            + 1;
        for row in 0..self.rows() {
            let line = (0..self.columns())
                .map(|col| {
                    let cell = self.get(row, col);
                    let token = format!("{}{}", cell.region, if cell.marked { "*" } else { "" });
                    format!("{token:<width$}")
                })
                .join(" ");
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Example boards, each with at least one solution.
pub const EXAMPLE_FIVE: [[RegionId; 5]; 5] = [
    [1, 0, 0, 0, 0],
    [1, 1, 2, 0, 0],
    [1, 2, 2, 2, 3],
    [1, 4, 2, 3, 3],
    [4, 4, 4, 3, 3],
];

pub const EXAMPLE_SIX: [[RegionId; 6]; 6] = [
    [0, 0, 0, 1, 1, 2],
    [0, 0, 1, 1, 1, 2],
    [3, 0, 1, 1, 2, 2],
    [3, 3, 4, 1, 2, 2],
    [3, 4, 4, 4, 5, 2],
    [3, 4, 4, 5, 5, 5],
];

pub const EXAMPLE_EIGHT: [[RegionId; 8]; 8] = [
    [0, 0, 1, 1, 2, 2, 3, 3],
    [0, 1, 1, 1, 2, 2, 3, 3],
    [0, 1, 1, 2, 2, 2, 3, 3],
    [4, 4, 1, 2, 2, 3, 3, 3],
    [4, 4, 4, 5, 2, 3, 3, 3],
    [4, 4, 5, 5, 5, 6, 3, 7],
    [4, 4, 5, 5, 6, 6, 6, 7],
    [4, 4, 5, 5, 6, 6, 7, 7],
];
