//! CNF encoding of region-coloured queens puzzles.
//!
//! Every cell is a boolean variable named `"{row},{col}"`, true when the cell is
//! marked. The rules become clauses:
//! - exactly one mark per row, per column and per region: one clause requiring
//!   at least one of the cells, plus one clause per pair forbidding both;
//! - no two marks touch: for each pair of neighbouring cells (diagonals
//!   included) a clause forbidding both. Each pair is emitted once, from the
//!   cell that comes first in row-major order.
//!
//! The encoding assumes king-move adjacency. A variant that only forbids
//! orthogonal contact needs a different neighbourhood, not just this one trimmed.

use crate::combinatorics::subsets;
use crate::queens::board::{Board, Coord, QueensCell, RegionId, marked_cells};
use crate::queens::error::EncodeError;
use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::dpll::Solution;
use crate::sat::formula::Formula;
use crate::sat::literal::{Literal, Variable};
use crate::sat::variable_selection::VariableSelection;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::debug;

/// Cells grouped by region, regions kept in the order they are first met.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionMap {
    regions: Vec<(RegionId, Vec<Coord>)>,
}

impl RegionMap {
    /// Groups cells by region. Repeated ids are merged.
    ///
    /// # Errors
    ///
    /// [`EncodeError::EmptyRegion`] if a region has no cells.
    pub fn new<I>(groups: I) -> Result<Self, EncodeError>
    where
        I: IntoIterator<Item = (RegionId, Vec<Coord>)>,
    {
        let mut index: FxHashMap<RegionId, usize> = FxHashMap::default();
        let mut regions: Vec<(RegionId, Vec<Coord>)> = Vec::new();
        for (region, cells) in groups {
            match index.get(&region) {
                Some(&i) => regions[i].1.extend(cells),
                None => {
                    index.insert(region, regions.len());
                    regions.push((region, cells));
                }
            }
        }
        if let Some((region, _)) = regions.iter().find(|(_, cells)| cells.is_empty()) {
            return Err(EncodeError::EmptyRegion { region: *region });
        }
        Ok(Self { regions })
    }

    /// # Errors
    ///
    /// See [`RegionMap::new`]; a board never yields an empty region.
    pub fn from_board(board: &Board) -> Result<Self, EncodeError> {
        Self::new(
            board
                .iter()
                .map(|(row, col, cell)| (cell.region, vec![Coord::new(row, col)])),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    #[must_use]
    pub fn get(&self, region: RegionId) -> Option<&[Coord]> {
        self.regions
            .iter()
            .find(|(id, _)| *id == region)
            .map(|(_, cells)| cells.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &[Coord])> {
        self.regions.iter().map(|(id, cells)| (*id, cells.as_slice()))
    }

    /// Regions from smallest to largest; equal sizes keep first-met order.
    pub fn by_size(&self) -> impl Iterator<Item = (RegionId, &[Coord])> {
        let mut ordered: Vec<_> = self.iter().collect();
        ordered.sort_by_key(|(_, cells)| cells.len());
        ordered.into_iter()
    }
}

/// Branches on cells of the smallest region that still has a live cell.
///
/// Small regions have the fewest ways to place their mark, so settling them
/// first collapses the search quickly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOrder {
    order: Vec<Variable>,
}

impl RegionOrder {
    #[must_use]
    pub fn new(regions: &RegionMap) -> Self {
        Self {
            order: regions
                .by_size()
                .flat_map(|(_, cells)| cells.iter().map(|cell| cell.variable()))
                .collect(),
        }
    }
}

impl VariableSelection for RegionOrder {
    fn pick(&self, clauses: &[Arc<Clause>]) -> Option<Variable> {
        let live: FxHashSet<&Variable> = clauses.iter().flat_map(|c| c.variables()).collect();
        self.order.iter().find(|var| live.contains(var)).cloned()
    }
}

/// Encoding switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Encoding {
    /// Pin every cell already marked on the input board.
    pub keep_marks: bool,
}

/// One clause requiring a mark among `cells`, and one per pair forbidding two.
///
/// # Errors
///
/// Only if the cells repeat a coordinate in a way that contradicts itself,
/// which distinct cells never do.
pub fn exactly_one(cells: &[Coord]) -> Result<Vec<Clause>, EncodeError> {
    let mut clauses = vec![Clause::new(cells.iter().map(|c| (c.variable(), true)))?];
    if cells.len() < 2 {
        return Ok(clauses);
    }
    for pair in subsets(cells, 2)? {
        clauses.push(Clause::new(pair.iter().map(|c| (c.variable(), false)))?);
    }
    Ok(clauses)
}

fn generate_region_clauses(regions: &RegionMap) -> Result<Vec<Clause>, EncodeError> {
    let mut clauses = Vec::new();
    for (_, cells) in regions.iter() {
        clauses.extend(exactly_one(cells)?);
    }
    Ok(clauses)
}

fn generate_row_clauses(board: &Board) -> Result<Vec<Clause>, EncodeError> {
    let mut clauses = Vec::new();
    for row in 0..board.rows() {
        let cells: Vec<Coord> = (0..board.columns()).map(|col| Coord::new(row, col)).collect();
        clauses.extend(exactly_one(&cells)?);
    }
    Ok(clauses)
}

fn generate_col_clauses(board: &Board) -> Result<Vec<Clause>, EncodeError> {
    let mut clauses = Vec::new();
    for col in 0..board.columns() {
        let cells: Vec<Coord> = (0..board.rows()).map(|row| Coord::new(row, col)).collect();
        clauses.extend(exactly_one(&cells)?);
    }
    Ok(clauses)
}

fn generate_adjacency_clauses(board: &Board) -> Result<Vec<Clause>, EncodeError> {
    let mut clauses = Vec::new();
    for (row, col, _) in board.iter() {
        let here = Coord::new(row, col);
        for (nr, nc) in board.neighbors(row, col) {
            if (nr, nc) > (row, col) {
                let there = Coord::new(nr, nc);
                clauses.push(Clause::new([
                    (here.variable(), false),
                    (there.variable(), false),
                ])?);
            }
        }
    }
    Ok(clauses)
}

fn generate_marked_clauses(board: &Board) -> Result<Vec<Clause>, EncodeError> {
    marked_cells(board)
        .map(|cell| Clause::new([Literal::new(cell.variable(), true)]).map_err(EncodeError::from))
        .collect()
}

/// Solves queens boards through the SAT engine. Holds no state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueensSolver {
    pub encoding: Encoding,
}

impl QueensSolver {
    #[must_use]
    pub const fn new(encoding: Encoding) -> Self {
        Self { encoding }
    }

    /// Encodes `board` as a formula that branches with [`RegionOrder`].
    ///
    /// # Errors
    ///
    /// [`EncodeError::EmptyRegion`] or a contradiction raised while building clauses.
    pub fn to_formula(&self, board: &Board) -> Result<Formula, EncodeError> {
        let regions = RegionMap::from_board(board)?;

        let mut clauses = generate_region_clauses(&regions)?;
        clauses.extend(generate_row_clauses(board)?);
        clauses.extend(generate_col_clauses(board)?);
        clauses.extend(generate_adjacency_clauses(board)?);
        if self.encoding.keep_marks {
            clauses.extend(generate_marked_clauses(board)?);
        }

        debug!(
            rows = board.rows(),
            columns = board.columns(),
            regions = regions.len(),
            clauses = clauses.len(),
            "encoded queens board"
        );

        Ok(Formula::new(clauses).with_selector(RegionOrder::new(&regions)))
    }

    /// Solves `board`, returning it with exactly the solution's cells marked.
    ///
    /// `Ok(None)` means the board has no solution.
    ///
    /// # Errors
    ///
    /// See [`QueensSolver::to_formula`]; also [`EncodeError::Solve`] if the search aborts.
    pub fn solve(&self, board: &Board) -> Result<Option<Board>, EncodeError> {
        let solution = self.solve_formula(board)?;
        Ok(solution
            .assignment
            .map(|assignment| Self::decode(board, &assignment)))
    }

    /// Encodes and searches, keeping the engine's statistics.
    ///
    /// # Errors
    ///
    /// See [`QueensSolver::solve`].
    pub fn solve_formula(&self, board: &Board) -> Result<Solution, EncodeError> {
        Ok(self.to_formula(board)?.solve()?)
    }

    /// Marks exactly the cells the assignment sets true. Cells the search never
    /// had to fix are left unmarked.
    #[must_use]
    pub fn decode(board: &Board, assignment: &Assignment) -> Board {
        board.map(|row, col, cell| QueensCell {
            marked: assignment
                .get(&Coord::new(row, col).variable())
                .unwrap_or(false),
            region: cell.region,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queens::board::{
        EXAMPLE_EIGHT, EXAMPLE_FIVE, EXAMPLE_SIX, board_from_regions, parse_board, validate,
    };
    use crate::queens::error::Violation;

    fn solve(regions: &[impl AsRef<[RegionId]>]) -> Option<Board> {
        let board = board_from_regions(regions).unwrap();
        QueensSolver::default().solve(&board).unwrap()
    }

    #[test]
    fn test_exactly_one() {
        let cells = [Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)];
        let clauses = exactly_one(&cells).unwrap();
        assert_eq!(clauses.len(), 4);
        assert_eq!(clauses[0].to_string(), "0,0 or 0,1 or 0,2");
        assert_eq!(clauses[1].to_string(), "not 0,0 or not 0,1");
        assert_eq!(clauses[3].to_string(), "not 0,1 or not 0,2");

        let single = exactly_one(&[Coord::new(4, 4)]).unwrap();
        assert_eq!(single.len(), 1);
        assert!(single[0].is_unit());
    }

    #[test]
    fn test_empty_region_rejected() {
        let err = RegionMap::new([(0, vec![Coord::new(0, 0)]), (1, vec![])]).unwrap_err();
        assert_eq!(err, EncodeError::EmptyRegion { region: 1 });
    }

    #[test]
    fn test_region_map_order() {
        let board = board_from_regions(&EXAMPLE_FIVE).unwrap();
        let regions = RegionMap::from_board(&board).unwrap();
        assert_eq!(regions.len(), 5);
        let ids: Vec<RegionId> = regions.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 0, 2, 3, 4]);
        let by_size: Vec<(RegionId, usize)> =
            regions.by_size().map(|(id, cells)| (id, cells.len())).collect();
        assert_eq!(by_size[0], (4, 4));
        assert_eq!(regions.get(2).map(<[Coord]>::len), Some(5));
        assert_eq!(regions.get(9), None);
    }

    #[test]
    fn test_adjacency_pairs_emitted_once() {
        let board = board_from_regions(&[[0, 0], [1, 1]]).unwrap();
        let clauses = generate_adjacency_clauses(&board).unwrap();
        // a 2x2 block has 6 touching pairs
        assert_eq!(clauses.len(), 6);
    }

    #[test]
    fn test_region_order_prefers_small_regions() {
        let board = board_from_regions(&EXAMPLE_FIVE).unwrap();
        let regions = RegionMap::from_board(&board).unwrap();
        let strategy = RegionOrder::new(&regions);
        let formula = QueensSolver::default().to_formula(&board).unwrap();
        // region 4 (4 cells) is the smallest; its first cell is (3,1)
        assert_eq!(strategy.pick(&formula.clauses()).as_deref(), Some("3,1"));
        assert_eq!(strategy.pick(&[]), None);
    }

    #[test]
    fn test_solves_examples() {
        let five = solve(&EXAMPLE_FIVE).expect("five has a solution");
        assert_eq!(validate(&five), Ok(()));
        let six = solve(&EXAMPLE_SIX).expect("six has a solution");
        assert_eq!(validate(&six), Ok(()));
        let eight = solve(&EXAMPLE_EIGHT).expect("eight has a solution");
        assert_eq!(validate(&eight), Ok(()));
        // regions survive decoding
        let regions = board_from_regions(&EXAMPLE_EIGHT).unwrap();
        assert_eq!(
            eight.map(|_, _, c| c.region),
            regions.map(|_, _, c| c.region)
        );
    }

    #[test]
    fn test_row_regions() {
        let board = solve(&[[0, 0, 0, 0], [1, 1, 1, 1], [2, 2, 2, 2], [3, 3, 3, 3]])
            .expect("4x4 has a solution");
        assert_eq!(validate(&board), Ok(()));
    }

    #[test]
    fn test_three_by_three_has_no_solution() {
        assert_eq!(solve(&[[0, 0, 0], [1, 1, 1], [2, 2, 2]]), None);
    }

    #[test]
    fn test_too_few_regions_has_no_solution() {
        assert_eq!(
            solve(&[[0, 0, 0, 0], [0, 1, 1, 1], [2, 2, 2, 2], [2, 2, 2, 2]]),
            None
        );
    }

    #[test]
    fn test_keep_marks() {
        let board = parse_board("0  0* 1  1\n2  0  1  1\n2  3  3  1\n2  3  3  3\n").unwrap();
        let keep = QueensSolver::new(Encoding { keep_marks: true });
        let solved = keep.solve(&board).unwrap().expect("solution exists");
        assert!(solved.get(0, 1).marked);
        assert_eq!(validate(&solved), Ok(()));

        // a mark that cannot be part of any solution makes the board unsolvable
        let wrong = parse_board("0* 0  1  1\n2  0  1  1\n2  3  3  1\n2  3  3  3\n").unwrap();
        assert_eq!(keep.solve(&wrong).unwrap(), None);
        // without pinning, stale marks are ignored
        assert!(QueensSolver::default().solve(&wrong).unwrap().is_some());
    }

    #[test]
    fn test_decode_treats_missing_as_unmarked() {
        let board = board_from_regions(&[[0, 1], [2, 3]]).unwrap();
        let mut assignment = Assignment::new();
        assignment.set("1,0", true);
        assignment.set("0,0", false);
        let decoded = QueensSolver::decode(&board, &assignment);
        assert!(decoded.get(1, 0).marked);
        assert!(!decoded.get(0, 1).marked);
        assert!(!decoded.get(1, 1).marked);
        assert_eq!(
            validate(&decoded),
            Err(Violation::Row { row: 0, count: 0 })
        );
    }

    #[test]
    fn test_solution_stats() {
        let board = board_from_regions(&EXAMPLE_EIGHT).unwrap();
        let solution = QueensSolver::default().solve_formula(&board).unwrap();
        assert!(solution.is_sat());
        assert!(solution.stats.propagations > 0);
    }
}
