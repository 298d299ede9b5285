//! A rectangular, immutable 2-D grid with `(0, 0)` in the top-left corner.

use core::ops::Index;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("{rows}x{columns} grid needs {} cells, got {cells}", .rows * .columns)]
    CellCount {
        rows: usize,
        columns: usize,
        cells: usize,
    },
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// King-move offsets: every surrounding cell, diagonals included.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    rows: usize,
    columns: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid from cells in row-major order.
    ///
    /// # Errors
    ///
    /// [`GridError::CellCount`] unless `cells.len() == rows * columns`.
    pub fn new(rows: usize, columns: usize, cells: Vec<T>) -> Result<Self, GridError> {
        if rows.checked_mul(columns) != Some(cells.len()) {
            return Err(GridError::CellCount {
                rows,
                columns,
                cells: cells.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// # Errors
    ///
    /// [`GridError::RaggedRow`] if rows differ in length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let columns = rows.first().map_or(0, Vec::len);
        let height = rows.len();
        let mut cells = Vec::with_capacity(height * columns);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != columns {
                return Err(GridError::RaggedRow {
                    row: index,
                    expected: columns,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }
        Self::new(height, columns, cells)
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn in_bounds(&self, row: usize, column: usize) -> bool {
        row < self.rows && column < self.columns
    }

    /// # Panics
    ///
    /// If `(row, column)` lies outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> &T {
        assert!(row < self.rows, "row {row} out of bounds ({} rows)", self.rows);
        assert!(
            column < self.columns,
            "column {column} out of bounds ({} columns)",
            self.columns
        );
        &self.cells[row * self.columns + column]
    }

    #[must_use]
    pub fn try_get(&self, row: usize, column: usize) -> Option<&T> {
        self.in_bounds(row, column)
            .then(|| &self.cells[row * self.columns + column])
    }

    /// Visits every cell in row-major order.
    pub fn for_each(&self, mut visit: impl FnMut(usize, usize, &T)) {
        for (row, column, value) in self.iter() {
            visit(row, column, value);
        }
    }

    /// A new grid of the same shape holding `transform(row, column, value)` for each cell.
    #[must_use]
    pub fn map<U>(&self, mut transform: impl FnMut(usize, usize, &T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            columns: self.columns,
            cells: self
                .iter()
                .map(|(row, column, value)| transform(row, column, value))
                .collect(),
        }
    }

    /// `(row, column, value)` triples in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let columns = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, value)| (i / columns, i % columns, value))
    }

    /// The in-bounds cells touching `(row, column)`, diagonals included.
    pub fn neighbors(&self, row: usize, column: usize) -> impl Iterator<Item = (usize, usize)> {
        let (rows, columns) = (self.rows, self.columns);
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = column.checked_add_signed(dc)?;
            (r < rows && c < columns).then_some((r, c))
        })
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        self.get(row, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_three() -> Grid<i32> {
        Grid::new(3, 3, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap()
    }

    #[test]
    #[should_panic(expected = "row 4 out of bounds")]
    fn test_get_row_out_of_bounds() {
        let _ = three_by_three().get(4, 2);
    }

    #[test]
    #[should_panic(expected = "column 5 out of bounds")]
    fn test_get_column_out_of_bounds() {
        let _value = three_by_three()[(1, 5)];
    }

    #[test]
    fn test_get() {
        let grid = Grid::new(3, 3, vec![1.0_f64, 2.0, 3.0, 4.0, 5.2, 6.0, 7.0, 8.0, 9.0]).unwrap();
        assert!((grid.get(1, 1) - 5.2).abs() < f64::EPSILON);
        assert_eq!(three_by_three().try_get(3, 0), None);
        assert_eq!(three_by_three().try_get(2, 0), Some(&7));
    }

    #[test]
    fn test_for_each_visits_every_cell() {
        let grid = Grid::new(4, 2, vec![8, 7, 6, 5, 4, 3, 2, 1]).unwrap();
        let mut seen = [false; 8];
        let mut sum = 0;
        grid.for_each(|row, col, value| {
            seen[row * 2 + col] = true;
            sum += value;
        });
        assert_eq!(sum, 36);
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_map() {
        let doubled = three_by_three().map(|r, c, v| (r, c, v * 2));
        assert_eq!(doubled.get(2, 1), &(2, 1, 16));
        assert_eq!(doubled.rows(), 3);
    }

    #[test]
    fn test_bad_dimensions() {
        assert_eq!(
            Grid::new(2, 2, vec![1, 2, 3]),
            Err(GridError::CellCount {
                rows: 2,
                columns: 2,
                cells: 3
            })
        );
        assert_eq!(
            Grid::from_rows(vec![vec![1, 2], vec![3]]),
            Err(GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_neighbors() {
        let grid = three_by_three();
        assert_eq!(grid.neighbors(0, 0).collect::<Vec<_>>(), vec![
            (0, 1),
            (1, 0),
            (1, 1)
        ]);
        assert_eq!(grid.neighbors(1, 1).count(), 8);
        assert_eq!(grid.neighbors(2, 1).count(), 5);
    }
}
