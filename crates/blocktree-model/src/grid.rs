use serde::{Deserialize, Serialize};

use crate::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// A dense, rectangular, row-major grid of cell values.
///
/// Coordinates are **0-indexed** and absolute: `(0, 0)` is worksheet cell `A1` regardless of
/// where the used range of the source sheet starts. Indices never shift once a grid is
/// built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellValue>,
}

impl Grid {
    /// An all-empty grid of the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CellValue::Empty; rows * cols],
        }
    }

    /// Build a grid from ragged rows; short rows are padded with [`CellValue::Empty`].
    pub fn from_rows<R, V>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut grid = Grid::new(rows.len(), cols);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                grid.set(r, c, value);
            }
        }
        grid
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Value at `(row, col)`; out-of-bounds reads are [`CellValue::Empty`].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        if row < self.rows && col < self.cols {
            &self.cells[row * self.cols + col]
        } else {
            &EMPTY
        }
    }

    /// Value at `(row, col)` if the coordinate lies inside the grid.
    #[inline]
    pub fn checked_get(&self, row: usize, col: usize) -> Option<&CellValue> {
        (row < self.rows && col < self.cols).then(|| &self.cells[row * self.cols + col])
    }

    /// Store a value, growing the grid when the coordinate lies beyond the current bounds.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if row >= self.rows || col >= self.cols {
            self.resize((row + 1).max(self.rows), (col + 1).max(self.cols));
        }
        let cols = self.cols;
        self.cells[row * cols + col] = value;
    }

    fn resize(&mut self, rows: usize, cols: usize) {
        if cols == self.cols {
            self.cells.resize(rows * cols, CellValue::Empty);
            self.rows = rows;
            return;
        }

        let mut cells = vec![CellValue::Empty; rows * cols];
        for r in 0..self.rows {
            for c in 0..self.cols {
                cells[r * cols + c] = std::mem::take(&mut self.cells[r * self.cols + c]);
            }
        }
        self.rows = rows;
        self.cols = cols;
        self.cells = cells;
    }

    /// Iterate rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[CellValue]> + '_ {
        // `chunks` panics on a zero chunk size; a zero-width grid has no visible cells.
        let width = self.cols.max(1);
        self.cells.chunks(width).take(if self.cols == 0 { 0 } else { self.rows })
    }

    /// Copy of the rows from `start_row` to the end.
    pub fn rows_from(&self, start_row: usize) -> Grid {
        let start_row = start_row.min(self.rows);
        Grid {
            rows: self.rows - start_row,
            cols: self.cols,
            cells: self.cells[start_row * self.cols..].to_vec(),
        }
    }
}

/// The data-bearing part of a worksheet: everything after the header rows.
///
/// Columns are addressed by **rank** (1-based position within the window), and rows by
/// their 0-based index within the window.
/// [`DataWindow::header_rows`] records how many worksheet rows sit above window row `0`, so
/// worksheet coordinates can always be mapped back.
#[derive(Clone, Debug, PartialEq)]
pub struct DataWindow {
    header_rows: usize,
    grid: Grid,
}

impl DataWindow {
    /// Cut the window out of a full worksheet grid.
    pub fn from_full(full: &Grid, header_rows: usize) -> Self {
        Self {
            header_rows,
            grid: full.rows_from(header_rows),
        }
    }

    #[inline]
    pub fn header_rows(&self) -> usize {
        self.header_rows
    }

    /// Number of data rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Number of columns, i.e. the highest rank available.
    #[inline]
    pub fn width(&self) -> usize {
        self.grid.cols()
    }

    /// True when the window has a column of the given rank.
    #[inline]
    pub fn has_rank(&self, rank: usize) -> bool {
        rank >= 1 && rank <= self.width()
    }

    /// Value at window row `row`, column `rank` (1-based). Missing columns read as empty.
    #[inline]
    pub fn cell(&self, row: usize, rank: usize) -> &CellValue {
        match rank.checked_sub(1) {
            Some(col) => self.grid.get(row, col),
            None => &EMPTY,
        }
    }

    #[inline]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Iterate the window row by row.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[CellValue]> + '_ {
        self.grid.iter_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_pads_ragged_input() {
        let grid = Grid::from_rows(vec![vec!["a"], vec!["b", "c", "d"]]);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(0, 2), &CellValue::Empty);
        assert_eq!(grid.get(1, 2), &CellValue::from("d"));
        assert_eq!(grid.get(9, 9), &CellValue::Empty);
        assert_eq!(grid.checked_get(9, 9), None);
    }

    #[test]
    fn set_grows_without_reindexing() {
        let mut grid = Grid::from_rows(vec![vec!["a", "b"]]);
        grid.set(2, 3, CellValue::Number(1.0));
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.get(0, 0), &CellValue::from("a"));
        assert_eq!(grid.get(0, 1), &CellValue::from("b"));
        assert_eq!(grid.get(2, 3), &CellValue::Number(1.0));
    }

    #[test]
    fn window_skips_header_rows_and_uses_ranks() {
        let grid = Grid::from_rows(vec![
            vec!["h1"],
            vec!["h2"],
            vec!["h3"],
            vec!["h4"],
            vec!["x", "y"],
        ]);
        let window = DataWindow::from_full(&grid, 4);
        assert_eq!(window.rows(), 1);
        assert_eq!(window.width(), 2);
        assert_eq!(window.cell(0, 1), &CellValue::from("x"));
        assert_eq!(window.cell(0, 2), &CellValue::from("y"));
        assert_eq!(window.cell(0, 0), &CellValue::Empty);
        assert_eq!(window.cell(0, 11), &CellValue::Empty);
        assert!(!window.has_rank(11));
    }

    #[test]
    fn window_past_end_is_empty() {
        let grid = Grid::from_rows(vec![vec!["h1"], vec!["h2"]]);
        let window = DataWindow::from_full(&grid, 4);
        assert_eq!(window.rows(), 0);
        assert_eq!(window.iter_rows().count(), 0);
    }
}
