use serde::Serialize;

use crate::error::ProbabilityError;
use crate::support::Support;

/// Upper bound on the number of cells in one table.
const MAX_CELLS: usize = 1 << 24;

/// Number of cells of a table over `first` and `second`, refusing tables too large to allocate.
pub(crate) fn cell_count(first: &Support, second: &Support) -> Result<usize, ProbabilityError> {
    first
        .len()
        .checked_mul(second.len())
        .filter(|&cells| cells <= MAX_CELLS)
        .ok_or_else(|| {
            ProbabilityError::invalid(format!(
                "a {}x{} table exceeds the limit of {} cells",
                second.len(),
                first.len(),
                MAX_CELLS
            ))
        })
}

/// Dense 2-D storage shared by joint tables and likelihood grids.
///
/// Columns are labelled by the first variable's support and rows by the second's. Cells are
/// stored row-major, so `cells[row * columns + column]` is the cell for
/// `(first[column], second[row])`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Grid {
    first: Support,
    second: Support,
    cells: Vec<f64>,
}

impl Grid {
    pub(crate) fn new(first: Support, second: Support, cells: Vec<f64>) -> Self {
        debug_assert_eq!(cells.len(), first.len() * second.len());
        Self {
            first,
            second,
            cells,
        }
    }

    /// Fills every cell with `f(x, y)`, walking rows then columns.
    pub(crate) fn try_from_fn(
        first: &Support,
        second: &Support,
        mut f: impl FnMut(f64, f64) -> Result<f64, ProbabilityError>,
    ) -> Result<Self, ProbabilityError> {
        let mut cells = Vec::with_capacity(cell_count(first, second)?);
        for y in second.iter() {
            for x in first.iter() {
                cells.push(f(x, y)?);
            }
        }
        Ok(Self::new(first.clone(), second.clone(), cells))
    }

    pub(crate) fn first(&self) -> &Support {
        &self.first
    }

    pub(crate) fn second(&self) -> &Support {
        &self.second
    }

    pub(crate) fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// `(rows, columns)`.
    pub(crate) fn shape(&self) -> (usize, usize) {
        (self.second.len(), self.first.len())
    }

    pub(crate) fn at(&self, row: usize, column: usize) -> f64 {
        self.cells[row * self.first.len() + column]
    }

    pub(crate) fn row(&self, row: usize) -> &[f64] {
        let width = self.first.len();
        &self.cells[row * width..(row + 1) * width]
    }

    pub(crate) fn column(&self, column: usize) -> Vec<f64> {
        (0..self.second.len()).map(|row| self.at(row, column)).collect()
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        self.second
            .iter()
            .zip(self.cells.chunks(self.first.len().max(1)))
    }

    /// `(x, y, weight)` for every cell, row by row.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.rows()
            .flat_map(move |(y, row)| self.first.iter().zip(row).map(move |(x, &w)| (x, y, w)))
    }

    pub(crate) fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    pub(crate) fn map_cells(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
            cells: self.cells.iter().map(|&w| f(w)).collect(),
        }
    }
}
