//! Joint distributions of two variables, stored as dense tables.
//!
//! Throughout the crate, the *first* variable labels the columns of a table and the *second*
//! variable labels its rows. [`JointTable::build`], [`LikelihoodGrid::evaluate`],
//! [`crate::update::update`] and the extractors all follow that convention.

use serde::Serialize;

use crate::distribution::{check_weights, DiscreteDistribution};
use crate::error::ProbabilityError;
use crate::grid::{cell_count, Grid};
use crate::likelihood::LikelihoodGrid;
use crate::support::Support;

/// Names one of the two variables of a joint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Variable {
    /// The variable of the first distribution, indexing columns.
    First,
    /// The variable of the second distribution, indexing rows.
    Second,
}

impl Variable {
    pub fn other(self) -> Self {
        match self {
            Variable::First => Variable::Second,
            Variable::Second => Variable::First,
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variable::First => write!(f, "first"),
            Variable::Second => write!(f, "second"),
        }
    }
}

/// A weight for every `(x, y)` pair of two supports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JointTable {
    grid: Grid,
}

impl JointTable {
    /// Builds the joint distribution of two **independent** variables as the outer product of
    /// their distributions: the cell at `(x, y)` is `first(x) * second(y)`.
    ///
    /// This is not a general joint constructor. If the variables are dependent, build the table
    /// with [`JointTable::from_cells`] instead. The total mass of the result is the product of
    /// the two masses, so two normalized inputs give a normalized table.
    ///
    /// Fails with [`ProbabilityError::InvalidDistribution`] when the table would be too large to
    /// allocate or its total mass overflows.
    pub fn build(
        first: &DiscreteDistribution,
        second: &DiscreteDistribution,
    ) -> Result<Self, ProbabilityError> {
        let count = cell_count(first.support(), second.support())?;
        if !(first.total_mass() * second.total_mass()).is_finite() {
            return Err(ProbabilityError::invalid("joint mass overflows"));
        }
        let mut cells = Vec::with_capacity(count);
        for &wy in second.weights() {
            for &wx in first.weights() {
                cells.push(wx * wy);
            }
        }
        tracing::debug!(
            rows = second.len(),
            columns = first.len(),
            "built joint table from independent marginals"
        );
        Ok(Self::from_grid(Grid::new(
            first.support().clone(),
            second.support().clone(),
            cells,
        )))
    }

    /// Wraps an existing table. `cells` is row-major: rows follow `second`, columns follow
    /// `first`.
    pub fn from_cells(
        first: Support,
        second: Support,
        cells: Vec<f64>,
    ) -> Result<Self, ProbabilityError> {
        if cells.len() != cell_count(&first, &second)? {
            return Err(ProbabilityError::invalid(format!(
                "{} cells for a {}x{} table",
                cells.len(),
                second.len(),
                first.len()
            )));
        }
        check_weights(&cells)?;
        Ok(Self::from_grid(Grid::new(first, second, cells)))
    }

    pub(crate) fn from_grid(grid: Grid) -> Self {
        Self { grid }
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn support(&self, variable: Variable) -> &Support {
        match variable {
            Variable::First => self.grid.first(),
            Variable::Second => self.grid.second(),
        }
    }

    /// Support of the first variable, labelling the columns.
    pub fn first(&self) -> &Support {
        self.grid.first()
    }

    /// Support of the second variable, labelling the rows.
    pub fn second(&self) -> &Support {
        self.grid.second()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[f64] {
        self.grid.cells()
    }

    /// The weight of the pair `(x, y)`, matched exactly.
    pub fn get(&self, x: f64, y: f64) -> Result<f64, ProbabilityError> {
        let column = self.grid.first().index_of(x)?;
        let row = self.grid.second().index_of(y)?;
        Ok(self.grid.at(row, column))
    }

    /// Rows labelled by their value of the second variable.
    pub fn rows(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        self.grid.rows()
    }

    /// `(x, y, weight)` for every cell.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.grid.entries()
    }

    pub fn total_mass(&self) -> f64 {
        self.grid.total()
    }

    pub fn is_normalized(&self) -> bool {
        (self.total_mass() - 1.0).abs() < DiscreteDistribution::EPSILON
    }

    /// Returns a normalized copy and the mass before normalization.
    pub fn normalize(&self) -> Result<(Self, f64), ProbabilityError> {
        let total = self.total_mass();
        if total <= 0.0 {
            return Err(ProbabilityError::DegenerateDistribution);
        }
        if !total.is_finite() {
            return Err(ProbabilityError::invalid("total weight overflows"));
        }
        tracing::trace!(total, "normalized joint table");
        Ok((Self::from_grid(self.grid.map_cells(|w| w / total)), total))
    }

    /// Evaluates `evidence(x, y)` over this table's supports.
    pub fn likelihood(
        &self,
        evidence: impl Fn(f64, f64) -> f64,
    ) -> Result<LikelihoodGrid, ProbabilityError> {
        LikelihoodGrid::evaluate(self.first(), self.second(), evidence)
    }

    /// See [`crate::update::update`].
    pub fn update(&self, likelihood: &LikelihoodGrid) -> Result<(Self, f64), ProbabilityError> {
        crate::update::update(self, likelihood)
    }

    /// Probability that the first variable is strictly greater than the second.
    pub fn prob_first_greater(&self) -> f64 {
        let greater = self
            .iter()
            .filter(|&(x, y, _)| x > y)
            .map(|(_, _, w)| w)
            .sum::<f64>();
        greater / self.total_mass()
    }
}
