//! Likelihood of an observation under every hypothesis `(x, y)`.

use serde::Serialize;

use crate::error::ProbabilityError;
use crate::grid::Grid;
use crate::support::Support;

/// Same layout as a [`crate::joint::JointTable`]: columns follow the first variable, rows the
/// second. Cells need not sum to anything in particular.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LikelihoodGrid {
    grid: Grid,
}

impl LikelihoodGrid {
    /// Calls `evidence(x, y)` for every `x` in `first` and `y` in `second`.
    ///
    /// The function has to be total over the cross product: a negative, infinite or NaN value
    /// for any pair is rejected with [`ProbabilityError::InvalidLikelihood`].
    pub fn evaluate(
        first: &Support,
        second: &Support,
        evidence: impl Fn(f64, f64) -> f64,
    ) -> Result<Self, ProbabilityError> {
        let grid = Grid::try_from_fn(first, second, |x, y| {
            let value = evidence(x, y);
            if value.is_finite() && value >= 0.0 {
                Ok(value)
            } else {
                Err(ProbabilityError::InvalidLikelihood {
                    at: format!("({}, {})", x, y),
                    value,
                })
            }
        })?;
        tracing::debug!(
            rows = second.len(),
            columns = first.len(),
            "evaluated likelihood grid"
        );
        Ok(Self { grid })
    }

    pub fn first(&self) -> &Support {
        self.grid.first()
    }

    pub fn second(&self) -> &Support {
        self.grid.second()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    pub fn cells(&self) -> &[f64] {
        self.grid.cells()
    }

    pub fn get(&self, x: f64, y: f64) -> Result<f64, ProbabilityError> {
        let column = self.grid.first().index_of(x)?;
        let row = self.grid.second().index_of(y)?;
        Ok(self.grid.at(row, column))
    }

    /// `(x, y, likelihood)` for every cell.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.grid.entries()
    }
}

/// Observation "the first variable is larger than the second".
pub fn greater_than(x: f64, y: f64) -> f64 {
    if x > y {
        1.0
    } else {
        0.0
    }
}

/// Observation "the first variable is smaller than the second".
pub fn less_than(x: f64, y: f64) -> f64 {
    if x < y {
        1.0
    } else {
        0.0
    }
}

/// Probability that a player wins against an opponent rated `diff` points lower, using the Elo
/// logistic curve.
pub fn elo_win_probability(diff: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-diff / 400.0))
}
