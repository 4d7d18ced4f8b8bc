//! Marginal and conditional distributions of a joint table.

use crate::distribution::DiscreteDistribution;
use crate::error::ProbabilityError;
use crate::joint::{JointTable, Variable};

impl JointTable {
    /// The marginal distribution **of** `variable`, obtained by summing over the other one.
    ///
    /// `variable` names the variable kept, not the axis summed away.
    ///
    /// `marginal(Variable::First)` adds up each column and is keyed by the first support; for a
    /// table built from independent `p1` and `p2` it gives back `p1`. The weights keep the
    /// table's scale, so a normalized table yields a normalized marginal.
    pub fn marginal(&self, variable: Variable) -> DiscreteDistribution {
        let grid = self.grid();
        let (rows, columns) = grid.shape();
        let weights = match variable {
            Variable::First => {
                let mut sums = vec![0.0; columns];
                for row in 0..rows {
                    for (sum, w) in sums.iter_mut().zip(grid.row(row)) {
                        *sum += w;
                    }
                }
                sums
            }
            Variable::Second => (0..rows).map(|row| grid.row(row).iter().sum()).collect(),
        };
        DiscreteDistribution::from_parts(self.support(variable).clone(), weights)
    }

    /// The distribution of the other variable given that `fixed` equals `value` exactly.
    ///
    /// Fixing [`Variable::First`] selects a column, fixing [`Variable::Second`] a row. The slice
    /// is normalized; if it has no mass, the condition is impossible under this table and
    /// [`ProbabilityError::DegenerateDistribution`] is returned.
    pub fn conditional(
        &self,
        fixed: Variable,
        value: f64,
    ) -> Result<DiscreteDistribution, ProbabilityError> {
        let grid = self.grid();
        let index = self.support(fixed).index_of(value)?;
        let slice = match fixed {
            Variable::First => grid.column(index),
            Variable::Second => grid.row(index).to_vec(),
        };
        let mut conditional =
            DiscreteDistribution::from_parts(self.support(fixed.other()).clone(), slice);
        conditional.normalize_mut()?;
        Ok(conditional)
    }
}
