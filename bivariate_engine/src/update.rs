//! Bayesian update of a joint table.

use crate::error::ProbabilityError;
use crate::grid::Grid;
use crate::joint::{JointTable, Variable};
use crate::likelihood::LikelihoodGrid;
use crate::support::Support;

/// Evidence below this is reported, since the posterior is then dominated by rounding.
const TINY_EVIDENCE: f64 = 1e-12;

fn check_axis(
    variable: Variable,
    prior: &Support,
    likelihood: &Support,
) -> Result<(), ProbabilityError> {
    if prior == likelihood {
        Ok(())
    } else {
        Err(ProbabilityError::ShapeMismatch {
            variable,
            prior_len: prior.len(),
            likelihood_len: likelihood.len(),
        })
    }
}

/// Multiplies `prior` by `likelihood` cell by cell and normalizes.
///
/// Returns the posterior and the evidence, the total mass of the product before normalization.
/// Both axes must carry the same values in the same order. The prior is left untouched.
pub fn update(
    prior: &JointTable,
    likelihood: &LikelihoodGrid,
) -> Result<(JointTable, f64), ProbabilityError> {
    check_axis(Variable::First, prior.first(), likelihood.first())?;
    check_axis(Variable::Second, prior.second(), likelihood.second())?;

    let cells = prior
        .cells()
        .iter()
        .zip(likelihood.cells())
        .map(|(p, l)| p * l)
        .collect::<Vec<_>>();
    let evidence = cells.iter().sum::<f64>();
    if evidence <= 0.0 {
        tracing::debug!("update rejected: zero evidence");
        return Err(ProbabilityError::ZeroEvidence);
    }
    if !evidence.is_finite() {
        return Err(ProbabilityError::invalid("evidence overflows"));
    }
    if evidence < TINY_EVIDENCE {
        tracing::warn!(evidence, "evidence is vanishingly small");
    }

    let posterior = cells.into_iter().map(|w| w / evidence).collect();
    let (rows, columns) = prior.shape();
    tracing::debug!(rows, columns, evidence, "updated joint table");
    Ok((
        JointTable::from_grid(Grid::new(
            prior.first().clone(),
            prior.second().clone(),
            posterior,
        )),
        evidence,
    ))
}
