use miette::Diagnostic;
use thiserror::Error;

use crate::joint::Variable;

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ProbabilityError {
    #[error("Invalid distribution: {reason}")]
    #[diagnostic(
        code(bivariate::invalid_distribution),
        help("Values must be finite and distinct, weights finite and non-negative, with at least one positive weight.")
    )]
    InvalidDistribution { reason: String },

    #[error("Cannot normalize a distribution with zero total mass")]
    #[diagnostic(
        code(bivariate::degenerate_distribution),
        help("Every weight is zero. If this is a conditional slice, the fixed value is impossible under the joint.")
    )]
    DegenerateDistribution,

    #[error("Value {value} is not in the support")]
    #[diagnostic(
        code(bivariate::value_not_found),
        help("Lookups match values exactly; there is no interpolation between grid points.")
    )]
    ValueNotFound { value: f64 },

    #[error("Axis of the {variable} variable does not match: prior has {prior_len} values, likelihood has {likelihood_len}")]
    #[diagnostic(
        code(bivariate::shape_mismatch),
        help("Evaluate the likelihood over the same supports, in the same order, as the joint prior.")
    )]
    ShapeMismatch {
        variable: Variable,
        prior_len: usize,
        likelihood_len: usize,
    },

    #[error("The observed evidence has zero probability under every hypothesis")]
    #[diagnostic(
        code(bivariate::zero_evidence),
        help("The prior and the evidence function are incompatible; change one of them.")
    )]
    ZeroEvidence,

    /// `at` is the hypothesis, `x` for a single variable or `(x, y)` for a pair.
    #[error("Evidence function returned {value} at {at}")]
    #[diagnostic(
        code(bivariate::invalid_likelihood),
        help("Likelihoods must be finite and non-negative for every hypothesis.")
    )]
    InvalidLikelihood { at: String, value: f64 },
}

impl ProbabilityError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ProbabilityError::InvalidDistribution {
            reason: reason.into(),
        }
    }
}
