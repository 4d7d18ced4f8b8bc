//! One-dimensional discrete distributions over real values.
//!
//! Weights need not sum to one. Every constructor guarantees that the weights are finite,
//! non-negative, and have a positive total, so summary statistics are always defined; they are
//! computed relative to the total mass, which makes them identical for a distribution and its
//! normalized copy.

use std::f64::consts::PI;

use serde::Serialize;

use crate::error::ProbabilityError;
use crate::support::Support;

/// A finite support of values, each with a non-negative weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscreteDistribution {
    support: Support,
    weights: Vec<f64>,
}

impl std::fmt::Display for DiscreteDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter()
                .map(|(value, weight)| format!("{}: {}", value, weight))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

pub(crate) fn check_weights(weights: &[f64]) -> Result<f64, ProbabilityError> {
    for (i, &weight) in weights.iter().enumerate() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ProbabilityError::invalid(format!(
                "weight {} at position {} is not a finite non-negative number",
                weight, i
            )));
        }
    }
    let total = weights.iter().sum::<f64>();
    if total <= 0.0 {
        Err(ProbabilityError::invalid("all weights are zero"))
    } else if !total.is_finite() {
        Err(ProbabilityError::invalid("total weight overflows"))
    } else {
        Ok(total)
    }
}

fn normal_pdf(x: f64, mean: f64, std: f64) -> f64 {
    let z = (x - mean) / std;
    (-0.5 * z * z).exp() / (std * (2.0 * PI).sqrt())
}

impl DiscreteDistribution {
    /// Tolerance used by [`DiscreteDistribution::is_normalized`].
    pub const EPSILON: f64 = 1e-9;

    /// Creates a distribution from distinct values and their weights.
    pub fn new(values: Vec<f64>, weights: Vec<f64>) -> Result<Self, ProbabilityError> {
        if values.len() != weights.len() {
            return Err(ProbabilityError::invalid(format!(
                "{} values but {} weights",
                values.len(),
                weights.len()
            )));
        }
        Self::with_support(Support::new(values)?, weights)
    }

    /// Like [`DiscreteDistribution::new`], over a support that was already built.
    pub fn with_support(support: Support, weights: Vec<f64>) -> Result<Self, ProbabilityError> {
        if support.len() != weights.len() {
            return Err(ProbabilityError::invalid(format!(
                "{} values but {} weights",
                support.len(),
                weights.len()
            )));
        }
        check_weights(&weights)?;
        Ok(Self { support, weights })
    }

    /// Evaluates `f` at every value of the support to get its weight, e.g. a density.
    pub fn from_fn(support: Support, f: impl Fn(f64) -> f64) -> Result<Self, ProbabilityError> {
        let weights = support.iter().map(f).collect();
        Self::with_support(support, weights)
    }

    pub fn uniform(support: Support) -> Result<Self, ProbabilityError> {
        let (normalized, _) = Self::from_fn(support, |_| 1.0)?.normalize()?;
        Ok(normalized)
    }

    /// A normal density with the given parameters, discretized on `support` and normalized.
    pub fn normal(support: Support, mean: f64, std: f64) -> Result<Self, ProbabilityError> {
        if !(mean.is_finite() && std.is_finite() && std > 0.0) {
            return Err(ProbabilityError::invalid(format!(
                "normal parameters must be finite with positive std, got mean {} and std {}",
                mean, std
            )));
        }
        let (normalized, _) = Self::from_fn(support, |x| normal_pdf(x, mean, std))?.normalize()?;
        Ok(normalized)
    }

    /// Wraps weights produced by aggregation inside the crate. The caller upholds the invariants.
    pub(crate) fn from_parts(support: Support, weights: Vec<f64>) -> Self {
        debug_assert_eq!(support.len(), weights.len());
        Self { support, weights }
    }

    pub fn support(&self) -> &Support {
        &self.support
    }

    pub fn values(&self) -> &[f64] {
        self.support.values()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterates over `(value, weight)` pairs in support order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.support.iter().zip(self.weights.iter().copied())
    }

    pub fn total_mass(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.total_mass() - 1.0).abs() < Self::EPSILON
    }

    /// Returns a normalized copy, together with the mass before normalization.
    ///
    /// When the weights are prior times likelihood, that mass is the evidence.
    pub fn normalize(&self) -> Result<(Self, f64), ProbabilityError> {
        let mut normalized = self.clone();
        let total = normalized.normalize_mut()?;
        Ok((normalized, total))
    }

    /// Normalizes in place and returns the mass before normalization.
    pub fn normalize_mut(&mut self) -> Result<f64, ProbabilityError> {
        let total = self.total_mass();
        if total <= 0.0 {
            return Err(ProbabilityError::DegenerateDistribution);
        }
        if !total.is_finite() {
            return Err(ProbabilityError::invalid("total weight overflows"));
        }
        for weight in &mut self.weights {
            *weight /= total;
        }
        tracing::trace!(total, len = self.weights.len(), "normalized distribution");
        Ok(total)
    }

    /// Weight of exactly `value`.
    pub fn probability_at(&self, value: f64) -> Result<f64, ProbabilityError> {
        Ok(self.weights[self.support.index_of(value)?])
    }

    /// Weighted mean, `Σ value·weight / Σ weight`.
    pub fn mean(&self) -> f64 {
        self.iter().map(|(value, weight)| value * weight).sum::<f64>() / self.total_mass()
    }

    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.iter()
            .map(|(value, weight)| (value - mean).powi(2) * weight)
            .sum::<f64>()
            / self.total_mass()
    }

    pub fn std(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest value whose cumulative probability reaches `p`.
    pub fn quantile(&self, p: f64) -> Result<f64, ProbabilityError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(ProbabilityError::invalid(format!(
                "quantile probability {} is outside [0, 1]",
                p
            )));
        }
        let order = self.support.ascending_order();
        let threshold = p * self.total_mass();
        let mut cumulative = 0.0;
        for &i in &order {
            cumulative += self.weights[i];
            if cumulative >= threshold {
                return Ok(self.values()[i]);
            }
        }
        // Rounding can leave the running sum a hair under the total.
        let last = order[order.len() - 1];
        Ok(self.values()[last])
    }

    /// Central interval holding probability `p`.
    pub fn credible_interval(&self, p: f64) -> Result<(f64, f64), ProbabilityError> {
        let tail = (1.0 - p) / 2.0;
        Ok((self.quantile(tail)?, self.quantile(1.0 - tail)?))
    }

    /// The most probable value. Ties go to the smallest value.
    pub fn max_prob(&self) -> f64 {
        let mut best = 0;
        for i in self.support.ascending_order() {
            if self.weights[i] > self.weights[best]
                || (self.weights[i] == self.weights[best] && self.values()[i] < self.values()[best])
            {
                best = i;
            }
        }
        self.values()[best]
    }

    /// Multiplies each weight by `likelihood(value)` and normalizes.
    ///
    /// Returns the posterior and the evidence, the mass before normalization.
    pub fn update(
        &self,
        likelihood: impl Fn(f64) -> f64,
    ) -> Result<(Self, f64), ProbabilityError> {
        let mut weights = Vec::with_capacity(self.len());
        for (value, weight) in self.iter() {
            let l = likelihood(value);
            if !l.is_finite() || l < 0.0 {
                return Err(ProbabilityError::InvalidLikelihood {
                    at: value.to_string(),
                    value: l,
                });
            }
            weights.push(weight * l);
        }
        let mut posterior = Self::from_parts(self.support.clone(), weights);
        let evidence = posterior.total_mass();
        if evidence <= 0.0 {
            return Err(ProbabilityError::ZeroEvidence);
        }
        if !evidence.is_finite() {
            return Err(ProbabilityError::invalid("evidence overflows"));
        }
        posterior.normalize_mut()?;
        Ok((posterior, evidence))
    }

    fn compare(&self, other: &Self, keep: impl Fn(f64, f64) -> bool) -> f64 {
        let mut total = 0.0;
        for (x, px) in self.iter() {
            for (y, py) in other.iter() {
                if keep(x, y) {
                    total += px * py;
                }
            }
        }
        total / (self.total_mass() * other.total_mass())
    }

    /// Probability that a draw from `self` exceeds an independent draw from `other`.
    pub fn prob_gt(&self, other: &Self) -> f64 {
        self.compare(other, |x, y| x > y)
    }

    pub fn prob_lt(&self, other: &Self) -> f64 {
        self.compare(other, |x, y| x < y)
    }

    pub fn prob_eq(&self, other: &Self) -> f64 {
        self.compare(other, |x, y| x == y)
    }
}
