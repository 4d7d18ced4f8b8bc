//! Ordered sets of real values that label one axis of a distribution or table.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::error::ProbabilityError;

/// Upper bound on the number of values [`Support::range`] will generate.
const MAX_RANGE_LEN: usize = 1 << 24;

/// An ordered sequence of distinct, finite values together with a value → position index.
///
/// Lookups are exact: a value that is not bit-for-bit in the support (modulo the sign of zero)
/// is reported as [`ProbabilityError::ValueNotFound`], never rounded to a neighbour.
#[derive(Debug, Clone)]
pub struct Support {
    values: Vec<f64>,
    positions: HashMap<u64, usize>,
}

// -0.0 and 0.0 share a slot.
fn key(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

impl Support {
    pub fn new(values: Vec<f64>) -> Result<Self, ProbabilityError> {
        let mut positions = HashMap::with_capacity(values.len());
        for (i, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(ProbabilityError::invalid(format!(
                    "value {} at position {} is not finite",
                    value, i
                )));
            }
            if positions.insert(key(value), i).is_some() {
                return Err(ProbabilityError::invalid(format!(
                    "value {} appears more than once",
                    value
                )));
            }
        }
        Ok(Self { values, positions })
    }

    /// Builds `start, start + step, start + 2 * step, ...` up to but excluding `stop`.
    ///
    /// Each value is computed as `start + i * step` rather than by repeated addition, so long
    /// grids don't drift away from their nominal points.
    pub fn range(start: f64, stop: f64, step: f64) -> Result<Self, ProbabilityError> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
            return Err(ProbabilityError::invalid("range bounds must be finite"));
        }
        if step <= 0.0 {
            return Err(ProbabilityError::invalid(format!(
                "range step must be positive, got {}",
                step
            )));
        }
        let mut values = Vec::new();
        let mut i: u32 = 0;
        loop {
            let value = start + f64::from(i) * step;
            if value >= stop {
                break;
            }
            if values.len() == MAX_RANGE_LEN {
                return Err(ProbabilityError::invalid(format!(
                    "range from {} to {} with step {} is too long",
                    start, stop, step
                )));
            }
            values.push(value);
            i += 1;
        }
        Self::new(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.positions.contains_key(&key(value))
    }

    /// Position of `value` in the support.
    pub fn index_of(&self, value: f64) -> Result<usize, ProbabilityError> {
        self.positions
            .get(&key(value))
            .copied()
            .ok_or(ProbabilityError::ValueNotFound { value })
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Positions of the values sorted by ascending value.
    pub(crate) fn ascending_order(&self) -> Vec<usize> {
        let mut order = (0..self.values.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| self.values[a].total_cmp(&self.values[b]));
        order
    }
}

/// Two supports are equal when they hold the same values in the same order.
impl PartialEq for Support {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Serialize for Support {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.values)
    }
}
