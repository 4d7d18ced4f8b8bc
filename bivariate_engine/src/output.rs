//! Read-only views consumed by plotting and export tools.
use serde::Serialize;
use std::fmt::Write;

use crate::distribution::DiscreteDistribution;
use crate::joint::JointTable;

#[derive(Debug, Clone, Serialize)]
pub enum OutputValue {
    Distribution(Distribution),
    Joint(Joint),
}

#[derive(Debug, Clone, Serialize)]
pub struct Distribution {
    pub probabilities: Vec<(f64, f64)>,
}

/// A table laid out for rendering: `cells[i][j]` belongs to `(columns[j], rows[i])`.
#[derive(Debug, Clone, Serialize)]
pub struct Joint {
    pub columns: Vec<f64>,
    pub rows: Vec<f64>,
    pub cells: Vec<Vec<f64>>,
}

impl From<&DiscreteDistribution> for OutputValue {
    fn from(value: &DiscreteDistribution) -> Self {
        OutputValue::Distribution(Distribution {
            probabilities: to_probabilities(value),
        })
    }
}

impl From<&JointTable> for OutputValue {
    fn from(value: &JointTable) -> Self {
        let total = value.total_mass();
        OutputValue::Joint(Joint {
            columns: value.first().values().to_vec(),
            rows: value.second().values().to_vec(),
            cells: value
                .rows()
                .map(|(_, row)| row.iter().map(|w| w / total).collect())
                .collect(),
        })
    }
}

/// Normalized `(value, probability)` pairs in ascending value order.
pub fn to_probabilities(distribution: &DiscreteDistribution) -> Vec<(f64, f64)> {
    let total = distribution.total_mass();
    let mut probabilities = distribution
        .iter()
        .map(|(value, weight)| (value, weight / total))
        .collect::<Vec<_>>();
    probabilities.sort_by(|a, b| a.0.total_cmp(&b.0));
    probabilities
}

/// Renders a distribution as AnyDice-style CSV: a `"name",mean,stddev,min,max` summary line,
/// a `#,%` header, then one `value,percent` line per value.
pub fn export_anydice_format(name: &str, distribution: &DiscreteDistribution) -> String {
    let mut string = String::new();
    write_anydice_format(&mut string, name, distribution).expect("writing to a String");
    string
}

fn write_anydice_format(
    out: &mut impl Write,
    name: &str,
    distribution: &DiscreteDistribution,
) -> std::fmt::Result {
    let probabilities = to_probabilities(distribution);
    let (min, max) = min_and_max(&probabilities);
    writeln!(
        out,
        "\"{}\",{},{},{},{}",
        name,
        distribution.mean(),
        distribution.std(),
        min,
        max
    )?;
    writeln!(out, "#,%")?;
    for (value, prob) in probabilities {
        writeln!(out, "{},{}", value, prob * 100.0)?;
    }
    Ok(())
}

/// Renders a joint table as a CSV grid. The header row lists the first variable's values, and
/// each following line starts with a value of the second variable.
pub fn export_joint_csv(joint: &JointTable) -> String {
    let mut string = String::new();
    write_joint_csv(&mut string, joint).expect("writing to a String");
    string
}

fn write_joint_csv(out: &mut impl Write, joint: &JointTable) -> std::fmt::Result {
    for x in joint.first().iter() {
        write!(out, ",{}", x)?;
    }
    writeln!(out)?;
    for (y, row) in joint.rows() {
        write!(out, "{}", y)?;
        for w in row {
            write!(out, ",{}", w)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn min_and_max(probabilities: &[(f64, f64)]) -> (f64, f64) {
    let min = probabilities.first().map_or(f64::NAN, |(value, _)| *value);
    let max = probabilities.last().map_or(f64::NAN, |(value, _)| *value);
    (min, max)
}
