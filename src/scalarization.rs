use crate::comparator::achievement_scalarization_compare;
use crate::error::{Error, Result};
use crate::solution::Solution;

/// Denominators at or below this magnitude are treated as zero when computing
/// angle utilities; the affected ratio is replaced by a maximal surrogate.
pub const ANGLE_DENOMINATOR_EPSILON: f64 = 1e-5;

/// A scalarizing (aggregation) function mapping an objective vector to a
/// single utility value, minimization oriented.
///
/// Reference points that are not supplied explicitly are derived from the
/// population at scalarization time: the ideal point as the per-objective
/// minimum, the nadir point as the per-objective maximum, and extreme points
/// through the achievement scalarization order.
#[derive(Debug, Clone)]
pub enum Scalarizer {
    /// Sum of objective values.
    Sum,
    /// Positively weighted sum of objective values.
    WeightedSum { weights: Vec<f64> },
    /// Product of objective values.
    Product,
    /// Objectives exponentiated by positive weights, then multiplied.
    WeightedProduct { weights: Vec<f64> },
    /// Largest per-objective distance to the ideal point.
    Chebyshev { ideal: Option<Vec<f64>> },
    /// Chebyshev with weighted axes.
    WeightedChebyshev {
        weights: Vec<f64>,
        ideal: Option<Vec<f64>>,
    },
    /// Negated Nash bargaining value against the nadir (disagreement) point.
    Nash { nadir: Option<Vec<f64>> },
    /// Angle-based utility against the per-axis extreme points.
    AngleUtility {
        extremes: Option<Vec<Vec<f64>>>,
        denominator_epsilon: f64,
    },
    /// Pairwise tradeoff (proper/knee) utility.
    TradeoffUtility,
    /// Constant 1.0, the no-preference baseline.
    Uniform,
}

fn check_weights(function: &'static str, weights: &[f64]) -> Result<()> {
    if weights.is_empty() {
        return Err(Error::MissingWeights { function });
    }
    for (index, &value) in weights.iter().enumerate() {
        if value <= 0.0 {
            return Err(Error::NonPositiveWeight { index, value });
        }
    }
    Ok(())
}

impl Scalarizer {
    pub fn weighted_sum(weights: Vec<f64>) -> Result<Self> {
        check_weights("weighted-sum", &weights)?;
        Ok(Scalarizer::WeightedSum { weights })
    }

    pub fn weighted_product(weights: Vec<f64>) -> Result<Self> {
        check_weights("weighted-product", &weights)?;
        Ok(Scalarizer::WeightedProduct { weights })
    }

    pub fn weighted_chebyshev(weights: Vec<f64>, ideal: Option<Vec<f64>>) -> Result<Self> {
        check_weights("weighted-chebyshev", &weights)?;
        Ok(Scalarizer::WeightedChebyshev { weights, ideal })
    }

    pub fn angle_utility() -> Self {
        Scalarizer::AngleUtility {
            extremes: None,
            denominator_epsilon: ANGLE_DENOMINATOR_EPSILON,
        }
    }

    /// Utility per solution, parallel to the population order.
    pub fn scalarize<V>(&self, population: &[Solution<V>]) -> Result<Vec<f64>> {
        if population.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<&[f64]> = population.iter().map(|s| s.objectives()).collect();
        let dimension = rows[0].len();
        for row in &rows {
            if row.len() != dimension {
                return Err(Error::DimensionMismatch {
                    expected: dimension,
                    got: row.len(),
                });
            }
        }

        match self {
            Scalarizer::Sum => Ok(rows.iter().map(|f| f.iter().sum()).collect()),
            Scalarizer::WeightedSum { weights } => {
                check_dimension(weights, dimension)?;
                Ok(rows
                    .iter()
                    .map(|f| f.iter().zip(weights).map(|(v, w)| v * w).sum())
                    .collect())
            }
            Scalarizer::Product => Ok(rows.iter().map(|f| f.iter().product()).collect()),
            Scalarizer::WeightedProduct { weights } => {
                check_dimension(weights, dimension)?;
                Ok(rows
                    .iter()
                    .map(|f| f.iter().zip(weights).map(|(v, w)| v.powf(*w)).product())
                    .collect())
            }
            Scalarizer::Chebyshev { ideal } => {
                let ideal = reference_or(ideal, dimension, || ideal_of(&rows))?;
                Ok(rows.iter().map(|f| chebyshev(f, &ideal)).collect())
            }
            Scalarizer::WeightedChebyshev { weights, ideal } => {
                check_dimension(weights, dimension)?;
                let ideal = reference_or(ideal, dimension, || ideal_of(&rows))?;
                Ok(rows
                    .iter()
                    .map(|f| {
                        f.iter()
                            .zip(&ideal)
                            .zip(weights)
                            .map(|((v, i), w)| w * (v - i))
                            .fold(f64::NEG_INFINITY, f64::max)
                    })
                    .collect())
            }
            Scalarizer::Nash { nadir } => {
                let nadir = reference_or(nadir, dimension, || nadir_of(&rows))?;
                // Nash bargaining maximizes the product of gains over the
                // disagreement point; negation adapts it to minimization.
                Ok(rows
                    .iter()
                    .map(|f| {
                        -f.iter()
                            .zip(&nadir)
                            .map(|(v, n)| n - v)
                            .product::<f64>()
                    })
                    .collect())
            }
            Scalarizer::AngleUtility {
                extremes,
                denominator_epsilon,
            } => {
                let extremes = match extremes {
                    Some(points) => {
                        for point in points {
                            check_dimension(point, dimension)?;
                        }
                        points.clone()
                    }
                    None => extremes_of(&rows),
                };
                Ok(rows
                    .iter()
                    .map(|f| angle_utility(f, &extremes, *denominator_epsilon))
                    .collect())
            }
            Scalarizer::TradeoffUtility => Ok(tradeoff_utility(&rows)),
            Scalarizer::Uniform => Ok(vec![1.0; rows.len()]),
        }
    }
}

fn check_dimension(values: &[f64], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            got: values.len(),
        });
    }
    Ok(())
}

fn reference_or(
    supplied: &Option<Vec<f64>>,
    dimension: usize,
    derive: impl FnOnce() -> Vec<f64>,
) -> Result<Vec<f64>> {
    match supplied {
        Some(point) => {
            check_dimension(point, dimension)?;
            Ok(point.clone())
        }
        None => Ok(derive()),
    }
}

fn chebyshev(f: &[f64], ideal: &[f64]) -> f64 {
    f.iter()
        .zip(ideal)
        .map(|(v, i)| v - i)
        .fold(f64::NEG_INFINITY, f64::max)
}

fn angle_utility(f: &[f64], extremes: &[Vec<f64>], denominator_epsilon: f64) -> f64 {
    let mut fraction: f64 = 0.0;
    for (axis, extreme) in extremes.iter().enumerate() {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (j, e) in extreme.iter().enumerate() {
            if j == axis {
                denominator = (e - f[j]).abs();
            } else {
                numerator += (e - f[j]).powi(2);
            }
        }
        if denominator > denominator_epsilon {
            fraction = fraction.max(numerator.sqrt() / denominator);
        } else {
            // The point sits on the extreme axis; treat it as infinitely far.
            fraction = f64::MAX;
        }
    }
    fraction.atan()
}

fn tradeoff_utility(rows: &[&[f64]]) -> Vec<f64> {
    let mut utilities = vec![0.0f64; rows.len()];

    for current in 0..rows.len().saturating_sub(1) {
        for other in current + 1..rows.len() {
            let mut numerator: f64 = 0.0;
            let mut denominator: f64 = 0.0;
            for (fc, fo) in rows[current].iter().zip(rows[other]) {
                if fc > fo {
                    numerator = numerator.max(fc - fo);
                } else if fc < fo {
                    denominator = denominator.max(fo - fc);
                }
            }
            // Only mutually non-dominated pairs exchange utility.
            if numerator != 0.0 && denominator != 0.0 {
                utilities[current] = utilities[current].max(numerator / denominator);
                utilities[other] = utilities[other].max(denominator / numerator);
            }
        }
    }

    utilities
}

fn ideal_of(rows: &[&[f64]]) -> Vec<f64> {
    fold_axes(rows, f64::INFINITY, f64::min)
}

fn nadir_of(rows: &[&[f64]]) -> Vec<f64> {
    fold_axes(rows, f64::NEG_INFINITY, f64::max)
}

fn fold_axes(rows: &[&[f64]], init: f64, fold: fn(f64, f64) -> f64) -> Vec<f64> {
    let mut out = vec![init; rows[0].len()];
    for row in rows {
        for (acc, &v) in out.iter_mut().zip(row.iter()) {
            *acc = fold(*acc, v);
        }
    }
    out
}

fn extremes_of(rows: &[&[f64]]) -> Vec<Vec<f64>> {
    let dimension = rows[0].len();
    (0..dimension)
        .map(|axis| {
            let extreme = rows
                .iter()
                .min_by(|a, b| achievement_scalarization_compare(axis, a, b))
                .unwrap_or(&rows[0]);
            extreme.to_vec()
        })
        .collect()
}

/// Per-objective minimum across the population.
pub fn ideal_point<V>(population: &[Solution<V>]) -> Result<Vec<f64>> {
    let rows: Vec<&[f64]> = population.iter().map(|s| s.objectives()).collect();
    if rows.is_empty() {
        return Err(Error::EmptyPopulation);
    }
    Ok(ideal_of(&rows))
}

/// Per-objective maximum across the population.
pub fn nadir_point<V>(population: &[Solution<V>]) -> Result<Vec<f64>> {
    let rows: Vec<&[f64]> = population.iter().map(|s| s.objectives()).collect();
    if rows.is_empty() {
        return Err(Error::EmptyPopulation);
    }
    Ok(nadir_of(&rows))
}

/// One extreme point per objective axis, located through the achievement
/// scalarization order.
pub fn extreme_points<V>(population: &[Solution<V>]) -> Result<Vec<Vec<f64>>> {
    let rows: Vec<&[f64]> = population.iter().map(|s| s.objectives()).collect();
    if rows.is_empty() {
        return Err(Error::EmptyPopulation);
    }
    Ok(extremes_of(&rows))
}
