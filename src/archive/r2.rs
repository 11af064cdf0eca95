use ndarray::Array2;

use crate::archive::EvictionPolicy;
use crate::error::{Error, Result};
use crate::weights::WeightVectorSet;

/// Evicts the member contributing least to the R2 indicator.
///
/// Member rows are normalized per objective by the set's own extremes; the
/// utility of member i under weight vector w is max_d w_d * |f_d|, and the R2
/// value of a set is the mean over vectors of the best (smallest) utility.
/// The victim is the member whose removal leaves the best R2 value; ties go
/// to the earliest inserted member.
#[derive(Debug, Clone)]
pub struct R2ContributionEviction {
    weights: WeightVectorSet,
}

impl R2ContributionEviction {
    pub fn new(weights: WeightVectorSet) -> Self {
        R2ContributionEviction { weights }
    }
}

impl EvictionPolicy for R2ContributionEviction {
    fn name(&self) -> &str {
        "r2-contribution"
    }

    fn choose_victim(&mut self, objectives: &[Vec<f64>]) -> usize {
        let n = objectives.len();
        let vectors = self.weights.len();
        let dimension = objectives[0].len();

        let normalized = normalize(objectives);
        let mut utilities = Array2::<f64>::zeros((n, vectors));
        for (j, weight) in self.weights.iter().enumerate() {
            for i in 0..n {
                let mut value = f64::NEG_INFINITY;
                for d in 0..dimension {
                    value = value.max(weight[d] * normalized[i][d].abs());
                }
                utilities[[i, j]] = value;
            }
        }

        let r2_without = |skip: usize| -> f64 {
            let mut sum = 0.0;
            for j in 0..vectors {
                let mut best = f64::INFINITY;
                for i in 0..n {
                    if i != skip {
                        best = best.min(utilities[[i, j]]);
                    }
                }
                sum += best;
            }
            sum / vectors as f64
        };

        let mut victim = 0;
        let mut best_value = f64::INFINITY;
        for index in 0..n {
            let value = r2_without(index);
            if value < best_value {
                best_value = value;
                victim = index;
            }
        }
        victim
    }

    fn check_dimension(&self, objectives_len: usize) -> Result<()> {
        if self.weights.dimension() != objectives_len {
            return Err(Error::DimensionMismatch {
                expected: objectives_len,
                got: self.weights.dimension(),
            });
        }
        Ok(())
    }
}

fn normalize(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dimension = rows[0].len();
    let mut min = vec![f64::INFINITY; dimension];
    let mut max = vec![f64::NEG_INFINITY; dimension];
    for row in rows {
        for axis in 0..dimension {
            min[axis] = min[axis].min(row[axis]);
            max[axis] = max[axis].max(row[axis]);
        }
    }
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(axis, &value)| {
                    let range = max[axis] - min[axis];
                    if range > 0.0 {
                        (value - min[axis]) / range
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}
