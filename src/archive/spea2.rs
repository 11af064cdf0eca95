use crate::archive::EvictionPolicy;
use crate::comparator::strictly_dominates;

/// SPEA2-style strength fitness eviction.
///
/// Every member gets strength S(i) = number of members it dominates, raw
/// fitness R(i) = sum of strengths of the members dominating it, and density
/// D(i) = 1 / (distance to the nearest neighbour + 2). The member with the
/// worst combined fitness R + D leaves; ties go to the earliest inserted.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthFitnessEviction;

impl EvictionPolicy for StrengthFitnessEviction {
    fn name(&self) -> &str {
        "strength-fitness"
    }

    fn choose_victim(&mut self, objectives: &[Vec<f64>]) -> usize {
        let n = objectives.len();

        let mut strength = vec![0.0f64; n];
        for i in 0..n {
            for j in 0..n {
                if i != j && strictly_dominates(&objectives[i], &objectives[j]) {
                    strength[i] += 1.0;
                }
            }
        }

        let mut fitness = vec![0.0f64; n];
        for i in 0..n {
            for j in 0..n {
                if i != j && strictly_dominates(&objectives[j], &objectives[i]) {
                    fitness[i] += strength[j];
                }
            }
        }

        for i in 0..n {
            let mut nearest = f64::INFINITY;
            for j in 0..n {
                if i != j {
                    nearest = nearest.min(euclidean(&objectives[i], &objectives[j]));
                }
            }
            // k = 1 as recommended for SPEA2 truncation.
            fitness[i] += 1.0 / (nearest + 2.0);
        }

        let mut victim = 0;
        for (index, &value) in fitness.iter().enumerate() {
            if value > fitness[victim] {
                victim = index;
            }
        }
        victim
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
