use std::cmp::Ordering;

use itertools::Itertools;
use ndarray::Array2;

use crate::comparator::{constrained_dominance_compare, strictly_dominates};
use crate::error::{Error, Result};
use crate::scalarization::Scalarizer;
use crate::solution::Solution;
use crate::weights::WeightVectorSet;

/// The result of ranking a population: a total partition into successive
/// fronts, front 0 being the non-dominated set.
#[derive(Debug, Clone)]
pub struct Ranking {
    fronts: Vec<Vec<usize>>,
    rank_of: Vec<usize>,
}

impl Ranking {
    pub fn number_of_fronts(&self) -> usize {
        self.fronts.len()
    }

    /// Population indices belonging to front `index`.
    pub fn front(&self, index: usize) -> &[usize] {
        &self.fronts[index]
    }

    pub fn fronts(&self) -> &[Vec<usize>] {
        &self.fronts
    }

    /// Front index of the solution at `solution_index` in the ranked population.
    pub fn rank_of(&self, solution_index: usize) -> usize {
        self.rank_of[solution_index]
    }

    fn from_fronts(fronts: Vec<Vec<usize>>, population_len: usize) -> Self {
        let mut rank_of = vec![0usize; population_len];
        for (rank, front) in fronts.iter().enumerate() {
            for &index in front {
                rank_of[index] = rank;
            }
        }
        Ranking { fronts, rank_of }
    }
}

fn check_uniform_dimension<V>(population: &[Solution<V>]) -> Result<usize> {
    let dimension = population[0].number_of_objectives();
    for solution in population {
        if solution.number_of_objectives() != dimension {
            return Err(Error::DimensionMismatch {
                expected: dimension,
                got: solution.number_of_objectives(),
            });
        }
    }
    Ok(dimension)
}

/// Partition a population into Pareto fronts.
///
/// Unconstrained populations go through an efficient non-dominated sort that
/// presorts lexicographically and only tests candidates against already
/// placed fronts. Populations carrying constraint violations fall back to the
/// pairwise bookkeeping sort, with constraint comparison applied before
/// dominance.
pub fn rank<V>(population: &[Solution<V>]) -> Result<Ranking> {
    if population.is_empty() {
        return Ok(Ranking {
            fronts: Vec::new(),
            rank_of: Vec::new(),
        });
    }
    check_uniform_dimension(population)?;

    let constrained = population
        .iter()
        .any(|s| s.constraint().map_or(false, |c| !c.is_feasible()));

    let fronts = if constrained {
        constrained_sort(population)?
    } else {
        let rows: Vec<&[f64]> = population.iter().map(|s| s.objectives()).collect();
        ens_sort(&rows)
    };

    tracing::trace!(
        population = population.len(),
        fronts = fronts.len(),
        "ranked population"
    );
    Ok(Ranking::from_fronts(fronts, population.len()))
}

/// Efficient non-dominated sort: indices are presorted lexicographically, so
/// a candidate can only be dominated by members already placed; each
/// candidate joins the first front that contains no dominating member.
fn ens_sort(rows: &[&[f64]]) -> Vec<Vec<usize>> {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    indices.sort_by(|&a, &b| lexicographic(rows[a], rows[b]));

    let mut fronts: Vec<Vec<usize>> = Vec::new();
    for &n in &indices {
        let mut k = 0;
        while k < fronts.len() {
            // Scan back to front: the most recently added members are the
            // most likely to dominate the candidate.
            let dominated = fronts[k]
                .iter()
                .rev()
                .any(|&member| strictly_dominates(rows[member], rows[n]));
            if !dominated {
                break;
            }
            k += 1;
        }
        if k == fronts.len() {
            fronts.push(vec![n]);
        } else {
            fronts[k].push(n);
        }
    }

    fronts
}

fn lexicographic(a: &[f64], b: &[f64]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.partial_cmp(y).unwrap_or(Ordering::Equal) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }
    Ordering::Equal
}

/// Pairwise fast non-dominated sort with constraint-aware comparison.
fn constrained_sort<V>(population: &[Solution<V>]) -> Result<Vec<Vec<usize>>> {
    let n = population.len();
    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];

    for p in 0..n {
        for q in p + 1..n {
            match constrained_dominance_compare(&population[p], &population[q])? {
                Ordering::Less => {
                    dominated_by[p].push(q);
                    domination_count[q] += 1;
                }
                Ordering::Greater => {
                    dominated_by[q].push(p);
                    domination_count[p] += 1;
                }
                Ordering::Equal => {}
            }
        }
    }

    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    let mut fronts = Vec::new();
    while !current.is_empty() {
        let mut next = Vec::new();
        for &p in &current {
            for &q in &dominated_by[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    next.push(q);
                }
            }
        }
        fronts.push(std::mem::take(&mut current));
        current = next;
    }

    Ok(fronts)
}

/// Which weighted scalarizing function drives a scalarization-based ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarizingKind {
    WeightedSum,
    WeightedChebyshev,
}

/// Scalarization-based (R2-style) ranking.
///
/// For every weight vector the population is sorted by that vector's utility
/// and each solution receives its position as a rank; a solution's final rank
/// is the maximum position it was ever assigned (ranks only increase across
/// vectors). Fronts are the ascending groups of distinct final ranks, which
/// are coarser than pure dominance fronts.
pub fn rank_by_scalarization<V>(
    population: &[Solution<V>],
    weights: &WeightVectorSet,
    kind: ScalarizingKind,
) -> Result<Ranking> {
    if population.is_empty() {
        return Ok(Ranking {
            fronts: Vec::new(),
            rank_of: Vec::new(),
        });
    }
    let dimension = check_uniform_dimension(population)?;
    if weights.dimension() != dimension {
        return Err(Error::DimensionMismatch {
            expected: dimension,
            got: weights.dimension(),
        });
    }

    let n = population.len();
    let vectors = weights.len();

    // Utility of every solution under every weight vector.
    let mut utilities = Array2::<f64>::zeros((n, vectors));
    let ideal = crate::scalarization::ideal_point(population)?;
    for (j, vector) in weights.iter().enumerate() {
        // Vectors of a weight set may contain zero components (boundary
        // directions), so the variants are built directly instead of going
        // through the positivity-checking constructors.
        let scalarizer = match kind {
            ScalarizingKind::WeightedSum => Scalarizer::WeightedSum {
                weights: vector.to_vec(),
            },
            ScalarizingKind::WeightedChebyshev => Scalarizer::WeightedChebyshev {
                weights: vector.to_vec(),
                ideal: Some(ideal.clone()),
            },
        };
        for (i, value) in scalarizer.scalarize(population)?.into_iter().enumerate() {
            utilities[[i, j]] = value;
        }
    }

    let mut ranks = vec![0usize; n];
    for j in 0..vectors {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            utilities[[a, j]]
                .partial_cmp(&utilities[[b, j]])
                .unwrap_or(Ordering::Equal)
        });
        for (position, &index) in order.iter().enumerate() {
            // Ranks only ever increase as further vectors are considered.
            if position > ranks[index] {
                ranks[index] = position;
            }
        }
    }

    // Fronts are the ascending groups of distinct final ranks.
    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut previous_rank = None;
    for index in (0..n).sorted_by_key(|&i| (ranks[i], i)) {
        if previous_rank != Some(ranks[index]) {
            fronts.push(Vec::new());
            previous_rank = Some(ranks[index]);
        }
        if let Some(front) = fronts.last_mut() {
            front.push(index);
        }
    }

    Ok(Ranking::from_fronts(fronts, n))
}
