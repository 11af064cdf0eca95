
use std::cmp::Ordering;

use itertools::Itertools;
use rand::Rng;

use crate::comparator::objectives_equal_eps;
use crate::density::{crowding_distance, dir_score, preference_distance};
use crate::error::{Error, Result};
use crate::ranking::{rank, Ranking};
use crate::solution::Solution;
use crate::weights::WeightVectorSet;

/// A solution annotated with the outputs of one ranking/density pass.
///
/// The wrapper is created fresh for every pass, so the annotations can never
/// go stale against the underlying objectives.
#[derive(Debug, Clone)]
pub struct RankedSolution<V> {
    pub solution: Solution<V>,
    pub front: usize,
    pub density: f64,
}

/// Rank a population and attach per-front crowding distances. The returned
/// view is ordered by front, then by density descending within each front.
pub fn ranked_view<V: Clone>(population: &[Solution<V>]) -> Result<Vec<RankedSolution<V>>> {
    let ranking = rank(population)?;
    let mut view = Vec::with_capacity(population.len());
    for (front_index, front) in ranking.fronts().iter().enumerate() {
        let rows: Vec<Vec<f64>> = front
            .iter()
            .map(|&i| population[i].objectives().to_vec())
            .collect();
        let densities = crowding_distance(&rows);

        let mut entries: Vec<(usize, f64)> = front.iter().copied().zip(densities).collect();
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        for (index, density) in entries {
            view.push(RankedSolution {
                solution: population[index].clone(),
                front: front_index,
                density,
            });
        }
    }
    Ok(view)
}

/// N-ary tournament over a ranked view: `arity` distinct entrants are drawn
/// uniformly without replacement and the winner is the one with the best
/// front, ties broken by higher density, further ties by draw order.
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelection {
    pub arity: usize,
}

impl TournamentSelection {
    pub fn binary() -> Self {
        TournamentSelection { arity: 2 }
    }

    pub fn select<'a, V, R: Rng>(
        &self,
        rng: &mut R,
        pool: &'a [RankedSolution<V>],
    ) -> Result<&'a RankedSolution<V>> {
        if pool.len() < self.arity {
            return Err(Error::InsufficientPopulation {
                requested: self.arity,
                available: pool.len(),
            });
        }
        let entrants = rand::seq::index::sample(rng, pool.len(), self.arity);
        let mut best = &pool[entrants.index(0)];
        for position in 1..entrants.len() {
            let challenger = &pool[entrants.index(position)];
            if beats(challenger, best) {
                best = challenger;
            }
        }
        Ok(best)
    }
}

fn beats<V>(a: &RankedSolution<V>, b: &RankedSolution<V>) -> bool {
    a.front < b.front || (a.front == b.front && a.density > b.density)
}

/// Environmental selection by rank and crowding distance.
///
/// Whole fronts are taken in rank order while they fit the remaining budget;
/// the first front that would overflow is sorted by crowding distance
/// descending and only the best remainder is taken. The output always has
/// exactly `target` solutions when the input is large enough.
#[derive(Debug, Clone, Copy)]
pub struct RankingAndCrowdingSelection {
    pub target: usize,
}

impl RankingAndCrowdingSelection {
    pub fn select<V: Clone>(&self, population: &[Solution<V>]) -> Result<Vec<Solution<V>>> {
        if population.len() < self.target {
            return Err(Error::InsufficientPopulation {
                requested: self.target,
                available: population.len(),
            });
        }
        let ranking = rank(population)?;
        let picked = fill_by_rank(population, &ranking, self.target, |rows| {
            crowding_distance(rows)
        });
        Ok(picked.into_iter().map(|i| population[i].clone()).collect())
    }
}

/// Environmental selection guided by interest points.
///
/// The budget is split across the interest points; each share is filled by
/// rank using the preference distance around its point, which excludes
/// solutions outside the epsilon ball. A final pass drops near-duplicate
/// picks, so the result can be shorter than the target when the balls are
/// sparsely populated.
#[derive(Debug, Clone)]
pub struct RankingAndPreferenceSelection {
    pub target: usize,
    pub interest_points: Vec<Vec<f64>>,
    pub epsilon: f64,
}

impl RankingAndPreferenceSelection {
    pub fn select<V: Clone>(&self, population: &[Solution<V>]) -> Result<Vec<Solution<V>>> {
        if population.len() < self.target {
            return Err(Error::InsufficientPopulation {
                requested: self.target,
                available: population.len(),
            });
        }
        if self.interest_points.is_empty() {
            return Err(Error::NoInterestPoints);
        }

        let ranking = rank(population)?;
        let points = self.interest_points.len();
        let mut picked: Vec<usize> = Vec::with_capacity(self.target);

        for (point_index, point) in self.interest_points.iter().enumerate() {
            let mut share = self.target / points;
            if point_index < self.target % points {
                share += 1;
            }

            let mut taken = 0;
            for front in ranking.fronts() {
                if taken >= share {
                    break;
                }
                let rows: Vec<Vec<f64>> = front
                    .iter()
                    .map(|&i| population[i].objectives().to_vec())
                    .collect();
                let scores = preference_distance(&rows, point, self.epsilon)?;

                // Pool for this point: in-ball members not yet picked.
                let pool: Vec<(usize, f64)> = front
                    .iter()
                    .zip(&scores)
                    .filter_map(|(&i, score)| score.map(|s| (i, s)))
                    .filter(|(i, _)| !picked.contains(i))
                    .collect();

                for (index, _) in pool
                    .into_iter()
                    .sorted_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
                {
                    if taken >= share {
                        break;
                    }
                    picked.push(index);
                    taken += 1;
                }
            }
        }

        let selected: Vec<Solution<V>> =
            picked.into_iter().map(|i| population[i].clone()).collect();
        Ok(epsilon_clean(selected, self.epsilon))
    }
}

/// Environmental selection with reference-direction density: the fill is the
/// same as ranking-and-crowding, with the DIR score replacing crowding.
#[derive(Debug, Clone)]
pub struct RankingAndDirScoreSelection {
    pub target: usize,
    pub directions: WeightVectorSet,
}

impl RankingAndDirScoreSelection {
    pub fn select<V: Clone>(&self, population: &[Solution<V>]) -> Result<Vec<Solution<V>>> {
        if population.len() < self.target {
            return Err(Error::InsufficientPopulation {
                requested: self.target,
                available: population.len(),
            });
        }
        let ranking = rank(population)?;
        let directions: Vec<Vec<f64>> = self.directions.iter().map(|w| w.to_vec()).collect();
        let mut failure = None;
        let picked = fill_by_rank(population, &ranking, self.target, |rows| {
            match dir_score(rows, &directions) {
                Ok(scores) => scores,
                Err(error) => {
                    failure = Some(error);
                    vec![0.0; rows.len()]
                }
            }
        });
        if let Some(error) = failure {
            return Err(error);
        }
        Ok(picked.into_iter().map(|i| population[i].clone()).collect())
    }
}

/// Shared fill: whole fronts while they fit, then the best slice of the
/// overflowing front by the supplied density score (descending, stable).
fn fill_by_rank<V>(
    population: &[Solution<V>],
    ranking: &Ranking,
    target: usize,
    mut score: impl FnMut(&[Vec<f64>]) -> Vec<f64>,
) -> Vec<usize> {
    let mut picked: Vec<usize> = Vec::with_capacity(target);
    for front in ranking.fronts() {
        if picked.len() == target {
            break;
        }
        if picked.len() + front.len() <= target {
            picked.extend(front.iter().copied());
            continue;
        }

        let rows: Vec<Vec<f64>> = front
            .iter()
            .map(|&i| population[i].objectives().to_vec())
            .collect();
        let scores = score(&rows);
        let remainder = target - picked.len();
        picked.extend(
            front
                .iter()
                .copied()
                .zip(scores)
                .sorted_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
                .take(remainder)
                .map(|(index, _)| index),
        );
        break;
    }
    picked
}

/// Drop selections whose objective vectors duplicate an earlier pick within
/// `epsilon`.
pub fn epsilon_clean<V>(selected: Vec<Solution<V>>, epsilon: f64) -> Vec<Solution<V>> {
    let mut kept: Vec<Solution<V>> = Vec::with_capacity(selected.len());
    for candidate in selected {
        let duplicate = kept
            .iter()
            .any(|k| objectives_equal_eps(k.objectives(), candidate.objectives(), epsilon));
        if !duplicate {
            kept.push(candidate);
        }
    }
    kept
}
