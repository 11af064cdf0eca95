use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithm::{Algorithm, Variation};
use crate::archive::grid::AdaptiveGridEviction;
use crate::archive::BoundedArchive;
use crate::comparator::dominance_compare;
use crate::error::Result;
use crate::evaluator::Termination;
use crate::solution::Solution;
use crate::Problem;

/// PAES configuration with documented defaults.
#[derive(Debug, Clone)]
pub struct PaesConfig {
    pub archive_capacity: usize,
    pub grid_bisections: usize,
    pub seed: u64,
}

impl Default for PaesConfig {
    fn default() -> Self {
        PaesConfig {
            archive_capacity: 100,
            grid_bisections: 5,
            seed: 0,
        }
    }
}

/// (1+1) Pareto archived evolution strategy.
///
/// A single current solution is mutated each step; the mutant replaces the
/// current solution when it dominates it, and otherwise when the
/// adaptive-grid archive accepts it. The archive is the result set.
pub struct Paes<V> {
    problem: Box<dyn Problem<V> + Sync>,
    variation: Box<dyn Variation<V>>,
    termination: Box<dyn Termination>,
    archive: BoundedArchive<V>,
    rng: StdRng,
    evaluations: usize,
}

impl<V: Clone> Paes<V> {
    pub fn new(
        problem: Box<dyn Problem<V> + Sync>,
        variation: Box<dyn Variation<V>>,
        termination: Box<dyn Termination>,
        config: PaesConfig,
    ) -> Result<Self> {
        let policy =
            AdaptiveGridEviction::new(config.grid_bisections, problem.number_of_objectives())?;
        let archive = BoundedArchive::new(config.archive_capacity, Box::new(policy))?;
        Ok(Paes {
            problem,
            variation,
            termination,
            archive,
            rng: StdRng::seed_from_u64(config.seed),
            evaluations: 0,
        })
    }
}

impl<V: Clone> Algorithm<V> for Paes<V> {
    fn name(&self) -> &str {
        "PAES"
    }

    fn run(&mut self) -> Result<()> {
        let objectives = self.problem.number_of_objectives();

        let mut current = Solution::new(self.variation.create(&mut self.rng), objectives);
        self.problem.evaluate(&mut current)?;
        self.evaluations += 1;
        self.archive.add(&current)?;

        for iteration in 0.. {
            let values: Vec<Vec<f64>> = self
                .archive
                .members()
                .iter()
                .map(|member| member.objectives().to_vec())
                .collect();
            if self
                .termination
                .should_stop(iteration, self.evaluations, &values)
            {
                break;
            }

            let mut mutant_variables = current.variables.clone();
            self.variation.mutate(&mut self.rng, &mut mutant_variables);
            let mut mutant = Solution::new(mutant_variables, objectives);
            self.problem.evaluate(&mut mutant)?;
            self.evaluations += 1;

            match dominance_compare(current.objectives(), mutant.objectives())? {
                // The current solution dominates the mutant: discard it.
                Ordering::Less => {}
                Ordering::Greater => {
                    self.archive.add(&mutant)?;
                    current = mutant;
                }
                Ordering::Equal => {
                    // Mutually non-dominated: the archive arbitrates. An
                    // accepted mutant becomes the new search point.
                    if self.archive.add(&mutant)? {
                        current = mutant;
                    }
                }
            }
        }

        Ok(())
    }

    fn result(&self) -> &[Solution<V>] {
        self.archive.members()
    }
}
