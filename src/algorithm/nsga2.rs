use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithm::{check_probability, Algorithm, Variation};
use crate::error::Result;
use crate::evaluator::{PopulationEvaluator, Termination};
use crate::ranking::rank;
use crate::selection::{ranked_view, RankingAndCrowdingSelection, TournamentSelection};
use crate::solution::{objective_matrix, Solution};
use crate::{Error, Problem};

/// NSGA-II configuration with documented defaults.
#[derive(Debug, Clone)]
pub struct Nsga2Config {
    pub population_size: usize,
    pub crossover_probability: f64,
    pub mutation_probability: f64,
    pub seed: u64,
}

impl Default for Nsga2Config {
    fn default() -> Self {
        Nsga2Config {
            population_size: 100,
            crossover_probability: 0.9,
            mutation_probability: 0.1,
            seed: 0,
        }
    }
}

/// NSGA-II: generational loop over non-dominated ranking, crowding distance
/// and binary tournament mating, with environmental selection truncating the
/// parent/offspring union back to the population size.
pub struct Nsga2<V> {
    problem: Box<dyn Problem<V> + Sync>,
    variation: Box<dyn Variation<V>>,
    evaluator: Box<dyn PopulationEvaluator<V>>,
    termination: Box<dyn Termination>,
    config: Nsga2Config,
    rng: StdRng,
    evaluations: usize,
    result: Vec<Solution<V>>,
}

impl<V: Clone> Nsga2<V> {
    pub fn new(
        problem: Box<dyn Problem<V> + Sync>,
        variation: Box<dyn Variation<V>>,
        evaluator: Box<dyn PopulationEvaluator<V>>,
        termination: Box<dyn Termination>,
        config: Nsga2Config,
    ) -> Result<Self> {
        if config.population_size < 2 {
            return Err(Error::InvalidPopulationSize(config.population_size));
        }
        check_probability("crossover_probability", config.crossover_probability)?;
        check_probability("mutation_probability", config.mutation_probability)?;

        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Nsga2 {
            problem,
            variation,
            evaluator,
            termination,
            config,
            rng,
            evaluations: 0,
            result: Vec::new(),
        })
    }

    fn mate(&mut self, parents: &[crate::selection::RankedSolution<V>]) -> Result<Vec<Solution<V>>> {
        let objectives = self.problem.number_of_objectives();
        let tournament = TournamentSelection::binary();
        let mut offspring = Vec::with_capacity(self.config.population_size);

        while offspring.len() < self.config.population_size {
            let first = tournament.select(&mut self.rng, parents)?;
            let second = tournament.select(&mut self.rng, parents)?;

            let (mut child_a, mut child_b) = if self.rng.gen_bool(self.config.crossover_probability)
            {
                self.variation.crossover(
                    &mut self.rng,
                    &first.solution.variables,
                    &second.solution.variables,
                )
            } else {
                (
                    first.solution.variables.clone(),
                    second.solution.variables.clone(),
                )
            };

            if self.rng.gen_bool(self.config.mutation_probability) {
                self.variation.mutate(&mut self.rng, &mut child_a);
            }
            if self.rng.gen_bool(self.config.mutation_probability) {
                self.variation.mutate(&mut self.rng, &mut child_b);
            }

            offspring.push(Solution::new(child_a, objectives));
            if offspring.len() < self.config.population_size {
                offspring.push(Solution::new(child_b, objectives));
            }
        }

        Ok(offspring)
    }
}

impl<V: Clone> Algorithm<V> for Nsga2<V> {
    fn name(&self) -> &str {
        "NSGA-II"
    }

    fn run(&mut self) -> Result<()> {
        let objectives = self.problem.number_of_objectives();

        // Initial population
        let mut population: Vec<Solution<V>> = (0..self.config.population_size)
            .map(|_| Solution::new(self.variation.create(&mut self.rng), objectives))
            .collect();
        self.evaluator
            .evaluate_all(self.problem.as_ref(), &mut population)?;
        self.evaluations += population.len();

        for iteration in 0.. {
            let values = objective_matrix(&population);
            if self
                .termination
                .should_stop(iteration, self.evaluations, &values)
            {
                tracing::debug!(iteration, evaluations = self.evaluations, "terminating");
                break;
            }

            let parents = ranked_view(&population)?;
            let mut offspring = self.mate(&parents)?;
            self.evaluator
                .evaluate_all(self.problem.as_ref(), &mut offspring)?;
            self.evaluations += offspring.len();

            // Environmental selection over the parent/offspring union.
            population.extend(offspring);
            population = RankingAndCrowdingSelection {
                target: self.config.population_size,
            }
            .select(&population)?;
        }

        let ranking = rank(&population)?;
        self.result = ranking
            .front(0)
            .iter()
            .map(|&index| population[index].clone())
            .collect();
        Ok(())
    }

    fn result(&self) -> &[Solution<V>] {
        &self.result
    }
}
