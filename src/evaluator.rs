use crate::error::{Error, Result};
use crate::solution::Solution;
use crate::Problem;

/// Decides between generations whether an algorithm should stop.
pub trait Termination {
    /// `objective_values` is the objective row of every current solution.
    fn should_stop(
        &mut self,
        iteration: usize,
        evaluations: usize,
        objective_values: &[Vec<f64>],
    ) -> bool;
}

/// Stops after a fixed number of generations.
pub struct MaxIterations {
    pub limit: usize,
}

impl Termination for MaxIterations {
    fn should_stop(&mut self, iteration: usize, _evaluations: usize, _values: &[Vec<f64>]) -> bool {
        iteration >= self.limit
    }
}

/// Stops after a fixed number of problem evaluations.
pub struct MaxEvaluations {
    pub limit: usize,
}

impl Termination for MaxEvaluations {
    fn should_stop(&mut self, _iteration: usize, evaluations: usize, _values: &[Vec<f64>]) -> bool {
        evaluations >= self.limit
    }
}

/// Stops when no per-objective best value has improved for `window`
/// consecutive generations.
pub struct NoImprovement {
    window: usize,
    best_values: Option<Vec<f64>>,
    stale_generations: usize,
}

impl NoImprovement {
    pub fn new(window: usize) -> Self {
        NoImprovement {
            window,
            best_values: None,
            stale_generations: 0,
        }
    }
}

impl Termination for NoImprovement {
    fn should_stop(&mut self, _iteration: usize, _evaluations: usize, values: &[Vec<f64>]) -> bool {
        let first = match values.first() {
            Some(first) => first,
            None => return false,
        };
        let best = self
            .best_values
            .get_or_insert_with(|| vec![f64::MAX; first.len()]);

        let mut improved = false;
        for row in values {
            for (current_best, &value) in best.iter_mut().zip(row.iter()) {
                if value < *current_best {
                    improved = true;
                    *current_best = value;
                }
            }
        }

        if improved {
            self.stale_generations = 0;
            false
        } else {
            self.stale_generations += 1;
            self.stale_generations >= self.window
        }
    }
}

/// Fills in the objective vectors of a batch of candidates.
///
/// Evaluators may fan the `Problem::evaluate` calls out over threads, but
/// they always present a barrier: every solution of the batch is evaluated
/// before the call returns, so ranking never sees a half-evaluated
/// generation.
pub trait PopulationEvaluator<V> {
    fn evaluate_all(
        &mut self,
        problem: &(dyn Problem<V> + Sync),
        population: &mut [Solution<V>],
    ) -> Result<()>;
}

/// Evaluates one candidate at a time on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialEvaluator;

impl<V> PopulationEvaluator<V> for SequentialEvaluator {
    fn evaluate_all(
        &mut self,
        problem: &(dyn Problem<V> + Sync),
        population: &mut [Solution<V>],
    ) -> Result<()> {
        for solution in population.iter_mut() {
            problem.evaluate(solution)?;
        }
        Ok(())
    }
}

/// Evaluates candidates on scoped worker threads.
///
/// Only the objective computation is parallel; the call joins every worker
/// before returning, and all ranking and archive work stays on the control
/// thread.
#[derive(Debug, Clone, Copy)]
pub struct ParallelEvaluator {
    pub threads: usize,
}

impl Default for ParallelEvaluator {
    fn default() -> Self {
        ParallelEvaluator {
            threads: num_cpus::get(),
        }
    }
}

impl<V: Send> PopulationEvaluator<V> for ParallelEvaluator {
    fn evaluate_all(
        &mut self,
        problem: &(dyn Problem<V> + Sync),
        population: &mut [Solution<V>],
    ) -> Result<()> {
        if population.is_empty() {
            return Ok(());
        }
        let threads = self.threads.max(1);
        let chunk_len = (population.len() + threads - 1) / threads;
        tracing::debug!(
            threads,
            chunk_len,
            total = population.len(),
            "parallel evaluation"
        );

        crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = population
                .chunks_mut(chunk_len)
                .map(|chunk| {
                    scope.spawn(move |_| -> Result<()> {
                        for solution in chunk.iter_mut() {
                            problem.evaluate(solution)?;
                        }
                        Ok(())
                    })
                })
                .collect();

            // Barrier: every evaluation finishes before this call returns.
            for handle in handles {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(Error::Evaluation("evaluation worker panicked".into())))?;
            }
            Ok(())
        })
        .unwrap_or_else(|_| Err(Error::Evaluation("evaluation scope panicked".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::DoubleSolution;

    #[derive(Clone)]
    struct SquareSum;

    impl Problem<Vec<f64>> for SquareSum {
        fn name(&self) -> &str {
            "square-sum"
        }

        fn number_of_objectives(&self) -> usize {
            2
        }

        fn number_of_variables(&self) -> usize {
            2
        }

        fn variable_bounds(&self) -> Vec<(f64, f64)> {
            vec![(-1.0, 1.0); 2]
        }

        fn evaluate(&self, solution: &mut Solution<Vec<f64>>) -> Result<()> {
            let x = solution.variables.clone();
            let objectives = solution.objectives_mut();
            objectives[0] = x.iter().map(|v| v * v).sum();
            objectives[1] = x.iter().map(|v| (v - 1.0) * (v - 1.0)).sum();
            Ok(())
        }
    }

    fn fresh_population(count: usize) -> Vec<DoubleSolution> {
        (0..count)
            .map(|i| Solution::new(vec![i as f64 * 0.1, 0.5], 2))
            .collect()
    }

    #[test]
    fn sequential_evaluator_fills_objectives() {
        let mut population = fresh_population(4);
        SequentialEvaluator
            .evaluate_all(&SquareSum, &mut population)
            .unwrap();
        for solution in &population {
            assert!(solution.objectives()[1] > 0.0);
        }
    }

    #[test]
    fn parallel_evaluator_matches_sequential() {
        let mut sequential = fresh_population(13);
        let mut parallel = fresh_population(13);
        SequentialEvaluator
            .evaluate_all(&SquareSum, &mut sequential)
            .unwrap();
        ParallelEvaluator { threads: 4 }
            .evaluate_all(&SquareSum, &mut parallel)
            .unwrap();
        for (a, b) in sequential.iter().zip(&parallel) {
            assert_eq!(a.objectives(), b.objectives());
        }
    }

    #[test]
    fn max_iterations_counts_generations() {
        let mut termination = MaxIterations { limit: 3 };
        assert!(!termination.should_stop(0, 0, &[]));
        assert!(!termination.should_stop(2, 0, &[]));
        assert!(termination.should_stop(3, 0, &[]));
    }

    #[test]
    fn max_evaluations_counts_calls() {
        let mut termination = MaxEvaluations { limit: 100 };
        assert!(!termination.should_stop(0, 99, &[]));
        assert!(termination.should_stop(0, 100, &[]));
    }

    #[test]
    fn no_improvement_waits_for_a_stale_window() {
        let mut termination = NoImprovement::new(2);
        let improving = vec![vec![1.0, 1.0]];
        let stale = vec![vec![2.0, 2.0]];
        assert!(!termination.should_stop(0, 0, &improving));
        assert!(!termination.should_stop(1, 0, &stale));
        assert!(termination.should_stop(2, 0, &stale));
    }
}
