pub mod nsga2;
pub mod paes;

use rand::{Rng, RngCore};

use crate::error::{Error, Result};
use crate::solution::Solution;

/// A population-based optimization algorithm.
pub trait Algorithm<V> {
    fn name(&self) -> &str;

    /// Run to termination. Idempotent restarts are not supported; construct a
    /// fresh instance per run.
    fn run(&mut self) -> Result<()>;

    /// The final approximation set: archive contents or the best ranked
    /// front, depending on the algorithm.
    fn result(&self) -> &[Solution<V>];
}

/// Creation and variation of decision vectors, supplied by the driver.
///
/// Implementations own whatever bounds or step-size knobs they need; the
/// random source is always passed in explicitly so runs are reproducible.
pub trait Variation<V> {
    /// A fresh random decision vector.
    fn create(&self, rng: &mut dyn RngCore) -> V;

    /// Recombine two parents into two children.
    fn crossover(&self, rng: &mut dyn RngCore, a: &V, b: &V) -> (V, V);

    /// Perturb a decision vector in place.
    fn mutate(&self, rng: &mut dyn RngCore, variables: &mut V);
}

/// Uniform crossover and uniform-reset mutation over real-coded vectors,
/// clamped to the problem's variable bounds.
#[derive(Debug, Clone)]
pub struct RealVariation {
    bounds: Vec<(f64, f64)>,
}

impl RealVariation {
    pub fn new(bounds: Vec<(f64, f64)>) -> Self {
        RealVariation { bounds }
    }

    pub fn for_problem(problem: &dyn crate::Problem<Vec<f64>>) -> Self {
        RealVariation {
            bounds: problem.variable_bounds(),
        }
    }
}

impl Variation<Vec<f64>> for RealVariation {
    fn create(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        self.bounds
            .iter()
            .map(|&(lower, upper)| rng.gen_range(lower..=upper))
            .collect()
    }

    fn crossover(&self, rng: &mut dyn RngCore, a: &Vec<f64>, b: &Vec<f64>) -> (Vec<f64>, Vec<f64>) {
        let mut first = b.clone();
        let mut second = b.clone();
        for (index, (f, s)) in first.iter_mut().zip(second.iter_mut()).enumerate() {
            if rng.gen_ratio(1, 2) {
                *f = a[index];
            }
            if rng.gen_ratio(1, 2) {
                *s = a[index];
            }
        }
        (first, second)
    }

    fn mutate(&self, rng: &mut dyn RngCore, variables: &mut Vec<f64>) {
        let genes = variables.len().max(1) as u32;
        for (value, &(lower, upper)) in variables.iter_mut().zip(&self.bounds) {
            if rng.gen_ratio(1, genes) {
                *value = rng.gen_range(lower..=upper);
            }
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidProbability { name, value });
    }
    Ok(())
}
