pub mod algorithm;
pub mod archive;
pub mod comparator;
pub mod density;
mod error;
pub mod evaluator;
pub mod ranking;
pub mod scalarization;
pub mod selection;
pub mod solution;
pub mod weights;
#[cfg(test)]
mod tests;

use dyn_clone::DynClone;

pub use error::{Error, Result};
pub use solution::{ConstraintViolation, DoubleSolution, Solution};

/// A multi-objective problem as seen by the core: it evaluates candidate
/// solutions into objective vectors and exposes its dimensions and variable
/// bounds. Benchmark mathematics and experiment drivers live outside this
/// crate.
pub trait Problem<V>: DynClone {
    fn name(&self) -> &str;

    fn number_of_objectives(&self) -> usize;

    fn number_of_variables(&self) -> usize;

    /// Fill in the objective vector (and constraint record, when applicable)
    /// of a candidate.
    fn evaluate(&self, solution: &mut Solution<V>) -> Result<()>;

    /// Per-variable (lower, upper) bounds, used by operators that clamp
    /// real-coded decision vectors.
    fn variable_bounds(&self) -> Vec<(f64, f64)>;
}

dyn_clone::clone_trait_object!(<V> Problem<V>);
