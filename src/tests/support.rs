use crate::error::Result;
use crate::solution::Solution;
use crate::Problem;

/// Schaffer's single-variable problem: f1 = x^2, f2 = (x - 2)^2. Its Pareto
/// set is x in [0, 2] with f1 + f2 bounded there, which makes convergence
/// easy to check.
#[derive(Clone)]
pub struct Schaffer;

impl Problem<Vec<f64>> for Schaffer {
    fn name(&self) -> &str {
        "schaffer"
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn number_of_variables(&self) -> usize {
        1
    }

    fn variable_bounds(&self) -> Vec<(f64, f64)> {
        vec![(-10.0, 10.0)]
    }

    fn evaluate(&self, solution: &mut Solution<Vec<f64>>) -> Result<()> {
        let x = solution.variables[0];
        let objectives = solution.objectives_mut();
        objectives[0] = x * x;
        objectives[1] = (x - 2.0) * (x - 2.0);
        Ok(())
    }
}
