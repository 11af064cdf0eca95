use std::cmp::Ordering;

use crate::algorithm::nsga2::{Nsga2, Nsga2Config};
use crate::algorithm::paes::{Paes, PaesConfig};
use crate::algorithm::{Algorithm, RealVariation};
use crate::comparator::dominance_compare;
use crate::evaluator::{MaxIterations, SequentialEvaluator};
use crate::tests::support::Schaffer;

#[test]
fn nsga2_produces_a_non_dominated_front() {
    let variation = RealVariation::for_problem(&Schaffer);
    let mut algorithm = Nsga2::new(
        Box::new(Schaffer),
        Box::new(variation),
        Box::new(SequentialEvaluator),
        Box::new(MaxIterations { limit: 25 }),
        Nsga2Config {
            population_size: 40,
            seed: 42,
            ..Nsga2Config::default()
        },
    )
    .unwrap();

    algorithm.run().unwrap();
    let result = algorithm.result();
    assert!(!result.is_empty());

    for a in result {
        for b in result {
            assert_eq!(
                dominance_compare(a.objectives(), b.objectives()).unwrap(),
                Ordering::Equal
            );
        }
    }

    // On Schaffer the Pareto front satisfies f1 + f2 <= 4 (attained between
    // the two optima); after a few generations everything should be close.
    for solution in result {
        let f = solution.objectives();
        assert!(f[0] + f[1] < 8.0, "far from the front: {f:?}");
    }
}

#[test]
fn nsga2_is_reproducible_for_a_fixed_seed() {
    let run = |seed: u64| {
        let variation = RealVariation::for_problem(&Schaffer);
        let mut algorithm = Nsga2::new(
            Box::new(Schaffer),
            Box::new(variation),
            Box::new(SequentialEvaluator),
            Box::new(MaxIterations { limit: 5 }),
            Nsga2Config {
                population_size: 16,
                seed,
                ..Nsga2Config::default()
            },
        )
        .unwrap();
        algorithm.run().unwrap();
        let mut front: Vec<Vec<f64>> = algorithm
            .result()
            .iter()
            .map(|s| s.objectives().to_vec())
            .collect();
        front.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap());
        front
    };

    assert_eq!(run(7), run(7));
}

#[test]
fn nsga2_rejects_bad_configuration() {
    let variation = RealVariation::for_problem(&Schaffer);
    let result = Nsga2::new(
        Box::new(Schaffer),
        Box::new(variation),
        Box::new(SequentialEvaluator),
        Box::new(MaxIterations { limit: 1 }),
        Nsga2Config {
            crossover_probability: 1.5,
            ..Nsga2Config::default()
        },
    );
    assert!(result.is_err());
}

#[test]
fn paes_fills_a_bounded_archive() {
    let variation = RealVariation::for_problem(&Schaffer);
    let mut algorithm = Paes::new(
        Box::new(Schaffer),
        Box::new(variation),
        Box::new(MaxIterations { limit: 400 }),
        PaesConfig {
            archive_capacity: 20,
            grid_bisections: 3,
            seed: 3,
        },
    )
    .unwrap();

    algorithm.run().unwrap();
    let result = algorithm.result();
    assert!(!result.is_empty());
    assert!(result.len() <= 20);

    for a in result {
        for b in result {
            assert_eq!(
                dominance_compare(a.objectives(), b.objectives()).unwrap(),
                Ordering::Equal
            );
        }
    }
}
