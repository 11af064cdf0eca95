use crate::archive::crowding::CrowdingDistanceEviction;
use crate::archive::BoundedArchive;
use crate::density::crowding_distance;
use crate::ranking::rank;
use crate::selection::{ranked_view, RankingAndCrowdingSelection};
use crate::solution::{DoubleSolution, Solution};

fn population(objectives: &[&[f64]]) -> Vec<DoubleSolution> {
    objectives
        .iter()
        .map(|f| Solution::with_objectives(Vec::new(), f.to_vec()))
        .collect()
}

// Six two-objective solutions with a known structure: three mutually
// non-dominated points, and three points each dominated by one of them.
fn two_front_population() -> Vec<DoubleSolution> {
    population(&[
        &[1.0, 5.0],
        &[3.0, 3.0],
        &[5.0, 1.0],
        &[2.0, 6.0],
        &[4.0, 4.0],
        &[6.0, 2.0],
    ])
}

#[test]
fn ranking_recovers_the_expected_fronts() {
    let pop = two_front_population();
    let ranking = rank(&pop).unwrap();

    assert_eq!(ranking.number_of_fronts(), 2);
    let mut front0 = ranking.front(0).to_vec();
    front0.sort_unstable();
    assert_eq!(front0, vec![0, 1, 2]);
    let mut front1 = ranking.front(1).to_vec();
    front1.sort_unstable();
    assert_eq!(front1, vec![3, 4, 5]);
}

#[test]
fn crowding_on_the_first_front_marks_the_extremes() {
    let pop = two_front_population();
    let ranking = rank(&pop).unwrap();

    let rows: Vec<Vec<f64>> = ranking
        .front(0)
        .iter()
        .map(|&i| pop[i].objectives().to_vec())
        .collect();
    let scores = crowding_distance(&rows);

    // The extreme points outrank the interior compromise.
    let interior_position = ranking
        .front(0)
        .iter()
        .position(|&i| pop[i].objectives() == [3.0, 3.0])
        .unwrap();
    for (position, score) in scores.iter().enumerate() {
        if position == interior_position {
            assert!(score.is_finite());
        } else {
            assert!(score.is_infinite());
        }
    }
}

#[test]
fn ranking_then_selection_then_archive() {
    let pop = two_front_population();

    // One generation of the selection pipeline: keep the four best.
    let survivors = RankingAndCrowdingSelection { target: 4 }.select(&pop).unwrap();
    assert_eq!(survivors.len(), 4);

    // Everything that survives flows into a small archive; the archive must
    // end up holding only non-dominated points within its capacity.
    let mut archive = BoundedArchive::new(3, Box::new(CrowdingDistanceEviction)).unwrap();
    for solution in &survivors {
        archive.add(solution).unwrap();
    }
    assert!(archive.len() <= 3);
    for member in archive.members() {
        // Front-0 members only: nothing in the population dominates them.
        let dominated = pop.iter().any(|other| {
            crate::comparator::dominance_compare(other.objectives(), member.objectives())
                .unwrap()
                == std::cmp::Ordering::Less
        });
        assert!(!dominated);
    }
}

#[test]
fn ranked_view_agrees_with_ranking() {
    let pop = two_front_population();
    let ranking = rank(&pop).unwrap();
    let view = ranked_view(&pop).unwrap();

    assert_eq!(view.len(), pop.len());
    let front0_count = view.iter().filter(|r| r.front == 0).count();
    assert_eq!(front0_count, ranking.front(0).len());
}
