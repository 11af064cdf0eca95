use std::cmp::Ordering;

use crate::archive::crowding::CrowdingDistanceEviction;
use crate::archive::grid::AdaptiveGridEviction;
use crate::archive::hypervolume::HypervolumeContributionEviction;
use crate::archive::r2::R2ContributionEviction;
use crate::archive::spea2::StrengthFitnessEviction;
use crate::archive::{BoundedArchive, EvictionPolicy};
use crate::comparator::dominance_compare;
use crate::error::Error;
use crate::solution::{DoubleSolution, Solution};
use crate::weights::WeightVectorSet;

fn solution(objectives: &[f64]) -> DoubleSolution {
    Solution::with_objectives(Vec::new(), objectives.to_vec())
}

fn crowding_archive(capacity: usize) -> BoundedArchive<Vec<f64>> {
    BoundedArchive::new(capacity, Box::new(CrowdingDistanceEviction)).unwrap()
}

#[test]
fn zero_capacity_is_rejected() {
    let result = BoundedArchive::<Vec<f64>>::new(0, Box::new(CrowdingDistanceEviction));
    assert!(matches!(result, Err(Error::InvalidCapacity(0))));
}

#[test]
fn first_solution_is_accepted() {
    let mut archive = crowding_archive(10);
    assert!(archive.add(&solution(&[1.0, 2.0])).unwrap());
    assert_eq!(archive.len(), 1);
}

#[test]
fn dominated_candidates_are_rejected_without_changes() {
    let mut archive = crowding_archive(10);
    archive.add(&solution(&[1.0, 1.0])).unwrap();
    assert!(!archive.add(&solution(&[2.0, 2.0])).unwrap());
    assert_eq!(archive.len(), 1);
    assert_eq!(archive.get(0).unwrap().objectives(), &[1.0, 1.0]);
}

#[test]
fn dominating_candidate_sweeps_out_members() {
    let mut archive = crowding_archive(10);
    archive.add(&solution(&[3.0, 3.0])).unwrap();
    archive.add(&solution(&[4.0, 2.5])).unwrap();
    archive.add(&solution(&[0.5, 9.0])).unwrap();
    assert!(archive.add(&solution(&[1.0, 1.0])).unwrap());
    // Both of the first two members were dominated and left.
    assert_eq!(archive.len(), 2);
}

#[test]
fn duplicates_within_epsilon_are_rejected() {
    let mut archive = crowding_archive(10);
    archive.add(&solution(&[1.0, 2.0])).unwrap();
    assert!(!archive.add(&solution(&[1.0, 2.0])).unwrap());
    assert!(!archive
        .add(&solution(&[1.0 + 1e-12, 2.0 - 1e-12]))
        .unwrap());
    assert_eq!(archive.len(), 1);
}

#[test]
fn archived_copies_are_frozen() {
    let mut archive = crowding_archive(10);
    let mut live = solution(&[1.0, 2.0]);
    archive.add(&live).unwrap();
    live.objectives_mut()[0] = 42.0;
    assert_eq!(archive.get(0).unwrap().objectives(), &[1.0, 2.0]);
}

#[test]
fn capacity_is_never_exceeded() {
    let mut archive = crowding_archive(5);
    // A non-dominated staircase longer than the capacity.
    for i in 0..20 {
        let f0 = i as f64;
        let f1 = 19.0 - i as f64;
        archive.add(&solution(&[f0, f1])).unwrap();
        assert!(archive.len() <= 5);
    }
    assert_eq!(archive.len(), 5);
}

#[test]
fn members_stay_mutually_non_dominated() {
    let mut archive = crowding_archive(8);
    let points = [
        [5.0, 5.0],
        [1.0, 9.0],
        [9.0, 1.0],
        [4.0, 6.0],
        [6.0, 4.0],
        [3.0, 3.0],
        [2.0, 8.0],
        [8.0, 2.0],
        [2.5, 2.5],
        [7.0, 7.0],
    ];
    for point in &points {
        archive.add(&solution(point)).unwrap();
    }
    for a in archive.members() {
        for b in archive.members() {
            assert_eq!(
                dominance_compare(a.objectives(), b.objectives()).unwrap(),
                Ordering::Equal
            );
        }
    }
}

#[test]
fn crowding_eviction_keeps_the_extremes() {
    let mut archive = crowding_archive(4);
    archive.add(&solution(&[0.0, 4.0])).unwrap();
    archive.add(&solution(&[4.0, 0.0])).unwrap();
    archive.add(&solution(&[1.0, 3.0])).unwrap();
    archive.add(&solution(&[3.0, 1.0])).unwrap();
    // The middle point crowds the interior; one interior member must go,
    // never the extremes.
    archive.add(&solution(&[2.0, 2.0])).unwrap();

    assert_eq!(archive.len(), 4);
    let members: Vec<&[f64]> = archive.members().iter().map(|s| s.objectives()).collect();
    assert!(members.contains(&[0.0, 4.0].as_slice()));
    assert!(members.contains(&[4.0, 0.0].as_slice()));
}

#[test]
fn dimension_mismatch_is_detected() {
    let mut archive = crowding_archive(4);
    archive.add(&solution(&[1.0, 2.0])).unwrap();
    assert!(matches!(
        archive.add(&solution(&[1.0, 2.0, 3.0])),
        Err(Error::DimensionMismatch {
            expected: 2,
            got: 3
        })
    ));
}

#[test]
fn grid_archive_evicts_from_crowded_cells() {
    let policy = AdaptiveGridEviction::new(2, 2).unwrap();
    let mut archive = BoundedArchive::new(4, Box::new(policy)).unwrap();

    // Three points clustered near (0, 1) and two spread out.
    archive.add(&solution(&[0.00, 1.00])).unwrap();
    archive.add(&solution(&[0.02, 0.99])).unwrap();
    archive.add(&solution(&[0.04, 0.98])).unwrap();
    archive.add(&solution(&[0.50, 0.50])).unwrap();
    archive.add(&solution(&[1.00, 0.00])).unwrap();

    assert_eq!(archive.len(), 4);
    let members: Vec<&[f64]> = archive.members().iter().map(|s| s.objectives()).collect();
    // The spread-out points survive; the cluster lost its earliest member.
    assert!(members.contains(&[0.5, 0.5].as_slice()));
    assert!(members.contains(&[1.0, 0.0].as_slice()));
    assert!(!members.contains(&[0.0, 1.0].as_slice()));
}

#[test]
fn grid_archive_rejects_wrong_dimension_upfront() {
    let policy = AdaptiveGridEviction::new(2, 3).unwrap();
    let mut archive = BoundedArchive::new(4, Box::new(policy)).unwrap();
    assert!(archive.add(&solution(&[1.0, 2.0])).is_err());
    assert!(archive.is_empty());
}

#[test]
fn strength_fitness_evicts_the_most_crowded() {
    let mut archive = BoundedArchive::new(4, Box::new(StrengthFitnessEviction)).unwrap();
    archive.add(&solution(&[0.0, 4.0])).unwrap();
    archive.add(&solution(&[4.0, 0.0])).unwrap();
    archive.add(&solution(&[1.0, 3.0])).unwrap();
    archive.add(&solution(&[3.0, 1.0])).unwrap();
    // (1.1, 2.9) sits right next to (1, 3): one of that pair must go.
    archive.add(&solution(&[1.1, 2.9])).unwrap();

    assert_eq!(archive.len(), 4);
    let members: Vec<&[f64]> = archive.members().iter().map(|s| s.objectives()).collect();
    assert!(members.contains(&[0.0, 4.0].as_slice()));
    assert!(members.contains(&[4.0, 0.0].as_slice()));
    assert!(members.contains(&[3.0, 1.0].as_slice()));
}

#[test]
fn hypervolume_eviction_drops_the_least_contributor() {
    let mut archive =
        BoundedArchive::new(4, Box::new(HypervolumeContributionEviction::default())).unwrap();
    archive.add(&solution(&[0.0, 4.0])).unwrap();
    archive.add(&solution(&[4.0, 0.0])).unwrap();
    archive.add(&solution(&[1.0, 1.0])).unwrap();
    archive.add(&solution(&[0.5, 3.5])).unwrap();
    // (3.5, 0.5) and (0.5, 3.5) both hug the big contributor (1, 1); the
    // new least contributor leaves, and (1, 1) must survive.
    archive.add(&solution(&[3.5, 0.5])).unwrap();

    assert_eq!(archive.len(), 4);
    let members: Vec<&[f64]> = archive.members().iter().map(|s| s.objectives()).collect();
    assert!(members.contains(&[1.0, 1.0].as_slice()));
}

#[test]
fn r2_eviction_consults_the_weight_set() {
    let weights = WeightVectorSet::uniform_pair(11).unwrap();
    let mut archive =
        BoundedArchive::new(3, Box::new(R2ContributionEviction::new(weights))).unwrap();
    archive.add(&solution(&[0.0, 1.0])).unwrap();
    archive.add(&solution(&[1.0, 0.0])).unwrap();
    archive.add(&solution(&[0.5, 0.5])).unwrap();
    archive.add(&solution(&[0.45, 0.52])).unwrap();

    assert_eq!(archive.len(), 3);
    let members: Vec<&[f64]> = archive.members().iter().map(|s| s.objectives()).collect();
    assert!(members.contains(&[0.0, 1.0].as_slice()));
    assert!(members.contains(&[1.0, 0.0].as_slice()));
}

#[test]
fn r2_eviction_validates_weight_dimension() {
    let weights = WeightVectorSet::uniform_pair(5).unwrap();
    let mut archive =
        BoundedArchive::new(3, Box::new(R2ContributionEviction::new(weights))).unwrap();
    assert!(archive.add(&solution(&[1.0, 2.0, 3.0])).is_err());
}

#[test]
fn eviction_tie_break_prefers_the_earliest_member() {
    #[derive(Debug, Clone)]
    struct FirstMember;
    impl EvictionPolicy for FirstMember {
        fn name(&self) -> &str {
            "first-member"
        }
        fn choose_victim(&mut self, _objectives: &[Vec<f64>]) -> usize {
            0
        }
    }

    let mut archive = BoundedArchive::new(2, Box::new(FirstMember)).unwrap();
    archive.add(&solution(&[0.0, 2.0])).unwrap();
    archive.add(&solution(&[1.0, 1.0])).unwrap();
    archive.add(&solution(&[2.0, 0.0])).unwrap();
    assert_eq!(archive.get(0).unwrap().objectives(), &[1.0, 1.0]);
    assert_eq!(archive.get(1).unwrap().objectives(), &[2.0, 0.0]);
}
