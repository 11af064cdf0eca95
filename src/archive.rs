pub mod crowding;
pub mod grid;
pub mod hypervolume;
pub mod r2;
pub mod spea2;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::fmt::Debug;

use dyn_clone::DynClone;

use crate::comparator::{dominance_compare, objectives_equal_eps};
use crate::error::{Error, Result};
use crate::solution::Solution;

/// Default per-objective tolerance for the archive duplicate test.
pub const DEFAULT_DUPLICATE_EPSILON: f64 = 1e-10;

/// Chooses which member leaves a full archive.
///
/// `objectives` holds one row per member in insertion order and is never
/// empty; all rows share one dimension. Implementations must be
/// deterministic; ties are broken towards the earliest inserted member.
pub trait EvictionPolicy: DynClone + Debug {
    fn name(&self) -> &str;

    /// Called once per insertion that overflows the capacity; returns the
    /// index of the member to remove.
    fn choose_victim(&mut self, objectives: &[Vec<f64>]) -> usize;

    /// Early consistency check against the objective dimension, run before
    /// the first member is inserted.
    fn check_dimension(&self, _objectives_len: usize) -> Result<()> {
        Ok(())
    }
}

dyn_clone::clone_trait_object!(EvictionPolicy);

/// A capacity-bounded set of mutually non-dominated solutions.
///
/// `add` follows one fixed control flow for every diversity policy: reject if
/// dominated, evict members the candidate dominates, reject duplicates,
/// insert a deep copy, and — only if the capacity is now exceeded — remove
/// exactly one member chosen by the eviction policy. The archive is never
/// left over capacity and never holds two solutions where one dominates the
/// other.
#[derive(Debug)]
pub struct BoundedArchive<V> {
    members: Vec<Solution<V>>,
    capacity: usize,
    epsilon: f64,
    policy: Box<dyn EvictionPolicy>,
}

impl<V: Clone> BoundedArchive<V> {
    pub fn new(capacity: usize, policy: Box<dyn EvictionPolicy>) -> Result<Self> {
        Self::with_epsilon(capacity, policy, DEFAULT_DUPLICATE_EPSILON)
    }

    pub fn with_epsilon(
        capacity: usize,
        policy: Box<dyn EvictionPolicy>,
        epsilon: f64,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(BoundedArchive {
            members: Vec::with_capacity(capacity + 1),
            capacity,
            epsilon,
            policy,
        })
    }

    /// Offer a solution to the archive. Returns true if it was inserted,
    /// which may have evicted dominated members and at most one further
    /// member by the diversity policy.
    pub fn add(&mut self, candidate: &Solution<V>) -> Result<bool> {
        if let Some(first) = self.members.first() {
            if candidate.number_of_objectives() != first.number_of_objectives() {
                return Err(Error::DimensionMismatch {
                    expected: first.number_of_objectives(),
                    got: candidate.number_of_objectives(),
                });
            }
        } else {
            self.policy.check_dimension(candidate.number_of_objectives())?;
        }

        // Reject before any mutation: a dominating or duplicate member means
        // the archive stays exactly as it was.
        for member in &self.members {
            match dominance_compare(candidate.objectives(), member.objectives())? {
                Ordering::Greater => return Ok(false),
                Ordering::Equal => {
                    if objectives_equal_eps(
                        candidate.objectives(),
                        member.objectives(),
                        self.epsilon,
                    ) {
                        return Ok(false);
                    }
                }
                Ordering::Less => {}
            }
        }

        self.members.retain(|member| {
            !crate::comparator::strictly_dominates(candidate.objectives(), member.objectives())
        });

        self.members.push(candidate.clone());

        if self.members.len() > self.capacity {
            let rows: Vec<Vec<f64>> = self
                .members
                .iter()
                .map(|m| m.objectives().to_vec())
                .collect();
            let victim = self.policy.choose_victim(&rows).min(self.members.len() - 1);
            tracing::debug!(
                policy = self.policy.name(),
                victim,
                size = self.members.len(),
                "archive over capacity, evicting"
            );
            self.members.remove(victim);
        }

        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current members in insertion order.
    pub fn members(&self) -> &[Solution<V>] {
        &self.members
    }

    pub fn get(&self, index: usize) -> Option<&Solution<V>> {
        self.members.get(index)
    }
}

impl<V: Clone> Clone for BoundedArchive<V> {
    fn clone(&self) -> Self {
        BoundedArchive {
            members: self.members.clone(),
            capacity: self.capacity,
            epsilon: self.epsilon,
            policy: dyn_clone::clone_box(&*self.policy),
        }
    }
}
