//! Candidate pruning and its reverse index.
//!
//! For every disk `i` the pruner orders all disks by distance from the centre
//! of `i` and keeps the longest prefix whose members could plausibly merge
//! into `i`: the walk stops at the first candidate farther away than the
//! radius accumulated by everything before it. The bound is necessary but not
//! sufficient, so the lists over-approximate the merges the model can choose.

mod reverse;

use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{disk::DiskSet, distance::DistanceMetric};

pub use self::reverse::{ReverseEntry, ReverseIndex};

/// Computes pruned candidate lists for a disk set under a fixed metric.
///
/// # Examples
/// ```
/// use diskmerge_core::{CandidatePruner, DiskSet, DistanceMetric};
///
/// let disks = DiskSet::from_triples("line", [(0.0, 0.0, 2.0), (1.0, 0.0, 2.0), (9.0, 0.0, 1.0)])?;
/// let pruner = CandidatePruner::new(&disks, DistanceMetric::SquaredEuclidean);
/// assert_eq!(pruner.candidates_for(0), vec![0, 1]);
/// # Ok::<(), diskmerge_core::DiskSetError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CandidatePruner<'a> {
    disks: &'a DiskSet,
    metric: DistanceMetric,
}

impl<'a> CandidatePruner<'a> {
    /// Creates a pruner over `disks` using `metric`.
    #[must_use]
    pub const fn new(disks: &'a DiskSet, metric: DistanceMetric) -> Self {
        Self { disks, metric }
    }

    /// Returns the pruned candidate list of disk `target`.
    ///
    /// `target` always comes first. The remaining disks follow in ascending
    /// distance, ties broken by index.
    ///
    /// # Panics
    /// Panics when `target` is out of bounds.
    #[must_use]
    pub fn candidates_for(&self, target: usize) -> Vec<usize> {
        let centre = self.disks.centre(target);
        let mut others: Vec<(f64, usize)> = (0..self.disks.len())
            .filter(|&other| other != target)
            .map(|other| (self.metric.distance(centre, self.disks.centre(other)), other))
            .collect();
        others.sort_by(|a, b| compare_candidates(*a, *b));

        let mut list = vec![target];
        let mut rad = self.disks.radius(target);
        for (distance, other) in others {
            if rad < distance {
                break;
            }
            rad += self.disks.radius(other);
            list.push(other);
        }
        list
    }

    /// Builds the candidate index for every disk.
    #[instrument(
        name = "core.prune",
        skip(self),
        fields(disks = self.disks.len(), metric = %self.metric),
    )]
    #[must_use]
    pub fn build(&self) -> CandidateIndex {
        #[cfg(feature = "parallel")]
        let lists: Vec<Vec<usize>> = (0..self.disks.len())
            .into_par_iter()
            .map(|target| self.candidates_for(target))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let lists = self.build_lists_sequential();

        let index = CandidateIndex::from_lists(self.disks, lists);
        debug!(
            total_candidates = index.total_len(),
            longest = index.longest(),
            "candidate lists pruned"
        );
        index
    }

    /// Builds every list on the calling thread.
    #[cfg(any(test, not(feature = "parallel")))]
    pub(crate) fn build_lists_sequential(&self) -> Vec<Vec<usize>> {
        (0..self.disks.len())
            .map(|target| self.candidates_for(target))
            .collect()
    }
}

fn compare_candidates(a: (f64, usize), b: (f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1))
}

/// Pruned candidate lists for every disk, plus the radius each list could
/// absorb in total.
///
/// `list(i)[0] == i` for every `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateIndex {
    lists: Vec<Vec<usize>>,
    capacities: Vec<f64>,
}

impl CandidateIndex {
    pub(crate) fn from_lists(disks: &DiskSet, lists: Vec<Vec<usize>>) -> Self {
        let capacities = lists
            .iter()
            .map(|list| list.iter().map(|&member| disks.radius(member)).sum())
            .collect();
        Self { lists, capacities }
    }

    /// Returns the number of disks covered by the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns whether the index covers no disks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Returns the candidate list of `target`.
    ///
    /// # Panics
    /// Panics when `target` is out of bounds.
    #[must_use]
    pub fn list(&self, target: usize) -> &[usize] {
        &self.lists[target]
    }

    /// Iterates over `(target, list)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.lists
            .iter()
            .enumerate()
            .map(|(target, list)| (target, list.as_slice()))
    }

    /// Returns the sum of radii over the candidate list of `target`.
    ///
    /// This bounds the radius `target` can reach after merging.
    ///
    /// # Panics
    /// Panics when `target` is out of bounds.
    #[must_use]
    pub fn capacity(&self, target: usize) -> f64 {
        self.capacities[target]
    }

    /// Returns the position of `member` in the list of `target`, if present.
    #[must_use]
    pub fn position(&self, target: usize, member: usize) -> Option<usize> {
        self.lists
            .get(target)?
            .iter()
            .position(|&candidate| candidate == member)
    }

    /// Returns whether `member` may merge into `target`.
    #[must_use]
    pub fn contains(&self, target: usize, member: usize) -> bool {
        self.position(target, member).is_some()
    }

    /// Returns the combined length of all lists.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// Returns the length of the longest list.
    #[must_use]
    pub fn longest(&self) -> usize {
        self.lists.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn disks(triples: &[(f64, f64, f64)]) -> DiskSet {
        DiskSet::from_triples("test", triples.iter().copied()).expect("valid disks")
    }

    #[test]
    fn single_disk_lists_itself() {
        let set = disks(&[(0.0, 0.0, 5.0)]);
        let index = CandidatePruner::new(&set, DistanceMetric::SquaredEuclidean).build();
        assert_eq!(index.list(0), &[0]);
        assert_eq!(index.capacity(0), 5.0);
    }

    #[test]
    fn coincident_disks_list_self_first() {
        let set = disks(&[(0.0, 0.0, 1.0), (0.0, 0.0, 1.0), (0.0, 0.0, 1.0)]);
        let index = CandidatePruner::new(&set, DistanceMetric::SquaredEuclidean).build();
        assert_eq!(index.list(0), &[0, 1, 2]);
        assert_eq!(index.list(1), &[1, 0, 2]);
        assert_eq!(index.list(2), &[2, 0, 1]);
    }

    #[test]
    fn truncation_is_prefix_closed() {
        // Disk 2 fails the bound, so disk 3 is never examined.
        let set = disks(&[(0.0, 0.0, 1.0), (1.0, 0.0, 1.0), (2.0, 0.0, 10.0), (3.0, 0.0, 1.0)]);
        let pruner = CandidatePruner::new(&set, DistanceMetric::SquaredEuclidean);
        assert_eq!(pruner.candidates_for(0), vec![0, 1]);
    }

    #[rstest]
    #[case::equal_is_kept(1.0, vec![0, 1])]
    #[case::strictly_smaller_truncates(0.999, vec![0])]
    fn boundary_uses_strict_comparison(#[case] radius: f64, #[case] expected: Vec<usize>) {
        let set = disks(&[(0.0, 0.0, radius), (1.0, 0.0, 1.0)]);
        let pruner = CandidatePruner::new(&set, DistanceMetric::SquaredEuclidean);
        assert_eq!(pruner.candidates_for(0), expected);
    }

    #[test]
    fn zero_radius_disk_only_absorbs_coincident_neighbours() {
        let set = disks(&[(0.0, 0.0, 0.0), (0.0, 0.0, 0.0), (0.5, 0.0, 4.0)]);
        let pruner = CandidatePruner::new(&set, DistanceMetric::SquaredEuclidean);
        assert_eq!(pruner.candidates_for(0), vec![0, 1]);
        assert_eq!(pruner.candidates_for(2), vec![2, 0, 1]);
    }

    #[test]
    fn ties_break_by_index() {
        let set = disks(&[(0.0, 0.0, 5.0), (0.0, 1.0, 1.0), (1.0, 0.0, 1.0), (-1.0, 0.0, 1.0)]);
        let pruner = CandidatePruner::new(&set, DistanceMetric::SquaredEuclidean);
        assert_eq!(pruner.candidates_for(0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn haversine_prunes_by_metres() {
        // One degree of latitude is roughly 111 km.
        let set = disks(&[(0.0, 0.0, 120_000.0), (1.0, 0.0, 1.0), (0.0, 2.0, 1.0)]);
        let pruner = CandidatePruner::new(&set, DistanceMetric::Haversine);
        assert_eq!(pruner.candidates_for(0), vec![0, 1]);
    }

    #[test]
    fn index_queries_agree_with_lists() {
        let set = disks(&[(0.0, 0.0, 2.0), (1.0, 0.0, 2.0), (2.0, 0.0, 2.0)]);
        let index = CandidatePruner::new(&set, DistanceMetric::SquaredEuclidean).build();
        assert_eq!(index.list(0), &[0, 1, 2]);
        assert_eq!(index.position(0, 2), Some(2));
        assert!(index.contains(1, 0));
        assert_eq!(index.position(7, 0), None);
        assert_eq!(index.total_len(), index.iter().map(|(_, list)| list.len()).sum());
        assert_eq!(index.capacity(0), 6.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_build_matches_sequential() {
        let triples: Vec<(f64, f64, f64)> = (0..40)
            .map(|i| {
                let i = f64::from(i);
                ((i * 7.0) % 13.0, (i * 3.0) % 11.0, 1.0 + (i % 4.0))
            })
            .collect();
        let set = disks(&triples);
        let pruner = CandidatePruner::new(&set, DistanceMetric::SquaredEuclidean);
        let parallel = pruner.build();
        let sequential = CandidateIndex::from_lists(&set, pruner.build_lists_sequential());
        assert_eq!(parallel, sequential);
    }
}
