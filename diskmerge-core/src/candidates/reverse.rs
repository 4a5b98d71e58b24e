//! Transpose of the candidate relation.

use super::CandidateIndex;

/// One occurrence of a disk inside another disk's candidate list.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ReverseEntry {
    /// Disk whose candidate list contains the member.
    pub target: usize,
    /// Position of the member inside `target`'s candidate list.
    pub position: usize,
}

/// For every disk `j`, the disks `i` whose candidate list contains `j`.
///
/// Entries are ordered by increasing target.
///
/// # Examples
/// ```
/// use diskmerge_core::{CandidatePruner, DiskSet, DistanceMetric, ReverseIndex};
///
/// let disks = DiskSet::from_triples("pair", [(0.0, 0.0, 1.0), (0.0, 0.0, 1.0)])?;
/// let candidates = CandidatePruner::new(&disks, DistanceMetric::SquaredEuclidean).build();
/// let reverse = ReverseIndex::from_candidates(&candidates);
/// assert_eq!(reverse.targets(1).collect::<Vec<_>>(), vec![0, 1]);
/// # Ok::<(), diskmerge_core::DiskSetError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReverseIndex {
    entries: Vec<Vec<ReverseEntry>>,
}

impl ReverseIndex {
    /// Transposes `candidates`.
    #[must_use]
    pub fn from_candidates(candidates: &CandidateIndex) -> Self {
        let mut entries = vec![Vec::new(); candidates.len()];
        for (target, list) in candidates.iter() {
            for (position, &member) in list.iter().enumerate() {
                entries[member].push(ReverseEntry { target, position });
            }
        }
        Self { entries }
    }

    /// Returns the number of disks covered by the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the index covers no disks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every occurrence of `member` in the candidate lists.
    ///
    /// # Panics
    /// Panics when `member` is out of bounds.
    #[must_use]
    pub fn entries(&self, member: usize) -> &[ReverseEntry] {
        &self.entries[member]
    }

    /// Iterates over the disks `member` may merge into.
    ///
    /// # Panics
    /// Panics when `member` is out of bounds.
    pub fn targets(&self, member: usize) -> impl Iterator<Item = usize> + '_ {
        self.entries[member].iter().map(|entry| entry.target)
    }
}
