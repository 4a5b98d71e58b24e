//! Independent checks of a merge outcome.
//!
//! [`verify_outcome`] re-derives every structural guarantee of a merge from
//! the outcome alone, without looking at the program or the solver.

use thiserror::Error;
use tracing::instrument;

use crate::{
    candidates::CandidateIndex, disk::DiskSet, distance::DistanceMetric,
    projection::MergeOutcome,
};

/// Relative tolerance for the centre-disjointness check.
pub const DISJOINTNESS_TOLERANCE: f64 = 1e-9;

/// A property that a merge outcome failed to satisfy.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvariantViolation {
    /// The mapping does not cover the disk set exactly.
    #[error("mapping covers {got} disks but the set holds {expected}")]
    LengthMismatch {
        /// Number of disks in the set.
        expected: usize,
        /// Length of the mapping.
        got: usize,
    },
    /// No disk of a non-empty set was selected.
    #[error("no disk is selected")]
    EmptySelection,
    /// A disk merges into a disk that does not exist.
    #[error("disk {index} merges into unknown disk {target}")]
    TargetOutOfBounds {
        /// Offending disk.
        index: usize,
        /// Its target.
        target: usize,
    },
    /// A disk merges into a disk that is not itself selected.
    #[error("disk {index} merges into {target}, which is not selected")]
    TargetNotSelected {
        /// Offending disk.
        index: usize,
        /// Its target.
        target: usize,
    },
    /// A disk merges into a target whose candidate list omits it.
    #[error("disk {index} is not a candidate of {target}")]
    NotACandidate {
        /// Offending disk.
        index: usize,
        /// Its target.
        target: usize,
    },
    /// The disks merged into a target are not a prefix of its list.
    #[error("merges into {target} skip candidate {skipped} at position {position}")]
    NestingGap {
        /// Target whose merges have a gap.
        target: usize,
        /// Position of the skipped candidate.
        position: usize,
        /// The skipped candidate.
        skipped: usize,
    },
    /// A grown disk reaches the centre of another selected disk.
    #[error(
        "disk {grower} grows to {radius} and reaches the centre of disk {partner} at distance {distance}"
    )]
    CentreCovered {
        /// The grown disk.
        grower: usize,
        /// The selected disk whose centre is covered.
        partner: usize,
        /// Output radius of `grower`.
        radius: f64,
        /// Distance between both centres.
        distance: f64,
    },
}

/// Checks `outcome` against the structural guarantees of a merge.
///
/// # Errors
/// Returns the first [`InvariantViolation`] found.
///
/// # Examples
/// ```
/// use diskmerge_core::{CandidatePruner, DiskSet, DistanceMetric, MergeOutcome, verify_outcome};
///
/// let disks = DiskSet::from_triples("far", [(0.0, 0.0, 1.0), (10.0, 0.0, 1.0)])?;
/// let metric = DistanceMetric::SquaredEuclidean;
/// let candidates = CandidatePruner::new(&disks, metric).build();
/// let outcome = MergeOutcome::from_mapping(&disks, vec![0, 1]);
/// assert!(verify_outcome(&disks, metric, &candidates, &outcome).is_ok());
/// # Ok::<(), diskmerge_core::DiskSetError>(())
/// ```
#[instrument(name = "core.verify", err, skip_all, fields(disks = disks.len()))]
pub fn verify_outcome(
    disks: &DiskSet,
    metric: DistanceMetric,
    candidates: &CandidateIndex,
    outcome: &MergeOutcome,
) -> Result<(), InvariantViolation> {
    let mapping = outcome.mapping();
    if mapping.len() != disks.len() {
        return Err(InvariantViolation::LengthMismatch {
            expected: disks.len(),
            got: mapping.len(),
        });
    }
    if outcome.selected_count() == 0 && !disks.is_empty() {
        return Err(InvariantViolation::EmptySelection);
    }
    check_targets(mapping, candidates)?;
    check_nesting(mapping, candidates)?;
    check_disjointness(metric, outcome)
}

fn check_targets(mapping: &[usize], candidates: &CandidateIndex) -> Result<(), InvariantViolation> {
    for (index, &target) in mapping.iter().enumerate() {
        let Some(&target_of_target) = mapping.get(target) else {
            return Err(InvariantViolation::TargetOutOfBounds { index, target });
        };
        if target_of_target != target {
            return Err(InvariantViolation::TargetNotSelected { index, target });
        }
        if !candidates.contains(target, index) {
            return Err(InvariantViolation::NotACandidate { index, target });
        }
    }
    Ok(())
}

fn check_nesting(mapping: &[usize], candidates: &CandidateIndex) -> Result<(), InvariantViolation> {
    let mut absorbed = vec![0_usize; mapping.len()];
    for &target in mapping {
        absorbed[target] += 1;
    }
    for (target, list) in candidates.iter() {
        for (position, &candidate) in list.iter().enumerate().take(absorbed[target]) {
            if mapping[candidate] != target {
                return Err(InvariantViolation::NestingGap {
                    target,
                    position,
                    skipped: candidate,
                });
            }
        }
    }
    Ok(())
}

fn check_disjointness(metric: DistanceMetric, outcome: &MergeOutcome) -> Result<(), InvariantViolation> {
    let selected = outcome.merged_disks();
    for grower in selected {
        for partner in selected.iter().filter(|partner| partner.index != grower.index) {
            let distance = metric.distance(grower.centre, partner.centre);
            let tolerance = DISJOINTNESS_TOLERANCE * distance.abs().max(grower.radius).max(1.0);
            if grower.radius > distance + tolerance {
                return Err(InvariantViolation::CentreCovered {
                    grower: grower.index,
                    partner: partner.index,
                    radius: grower.radius,
                    distance,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::CandidatePruner;
    use rstest::{fixture, rstest};

    const METRIC: DistanceMetric = DistanceMetric::SquaredEuclidean;

    // Candidate lists: 0 -> [0, 1, 2], 1 -> [1, 0, 2], 2 -> [2, 1, 0].
    #[fixture]
    fn line() -> (DiskSet, CandidateIndex) {
        let disks = DiskSet::from_triples("line", [(0.0, 0.0, 2.0), (1.0, 0.0, 2.0), (2.0, 0.0, 2.0)])
            .expect("valid disks");
        let candidates = CandidatePruner::new(&disks, METRIC).build();
        (disks, candidates)
    }

    fn check(fixture: &(DiskSet, CandidateIndex), mapping: Vec<usize>) -> Result<(), InvariantViolation> {
        let (disks, candidates) = fixture;
        let outcome = MergeOutcome::from_mapping(disks, mapping);
        verify_outcome(disks, METRIC, candidates, &outcome)
    }

    #[rstest]
    fn accepts_optimal_outcome(line: (DiskSet, CandidateIndex)) {
        assert_eq!(check(&line, vec![0, 0, 2]), Ok(()));
    }

    #[rstest]
    fn rejects_covered_centre(line: (DiskSet, CandidateIndex)) {
        // Disk 0 with radius 2 reaches disk 1 at squared distance 1.
        let err = check(&line, vec![0, 1, 2]).expect_err("singletons overlap");
        assert!(matches!(
            err,
            InvariantViolation::CentreCovered { grower: 0, partner: 1, .. }
        ));
    }

    #[rstest]
    fn rejects_unselected_target(line: (DiskSet, CandidateIndex)) {
        let err = check(&line, vec![1, 0, 2]).expect_err("targets swap");
        assert_eq!(err, InvariantViolation::TargetNotSelected { index: 0, target: 1 });
    }

    #[rstest]
    fn rejects_nesting_gap(line: (DiskSet, CandidateIndex)) {
        // Disk 0 absorbs 2 but skips 1, which sits before it in the list.
        let err = check(&line, vec![0, 1, 0]).expect_err("gap in prefix");
        assert_eq!(
            err,
            InvariantViolation::NestingGap {
                target: 0,
                position: 1,
                skipped: 1,
            }
        );
    }

    #[test]
    fn rejects_non_candidate_target() {
        let disks = DiskSet::from_triples("far", [(0.0, 0.0, 1.0), (10.0, 0.0, 1.0)])
            .expect("valid disks");
        let candidates = CandidatePruner::new(&disks, METRIC).build();
        let outcome = MergeOutcome::from_mapping(&disks, vec![0, 0]);
        let err = verify_outcome(&disks, METRIC, &candidates, &outcome)
            .expect_err("disk 1 is too far from disk 0");
        assert_eq!(err, InvariantViolation::NotACandidate { index: 1, target: 0 });
    }

    #[test]
    fn touching_centres_are_disjoint() {
        let disks = DiskSet::from_triples("touch", [(0.0, 0.0, 1.0), (1.0, 0.0, 1.0)])
            .expect("valid disks");
        let candidates = CandidatePruner::new(&disks, METRIC).build();
        let outcome = MergeOutcome::from_mapping(&disks, vec![0, 1]);
        assert_eq!(verify_outcome(&disks, METRIC, &candidates, &outcome), Ok(()));
    }

    #[rstest]
    fn rejects_cyclic_mapping_without_selection(line: (DiskSet, CandidateIndex)) {
        let err = check(&line, vec![1, 2, 0]).expect_err("nothing is selected");
        assert_eq!(err, InvariantViolation::EmptySelection);
    }

    #[test]
    fn empty_set_needs_no_selection() {
        let disks = DiskSet::new("none", Vec::new()).expect("empty set is constructible");
        let candidates = CandidatePruner::new(&disks, METRIC).build();
        let outcome = MergeOutcome::from_mapping(&disks, Vec::new());
        assert_eq!(verify_outcome(&disks, METRIC, &candidates, &outcome), Ok(()));
    }
}
