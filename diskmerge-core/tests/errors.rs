//! Stable error codes exposed by the core crate.

use diskmerge_core::{Coordinate, DiskMergeError, DiskSetError, InvariantViolation, SolverError};
use rstest::rstest;

#[rstest]
#[case::coordinate(
    DiskSetError::NonFiniteCoordinate { index: 0, which: Coordinate::Y, value: f64::NAN },
    "DISKSET_NON_FINITE_COORDINATE"
)]
#[case::radius(DiskSetError::NonFiniteRadius { index: 1, value: f64::INFINITY }, "DISKSET_NON_FINITE_RADIUS")]
#[case::negative(DiskSetError::NegativeRadius { index: 2, value: -1.0 }, "DISKSET_NEGATIVE_RADIUS")]
fn disk_set_codes(#[case] error: DiskSetError, #[case] code: &str) {
    assert_eq!(error.code().as_str(), code);
    assert_eq!(error.code().to_string(), code);
}

#[rstest]
#[case::infeasible(SolverError::Infeasible { solver: "s".to_owned() }, "SOLVER_INFEASIBLE")]
#[case::unbounded(SolverError::Unbounded { solver: "s".to_owned() }, "SOLVER_UNBOUNDED")]
#[case::backend(
    SolverError::Backend { solver: "s".to_owned(), message: "boom".to_owned() },
    "SOLVER_BACKEND"
)]
#[case::length(SolverError::AssignmentLength { expected: 3, got: 1 }, "SOLVER_ASSIGNMENT_LENGTH")]
fn solver_codes_surface_through_merge_errors(#[case] error: SolverError, #[case] code: &str) {
    assert_eq!(error.code().as_str(), code);
    let wrapped = DiskMergeError::from(error);
    assert_eq!(wrapped.code().as_str(), "DISKMERGE_SOLVER_FAILURE");
    assert_eq!(wrapped.solver_code().map(|inner| inner.as_str()), Some(code));
}

#[rstest]
#[case::relaxation(DiskMergeError::InvalidRelaxation { value: 0.0 }, "DISKMERGE_INVALID_RELAXATION")]
#[case::unassigned(DiskMergeError::UnassignedDisk { index: 4 }, "DISKMERGE_UNASSIGNED_DISK")]
#[case::ambiguous(
    DiskMergeError::AmbiguousAssignment { index: 0, first: 1, second: 2 },
    "DISKMERGE_AMBIGUOUS_ASSIGNMENT"
)]
#[case::violated(
    DiskMergeError::from(InvariantViolation::EmptySelection),
    "DISKMERGE_INVARIANT_VIOLATED"
)]
fn merge_codes(#[case] error: DiskMergeError, #[case] code: &str) {
    assert_eq!(error.code().as_str(), code);
    assert_eq!(error.solver_code(), None);
}

#[test]
fn messages_name_the_offending_disk() {
    let error = DiskSetError::NonFiniteCoordinate {
        index: 7,
        which: Coordinate::X,
        value: f64::INFINITY,
    };
    assert_eq!(error.to_string(), "disk 7 has a non-finite x coordinate: inf");
    let error = DiskMergeError::from(InvariantViolation::TargetNotSelected { index: 1, target: 3 });
    assert_eq!(
        error.to_string(),
        "merge outcome violates an invariant: disk 1 merges into 3, which is not selected"
    );
}
