//! Diskmerge core library.
//!
//! Merges overlapping disks into the largest possible set of
//! centre-disjoint representatives by solving a binary integer program.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod candidates;
mod disk;
mod distance;
mod error;
mod merger;
mod model;
mod projection;
mod solver;
mod verify;

pub use crate::{
    builder::DiskMergerBuilder,
    candidates::{CandidateIndex, CandidatePruner, ReverseEntry, ReverseIndex},
    disk::{Disk, DiskSet, Point},
    distance::{DistanceMetric, EARTH_RADIUS_METRES, UnknownMetric, haversine, squared_euclidean},
    error::{
        Coordinate, DiskMergeError, DiskMergeErrorCode, DiskSetError, DiskSetErrorCode, Result,
        SolverError, SolverErrorCode,
    },
    merger::{DiskMerger, MergePlan},
    model::{
        BinaryProgram, Comparison, ConstraintKind, LEGACY_BIG_M, LinearConstraint, LinearExpr,
        MergeModel, ModelBuilder, ModelStats, ProgramBuilder, Relaxation, VarId, VariableLayout,
    },
    projection::{MergeOutcome, MergedDisk, ResultProjector},
    solver::{Assignment, GoodLpOptimizer, Optimizer},
    verify::{DISJOINTNESS_TOLERANCE, InvariantViolation, verify_outcome},
};
