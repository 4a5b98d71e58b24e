//! Orchestration of a full merge run.
//!
//! A run prunes candidate lists, transposes them, records the integer
//! program, solves it and projects the assignment back onto disks. Every
//! stage emits its own `core.*` span.

use std::{fmt, sync::Arc};

use tracing::{debug, info, instrument};

use crate::{
    Result,
    candidates::{CandidateIndex, CandidatePruner, ReverseIndex},
    disk::DiskSet,
    distance::DistanceMetric,
    model::{MergeModel, ModelBuilder, Relaxation},
    projection::{MergeOutcome, ResultProjector},
    solver::Optimizer,
    verify::verify_outcome,
};

/// Derived indices and the recorded program for one disk set.
#[derive(Clone, Debug)]
pub struct MergePlan {
    candidates: CandidateIndex,
    reverse: ReverseIndex,
    model: MergeModel,
}

impl MergePlan {
    /// Returns the pruned candidate lists.
    #[must_use]
    pub fn candidates(&self) -> &CandidateIndex {
        &self.candidates
    }

    /// Returns the transposed candidate relation.
    #[must_use]
    pub fn reverse(&self) -> &ReverseIndex {
        &self.reverse
    }

    /// Returns the recorded program and its layout.
    #[must_use]
    pub fn model(&self) -> &MergeModel {
        &self.model
    }
}

/// Entry point for merging a disk set.
///
/// # Examples
/// ```
/// use diskmerge_core::{DiskMergerBuilder, DiskSet};
///
/// let disks = DiskSet::from_triples("pair", [(0.0, 0.0, 1.0), (0.0, 0.0, 1.0)])?;
/// let merger = DiskMergerBuilder::new().build()?;
/// let outcome = merger.run(&disks)?;
/// assert_eq!(outcome.selected_count(), 1);
/// assert_eq!(outcome.merged_disks()[0].radius, 2.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct DiskMerger {
    metric: DistanceMetric,
    relaxation: Relaxation,
    optimizer: Arc<dyn Optimizer + Send + Sync>,
    verify: bool,
}

impl fmt::Debug for DiskMerger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiskMerger")
            .field("metric", &self.metric)
            .field("relaxation", &self.relaxation)
            .field("optimizer", &self.optimizer.name())
            .field("verify", &self.verify)
            .finish()
    }
}

impl DiskMerger {
    pub(crate) fn new(
        metric: DistanceMetric,
        relaxation: Relaxation,
        optimizer: Arc<dyn Optimizer + Send + Sync>,
        verify: bool,
    ) -> Self {
        Self {
            metric,
            relaxation,
            optimizer,
            verify,
        }
    }

    /// Returns the distance metric used for every comparison.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Returns the relaxation applied to disjointness rows.
    #[must_use]
    pub fn relaxation(&self) -> Relaxation {
        self.relaxation
    }

    /// Returns the name of the configured optimizer.
    #[must_use]
    pub fn optimizer_name(&self) -> &str {
        self.optimizer.name()
    }

    /// Merges `disks` with the configured optimizer.
    ///
    /// # Errors
    /// See [`DiskMerger::run_with`].
    pub fn run(&self, disks: &DiskSet) -> Result<MergeOutcome> {
        self.run_with(disks, self.optimizer.as_ref())
    }

    /// Merges `disks` with `optimizer` in place of the configured one.
    ///
    /// An empty set yields an empty outcome without consulting the optimizer.
    ///
    /// # Errors
    /// Returns [`DiskMergeError::Solver`] when the optimizer fails,
    /// [`DiskMergeError::UnassignedDisk`] or
    /// [`DiskMergeError::AmbiguousAssignment`] when its assignment is not a
    /// mapping, and [`DiskMergeError::InvariantViolated`] when verification
    /// is enabled and fails.
    ///
    /// [`DiskMergeError::Solver`]: crate::DiskMergeError::Solver
    /// [`DiskMergeError::UnassignedDisk`]: crate::DiskMergeError::UnassignedDisk
    /// [`DiskMergeError::AmbiguousAssignment`]: crate::DiskMergeError::AmbiguousAssignment
    /// [`DiskMergeError::InvariantViolated`]: crate::DiskMergeError::InvariantViolated
    #[instrument(
        name = "core.run",
        err,
        skip(self, disks, optimizer),
        fields(
            disk_set = %disks.name(),
            disks = disks.len(),
            metric = %self.metric,
            relaxation = %self.relaxation,
            solver = optimizer.name(),
        ),
    )]
    pub fn run_with(&self, disks: &DiskSet, optimizer: &dyn Optimizer) -> Result<MergeOutcome> {
        if disks.is_empty() {
            debug!("disk set is empty, nothing to merge");
            return Ok(MergeOutcome::from_mapping(disks, Vec::new()));
        }
        let plan = self.prepare(disks);
        let program = plan.model.program();
        let assignment = optimizer.solve(program)?;
        assignment.check_len(program)?;

        let outcome = ResultProjector::new(disks, &plan.reverse, plan.model.layout())
            .project(&assignment)?;
        if self.verify {
            verify_outcome(disks, self.metric, &plan.candidates, &outcome)?;
        }
        info!(
            selected = outcome.selected_count(),
            merged = outcome.merges().count(),
            "merge completed"
        );
        Ok(outcome)
    }

    /// Derives the candidate lists, reverse index and program for `disks`
    /// without solving. An empty set yields an empty plan.
    #[must_use]
    pub fn prepare(&self, disks: &DiskSet) -> MergePlan {
        let candidates = CandidatePruner::new(disks, self.metric).build();
        let reverse = ReverseIndex::from_candidates(&candidates);
        let model = ModelBuilder::new(disks, self.metric, &candidates, &reverse)
            .with_relaxation(self.relaxation)
            .build();
        MergePlan {
            candidates,
            reverse,
            model,
        }
    }
}
