//! Emission of the merge formulation.

use tracing::{debug, instrument};

use super::{
    BinaryProgram, Comparison, ConstraintKind, LinearConstraint, LinearExpr, ProgramBuilder,
    Relaxation, VarId,
};
use crate::{
    candidates::{CandidateIndex, ReverseIndex},
    disk::DiskSet,
    distance::DistanceMetric,
};

/// Maps `(target, position)` pairs to variable handles.
///
/// Variables are numbered target by target: the variables of `target` occupy
/// a contiguous block in candidate-list order, so `x[target, target]` is the
/// first variable of each block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariableLayout {
    offsets: Vec<usize>,
    len: usize,
}

impl VariableLayout {
    /// Lays out one variable per candidate-list entry.
    #[must_use]
    pub fn new(candidates: &CandidateIndex) -> Self {
        let mut offsets = Vec::with_capacity(candidates.len());
        let mut len = 0;
        for (_, list) in candidates.iter() {
            offsets.push(len);
            len += list.len();
        }
        Self { offsets, len }
    }

    /// Returns the variable stating that the candidate at `position` of
    /// `target`'s list merges into `target`.
    ///
    /// # Panics
    /// Panics when `target` is out of bounds.
    #[must_use]
    pub fn var(&self, target: usize, position: usize) -> VarId {
        VarId::new(self.offsets[target] + position)
    }

    /// Returns the variable stating that `disk` is selected.
    ///
    /// # Panics
    /// Panics when `disk` is out of bounds.
    #[must_use]
    pub fn selection(&self, disk: usize) -> VarId {
        self.var(disk, 0)
    }

    /// Returns the total number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the layout holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Size of an emitted formulation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ModelStats {
    /// Boolean variables declared.
    pub variables: usize,
    /// Single-assignment rows.
    pub assignment_rows: usize,
    /// Monotonic-nesting rows.
    pub nesting_rows: usize,
    /// Centre-disjointness rows.
    pub disjointness_rows: usize,
    /// Disjointness rows omitted because they could never bind.
    pub skipped_disjointness_rows: usize,
}

impl ModelStats {
    /// Returns the total number of emitted rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.assignment_rows + self.nesting_rows + self.disjointness_rows
    }
}

/// A recorded merge formulation ready for an optimizer.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeModel {
    program: BinaryProgram,
    layout: VariableLayout,
    stats: ModelStats,
}

impl MergeModel {
    /// Returns the recorded program.
    #[must_use]
    pub fn program(&self) -> &BinaryProgram {
        &self.program
    }

    /// Returns the variable layout.
    #[must_use]
    pub fn layout(&self) -> &VariableLayout {
        &self.layout
    }

    /// Returns the formulation size.
    #[must_use]
    pub fn stats(&self) -> ModelStats {
        self.stats
    }
}

/// Builds the integer program whose optimum yields the merge mapping.
///
/// # Examples
/// ```
/// use diskmerge_core::{CandidatePruner, DiskSet, DistanceMetric, ModelBuilder, ReverseIndex};
///
/// let disks = DiskSet::from_triples("pair", [(0.0, 0.0, 1.0), (0.0, 0.0, 1.0)])?;
/// let metric = DistanceMetric::SquaredEuclidean;
/// let candidates = CandidatePruner::new(&disks, metric).build();
/// let reverse = ReverseIndex::from_candidates(&candidates);
/// let model = ModelBuilder::new(&disks, metric, &candidates, &reverse).build();
/// assert_eq!(model.stats().variables, 4);
/// assert_eq!(model.stats().assignment_rows, 2);
/// assert_eq!(model.stats().disjointness_rows, 2);
/// # Ok::<(), diskmerge_core::DiskSetError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ModelBuilder<'a> {
    disks: &'a DiskSet,
    metric: DistanceMetric,
    candidates: &'a CandidateIndex,
    reverse: &'a ReverseIndex,
    relaxation: Relaxation,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder using [`Relaxation::Tight`].
    #[must_use]
    pub const fn new(
        disks: &'a DiskSet,
        metric: DistanceMetric,
        candidates: &'a CandidateIndex,
        reverse: &'a ReverseIndex,
    ) -> Self {
        Self {
            disks,
            metric,
            candidates,
            reverse,
            relaxation: Relaxation::Tight,
        }
    }

    /// Overrides the relaxation strategy for disjointness rows.
    #[must_use]
    pub const fn with_relaxation(mut self, relaxation: Relaxation) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Records the formulation into a fresh [`BinaryProgram`].
    #[instrument(
        name = "core.model",
        skip(self),
        fields(disks = self.disks.len(), relaxation = %self.relaxation),
    )]
    #[must_use]
    pub fn build(&self) -> MergeModel {
        let mut program = BinaryProgram::default();
        let (layout, stats) = self.emit(&mut program);
        debug!(
            variables = stats.variables,
            assignment_rows = stats.assignment_rows,
            nesting_rows = stats.nesting_rows,
            disjointness_rows = stats.disjointness_rows,
            skipped_disjointness_rows = stats.skipped_disjointness_rows,
            "model emitted"
        );
        MergeModel {
            program,
            layout,
            stats,
        }
    }

    /// Emits the formulation through an arbitrary [`ProgramBuilder`].
    pub fn emit<P: ProgramBuilder>(&self, program: &mut P) -> (VariableLayout, ModelStats) {
        let layout = VariableLayout::new(self.candidates);
        for _ in 0..layout.len() {
            program.add_binary();
        }
        let mut stats = ModelStats {
            variables: layout.len(),
            ..ModelStats::default()
        };

        stats.assignment_rows = self.emit_assignment(program, &layout);
        stats.nesting_rows = self.emit_nesting(program, &layout);
        let (emitted, skipped) = self.emit_disjointness(program, &layout);
        stats.disjointness_rows = emitted;
        stats.skipped_disjointness_rows = skipped;

        let objective = (0..self.disks.len())
            .map(|disk| (layout.selection(disk), -1.0))
            .collect();
        program.minimise(objective);
        (layout, stats)
    }

    fn emit_assignment<P: ProgramBuilder>(&self, program: &mut P, layout: &VariableLayout) -> usize {
        for member in 0..self.disks.len() {
            let expr = self
                .reverse
                .entries(member)
                .iter()
                .map(|entry| (layout.var(entry.target, entry.position), 1.0))
                .collect();
            program.add_constraint(LinearConstraint {
                kind: ConstraintKind::Assignment,
                expr,
                comparison: Comparison::Equal,
                rhs: 1.0,
            });
        }
        self.disks.len()
    }

    fn emit_nesting<P: ProgramBuilder>(&self, program: &mut P, layout: &VariableLayout) -> usize {
        let mut rows = 0;
        for (target, list) in self.candidates.iter() {
            for position in 1..list.len() {
                let expr = [
                    (layout.var(target, position - 1), 1.0),
                    (layout.var(target, position), -1.0),
                ]
                .into_iter()
                .collect();
                program.add_constraint(LinearConstraint {
                    kind: ConstraintKind::Nesting,
                    expr,
                    comparison: Comparison::AtLeast,
                    rhs: 0.0,
                });
                rows += 1;
            }
        }
        rows
    }

    fn emit_disjointness<P: ProgramBuilder>(
        &self,
        program: &mut P,
        layout: &VariableLayout,
    ) -> (usize, usize) {
        let (mut emitted, mut skipped) = (0, 0);
        for (grower, list) in self.candidates.iter() {
            let centre = self.disks.centre(grower);
            for partner in (0..self.disks.len()).filter(|&partner| partner != grower) {
                let distance = self.metric.distance(centre, self.disks.centre(partner));
                // A row with no slack holds whatever the partner does.
                let slack = self.candidates.capacity(grower) - distance;
                if slack <= 0.0 {
                    skipped += 1;
                    continue;
                }
                let big_m = match self.relaxation {
                    Relaxation::Tight => slack,
                    Relaxation::Fixed(value) => value.min(slack),
                };

                // sum(r_k * x[k, grower]) + M * x[partner, partner] <= d + M
                let mut expr = LinearExpr::with_capacity(list.len() + 1);
                for (position, &member) in list.iter().enumerate() {
                    expr.add_term(layout.var(grower, position), self.disks.radius(member));
                }
                expr.add_term(layout.selection(partner), big_m);
                program.add_constraint(LinearConstraint {
                    kind: ConstraintKind::Disjointness,
                    expr,
                    comparison: Comparison::AtMost,
                    rhs: distance + big_m,
                });
                emitted += 1;
            }
        }
        (emitted, skipped)
    }
}
