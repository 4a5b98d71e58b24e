//! Turns a solved assignment into the merge mapping and output disks.

use tracing::{debug, instrument};

use crate::{
    Result,
    candidates::ReverseIndex,
    disk::{DiskSet, Point},
    error::DiskMergeError,
    model::VariableLayout,
    solver::Assignment,
};

/// A selected disk together with the radius it absorbed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergedDisk {
    /// Input index of the selected disk.
    pub index: usize,
    /// Centre of the selected disk.
    pub centre: Point,
    /// Sum of the radii of every disk merged into this one, itself included.
    pub radius: f64,
}

/// The merge mapping and the disks it produces.
///
/// # Examples
/// ```
/// use diskmerge_core::{DiskSet, MergeOutcome};
///
/// let disks = DiskSet::from_triples("pair", [(0.0, 0.0, 1.0), (0.0, 0.0, 2.0)])?;
/// let outcome = MergeOutcome::from_mapping(&disks, vec![0, 0]);
/// assert_eq!(outcome.selected_count(), 1);
/// assert_eq!(outcome.merged_disks()[0].radius, 3.0);
/// assert_eq!(outcome.merges().collect::<Vec<_>>(), vec![(1, 0)]);
/// assert_eq!(outcome.output_disks().count(), 1);
/// # Ok::<(), diskmerge_core::DiskSetError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutcome {
    mapping: Vec<usize>,
    merged: Vec<MergedDisk>,
}

impl MergeOutcome {
    /// Builds the outcome implied by `mapping`, where `mapping[j]` is the
    /// disk that `j` merges into.
    ///
    /// A disk counts as selected when it maps onto itself. Entries that fall
    /// outside `disks` contribute nothing; [`crate::verify_outcome`] reports
    /// them.
    #[must_use]
    pub fn from_mapping(disks: &DiskSet, mapping: Vec<usize>) -> Self {
        let mut radii = vec![0.0; disks.len()];
        for (disk, &target) in disks.disks().iter().zip(&mapping) {
            if let Some(radius) = radii.get_mut(target) {
                *radius += disk.radius();
            }
        }
        let merged = disks
            .disks()
            .iter()
            .zip(&mapping)
            .enumerate()
            .filter(|&(index, (_, &target))| index == target)
            .map(|(index, (disk, _))| MergedDisk {
                index,
                centre: disk.centre(),
                radius: radii[index],
            })
            .collect();
        Self { mapping, merged }
    }

    /// Returns the target of every disk, indexed by disk.
    #[must_use]
    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    /// Returns the disk that `member` merges into.
    ///
    /// # Panics
    /// Panics when `member` is out of bounds.
    #[must_use]
    pub fn target_of(&self, member: usize) -> usize {
        self.mapping[member]
    }

    /// Returns whether `disk` is kept as an output disk.
    #[must_use]
    pub fn is_selected(&self, disk: usize) -> bool {
        self.mapping.get(disk) == Some(&disk)
    }

    /// Returns the number of selected disks.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.merged.len()
    }

    /// Returns every selected disk in increasing index order, including
    /// those whose aggregated radius is zero.
    #[must_use]
    pub fn merged_disks(&self) -> &[MergedDisk] {
        &self.merged
    }

    /// Iterates over the selected disks with a nonzero aggregated radius.
    ///
    /// These are the disks a merge reports as its result.
    pub fn output_disks(&self) -> impl Iterator<Item = &MergedDisk> + '_ {
        self.merged.iter().filter(|disk| disk.radius != 0.0)
    }

    /// Iterates over `(member, target)` for every disk merged into another.
    pub fn merges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.mapping
            .iter()
            .copied()
            .enumerate()
            .filter(|&(member, target)| member != target)
    }
}

/// Reads the merge mapping out of a solved assignment.
#[derive(Clone, Copy, Debug)]
pub struct ResultProjector<'a> {
    disks: &'a DiskSet,
    reverse: &'a ReverseIndex,
    layout: &'a VariableLayout,
}

impl<'a> ResultProjector<'a> {
    /// Creates a projector for the model laid out by `layout`.
    #[must_use]
    pub const fn new(
        disks: &'a DiskSet,
        reverse: &'a ReverseIndex,
        layout: &'a VariableLayout,
    ) -> Self {
        Self {
            disks,
            reverse,
            layout,
        }
    }

    /// Projects `assignment` onto the merge mapping.
    ///
    /// # Errors
    /// Returns [`DiskMergeError::UnassignedDisk`] when a disk has no set
    /// variable and [`DiskMergeError::AmbiguousAssignment`] when it has more
    /// than one.
    #[instrument(name = "core.project", err, skip_all, fields(disks = self.disks.len()))]
    pub fn project(&self, assignment: &Assignment) -> Result<MergeOutcome> {
        let mapping = (0..self.disks.len())
            .map(|member| self.target_of(assignment, member))
            .collect::<Result<Vec<_>>>()?;
        let outcome = MergeOutcome::from_mapping(self.disks, mapping);
        debug!(selected = outcome.selected_count(), "assignment projected");
        Ok(outcome)
    }

    fn target_of(&self, assignment: &Assignment, member: usize) -> Result<usize> {
        let mut found = None;
        for entry in self.reverse.entries(member) {
            if !assignment.value(self.layout.var(entry.target, entry.position)) {
                continue;
            }
            if let Some(first) = found {
                return Err(DiskMergeError::AmbiguousAssignment {
                    index: member,
                    first,
                    second: entry.target,
                });
            }
            found = Some(entry.target);
        }
        found.ok_or(DiskMergeError::UnassignedDisk { index: member })
    }
}
