//! Solver-agnostic binary integer programs.
//!
//! [`ModelBuilder`] emits the merge formulation through the [`ProgramBuilder`]
//! surface. [`BinaryProgram`] is the in-memory recording every
//! [`crate::Optimizer`] consumes, so a different solver library only needs an
//! optimizer implementation, never changes to the formulation.

mod builder;

use core::fmt;

pub use self::builder::{MergeModel, ModelBuilder, ModelStats, VariableLayout};

/// Relaxation constant that reproduces the historical fixed big-M formulation.
pub const LEGACY_BIG_M: f64 = 1_000_000.0;

/// Handle to a boolean decision variable.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VarId(usize);

impl VarId {
    /// Creates a handle for the variable at `index`.
    #[must_use]
    #[rustfmt::skip]
    pub const fn new(index: usize) -> Self { Self(index) }

    /// Returns the zero-based position of the variable in its program.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index(self) -> usize { self.0 }
}

/// Sparse linear combination of variables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    /// Creates an empty expression with room for `capacity` terms.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Appends `coefficient * var`.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    /// Returns the `(variable, coefficient)` terms in insertion order.
    #[must_use]
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Evaluates the expression for a 0/1 assignment.
    #[must_use]
    pub fn evaluate(&self, values: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|(var, _)| values.get(var.index()).copied().unwrap_or(false))
            .map(|(_, coefficient)| coefficient)
            .sum()
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

/// Relation between a constraint's expression and its right-hand side.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Comparison {
    /// `expr = rhs`
    Equal,
    /// `expr <= rhs`
    AtMost,
    /// `expr >= rhs`
    AtLeast,
}

/// Which family of the merge formulation a constraint belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ConstraintKind {
    /// Every disk merges into exactly one target.
    Assignment,
    /// Merges into a target form a prefix of its candidate list.
    Nesting,
    /// Selected disks stay centre-disjoint after growing.
    Disjointness,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Assignment => "assignment",
            Self::Nesting => "nesting",
            Self::Disjointness => "disjointness",
        })
    }
}

/// A single linear row `expr (=|<=|>=) rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    /// Constraint family, kept for diagnostics.
    pub kind: ConstraintKind,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Relation between both sides.
    pub comparison: Comparison,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Returns whether a 0/1 assignment satisfies the row within `tolerance`.
    #[must_use]
    pub fn is_satisfied(&self, values: &[bool], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.comparison {
            Comparison::Equal => (lhs - self.rhs).abs() <= tolerance,
            Comparison::AtMost => lhs <= self.rhs + tolerance,
            Comparison::AtLeast => lhs + tolerance >= self.rhs,
        }
    }
}

/// Builder surface for binary integer programs.
///
/// Implementations may record the program (as [`BinaryProgram`] does) or
/// forward each call straight to a solver library.
pub trait ProgramBuilder {
    /// Declares a new boolean variable.
    fn add_binary(&mut self) -> VarId;

    /// Adds a linear constraint over previously declared variables.
    fn add_constraint(&mut self, constraint: LinearConstraint);

    /// Sets the linear objective to minimise.
    fn minimise(&mut self, objective: LinearExpr);
}

/// In-memory binary program: boolean variables, linear rows, and a
/// minimisation objective.
///
/// # Examples
/// ```
/// use diskmerge_core::{
///     BinaryProgram, Comparison, ConstraintKind, LinearConstraint, LinearExpr, ProgramBuilder,
/// };
///
/// let mut program = BinaryProgram::default();
/// let a = program.add_binary();
/// let b = program.add_binary();
/// program.add_constraint(LinearConstraint {
///     kind: ConstraintKind::Assignment,
///     expr: [(a, 1.0), (b, 1.0)].into_iter().collect(),
///     comparison: Comparison::Equal,
///     rhs: 1.0,
/// });
/// program.minimise([(a, -1.0)].into_iter().collect::<LinearExpr>());
/// assert_eq!(program.variable_count(), 2);
/// assert!(program.is_feasible(&[true, false], 1e-9));
/// assert_eq!(program.objective_value(&[true, false]), -1.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BinaryProgram {
    variable_count: usize,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl BinaryProgram {
    /// Returns the number of declared variables.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Returns all constraints in insertion order.
    #[must_use]
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Returns the objective to minimise.
    #[must_use]
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Counts the constraints of one family.
    #[must_use]
    pub fn count(&self, kind: ConstraintKind) -> usize {
        self.constraints
            .iter()
            .filter(|constraint| constraint.kind == kind)
            .count()
    }

    /// Returns whether `values` satisfies every row within `tolerance`.
    #[must_use]
    pub fn is_feasible(&self, values: &[bool], tolerance: f64) -> bool {
        values.len() == self.variable_count
            && self
                .constraints
                .iter()
                .all(|constraint| constraint.is_satisfied(values, tolerance))
    }

    /// Evaluates the objective for `values`.
    #[must_use]
    pub fn objective_value(&self, values: &[bool]) -> f64 {
        self.objective.evaluate(values)
    }
}

impl ProgramBuilder for BinaryProgram {
    fn add_binary(&mut self) -> VarId {
        let var = VarId::new(self.variable_count);
        self.variable_count += 1;
        var
    }

    fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    fn minimise(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }
}

/// How the disjointness rows are relaxed when the partner disk is not
/// selected.
///
/// Row `(i, j)` never needs a constant above `capacity(i) - dist(i, j)`, and
/// rows where that slack is not positive can never bind. Both strategies omit
/// such rows.
///
/// # Examples
/// ```
/// use diskmerge_core::{LEGACY_BIG_M, Relaxation};
///
/// assert_eq!(Relaxation::default(), Relaxation::Tight);
/// assert_eq!(Relaxation::legacy(), Relaxation::Fixed(LEGACY_BIG_M));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Relaxation {
    /// Per-row constant `capacity(i) - dist(i, j)`, where `capacity(i)` is the
    /// summed radius of the candidate list of `i`.
    #[default]
    Tight,
    /// A user-supplied constant, capped at the per-row slack.
    Fixed(f64),
}

impl Relaxation {
    /// Returns the historical fixed formulation.
    #[must_use]
    pub const fn legacy() -> Self {
        Self::Fixed(LEGACY_BIG_M)
    }
}

impl fmt::Display for Relaxation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tight => f.write_str("tight"),
            Self::Fixed(value) => write!(f, "fixed({value})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(comparison: Comparison, rhs: f64) -> LinearConstraint {
        LinearConstraint {
            kind: ConstraintKind::Nesting,
            expr: [(VarId::new(0), 2.0), (VarId::new(1), 3.0)].into_iter().collect(),
            comparison,
            rhs,
        }
    }

    #[rstest]
    #[case::equal_hit(Comparison::Equal, 5.0, true)]
    #[case::equal_miss(Comparison::Equal, 4.0, false)]
    #[case::at_most_hit(Comparison::AtMost, 5.0, true)]
    #[case::at_most_miss(Comparison::AtMost, 4.5, false)]
    #[case::at_least_hit(Comparison::AtLeast, 5.0, true)]
    #[case::at_least_miss(Comparison::AtLeast, 5.5, false)]
    fn constraint_evaluation(
        #[case] comparison: Comparison,
        #[case] rhs: f64,
        #[case] expected: bool,
    ) {
        assert_eq!(row(comparison, rhs).is_satisfied(&[true, true], 1e-9), expected);
    }

    #[test]
    fn program_rejects_assignment_of_wrong_length() {
        let mut program = BinaryProgram::default();
        program.add_binary();
        assert!(!program.is_feasible(&[], 1e-9));
        assert!(program.is_feasible(&[false], 1e-9));
    }

    #[test]
    fn relaxation_display() {
        assert_eq!(Relaxation::Tight.to_string(), "tight");
        assert_eq!(Relaxation::Fixed(2.5).to_string(), "fixed(2.5)");
    }
}
