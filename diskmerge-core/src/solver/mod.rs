//! Optimizer seam.
//!
//! The merge pipeline only needs a 0/1 value per variable from an optimal
//! solve. [`Optimizer`] hides the solver library behind that contract;
//! [`GoodLpOptimizer`] is the implementation shipped with the crate.

mod backend;

use crate::{
    error::SolverError,
    model::{BinaryProgram, VarId},
};

pub use self::backend::GoodLpOptimizer;

/// Solves binary programs to optimality.
///
/// Implementations must return one value per declared variable. Ties between
/// optimal solutions may be resolved arbitrarily.
pub trait Optimizer {
    /// Returns a short name used in logs and errors.
    fn name(&self) -> &str;

    /// Minimises `program` and returns the optimal assignment.
    ///
    /// # Errors
    /// Returns [`SolverError`] when the backend cannot produce an optimal
    /// assignment.
    fn solve(&self, program: &BinaryProgram) -> Result<Assignment, SolverError>;
}

/// Resolved 0/1 value of every variable of a program.
///
/// # Examples
/// ```
/// use diskmerge_core::{Assignment, VarId};
///
/// let assignment = Assignment::from_reals(&[0.9999, 1e-7, 0.5]);
/// assert!(assignment.value(VarId::new(0)));
/// assert!(!assignment.value(VarId::new(1)));
/// assert!(assignment.value(VarId::new(2)));
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    /// Wraps explicit boolean values.
    #[must_use]
    pub fn from_values(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// Rounds relaxed solver values to booleans at `0.5`.
    #[must_use]
    pub fn from_reals(values: &[f64]) -> Self {
        Self {
            values: values.iter().map(|&value| value >= 0.5).collect(),
        }
    }

    /// Returns the value of `var`; unknown variables read as unset.
    #[must_use]
    pub fn value(&self, var: VarId) -> bool {
        self.values.get(var.index()).copied().unwrap_or(false)
    }

    /// Returns every value in variable order.
    #[must_use]
    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the assignment holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fails unless the assignment covers exactly the program's variables.
    ///
    /// # Errors
    /// Returns [`SolverError::AssignmentLength`] on a size mismatch.
    pub fn check_len(&self, program: &BinaryProgram) -> Result<(), SolverError> {
        if self.values.len() == program.variable_count() {
            Ok(())
        } else {
            Err(SolverError::AssignmentLength {
                expected: program.variable_count(),
                got: self.values.len(),
            })
        }
    }
}
