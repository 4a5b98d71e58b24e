//! Error types for the diskmerge core library.
//!
//! Each public error enum carries a stable machine-readable code so the CLI
//! and log pipelines can key on failures without matching display strings.

use std::fmt;

use thiserror::Error;

use crate::verify::InvariantViolation;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Identifies which disk field failed validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Coordinate {
    /// First centre coordinate (`x`, or latitude for geographic input).
    X,
    /// Second centre coordinate (`y`, or longitude for geographic input).
    Y,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// An error produced while assembling a [`crate::DiskSet`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DiskSetError {
    /// A centre coordinate was NaN or infinite.
    #[error("disk {index} has a non-finite {which} coordinate: {value}")]
    NonFiniteCoordinate {
        /// Input position of the offending disk.
        index: usize,
        /// Coordinate that failed validation.
        which: Coordinate,
        /// The rejected value.
        value: f64,
    },
    /// A radius was NaN or infinite.
    #[error("disk {index} has a non-finite radius: {value}")]
    NonFiniteRadius {
        /// Input position of the offending disk.
        index: usize,
        /// The rejected value.
        value: f64,
    },
    /// A radius was negative.
    #[error("disk {index} has a negative radius: {value}")]
    NegativeRadius {
        /// Input position of the offending disk.
        index: usize,
        /// The rejected value.
        value: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`DiskSetError`] variants.
    enum DiskSetErrorCode for DiskSetError {
        /// A centre coordinate was NaN or infinite.
        NonFiniteCoordinate => NonFiniteCoordinate { .. } => "DISKSET_NON_FINITE_COORDINATE",
        /// A radius was NaN or infinite.
        NonFiniteRadius => NonFiniteRadius { .. } => "DISKSET_NON_FINITE_RADIUS",
        /// A radius was negative.
        NegativeRadius => NegativeRadius { .. } => "DISKSET_NEGATIVE_RADIUS",
    }
}

/// An error reported by an [`crate::Optimizer`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SolverError {
    /// The solver proved the program infeasible.
    #[error("solver `{solver}` reported the program as infeasible")]
    Infeasible {
        /// Name of the optimizer that rejected the program.
        solver: String,
    },
    /// The solver proved the program unbounded.
    #[error("solver `{solver}` reported the program as unbounded")]
    Unbounded {
        /// Name of the optimizer that rejected the program.
        solver: String,
    },
    /// The backend failed for another reason.
    #[error("solver `{solver}` failed: {message}")]
    Backend {
        /// Name of the failing optimizer.
        solver: String,
        /// Backend-provided description.
        message: String,
    },
    /// The optimizer returned a value vector of the wrong size.
    #[error("solver returned {got} values for a program with {expected} variables")]
    AssignmentLength {
        /// Number of variables declared by the program.
        expected: usize,
        /// Number of values returned by the optimizer.
        got: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SolverError`] variants.
    enum SolverErrorCode for SolverError {
        /// The solver proved the program infeasible.
        Infeasible => Infeasible { .. } => "SOLVER_INFEASIBLE",
        /// The solver proved the program unbounded.
        Unbounded => Unbounded { .. } => "SOLVER_UNBOUNDED",
        /// The backend failed for another reason.
        Backend => Backend { .. } => "SOLVER_BACKEND",
        /// The optimizer returned a value vector of the wrong size.
        AssignmentLength => AssignmentLength { .. } => "SOLVER_ASSIGNMENT_LENGTH",
    }
}

/// Error type produced when configuring or running [`crate::DiskMerger`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DiskMergeError {
    /// A fixed relaxation constant was not finite and positive.
    #[error("relaxation constant must be finite and positive (got {value})")]
    InvalidRelaxation {
        /// The rejected constant.
        value: f64,
    },
    /// The optimizer failed to produce an assignment.
    #[error("optimizer failed: {source}")]
    Solver {
        /// Underlying optimizer error.
        #[source]
        source: SolverError,
    },
    /// The solved assignment left a disk without a target.
    #[error("disk {index} was not assigned to any target")]
    UnassignedDisk {
        /// Disk without a target.
        index: usize,
    },
    /// The solved assignment gave a disk more than one target.
    #[error("disk {index} was assigned to both {first} and {second}")]
    AmbiguousAssignment {
        /// Disk with several targets.
        index: usize,
        /// First target found.
        first: usize,
        /// Second target found.
        second: usize,
    },
    /// A solved outcome failed verification.
    #[error("merge outcome violates an invariant: {source}")]
    InvariantViolated {
        /// The failed check.
        #[source]
        source: InvariantViolation,
    },
}

define_error_codes! {
    /// Stable codes describing [`DiskMergeError`] variants.
    enum DiskMergeErrorCode for DiskMergeError {
        /// A fixed relaxation constant was not finite and positive.
        InvalidRelaxation => InvalidRelaxation { .. } => "DISKMERGE_INVALID_RELAXATION",
        /// The optimizer failed to produce an assignment.
        SolverFailure => Solver { .. } => "DISKMERGE_SOLVER_FAILURE",
        /// The solved assignment left a disk without a target.
        UnassignedDisk => UnassignedDisk { .. } => "DISKMERGE_UNASSIGNED_DISK",
        /// The solved assignment gave a disk more than one target.
        AmbiguousAssignment => AmbiguousAssignment { .. } => "DISKMERGE_AMBIGUOUS_ASSIGNMENT",
        /// A solved outcome failed verification.
        InvariantViolated => InvariantViolated { .. } => "DISKMERGE_INVARIANT_VIOLATED",
    }
}

impl DiskMergeError {
    /// Retrieve the inner [`SolverErrorCode`] when the optimizer failed.
    #[must_use]
    pub const fn solver_code(&self) -> Option<SolverErrorCode> {
        match self {
            Self::Solver { source } => Some(source.code()),
            _ => None,
        }
    }
}

impl From<SolverError> for DiskMergeError {
    fn from(source: SolverError) -> Self {
        Self::Solver { source }
    }
}

impl From<InvariantViolation> for DiskMergeError {
    fn from(source: InvariantViolation) -> Self {
        Self::InvariantViolated { source }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, DiskMergeError>;
