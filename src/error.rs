//! Typed failure modes for plan construction and solves.
//!
//! No error is ever encoded as an out-of-band value in otherwise valid
//! numeric results; every failure surfaces through these enums.

use thiserror::Error;

use crate::r2r::TransformError;

/// Errors raised while constructing a plan.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// A grid size is less than 1.
    #[error("invalid grid size: dimensions must be positive")]
    InvalidSize,

    /// A grid spacing is zero, negative, or non-finite.
    #[error("invalid grid spacing: must be positive and finite")]
    InvalidSpacing,

    /// An input failed a structural check (dimension out of range,
    /// argument length disagreeing with the dimension, non-finite alpha).
    #[error("validation error for {field}: {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    /// Building the transform for one axis failed.
    #[error("axis {axis}: {source}")]
    AxisTransform {
        axis: usize,
        #[source]
        source: TransformError,
    },
}

/// Errors raised by `solve` and its variants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    /// A buffer length differs from what the plan requires. An absent
    /// (zero-length) buffer surfaces here with `got = 0`.
    #[error("size mismatch in {context}: expected {expected}, got {got}")]
    SizeMismatch {
        expected: usize,
        got: usize,
        context: &'static str,
    },

    /// The problem has a nontrivial kernel and the nullspace policy is
    /// [`NullspaceHandling::Error`](crate::NullspaceHandling::Error).
    #[error("problem has nullspace (zero eigenvalue): periodic or Neumann BC without unique solution")]
    Nullspace,

    /// The problem has a kernel, the policy requires a mean-consistent
    /// RHS, and the RHS mean exceeds the tolerance.
    #[error("RHS does not have mean zero: problem is inconsistent for periodic/Neumann BC")]
    NonZeroMean,

    /// Alpha cancels a sum of eigenvalues at a mode outside the constant
    /// kernel, leaving a zero denominator.
    #[error("helmholtz operator is singular: alpha cancels an eigenvalue")]
    Resonant,

    /// Boundary data passed to `solve_with_bc` is inconsistent with the
    /// plan (wrong face for the dimension, periodic axis, kind mismatch,
    /// or wrong values length).
    #[error("invalid boundary data for {field}: {message}")]
    InvalidBc {
        field: &'static str,
        message: &'static str,
    },

    /// An axis transform failed mid-solve.
    #[error("transform on axis {axis} failed: {source}")]
    Transform {
        axis: usize,
        #[source]
        source: TransformError,
    },
}
