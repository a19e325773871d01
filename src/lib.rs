//! Fast, plan-based spectral solver for the Poisson and Helmholtz
//! equations on uniform rectangular grids in 1–3 dimensions.
//!
//! Given a right-hand side f on a regular grid with per-axis boundary
//! conditions (Periodic, homogeneous Dirichlet, or homogeneous Neumann),
//! a [`Plan`] computes u with (alpha − Δ)u = f in O(N log N): each axis
//! is diagonalized by the orthogonal transform its boundary condition
//! calls for (FFT, DST-I, or DCT-II), and the resulting diagonal system
//! is a single elementwise division by the eigenvalue sums.
//!
//! Inhomogeneous Dirichlet/Neumann data is supported through
//! [`Plan::solve_with_bc`], which folds face values into the RHS so the
//! homogeneous spectral solver produces the inhomogeneous solution.
//!
//! # Modules
//! - `grid`: shape, strides, and line enumeration over row-major buffers
//! - `eigenvalues`: 1D discrete-Laplacian eigenvalue tables per BC
//! - `r2r`: DST-I and DCT-II plans built on the complex FFT
//! - `fft`: the complex FFT applied line-wise along one grid axis
//! - `plan`: plan construction and the solve pipeline
//! - `boundary`: inhomogeneous boundary data folded into the RHS
//! - `fd`: finite-difference Laplacian appliers for tests and residuals
//!
//! # Example
//!
//! ```
//! use spectral_pde::{BcKind, Plan, SolverOptions};
//!
//! let n = 64;
//! let h = 1.0 / (n as f64 + 1.0);
//! let mut plan = Plan::new(1, &[n], &[h], &[BcKind::Dirichlet],
//!     SolverOptions::default()).unwrap();
//!
//! // -u'' = f with u(0) = u(1) = 0.
//! let rhs = vec![1.0; n];
//! let mut u = vec![0.0; n];
//! plan.solve(&mut u, &rhs).unwrap();
//! ```

pub mod bc;
pub mod boundary;
pub mod eigenvalues;
pub mod error;
pub mod fd;
pub mod fft;
pub mod grid;
pub mod options;
pub mod plan;
pub mod r2r;

mod parallel;
mod transform;

pub use bc::{BcKind, BoundaryData, BoundaryFace};
pub use boundary::{apply_dirichlet_rhs, apply_neumann_rhs};
pub use error::{PlanError, SolveError};
pub use grid::Shape;
pub use options::{NullspaceHandling, SolverOptions};
pub use plan::Plan;
pub use r2r::{Normalization, TransformError};
