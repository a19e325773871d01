//! Reusable Poisson/Helmholtz solver plans.
//!
//! A plan binds grid shape, per-axis spacing and boundary condition,
//! alpha, options, eigenvalue tables, axis transforms, and a complex
//! workspace into a precomputed solver for (alpha − Δ)u = f. Building a
//! plan is cheap next to the workspace allocation; reuse one plan across
//! many solves.
//!
//! A plan is not reentrant: one plan must be driven by at most one thread
//! at a time. To solve independent problems concurrently, build one plan
//! per thread.

use num_complex::Complex64;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::bc::BcKind;
use crate::eigenvalues::eigenvalues;
use crate::error::{PlanError, SolveError};
use crate::grid::Shape;
use crate::options::{NullspaceHandling, SolverOptions};
use crate::parallel::{clamp_workers, effective_workers};
use crate::transform::AxisTransform;

/// Relative tolerance for the mean-consistency check on nullspace
/// problems.
const MEAN_TOL: f64 = 1e-12;

/// A reusable spectral solver for (alpha − Δ)u = f on a uniform
/// rectangular grid with per-axis boundary conditions.
pub struct Plan {
    pub(crate) dim: usize,
    pub(crate) n: [usize; 3],
    pub(crate) h: [f64; 3],
    pub(crate) bc: [BcKind; 3],
    pub(crate) alpha: f64,
    pub(crate) opts: SolverOptions,
    eig: Vec<Vec<f64>>,
    tr: Vec<AxisTransform>,
    work: Vec<Complex64>,
    pub(crate) real_scratch: Vec<f64>,
}

impl Plan {
    /// Create a Poisson plan (alpha = 0) with per-axis boundary
    /// conditions. `n`, `h`, and `bc` must each have length `dim`.
    pub fn new(
        dim: usize,
        n: &[usize],
        h: &[f64],
        bc: &[BcKind],
        opts: SolverOptions,
    ) -> Result<Plan, PlanError> {
        Self::with_alpha(dim, n, h, bc, 0.0, opts)
    }

    /// Create a Helmholtz plan for (alpha − Δ)u = f.
    ///
    /// Negative alpha values are allowed but can make the operator
    /// singular when alpha cancels an eigenvalue sum; `solve` reports
    /// that as [`SolveError::Resonant`].
    pub fn new_helmholtz(
        dim: usize,
        n: &[usize],
        h: &[f64],
        bc: &[BcKind],
        alpha: f64,
        opts: SolverOptions,
    ) -> Result<Plan, PlanError> {
        Self::with_alpha(dim, n, h, bc, alpha, opts)
    }

    fn with_alpha(
        dim: usize,
        n: &[usize],
        h: &[f64],
        bc: &[BcKind],
        alpha: f64,
        mut opts: SolverOptions,
    ) -> Result<Plan, PlanError> {
        if !(1..=3).contains(&dim) {
            return Err(PlanError::Validation {
                field: "dim",
                message: "must be 1, 2, or 3",
            });
        }
        if n.len() != dim {
            return Err(PlanError::Validation {
                field: "n",
                message: "length must match dim",
            });
        }
        if h.len() != dim {
            return Err(PlanError::Validation {
                field: "h",
                message: "length must match dim",
            });
        }
        if bc.len() != dim {
            return Err(PlanError::Validation {
                field: "bc",
                message: "length must match dim",
            });
        }
        if !alpha.is_finite() {
            return Err(PlanError::Validation {
                field: "alpha",
                message: "must be finite",
            });
        }

        opts.workers = effective_workers(opts.workers);

        let mut sizes = [1usize; 3];
        let mut spacings = [1.0f64; 3];
        let mut kinds = [BcKind::Periodic; 3];
        let mut size = 1usize;
        for axis in 0..dim {
            if n[axis] < 1 {
                return Err(PlanError::InvalidSize);
            }
            if !(h[axis] > 0.0 && h[axis].is_finite()) {
                return Err(PlanError::InvalidSpacing);
            }
            sizes[axis] = n[axis];
            spacings[axis] = h[axis];
            kinds[axis] = bc[axis];
            size = size.checked_mul(n[axis]).ok_or(PlanError::InvalidSize)?;
        }

        let mut eig = Vec::with_capacity(dim);
        let mut tr = Vec::with_capacity(dim);
        for axis in 0..dim {
            eig.push(eigenvalues(sizes[axis], spacings[axis], kinds[axis]));
            let lanes = clamp_workers(opts.workers, size / sizes[axis]);
            tr.push(
                AxisTransform::for_bc(kinds[axis], sizes[axis], lanes)
                    .map_err(|source| PlanError::AxisTransform { axis, source })?,
            );
        }

        let real_scratch = if opts.in_place {
            Vec::new()
        } else {
            vec![0.0; size]
        };

        debug!(
            dim,
            n = ?&sizes[..dim],
            bc = ?&kinds[..dim],
            alpha,
            workers = opts.workers,
            "built spectral plan"
        );

        Ok(Plan {
            dim,
            n: sizes,
            h: spacings,
            bc: kinds,
            alpha,
            opts,
            eig,
            tr,
            work: vec![Complex64::new(0.0, 0.0); size],
            real_scratch,
        })
    }

    /// Dimensionality of the plan (1, 2, or 3).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Grid shape with unused axes padded to 1.
    pub fn shape(&self) -> Shape {
        Shape(self.n)
    }

    /// Total number of grid points.
    pub fn size(&self) -> usize {
        self.n[0] * self.n[1] * self.n[2]
    }

    /// Grid size along `axis`.
    pub fn n(&self, axis: usize) -> usize {
        self.n[axis]
    }

    /// Grid spacing along `axis`.
    pub fn spacing(&self, axis: usize) -> f64 {
        self.h[axis]
    }

    /// Boundary condition on `axis`.
    pub fn bc(&self, axis: usize) -> BcKind {
        self.bc[axis]
    }

    /// The Helmholtz shift (0 for a Poisson plan).
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The options the plan was built with (workers resolved).
    pub fn options(&self) -> &SolverOptions {
        &self.opts
    }

    /// Bytes held by the plan's workspace buffers.
    pub fn work_bytes(&self) -> usize {
        self.work.len() * std::mem::size_of::<Complex64>()
            + self.real_scratch.len() * std::mem::size_of::<f64>()
    }

    /// Solve (alpha − Δ)u = rhs into `dst`. Both buffers must hold
    /// exactly `size()` elements; `dst` is written only after all numeric
    /// work has succeeded.
    pub fn solve(&mut self, dst: &mut [f64], rhs: &[f64]) -> Result<(), SolveError> {
        let size = self.size();
        if dst.len() != size {
            return Err(SolveError::SizeMismatch {
                expected: size,
                got: dst.len(),
                context: "solve dst",
            });
        }
        if rhs.len() != size {
            return Err(SolveError::SizeMismatch {
                expected: size,
                got: rhs.len(),
                context: "solve rhs",
            });
        }

        trace!(size, "solve");
        let offset = self.prepare(rhs)?;
        self.lift(rhs, offset);
        self.run()?;
        self.store(dst);
        Ok(())
    }

    /// Solve in place, overwriting `buf` with the solution.
    pub fn solve_in_place(&mut self, buf: &mut [f64]) -> Result<(), SolveError> {
        let size = self.size();
        if buf.len() != size {
            return Err(SolveError::SizeMismatch {
                expected: size,
                got: buf.len(),
                context: "solve buffer",
            });
        }

        trace!(size, "solve in place");
        let offset = self.prepare(buf)?;
        self.lift(buf, offset);
        self.run()?;
        self.store(buf);
        Ok(())
    }

    /// True when the operator has a nontrivial kernel: alpha = 0 and
    /// every axis BC keeps the constant mode.
    pub fn has_nullspace(&self) -> bool {
        self.alpha == 0.0 && self.bc[..self.dim].iter().all(|b| b.has_nullspace())
    }

    /// Nullspace gate and mean policy; returns the offset subtracted
    /// during the lift.
    fn prepare(&self, rhs: &[f64]) -> Result<f64, SolveError> {
        if !self.has_nullspace() {
            return Ok(0.0);
        }

        match self.opts.nullspace {
            NullspaceHandling::Error => Err(SolveError::Nullspace),
            NullspaceHandling::ZeroMode => {
                let (mean, max_abs) = mean_and_max_abs(rhs);
                if mean.abs() > MEAN_TOL * (1.0 + max_abs) {
                    return Err(SolveError::NonZeroMean);
                }
                Ok(0.0)
            }
            NullspaceHandling::SubtractMean => {
                let (mean, _) = mean_and_max_abs(rhs);
                Ok(mean)
            }
        }
    }

    fn lift(&mut self, rhs: &[f64], offset: f64) {
        for (w, &v) in self.work.iter_mut().zip(rhs) {
            *w = Complex64::new(v - offset, 0.0);
        }
    }

    fn run(&mut self) -> Result<(), SolveError> {
        let shape = self.shape();

        let Plan { tr, work, .. } = self;
        for (axis, t) in tr.iter_mut().enumerate() {
            t.forward(work, shape, axis)
                .map_err(|source| SolveError::Transform { axis, source })?;
        }

        self.apply_eigenvalues()?;

        let Plan { tr, work, .. } = self;
        for (axis, t) in tr.iter_mut().enumerate().rev() {
            t.inverse(work, shape, axis)
                .map_err(|source| SolveError::Transform { axis, source })?;
        }

        Ok(())
    }

    /// Elementwise divide by alpha plus the sum of per-axis eigenvalues.
    /// The constant mode is pinned to zero when the kernel exists; any
    /// other zero denominator is a resonance.
    fn apply_eigenvalues(&mut self) -> Result<(), SolveError> {
        let size = self.size();
        let plane = self.n[1] * self.n[2];
        let nz = self.n[2];
        let dim = self.dim;
        let alpha = self.alpha;
        let allow_zero_mode = self.has_nullspace();
        let workers = clamp_workers(self.opts.workers, size);

        let Plan { work, eig, .. } = self;
        let eig = eig.as_slice();

        let divide = |chunk: &mut [Complex64], base: usize| -> Result<(), SolveError> {
            for (off, value) in chunk.iter_mut().enumerate() {
                let idx = base + off;
                let i = idx / plane;
                let rem = idx % plane;
                let j = rem / nz;
                let k = rem % nz;

                let mut denom = alpha + eig[0][i];
                if dim > 1 {
                    denom += eig[1][j];
                }
                if dim > 2 {
                    denom += eig[2][k];
                }

                if denom == 0.0 {
                    // The constant mode lives in the kernel; pin it to zero.
                    if allow_zero_mode && i == 0 && (dim < 2 || j == 0) && (dim < 3 || k == 0) {
                        *value = Complex64::new(0.0, 0.0);
                        continue;
                    }
                    return Err(SolveError::Resonant);
                }

                *value /= denom;
            }
            Ok(())
        };

        if workers <= 1 {
            return divide(work.as_mut_slice(), 0);
        }

        let chunk = size.div_ceil(workers);
        work.par_chunks_mut(chunk)
            .enumerate()
            .try_for_each(|(c, slice)| divide(slice, c * chunk))
    }

    fn store(&self, dst: &mut [f64]) {
        let add_mean = if self.has_nullspace() {
            self.opts.solution_mean.unwrap_or(0.0)
        } else {
            0.0
        };

        for (d, w) in dst.iter_mut().zip(&self.work) {
            *d = w.re + add_mean;
        }
    }
}

pub(crate) fn mean_and_max_abs(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let mut sum = 0.0;
    let mut max_abs = 0.0f64;
    for &v in values {
        sum += v;
        max_abs = max_abs.max(v.abs());
    }
    (sum / values.len() as f64, max_abs)
}
