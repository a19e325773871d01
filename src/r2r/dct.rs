//! DCT-II plan for Neumann axes.

use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use super::{Normalization, TransformError};

/// Pre-computed DCT-II (Type II discrete cosine transform) plan.
///
/// For input x[0..N−1] on a cell-centered grid:
///
///     X[k] = Σ x[n] · cos(π(n+1/2)k/N),  k = 0..N−1
///
/// which diagonalizes the second-order Neumann Laplacian. The forward
/// transform is realized as a complex FFT of the even extension of length
/// 2N (no endpoint duplication) with a phase twiddle; the inverse is the
/// DCT-III expressed through the same length-2N FFT with the conjugate
/// phase. The unnormalized forward/inverse round trip is the identity.
///
/// A single plan is not safe for concurrent use; parallel callers hold
/// one plan per worker.
pub struct DctPlan {
    n: usize,
    extended_n: usize,
    norm: Normalization,
    fft_fwd: Arc<dyn Fft<f64>>,
    fft_inv: Arc<dyn Fft<f64>>,
    /// exp(−iπk/(2N)) twiddles for k = 0..N−1.
    phase: Vec<Complex64>,
    buf: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl DctPlan {
    /// Create an unnormalized DCT-II plan for size `n` (n >= 1).
    pub fn new(n: usize) -> Result<Self, TransformError> {
        Self::with_normalization(n, Normalization::None)
    }

    /// Create a DCT-II plan with the given output scaling.
    pub fn with_normalization(n: usize, norm: Normalization) -> Result<Self, TransformError> {
        if n < 1 {
            return Err(TransformError::InvalidSize(n));
        }

        let extended_n = 2 * n;
        let mut planner = FftPlanner::new();
        let fft_fwd = planner.plan_fft_forward(extended_n);
        let fft_inv = planner.plan_fft_inverse(extended_n);
        let scratch_len = fft_fwd
            .get_inplace_scratch_len()
            .max(fft_inv.get_inplace_scratch_len());

        let den = 2.0 * n as f64;
        let phase = (0..n)
            .map(|k| {
                let angle = -std::f64::consts::PI * k as f64 / den;
                Complex64::new(angle.cos(), angle.sin())
            })
            .collect();

        Ok(DctPlan {
            n,
            extended_n,
            norm,
            fft_fwd,
            fft_inv,
            phase,
            buf: vec![Complex64::new(0.0, 0.0); extended_n],
            scratch: vec![Complex64::new(0.0, 0.0); scratch_len],
        })
    }

    /// Transform size.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Forward DCT-II of `data` in place.
    ///
    /// Output is unnormalized unless the plan was built with
    /// [`Normalization::Ortho`] (X[0] scaled by 1/√N, X[k>0] by √(2/N)).
    pub fn forward(&mut self, data: &mut [f64]) -> Result<(), TransformError> {
        if data.len() != self.n {
            return Err(TransformError::SizeMismatch {
                expected: self.n,
                got: data.len(),
            });
        }

        // Even extension without endpoint duplication:
        // [x0, .., x_{n-1}, x_{n-1}, .., x0].
        for (i, &x) in data.iter().enumerate() {
            self.buf[i] = Complex64::new(x, 0.0);
            self.buf[self.extended_n - 1 - i] = Complex64::new(x, 0.0);
        }

        self.fft_fwd
            .process_with_scratch(&mut self.buf, &mut self.scratch);

        for (k, x) in data.iter_mut().enumerate() {
            let value = (self.buf[k] * self.phase[k]).re / 2.0;
            *x = match self.norm {
                Normalization::None => value,
                Normalization::Ortho => value * ortho_forward_scale(k, self.n),
            };
        }

        Ok(())
    }

    /// Inverse DCT-II (a DCT-III) of `data` in place.
    ///
    /// Rebuilds the conjugate-symmetric spectrum of the even extension,
    /// E[k] = 2·X[k]·exp(iπk/(2N)) with E[N] = 0 and E[2N−k] = conj(E[k]),
    /// and recovers the cell-centered samples with one inverse FFT.
    pub fn inverse(&mut self, data: &mut [f64]) -> Result<(), TransformError> {
        if data.len() != self.n {
            return Err(TransformError::SizeMismatch {
                expected: self.n,
                got: data.len(),
            });
        }

        for (k, &x) in data.iter().enumerate() {
            let raw = match self.norm {
                Normalization::None => x,
                Normalization::Ortho => x / ortho_forward_scale(k, self.n),
            };
            let e = self.phase[k].conj() * (2.0 * raw);
            self.buf[k] = e;
            if k > 0 {
                self.buf[self.extended_n - k] = e.conj();
            }
        }
        self.buf[self.n] = Complex64::new(0.0, 0.0);

        self.fft_inv
            .process_with_scratch(&mut self.buf, &mut self.scratch);

        // The backing inverse FFT is unnormalized; the first N entries of
        // buf/2N are the original samples.
        let scale = 1.0 / self.extended_n as f64;
        for (i, x) in data.iter_mut().enumerate() {
            *x = self.buf[i].re * scale;
        }

        Ok(())
    }

    /// Factor by which a forward/inverse round trip scales the input.
    /// The DCT-II pair is exactly inverse under either normalization.
    pub fn normalization_factor(&self) -> f64 {
        1.0
    }
}

fn ortho_forward_scale(k: usize, n: usize) -> f64 {
    if k == 0 {
        1.0 / (n as f64).sqrt()
    } else {
        (2.0 / n as f64).sqrt()
    }
}
