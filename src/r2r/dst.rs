//! DST-I plan for Dirichlet axes.

use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use super::{Normalization, TransformError};

/// Pre-computed DST-I (Type I discrete sine transform) plan.
///
/// For input x[0..N−1]:
///
///     X[k] = Σ x[n] · sin(π(n+1)(k+1)/(N+1)),  k = 0..N−1
///
/// which diagonalizes the second-order Dirichlet Laplacian. The transform
/// is realized as a complex FFT of the odd extension of length 2(N+1) and
/// is self-inverse up to the factor (N+1)/2.
///
/// A single plan is not safe for concurrent use; parallel callers hold
/// one plan per worker.
pub struct DstPlan {
    n: usize,
    extended_n: usize,
    norm: Normalization,
    fft: Arc<dyn Fft<f64>>,
    buf: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl DstPlan {
    /// Create an unnormalized DST-I plan for size `n` (n >= 1).
    pub fn new(n: usize) -> Result<Self, TransformError> {
        Self::with_normalization(n, Normalization::None)
    }

    /// Create a DST-I plan with the given output scaling.
    pub fn with_normalization(n: usize, norm: Normalization) -> Result<Self, TransformError> {
        if n < 1 {
            return Err(TransformError::InvalidSize(n));
        }

        // Odd extension embeds n points into 2(n+1):
        // [0, x0, .., x_{n-1}, 0, -x_{n-1}, .., -x0].
        let extended_n = 2 * (n + 1);
        let fft = FftPlanner::new().plan_fft_forward(extended_n);
        let scratch = vec![Complex64::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Ok(DstPlan {
            n,
            extended_n,
            norm,
            fft,
            buf: vec![Complex64::new(0.0, 0.0); extended_n],
            scratch,
        })
    }

    /// Transform size.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Forward DST-I of `data` in place.
    ///
    /// Output is unnormalized unless the plan was built with
    /// [`Normalization::Ortho`] (scale √(2/(N+1))).
    pub fn forward(&mut self, data: &mut [f64]) -> Result<(), TransformError> {
        if data.len() != self.n {
            return Err(TransformError::SizeMismatch {
                expected: self.n,
                got: data.len(),
            });
        }

        self.buf[0] = Complex64::new(0.0, 0.0);
        self.buf[self.n + 1] = Complex64::new(0.0, 0.0);
        for (i, &x) in data.iter().enumerate() {
            self.buf[i + 1] = Complex64::new(x, 0.0);
            self.buf[self.extended_n - 1 - i] = Complex64::new(-x, 0.0);
        }

        self.fft.process_with_scratch(&mut self.buf, &mut self.scratch);

        // The sine sums sit in the imaginary parts at bins 1..=N.
        let scale = match self.norm {
            Normalization::None => 1.0,
            Normalization::Ortho => (2.0 / (self.n as f64 + 1.0)).sqrt(),
        };
        for (k, x) in data.iter_mut().enumerate() {
            *x = -self.buf[k + 1].im / 2.0 * scale;
        }

        Ok(())
    }

    /// Inverse DST-I of `data` in place.
    ///
    /// DST-I is self-inverse up to scaling: the inverse is the forward
    /// transform scaled by 2/(N+1) (or unscaled under `Ortho`).
    pub fn inverse(&mut self, data: &mut [f64]) -> Result<(), TransformError> {
        self.forward(data)?;

        if self.norm == Normalization::Ortho {
            return Ok(());
        }

        let scale = 2.0 / (self.n as f64 + 1.0);
        for x in data.iter_mut() {
            *x *= scale;
        }
        Ok(())
    }

    /// Factor by which a forward/inverse round trip scales the input.
    pub fn normalization_factor(&self) -> f64 {
        match self.norm {
            Normalization::None => (self.n as f64 + 1.0) / 2.0,
            Normalization::Ortho => 1.0,
        }
    }
}
