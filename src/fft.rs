//! Complex FFT applied line-wise along one axis of an N-D grid.
//!
//! Wraps rustfft plans of a fixed length and walks every grid line
//! parallel to a chosen axis: contiguous lines (stride 1) transform in
//! place on the workspace, strided lines go through a gather/scatter
//! scratch. The inverse includes the 1/N normalization, so a forward then
//! inverse round trip returns the input unchanged.

use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::grid::{Lines, Shape};
use crate::parallel::{clamp_workers, parallel_for_with, SharedBuf};
use crate::r2r::TransformError;

/// Per-worker gather buffer and FFT scratch.
struct FftScratch {
    line: Vec<Complex64>,
    fft: Vec<Complex64>,
}

/// Complex FFT plan of length N applied along grid lines.
///
/// This is the axis transform for Periodic boundaries. The rustfft plans
/// are shared across workers (they are called through `&self`); only the
/// scratch buffers are per-worker.
pub struct FftLinePlan {
    n: usize,
    fwd: Arc<dyn Fft<f64>>,
    inv: Arc<dyn Fft<f64>>,
    workers: Vec<FftScratch>,
}

impl FftLinePlan {
    /// Create a plan for length `n` with `workers` parallel lanes.
    pub fn new(n: usize, workers: usize) -> Result<Self, TransformError> {
        if n < 1 {
            return Err(TransformError::InvalidSize(n));
        }

        let mut planner = FftPlanner::new();
        let fwd = planner.plan_fft_forward(n);
        let inv = planner.plan_fft_inverse(n);
        let scratch_len = fwd
            .get_inplace_scratch_len()
            .max(inv.get_inplace_scratch_len());

        let workers = (0..workers.max(1))
            .map(|_| FftScratch {
                line: vec![Complex64::new(0.0, 0.0); n],
                fft: vec![Complex64::new(0.0, 0.0); scratch_len],
            })
            .collect();

        Ok(FftLinePlan {
            n,
            fwd,
            inv,
            workers,
        })
    }

    /// Transform length.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Forward FFT along every line of `data` parallel to `axis`.
    pub fn forward(
        &mut self,
        data: &mut [Complex64],
        shape: Shape,
        axis: usize,
    ) -> Result<(), TransformError> {
        self.transform_lines(data, shape, axis, false)
    }

    /// Inverse FFT (with 1/N scaling) along every line parallel to `axis`.
    pub fn inverse(
        &mut self,
        data: &mut [Complex64],
        shape: Shape,
        axis: usize,
    ) -> Result<(), TransformError> {
        self.transform_lines(data, shape, axis, true)
    }

    fn transform_lines(
        &mut self,
        data: &mut [Complex64],
        shape: Shape,
        axis: usize,
        inverse: bool,
    ) -> Result<(), TransformError> {
        if data.len() != shape.size() {
            return Err(TransformError::SizeMismatch {
                expected: shape.size(),
                got: data.len(),
            });
        }
        if shape.n(axis) != self.n {
            return Err(TransformError::SizeMismatch {
                expected: self.n,
                got: shape.n(axis),
            });
        }

        let FftLinePlan {
            n,
            fwd,
            inv,
            workers,
        } = self;
        let n = *n;
        let plan: &dyn Fft<f64> = if inverse { inv.as_ref() } else { fwd.as_ref() };
        let inv_scale = 1.0 / n as f64;

        let lines = Lines::new(shape, axis);
        let stride = lines.stride();
        let count = lines.count();
        let fanout = clamp_workers(workers.len(), count);
        let shared = SharedBuf::new(data);

        parallel_for_with(&mut workers[..fanout], count, |scratch, start, end| {
            for line in start..end {
                let base = lines.start(line);
                if stride == 1 {
                    // Contiguous line: transform the workspace slice directly.
                    let slice = unsafe { shared.slice_mut(base, n) };
                    plan.process_with_scratch(slice, &mut scratch.fft);
                    if inverse {
                        for v in slice.iter_mut() {
                            *v *= inv_scale;
                        }
                    }
                } else {
                    for (i, v) in scratch.line.iter_mut().enumerate() {
                        *v = unsafe { shared.get(base + i * stride) };
                    }
                    plan.process_with_scratch(&mut scratch.line, &mut scratch.fft);
                    if inverse {
                        for v in scratch.line.iter_mut() {
                            *v *= inv_scale;
                        }
                    }
                    for (i, &v) in scratch.line.iter().enumerate() {
                        unsafe { shared.set(base + i * stride, v) };
                    }
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_grid(shape: Shape) -> Vec<Complex64> {
        (0..shape.size())
            .map(|i| Complex64::new((0.7 * i as f64).sin(), (0.3 * i as f64).cos()))
            .collect()
    }

    #[test]
    fn test_rejects_zero_size() {
        assert!(FftLinePlan::new(0, 1).is_err());
    }

    #[test]
    fn test_rejects_axis_mismatch() {
        let mut plan = FftLinePlan::new(8, 1).unwrap();
        let shape = Shape::d2(4, 8);
        let mut data = test_grid(shape);
        assert_eq!(
            plan.forward(&mut data, shape, 0).err(),
            Some(TransformError::SizeMismatch {
                expected: 8,
                got: 4
            })
        );
    }

    #[test]
    fn test_round_trip_every_axis() {
        let shape = Shape::d3(4, 6, 5);
        let original = test_grid(shape);

        for axis in 0..3 {
            let mut plan = FftLinePlan::new(shape.n(axis), 1).unwrap();
            let mut data = original.clone();
            plan.forward(&mut data, shape, axis).unwrap();
            plan.inverse(&mut data, shape, axis).unwrap();

            for (i, (got, want)) in data.iter().zip(original.iter()).enumerate() {
                assert!(
                    (got - want).norm() < 1e-10,
                    "axis {} index {}: {} vs {}",
                    axis,
                    i,
                    got,
                    want
                );
            }
        }
    }

    #[test]
    fn test_dc_mode_is_line_sum() {
        // The forward transform of each line puts the line sum in bin 0.
        let shape = Shape::d2(3, 4);
        let mut data: Vec<Complex64> = (0..shape.size())
            .map(|i| Complex64::new(i as f64, 0.0))
            .collect();

        let mut plan = FftLinePlan::new(4, 1).unwrap();
        plan.forward(&mut data, shape, 1).unwrap();

        for row in 0..3 {
            let sum: f64 = (0..4).map(|j| (row * 4 + j) as f64).sum();
            let got = data[shape.index(row, 0, 0)];
            assert!(
                (got.re - sum).abs() < 1e-12 && got.im.abs() < 1e-12,
                "row {}: {} vs {}",
                row,
                got,
                sum
            );
        }
    }

    #[test]
    fn test_worker_invariance() {
        let shape = Shape::d3(8, 5, 6);
        let original = test_grid(shape);

        for axis in 0..3 {
            let n = shape.n(axis);
            let mut serial = original.clone();
            let mut threaded = original.clone();
            FftLinePlan::new(n, 1)
                .unwrap()
                .forward(&mut serial, shape, axis)
                .unwrap();
            FftLinePlan::new(n, 4)
                .unwrap()
                .forward(&mut threaded, shape, axis)
                .unwrap();
            assert_eq!(serial, threaded, "axis {} differs across worker counts", axis);
        }
    }
}
