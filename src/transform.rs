//! Uniform per-axis transform dispatch.
//!
//! Each axis of a plan carries one transform chosen by its boundary
//! condition: FFT (Periodic), DST-I (Dirichlet), or DCT-II (Neumann).
//! Dispatch happens once per axis pass through a tagged enum; the
//! pointwise solver loops never dispatch.
//!
//! The r2r variants transform the real and imaginary line components
//! independently, so a single complex workspace can carry both the real
//! problem and intermediate complex products from earlier FFT axes.

use num_complex::Complex64;

use crate::bc::BcKind;
use crate::fft::FftLinePlan;
use crate::grid::{Lines, Shape};
use crate::parallel::{clamp_workers, parallel_for_with, SharedBuf};
use crate::r2r::{DctPlan, DstPlan, TransformError};

/// A 1D real transform applied to one gathered line.
trait LineTransform: Send {
    fn transform(&mut self, data: &mut [f64], inverse: bool) -> Result<(), TransformError>;
}

impl LineTransform for DstPlan {
    fn transform(&mut self, data: &mut [f64], inverse: bool) -> Result<(), TransformError> {
        if inverse {
            self.inverse(data)
        } else {
            self.forward(data)
        }
    }
}

impl LineTransform for DctPlan {
    fn transform(&mut self, data: &mut [f64], inverse: bool) -> Result<(), TransformError> {
        if inverse {
            self.inverse(data)
        } else {
            self.forward(data)
        }
    }
}

/// Per-worker r2r state: a private sub-plan plus gather buffers for the
/// real and imaginary line components.
struct R2rWorker<P> {
    plan: P,
    re: Vec<f64>,
    im: Vec<f64>,
}

/// Line-wise driver for a real-to-real transform over a complex grid.
pub(crate) struct R2rLines<P> {
    n: usize,
    workers: Vec<R2rWorker<P>>,
}

impl<P: LineTransform> R2rLines<P> {
    fn new(
        n: usize,
        workers: usize,
        make: impl Fn(usize) -> Result<P, TransformError>,
    ) -> Result<Self, TransformError> {
        let workers = (0..workers.max(1))
            .map(|_| {
                Ok(R2rWorker {
                    plan: make(n)?,
                    re: vec![0.0; n],
                    im: vec![0.0; n],
                })
            })
            .collect::<Result<Vec<_>, TransformError>>()?;
        Ok(R2rLines { n, workers })
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

        let n = self.n;
        let lines = Lines::new(shape, axis);
        let stride = lines.stride();
        let count = lines.count();
        let fanout = clamp_workers(self.workers.len(), count);
        let shared = SharedBuf::new(data);

        parallel_for_with(&mut self.workers[..fanout], count, |worker, start, end| {
            for line in start..end {
                let base = lines.start(line);
                for i in 0..n {
                    let v = unsafe { shared.get(base + i * stride) };
                    worker.re[i] = v.re;
                    worker.im[i] = v.im;
                }

                worker.plan.transform(&mut worker.re, inverse)?;
                worker.plan.transform(&mut worker.im, inverse)?;

                for i in 0..n {
                    unsafe {
                        shared.set(base + i * stride, Complex64::new(worker.re[i], worker.im[i]))
                    };
                }
            }
            Ok(())
        })
    }
}

/// One axis transform of a plan, tagged by boundary condition.
pub(crate) enum AxisTransform {
    Fft(FftLinePlan),
    Dst(R2rLines<DstPlan>),
    Dct(R2rLines<DctPlan>),
}

impl AxisTransform {
    /// Build the transform matching a boundary condition, with `workers`
    /// per-worker sub-plans.
    pub(crate) fn for_bc(bc: BcKind, n: usize, workers: usize) -> Result<Self, TransformError> {
        match bc {
            BcKind::Periodic => Ok(AxisTransform::Fft(FftLinePlan::new(n, workers)?)),
            BcKind::Dirichlet => Ok(AxisTransform::Dst(R2rLines::new(n, workers, DstPlan::new)?)),
            BcKind::Neumann => Ok(AxisTransform::Dct(R2rLines::new(n, workers, DctPlan::new)?)),
        }
    }

    /// Transform size along the axis.
    pub(crate) fn len(&self) -> usize {
        match self {
            AxisTransform::Fft(t) => t.len(),
            AxisTransform::Dst(t) => t.n,
            AxisTransform::Dct(t) => t.n,
        }
    }

    /// Scale a forward/inverse round trip applies to the input: 1 for the
    /// FFT and the DCT-II pair, (N+1)/2 for the unnormalized DST-I. The
    /// inverse pass consumes it, so round trips are the identity.
    pub(crate) fn normalization_factor(&self) -> f64 {
        match self {
            AxisTransform::Fft(_) => 1.0,
            AxisTransform::Dst(t) => t.workers[0].plan.normalization_factor(),
            AxisTransform::Dct(t) => t.workers[0].plan.normalization_factor(),
        }
    }

    /// Forward transform along every line of `data` parallel to `axis`.
    pub(crate) fn forward(
        &mut self,
        data: &mut [Complex64],
        shape: Shape,
        axis: usize,
    ) -> Result<(), TransformError> {
        match self {
            AxisTransform::Fft(t) => t.forward(data, shape, axis),
            AxisTransform::Dst(t) => t.transform_lines(data, shape, axis, false),
            AxisTransform::Dct(t) => t.transform_lines(data, shape, axis, false),
        }
    }

    /// Inverse transform along every line of `data` parallel to `axis`.
    pub(crate) fn inverse(
        &mut self,
        data: &mut [Complex64],
        shape: Shape,
        axis: usize,
    ) -> Result<(), TransformError> {
        match self {
            AxisTransform::Fft(t) => t.inverse(data, shape, axis),
            AxisTransform::Dst(t) => t.transform_lines(data, shape, axis, true),
            AxisTransform::Dct(t) => t.transform_lines(data, shape, axis, true),
        }
    }
}
