//! Real-to-real transforms (DST-I and DCT-II) built on a complex FFT.
//!
//! Both transforms embed a length-N real line into a longer complex
//! buffer with the symmetry that turns the FFT into the desired sine or
//! cosine sum. Plans own their buffers and are meant to be reused; the
//! one-shot helpers allocate a plan per call and exist for tests and
//! experiments, not hot paths.

mod dct;
mod dst;

pub use dct::DctPlan;
pub use dst::DstPlan;

use std::f64::consts::PI;

use thiserror::Error;

/// Output scaling applied by a transform plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Raw transform sums; a forward/inverse round trip scales the input
    /// by the plan's `normalization_factor`.
    #[default]
    None,
    /// Orthonormal scaling; forward and inverse are exact inverses.
    Ortho,
}

/// Failure modes of the transform layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The requested transform size is unsupported.
    #[error("invalid transform size {0}: must be at least 1")]
    InvalidSize(usize),

    /// A buffer length disagrees with the plan or the grid.
    #[error("transform length mismatch: expected {expected}, got {got}")]
    SizeMismatch { expected: usize, got: usize },
}

/// One-shot forward DST-I of `data` in place.
pub fn dst1(data: &mut [f64]) -> Result<(), TransformError> {
    DstPlan::new(data.len())?.forward(data)
}

/// One-shot inverse DST-I of `data` in place.
pub fn dst1_inverse(data: &mut [f64]) -> Result<(), TransformError> {
    DstPlan::new(data.len())?.inverse(data)
}

/// One-shot forward DCT-II of `data` in place.
pub fn dct2(data: &mut [f64]) -> Result<(), TransformError> {
    DctPlan::new(data.len())?.forward(data)
}

/// One-shot inverse DCT-II of `data` in place.
pub fn dct2_inverse(data: &mut [f64]) -> Result<(), TransformError> {
    DctPlan::new(data.len())?.inverse(data)
}

/// DST-I basis function sin(π(n+1)(k+1)/(size+1)) for mode k at
/// position n.
pub fn dst1_coefficient(n: usize, k: usize, size: usize) -> f64 {
    (PI * (n as f64 + 1.0) * (k as f64 + 1.0) / (size as f64 + 1.0)).sin()
}

/// DCT-II basis function cos(π(n+1/2)k/size) for mode k at position n.
pub fn dct2_coefficient(n: usize, k: usize, size: usize) -> f64 {
    if size == 0 {
        return 0.0;
    }
    (PI * (n as f64 + 0.5) * k as f64 / size as f64).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Deterministic, aperiodic line for transform checks.
    fn test_line(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (0.3 + i as f64).sin() + 0.5 * (1.7 * i as f64).cos())
            .collect()
    }

    #[test]
    fn test_one_shot_dst_matches_definition() {
        let n = 9;
        let x = test_line(n);
        let mut got = x.clone();
        dst1(&mut got).unwrap();

        for k in 0..n {
            let direct: f64 = (0..n).map(|i| x[i] * dst1_coefficient(i, k, n)).sum();
            assert!(
                (got[k] - direct).abs() < 1e-10,
                "mode {}: fft {} vs direct {}",
                k,
                got[k],
                direct
            );
        }
    }

    #[test]
    fn test_one_shot_dct_matches_definition() {
        let n = 11;
        let x = test_line(n);
        let mut got = x.clone();
        dct2(&mut got).unwrap();

        for k in 0..n {
            let direct: f64 = (0..n).map(|i| x[i] * dct2_coefficient(i, k, n)).sum();
            assert!(
                (got[k] - direct).abs() < 1e-10,
                "mode {}: fft {} vs direct {}",
                k,
                got[k],
                direct
            );
        }
    }

    #[test]
    fn test_one_shot_round_trips() {
        for n in [1, 2, 5, 8, 16, 31] {
            let x = test_line(n);

            let mut dst = x.clone();
            dst1(&mut dst).unwrap();
            dst1_inverse(&mut dst).unwrap();
            // DST-I round trip carries the (N+1)/2 factor.
            let factor = (n as f64 + 1.0) / 2.0;
            for (a, b) in dst.iter().zip(x.iter()) {
                assert!((a - b * factor).abs() < 1e-10 * (1.0 + b.abs()), "n={}", n);
            }

            let mut dct = x.clone();
            dct2(&mut dct).unwrap();
            dct2_inverse(&mut dct).unwrap();
            for (a, b) in dct.iter().zip(x.iter()) {
                assert!((a - b).abs() < 1e-10 * (1.0 + b.abs()), "n={}", n);
            }
        }
    }

    #[test]
    fn test_basis_orthogonality() {
        // DST-I basis vectors are orthogonal with uniform weight; DCT-II
        // basis vectors are orthogonal with uniform weight as well.
        let n = 12;
        for k1 in 0..n {
            for k2 in 0..n {
                let sine: f64 = (0..n)
                    .map(|i| dst1_coefficient(i, k1, n) * dst1_coefficient(i, k2, n))
                    .sum();
                let cosine: f64 = (0..n)
                    .map(|i| dct2_coefficient(i, k1, n) * dct2_coefficient(i, k2, n))
                    .sum();
                if k1 == k2 {
                    assert!(sine.abs() > 1e-6);
                    assert!(cosine.abs() > 1e-6);
                } else {
                    assert!(sine.abs() < 1e-10, "sine modes {} {} not orthogonal", k1, k2);
                    assert!(
                        cosine.abs() < 1e-10,
                        "cosine modes {} {} not orthogonal",
                        k1,
                        k2
                    );
                }
            }
        }
    }
}
