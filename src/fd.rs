//! Finite-difference Laplacian appliers.
//!
//! Second-order negative-Laplacian stencils with the same per-axis
//! boundary handling the spectral solver diagonalizes: along one axis the
//! result is (2u_i − u_{i−1} − u_{i+1})/h², with wrap-around neighbors for
//! Periodic, zero ghosts for Dirichlet, and mirrored ghosts for Neumann.
//! Useful for manufacturing right-hand sides and for residual checks.

use crate::bc::BcKind;
use crate::grid::Shape;

/// Whether the 1D operator under this boundary condition has a zero
/// eigenvalue (constant mode).
pub fn has_zero_eigenvalue(bc: BcKind) -> bool {
    bc.has_nullspace()
}

/// Index of the zero eigenvalue in the table for `bc`, if it has one.
pub fn zero_eigenvalue_index(bc: BcKind) -> Option<usize> {
    if bc.has_nullspace() {
        Some(0)
    } else {
        None
    }
}

/// Neighbor value along `axis` at offset ±1, honoring the axis BC.
#[inline]
fn neighbor(
    src: &[f64],
    shape: Shape,
    coords: (usize, usize, usize),
    axis: usize,
    step: isize,
    bc: BcKind,
) -> f64 {
    let n = shape.n(axis);
    let pos = [coords.0, coords.1, coords.2][axis] as isize + step;

    let wrapped = if pos >= 0 && (pos as usize) < n {
        pos as usize
    } else {
        match bc {
            BcKind::Periodic => ((pos + n as isize) % n as isize) as usize,
            // Zero ghost outside a Dirichlet boundary.
            BcKind::Dirichlet => return 0.0,
            // Mirrored ghost outside a Neumann boundary.
            BcKind::Neumann => [coords.0, coords.1, coords.2][axis],
        }
    };

    let mut c = [coords.0, coords.1, coords.2];
    c[axis] = wrapped;
    src[shape.index(c[0], c[1], c[2])]
}

fn apply(dst: &mut [f64], src: &[f64], shape: Shape, dim: usize, h: &[f64], bc: &[BcKind]) {
    let total = shape.size();
    if src.len() != total || dst.len() != total {
        return;
    }

    for idx in 0..total {
        let coords = shape.coords(idx);
        let u = src[idx];
        let mut sum = 0.0;
        for axis in 0..dim {
            let left = neighbor(src, shape, coords, axis, -1, bc[axis]);
            let right = neighbor(src, shape, coords, axis, 1, bc[axis]);
            sum += (2.0 * u - left - right) / (h[axis] * h[axis]);
        }
        dst[idx] = sum;
    }
}

/// Apply the 1D negative Laplacian stencil to `src`, writing into `dst`.
pub fn apply_1d(dst: &mut [f64], src: &[f64], h: f64, bc: BcKind) {
    apply(dst, src, Shape::d1(src.len()), 1, &[h], &[bc]);
}

/// Apply the 2D negative Laplacian stencil with per-axis boundary
/// handling. `src` and `dst` are row-major with the given shape.
pub fn apply_2d(dst: &mut [f64], src: &[f64], shape: Shape, h: [f64; 2], bc: [BcKind; 2]) {
    apply(dst, src, shape, 2, &h, &bc);
}

/// Apply the 3D negative Laplacian stencil with per-axis boundary
/// handling.
pub fn apply_3d(dst: &mut [f64], src: &[f64], shape: Shape, h: [f64; 3], bc: [BcKind; 3]) {
    apply(dst, src, shape, 3, &h, &bc);
}
