//! Inhomogeneous boundary data folded into the right-hand side.
//!
//! The spectral core solves the homogeneous problem. Prescribed Dirichlet
//! values and Neumann derivatives enter through the second-order ghost
//! identities instead: eliminating the known ghost value moves a g/h²
//! (Dirichlet) or g/h (Neumann) term onto the RHS of the adjacent grid
//! layer, and the reduction is exact for the second-order stencil.
//!
//! Neumann `values` are derivatives along the positive axis direction at
//! the face, matching the ghost construction u₋₁ = u₀ − h·g (low side)
//! and u_N = u_{N−1} + h·g (high side).

use tracing::trace;

use crate::bc::{BcKind, BoundaryData, BoundaryFace};
use crate::error::SolveError;
use crate::grid::{other_axes, Shape};
use crate::plan::Plan;

fn face_area(shape: Shape, face: BoundaryFace) -> usize {
    let (o0, o1) = other_axes(face.axis());
    shape.n(o0) * shape.n(o1)
}

/// Add `values[p0, p1] * scale` to the grid layer adjacent to `face`.
fn apply_face(rhs: &mut [f64], shape: Shape, face: BoundaryFace, values: &[f64], scale: f64) {
    let axis = face.axis();
    let (o0, o1) = other_axes(axis);
    let strides = shape.strides();
    let layer = if face.is_high() { shape.n(axis) - 1 } else { 0 };
    let base = layer * strides[axis];

    for p0 in 0..shape.n(o0) {
        for p1 in 0..shape.n(o1) {
            let idx = base + p0 * strides[o0] + p1 * strides[o1];
            rhs[idx] += values[p0 * shape.n(o1) + p1] * scale;
        }
    }
}

fn validate_face(shape: Shape, data: &BoundaryData) -> Result<(), SolveError> {
    if data.face.axis() >= shape.dim() {
        return Err(SolveError::InvalidBc {
            field: "face",
            message: "boundary face not valid for this dimension",
        });
    }

    let expected = face_area(shape, data.face);
    if data.values.len() != expected {
        return Err(SolveError::SizeMismatch {
            expected,
            got: data.values.len(),
            context: "face values",
        });
    }
    Ok(())
}

/// Fold inhomogeneous Dirichlet boundary values into `rhs` in place.
///
/// For each face the prescribed values are added to the adjacent layer
/// scaled by 1/h², h being the spacing of the face's axis; the patched
/// RHS makes the homogeneous solver produce the inhomogeneous solution.
pub fn apply_dirichlet_rhs(
    rhs: &mut [f64],
    shape: Shape,
    h: [f64; 3],
    data: &[BoundaryData],
) -> Result<(), SolveError> {
    let expected = shape.size();
    if rhs.len() != expected {
        return Err(SolveError::SizeMismatch {
            expected,
            got: rhs.len(),
            context: "dirichlet rhs patch",
        });
    }

    for d in data {
        if d.kind != BcKind::Dirichlet {
            return Err(SolveError::InvalidBc {
                field: "kind",
                message: "only Dirichlet boundary data is supported here",
            });
        }
        validate_face(shape, d)?;

        let spacing = h[d.face.axis()];
        apply_face(rhs, shape, d.face, &d.values, 1.0 / (spacing * spacing));
    }
    Ok(())
}

/// Fold inhomogeneous Neumann boundary derivatives into `rhs` in place.
///
/// Values are derivatives along the positive axis direction at the face;
/// the adjacent layer receives −g/h on low faces and +g/h on high faces.
pub fn apply_neumann_rhs(
    rhs: &mut [f64],
    shape: Shape,
    h: [f64; 3],
    data: &[BoundaryData],
) -> Result<(), SolveError> {
    let expected = shape.size();
    if rhs.len() != expected {
        return Err(SolveError::SizeMismatch {
            expected,
            got: rhs.len(),
            context: "neumann rhs patch",
        });
    }

    for d in data {
        if d.kind != BcKind::Neumann {
            return Err(SolveError::InvalidBc {
                field: "kind",
                message: "only Neumann boundary data is supported here",
            });
        }
        validate_face(shape, d)?;

        let spacing = h[d.face.axis()];
        let scale = if d.face.is_high() {
            1.0 / spacing
        } else {
            -1.0 / spacing
        };
        apply_face(rhs, shape, d.face, &d.values, scale);
    }
    Ok(())
}

impl Plan {
    /// Solve with inhomogeneous Dirichlet/Neumann boundary data: the face
    /// values are folded into a copy of `rhs` (or into `dst` when the
    /// plan is `in_place`), then the homogeneous solve runs on the
    /// patched buffer.
    pub fn solve_with_bc(
        &mut self,
        dst: &mut [f64],
        rhs: &[f64],
        data: &[BoundaryData],
    ) -> Result<(), SolveError> {
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

        if data.is_empty() {
            return self.solve(dst, rhs);
        }

        self.validate_boundary_data(data)?;
        trace!(faces = data.len(), "patching boundary data");

        if self.opts.in_place {
            // dst is about to be overwritten anyway; use it as the patch
            // buffer.
            dst.copy_from_slice(rhs);
            self.patch(dst, data)?;
            self.solve_in_place(dst)
        } else {
            let mut buf = std::mem::take(&mut self.real_scratch);
            buf.copy_from_slice(rhs);
            let result = self
                .patch(&mut buf, data)
                .and_then(|_| self.solve(dst, &buf));
            self.real_scratch = buf;
            result
        }
    }

    fn validate_boundary_data(&self, data: &[BoundaryData]) -> Result<(), SolveError> {
        for d in data {
            let axis = d.face.axis();
            if axis >= self.dim {
                return Err(SolveError::InvalidBc {
                    field: "face",
                    message: "boundary face not valid for plan dimension",
                });
            }
            if self.bc[axis] == BcKind::Periodic {
                return Err(SolveError::InvalidBc {
                    field: "face",
                    message: "boundary data not allowed on a periodic axis",
                });
            }
            if self.bc[axis] != d.kind {
                return Err(SolveError::InvalidBc {
                    field: "kind",
                    message: "boundary kind does not match the plan's axis",
                });
            }
        }
        Ok(())
    }

    fn patch(&self, buf: &mut [f64], data: &[BoundaryData]) -> Result<(), SolveError> {
        let shape = self.shape();
        for d in data.iter().filter(|d| d.kind == BcKind::Dirichlet) {
            apply_dirichlet_rhs(buf, shape, self.h, std::slice::from_ref(d))?;
        }
        for d in data.iter().filter(|d| d.kind == BcKind::Neumann) {
            apply_neumann_rhs(buf, shape, self.h, std::slice::from_ref(d))?;
        }
        Ok(())
    }
}
