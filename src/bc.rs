//! Boundary-condition vocabulary shared by plans, transforms, and the
//! inhomogeneous-data patches.

use std::fmt;

/// Boundary condition applied on both ends of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcKind {
    /// The domain wraps around: u(0) = u(L), u'(0) = u'(L).
    Periodic,
    /// The value is fixed at the boundary; the homogeneous form is u = 0.
    Dirichlet,
    /// The outward derivative is fixed at the boundary; the homogeneous
    /// form is du/dn = 0.
    Neumann,
}

impl BcKind {
    /// Whether the 1D Laplacian under this condition has a zero eigenvalue
    /// (the constant mode). True for Periodic and Neumann, false for
    /// Dirichlet.
    pub fn has_nullspace(self) -> bool {
        matches!(self, BcKind::Periodic | BcKind::Neumann)
    }
}

impl fmt::Display for BcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BcKind::Periodic => "Periodic",
            BcKind::Dirichlet => "Dirichlet",
            BcKind::Neumann => "Neumann",
        };
        f.write_str(name)
    }
}

/// One face of the rectangular domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryFace {
    XLow,
    XHigh,
    YLow,
    YHigh,
    ZLow,
    ZHigh,
}

impl BoundaryFace {
    /// The axis the face is orthogonal to (0 = x, 1 = y, 2 = z).
    pub fn axis(self) -> usize {
        match self {
            BoundaryFace::XLow | BoundaryFace::XHigh => 0,
            BoundaryFace::YLow | BoundaryFace::YHigh => 1,
            BoundaryFace::ZLow | BoundaryFace::ZHigh => 2,
        }
    }

    /// True for the high-coordinate side of the axis.
    pub fn is_high(self) -> bool {
        matches!(
            self,
            BoundaryFace::XHigh | BoundaryFace::YHigh | BoundaryFace::ZHigh
        )
    }
}

/// Prescribed inhomogeneous boundary values on one face.
///
/// `values` is the row-major face slice: its length must equal the
/// product of the two grid sizes orthogonal to `face.axis()`, with the
/// orthogonal axes kept in their original order.
#[derive(Debug, Clone)]
pub struct BoundaryData {
    pub face: BoundaryFace,
    pub kind: BcKind,
    pub values: Vec<f64>,
}
