//! Solver configuration.

/// How to treat the null direction (constant mode) when the problem has
/// one. A problem has a nontrivial kernel only when alpha = 0 and every
/// axis is Periodic or Neumann.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullspaceHandling {
    /// Pin the zero-mode coefficient to zero. The RHS must be
    /// mean-consistent, otherwise the solve fails with `NonZeroMean`.
    #[default]
    ZeroMode,

    /// Subtract the RHS mean before solving; the solution mean comes out
    /// as zero unless `solution_mean` shifts it.
    SubtractMean,

    /// Fail with `Nullspace` whenever the problem has a kernel. Use this
    /// when a unique solution is expected.
    Error,
}

/// Options accepted by plan construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    /// Nullspace handling for problems with zero eigenvalues.
    pub nullspace: NullspaceHandling,

    /// Mean of the reported solution for nullspace problems. When `None`
    /// the solver leaves the mean as computed (zero for the pinned mode).
    pub solution_mean: Option<f64>,

    /// Advisory request for real-FFT plans. The backing FFT used here has
    /// no real variant of the required dimensionality, so the flag is
    /// accepted and currently ignored.
    pub use_real_fft: bool,

    /// Number of parallel workers for transforms and the spectral divide.
    /// 0 selects a runtime-chosen value; anything else is clamped to at
    /// least 1 and to the per-call workload.
    pub workers: usize,

    /// Allow the solver to use the RHS buffer as scratch. Skips the real
    /// scratch allocation used by the boundary-data path.
    pub in_place: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            nullspace: NullspaceHandling::ZeroMode,
            solution_mean: None,
            use_real_fft: false,
            workers: 0,
            in_place: false,
        }
    }
}
