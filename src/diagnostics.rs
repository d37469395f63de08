use crate::types::{DisplacementField, SolveResult};
use serde::Serialize;

/// Snapshot of one coarse-to-fine iteration.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct IterationDiagnostics {
    pub iteration: usize,
    /// Euclidean norm of the six parameter deltas against the previous estimate.
    pub error: f64,
    /// Best correlation seen so far; non-decreasing across the solve.
    pub best_correlation: f64,
    /// Consecutive below-tolerance iterations up to and including this one.
    pub stable_iters: usize,
    pub estimate: DisplacementField,
}

#[derive(Clone, Debug, Serialize)]
pub struct SolveDiagnostics {
    /// Search grid size (translation step counts per axis).
    pub grid_cols: usize,
    pub grid_rows: usize,
    /// Window samples that fell outside either image across the whole solve.
    pub oob_samples: u64,
    pub iterations: Vec<IterationDiagnostics>,
}

/// Solve output paired with its per-iteration trace.
#[derive(Clone, Debug, Serialize)]
pub struct DetailedSolve {
    pub result: SolveResult,
    pub diagnostics: SolveDiagnostics,
}
