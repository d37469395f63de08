#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod correlation;
pub mod diagnostics;
pub mod image;
pub mod sampler;
pub mod solver;
pub mod types;

// Plumbing around the core: configuration for the demo tools and synthetic
// specimen generation.
pub mod config;
pub mod draw;
pub mod synth;

// --- High-level re-exports -------------------------------------------------

// Main entry points: solver + results.
pub use crate::solver::{solve_files, DicSolver, SolverParams};
pub use crate::types::{DisplacementField, SolveResult};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::image::{ImageF32, ImageU8, IntensityView};
    pub use crate::types::{Offset, Point};
    pub use crate::{DicSolver, DisplacementField, SolveResult, SolverParams};
}
