//! Coarse-to-fine displacement-field search.
//!
//! The solver refines a 6-parameter displacement estimate by local
//! exhaustive grid search around the current best guess:
//!
//! 1) Sweep translation (`u1`, `u2`) over an `npas_x × npas_y` integer grid
//!    centered on the current estimate, scoring every cell with the windowed
//!    cross-correlation.
//! 2) Sweep the normal strains (`du1dx1`, `du2dx2`) over the same grid,
//!    holding translation at the just-updated values.
//! 3) Sweep the shears (`du1dx2`, `du2dx1`) likewise.
//! 4) Compare the new estimate against the previous one (Euclidean norm over
//!    all six deltas), halve every step, and go again.
//!
//! A single best-ever correlation is threaded through the whole solve and is
//! never reset; an estimate only moves when a cell scores strictly higher,
//! so the recorded maximum grows monotonically and the search tightens onto
//! it as the steps shrink.
//!
//! The solve stops after `required_stable_iters` consecutive iterations
//! whose update norm stayed below `error_tolerance`. Nothing guarantees
//! that ever happens, which is why `SolverParams::max_iterations` exists
//! as an opt-in absolute bound.

mod grid;
mod params;

pub use params::SolverParams;

use crate::correlation::cross_correlation;
use crate::diagnostics::{DetailedSolve, IterationDiagnostics, SolveDiagnostics};
use crate::image::io::load_grayscale;
use crate::image::{to_f32, IntensityView};
use crate::types::{DisplacementField, Point, SolveResult};
use grid::CorrelationGrid;
use log::{debug, warn};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Displacement-field solver for a fixed parameter set.
pub struct DicSolver {
    params: SolverParams,
}

/// Running search state owned by one solve invocation.
struct SearchState {
    best_correlation: f64,
    oob_samples: u64,
}

/// Grid geometry shared by the three sweeps of every iteration.
#[derive(Clone, Copy)]
struct GridSpan {
    deb_x: i64,
    fin_x: i64,
    deb_y: i64,
    fin_y: i64,
}

impl DicSolver {
    /// Creates a solver, rejecting parameter sets the grid derivation cannot
    /// support (zero window, sub-pixel translation span).
    pub fn new(params: SolverParams) -> Result<Self, String> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Solves for the displacement field at `center`.
    pub fn solve(
        &self,
        image_ref: &impl IntensityView,
        image_def: &impl IntensityView,
        center: Point,
    ) -> SolveResult {
        self.solve_with_diagnostics(image_ref, image_def, center)
            .result
    }

    /// Solves several analysis points over the same image pair in parallel.
    ///
    /// Points are independent and only read the shared images, so they fan
    /// out across threads without any shared mutable state.
    pub fn solve_points<R, D>(
        &self,
        image_ref: &R,
        image_def: &D,
        centers: &[Point],
    ) -> Vec<SolveResult>
    where
        R: IntensityView + Sync,
        D: IntensityView + Sync,
    {
        centers
            .par_iter()
            .map(|&center| self.solve(image_ref, image_def, center))
            .collect()
    }

    /// Solves and records a per-iteration trace alongside the result.
    pub fn solve_with_diagnostics(
        &self,
        image_ref: &impl IntensityView,
        image_def: &impl IntensityView,
        center: Point,
    ) -> DetailedSolve {
        let t0 = Instant::now();
        let p = &self.params;
        let (npas_x, npas_y) = p.grid_span(); // both >= 1, checked in new()
        let span = GridSpan {
            deb_x: -(npas_x / 2),
            fin_x: -(npas_x / 2) + npas_x,
            deb_y: -(npas_y / 2),
            fin_y: -(npas_y / 2) + npas_y,
        };

        // Translation steps start at one pixel; strain and shear steps are
        // the parameter range over the translation step counts.
        let mut step = DisplacementField::new(
            1.0,
            1.0,
            (p.search_max.du1dx1 - p.search_min.du1dx1) / npas_x as f64,
            (p.search_max.du2dx2 - p.search_min.du2dx2) / npas_y as f64,
            (p.search_max.du1dx2 - p.search_min.du1dx2) / npas_x as f64,
            (p.search_max.du2dx1 - p.search_min.du2dx1) / npas_y as f64,
        );

        let mut sn = DisplacementField::midpoint(&p.search_min, &p.search_max);
        let mut sn1 = sn;
        let mut grid = CorrelationGrid::new(npas_x as usize, npas_y as usize);
        let mut state = SearchState {
            best_correlation: 0.0,
            oob_samples: 0,
        };

        let mut stable = 0usize;
        let mut iterations = 0usize;
        let mut converged = false;
        let mut trace = Vec::new();

        loop {
            // 1) Translation sweep; strains held at the previous estimate.
            if let Some((kx, ky)) = self.sweep(
                image_ref,
                image_def,
                center,
                sn,
                span,
                |s, x, y| {
                    s.u1 = sn.u1 + x * step.u1;
                    s.u2 = sn.u2 + y * step.u2;
                },
                &mut grid,
                &mut state,
            ) {
                sn1.u1 = sn.u1 + kx * step.u1;
                sn1.u2 = sn.u2 + ky * step.u2;
            }

            // 2) Normal-strain sweep around the freshly updated translation.
            if let Some((kx, ky)) = self.sweep(
                image_ref,
                image_def,
                center,
                sn1,
                span,
                |s, x, y| {
                    s.du1dx1 = sn.du1dx1 + x * step.du1dx1;
                    s.du2dx2 = sn.du2dx2 + y * step.du2dx2;
                },
                &mut grid,
                &mut state,
            ) {
                sn1.du1dx1 = sn.du1dx1 + kx * step.du1dx1;
                sn1.du2dx2 = sn.du2dx2 + ky * step.du2dx2;
            }

            // 3) Shear sweep with the other four parameters at their latest.
            if let Some((kx, ky)) = self.sweep(
                image_ref,
                image_def,
                center,
                sn1,
                span,
                |s, x, y| {
                    s.du1dx2 = sn.du1dx2 + x * step.du1dx2;
                    s.du2dx1 = sn.du2dx1 + y * step.du2dx1;
                },
                &mut grid,
                &mut state,
            ) {
                sn1.du1dx2 = sn.du1dx2 + kx * step.du1dx2;
                sn1.du2dx1 = sn.du2dx1 + ky * step.du2dx1;
            }

            let error = sn1.distance(&sn);
            step.halve();
            if error < p.error_tolerance {
                stable += 1;
            } else {
                stable = 0;
            }
            sn = sn1;
            iterations += 1;

            debug!(
                "solve: iter={} error={:.6} best={:.6} stable={}",
                iterations, error, state.best_correlation, stable
            );
            trace.push(IterationDiagnostics {
                iteration: iterations,
                error,
                best_correlation: state.best_correlation,
                stable_iters: stable,
                estimate: sn1,
            });

            if stable >= p.required_stable_iters {
                converged = true;
                break;
            }
            if let Some(cap) = p.max_iterations {
                if iterations >= cap {
                    warn!(
                        "solve: iteration cap {} reached before convergence (error={:.6})",
                        cap, error
                    );
                    break;
                }
            }
        }

        if state.oob_samples > 0 {
            warn!(
                "solve: {} window samples fell outside the image pair",
                state.oob_samples
            );
        }

        let latency_ms = t0.elapsed().as_secs_f64() * 1000.0;
        DetailedSolve {
            result: SolveResult {
                field: sn1,
                best_correlation: state.best_correlation,
                iterations,
                converged,
                latency_ms,
            },
            diagnostics: SolveDiagnostics {
                grid_cols: npas_x as usize,
                grid_rows: npas_y as usize,
                oob_samples: state.oob_samples,
                iterations: trace,
            },
        }
    }

    /// Scores one candidate grid around `base`, with `vary` writing the pair
    /// of parameters this sweep explores. Returns the winning grid offsets
    /// (as step multipliers) when some cell strictly beat the running best.
    #[allow(clippy::too_many_arguments)]
    fn sweep(
        &self,
        image_ref: &impl IntensityView,
        image_def: &impl IntensityView,
        center: Point,
        base: DisplacementField,
        span: GridSpan,
        vary: impl Fn(&mut DisplacementField, f64, f64),
        grid: &mut CorrelationGrid,
        state: &mut SearchState,
    ) -> Option<(f64, f64)> {
        for x in span.deb_x..span.fin_x {
            for y in span.deb_y..span.fin_y {
                let mut s = base;
                vary(&mut s, x as f64, y as f64);
                let c = cross_correlation(center, &s, self.params.window, image_ref, image_def);
                state.oob_samples += u64::from(c.oob_samples);
                grid.set(
                    (x - span.deb_x) as usize,
                    (y - span.deb_y) as usize,
                    c.coefficient,
                );
            }
        }
        grid.best_above(&mut state.best_correlation)
            .map(|(mx, my)| ((mx as i64 + span.deb_x) as f64, (my as i64 + span.deb_y) as f64))
    }
}

/// Loads an image pair from disk, converts both to grayscale once, and
/// solves at `center`.
pub fn solve_files(
    reference: &Path,
    deformed: &Path,
    center: Point,
    params: SolverParams,
) -> Result<SolveResult, String> {
    let solver = DicSolver::new(params)?;
    let gray_ref = load_grayscale(reference)?;
    let gray_def = load_grayscale(deformed)?;
    let image_ref = to_f32(&gray_ref.as_view());
    let image_def = to_f32(&gray_def.as_view());
    Ok(solver.solve(&image_ref, &image_def, center))
}
