//! Solver configuration.

use crate::types::DisplacementField;
use serde::{Deserialize, Serialize};

/// Parameters of one correlation solve.
///
/// The translation search span (`search_max.u1 - search_min.u1`, same for
/// `u2`) fixes the integer grid size; strain and shear step sizes are the
/// corresponding parameter range divided by those same counts, so the
/// strain resolution is coupled to the translation span.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// Analysis window width in pixels.
    pub window: usize,
    /// Lower search bound for all six parameters.
    pub search_min: DisplacementField,
    /// Upper search bound for all six parameters.
    pub search_max: DisplacementField,
    /// Convergence threshold on the parameter-update norm.
    pub error_tolerance: f64,
    /// Consecutive below-tolerance iterations required to stop.
    pub required_stable_iters: usize,
    /// Absolute cap on outer iterations. The stopping rule counts only
    /// converged iterations and can spin forever on hostile input; `None`
    /// leaves it unbounded, `Some(n)` bounds the solve.
    pub max_iterations: Option<usize>,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            window: 35,
            search_min: DisplacementField::new(-5.0, -5.0, -0.05, -0.05, -0.05, -0.05),
            search_max: DisplacementField::new(5.0, 5.0, 0.05, 0.05, 0.05, 0.05),
            error_tolerance: 1e-3,
            required_stable_iters: 10,
            max_iterations: None,
        }
    }
}

impl SolverParams {
    /// Integer step counts derived from the u1/u2 search spans.
    pub(crate) fn grid_span(&self) -> (i64, i64) {
        (
            (self.search_max.u1 - self.search_min.u1).floor() as i64,
            (self.search_max.u2 - self.search_min.u2).floor() as i64,
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.window == 0 {
            return Err("analysis window must be at least one pixel wide".to_string());
        }
        let (npas_x, npas_y) = self.grid_span();
        if npas_x < 1 || npas_y < 1 {
            return Err(format!(
                "translation search span must cover at least one pixel per axis (got {npas_x}x{npas_y} steps)"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(SolverParams::default().validate().is_ok());
    }

    #[test]
    fn grid_span_floors_the_translation_range() {
        let params = SolverParams {
            search_min: DisplacementField::new(-12.0, -2.0, -0.05, -0.05, -0.05, -0.05),
            search_max: DisplacementField::new(3.0, 5.9, 0.05, 0.05, 0.05, 0.05),
            ..Default::default()
        };
        assert_eq!(params.grid_span(), (15, 7));
    }

    #[test]
    fn sub_pixel_translation_span_is_rejected() {
        let params = SolverParams {
            search_min: DisplacementField::new(-0.3, -5.0, 0.0, 0.0, 0.0, 0.0),
            search_max: DisplacementField::new(0.3, 5.0, 0.0, 0.0, 0.0, 0.0),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_window_is_rejected() {
        let params = SolverParams {
            window: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
