use nalgebra::{Matrix2, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Continuous (sub-pixel) position in image coordinates.
pub type Point = Point2<f64>;

/// Displacement of a sample relative to the analysis-window center.
pub type Offset = Vector2<f64>;

/// Six-parameter affine displacement model around an analysis point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplacementField {
    pub u1: f64, // translation
    pub u2: f64,
    pub du1dx1: f64, // normal strain
    pub du2dx2: f64,
    pub du1dx2: f64, // shear
    pub du2dx1: f64,
}

impl DisplacementField {
    pub const fn new(u1: f64, u2: f64, du1dx1: f64, du2dx2: f64, du1dx2: f64, du2dx1: f64) -> Self {
        Self {
            u1,
            u2,
            du1dx1,
            du2dx2,
            du1dx2,
            du2dx1,
        }
    }

    /// Per-parameter midpoint of two bounds; the solver's starting estimate.
    pub fn midpoint(lo: &Self, hi: &Self) -> Self {
        Self {
            u1: 0.5 * (lo.u1 + hi.u1),
            u2: 0.5 * (lo.u2 + hi.u2),
            du1dx1: 0.5 * (lo.du1dx1 + hi.du1dx1),
            du2dx2: 0.5 * (lo.du2dx2 + hi.du2dx2),
            du1dx2: 0.5 * (lo.du1dx2 + hi.du1dx2),
            du2dx1: 0.5 * (lo.du2dx1 + hi.du2dx1),
        }
    }

    pub fn translation(&self) -> Vector2<f64> {
        Vector2::new(self.u1, self.u2)
    }

    /// Displacement-gradient Jacobian `[[du1/dx1, du1/dx2], [du2/dx1, du2/dx2]]`.
    pub fn jacobian(&self) -> Matrix2<f64> {
        Matrix2::new(self.du1dx1, self.du1dx2, self.du2dx1, self.du2dx2)
    }

    /// Euclidean norm over all six parameter deltas.
    pub fn distance(&self, other: &Self) -> f64 {
        let d = [
            self.u1 - other.u1,
            self.u2 - other.u2,
            self.du1dx1 - other.du1dx1,
            self.du2dx2 - other.du2dx2,
            self.du1dx2 - other.du1dx2,
            self.du2dx1 - other.du2dx1,
        ];
        d.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Halves all six components in place; the coarse-to-fine step schedule.
    pub fn halve(&mut self) {
        self.u1 *= 0.5;
        self.u2 *= 0.5;
        self.du1dx1 *= 0.5;
        self.du2dx2 *= 0.5;
        self.du1dx2 *= 0.5;
        self.du2dx1 *= 0.5;
    }
}

/// Terminal output of one solve.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct SolveResult {
    pub field: DisplacementField,
    /// Best correlation score seen anywhere in the search.
    pub best_correlation: f64,
    pub iterations: usize,
    /// False only when an explicit iteration cap cut the solve short.
    pub converged: bool,
    pub latency_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_averages_every_parameter() {
        let lo = DisplacementField::new(-2.0, -4.0, -0.1, -0.2, -0.3, -0.4);
        let hi = DisplacementField::new(4.0, 0.0, 0.1, 0.2, 0.3, 0.4);
        let mid = DisplacementField::midpoint(&lo, &hi);
        assert_eq!(mid, DisplacementField::new(1.0, -2.0, 0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn distance_is_euclidean_over_six_parameters() {
        let a = DisplacementField::default();
        let b = DisplacementField::new(3.0, 4.0, 0.0, 0.0, 0.0, 0.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn jacobian_rows_follow_the_gradient_layout() {
        let f = DisplacementField::new(0.0, 0.0, 0.1, 0.4, 0.2, 0.3);
        let j = f.jacobian();
        assert_eq!(j[(0, 0)], 0.1);
        assert_eq!(j[(0, 1)], 0.2);
        assert_eq!(j[(1, 0)], 0.3);
        assert_eq!(j[(1, 1)], 0.4);
    }

    #[test]
    fn halve_scales_every_component() {
        let mut step = DisplacementField::new(1.0, 1.0, 0.2, 0.2, 0.1, 0.1);
        step.halve();
        assert_eq!(step, DisplacementField::new(0.5, 0.5, 0.1, 0.1, 0.05, 0.05));
    }
}
