//! Windowed cross-correlation of a displacement-field hypothesis.

use crate::image::IntensityView;
use crate::sampler::sample;
use crate::types::{DisplacementField, Offset, Point};

/// Correlation score for one displacement-field hypothesis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowCorrelation {
    /// Cross-correlation coefficient, `>= 0`; 0.0 when the denominator is
    /// degenerate (e.g. a perfectly black window).
    pub coefficient: f64,
    /// Samples that fell outside either image while scanning the window.
    pub oob_samples: u32,
}

/// Maps a reference position through the displacement model.
///
/// The Jacobian acts on the offset from the window center, not on the
/// absolute position, so strain and shear only displace samples away from
/// the center.
pub fn warp(p: Point, field: &DisplacementField, offset: Offset) -> Point {
    p + field.translation() + field.jacobian() * offset
}

/// Scores `field` at `center` over a square window of `window` pixels.
///
/// Offsets run `k - window/2` for `k in 0..window` on both axes, one sample
/// per pixel (half-integer offsets for odd windows). The coefficient is
/// `sqrt(Σf·f' / (Σf² · Σf'²))` over the window: an unnormalized-intensity
/// correlation, deliberately not the zero-mean textbook variant; the
/// solver's convergence behaviour depends on it.
pub fn cross_correlation(
    center: Point,
    field: &DisplacementField,
    window: usize,
    image_ref: &impl IntensityView,
    image_def: &impl IntensityView,
) -> WindowCorrelation {
    let half = window as f64 / 2.0;
    let mut sum_cross = 0.0f64;
    let mut sum_ref = 0.0f64;
    let mut sum_def = 0.0f64;
    let mut oob = 0u32;

    for kx in 0..window {
        let dx1 = kx as f64 - half;
        for ky in 0..window {
            let dx2 = ky as f64 - half;
            let offset = Offset::new(dx1, dx2);
            let p_ref = center + offset;
            let f = sample(image_ref, p_ref);
            let f_prime = sample(image_def, warp(p_ref, field, offset));
            oob += u32::from(!f.in_bounds) + u32::from(!f_prime.in_bounds);
            sum_cross += f.value * f_prime.value;
            sum_ref += f.value * f.value;
            sum_def += f_prime.value * f_prime.value;
        }
    }

    let denom = sum_ref * sum_def;
    let coefficient = if denom != 0.0 {
        (sum_cross / denom).sqrt()
    } else {
        0.0
    };
    WindowCorrelation {
        coefficient,
        oob_samples: oob,
    }
}
