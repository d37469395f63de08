//! Synthetic deformed-image generation for tests and demos.

use crate::image::ImageF32;
use crate::sampler::sample;
use crate::types::{DisplacementField, Point};
use nalgebra::Matrix2;

/// Applies `field` (anchored at `center`) to `reference`, producing the
/// deformed image on the same pixel grid.
///
/// Works backward: each output pixel is mapped to its reference-frame
/// pre-image through the inverted affine model and sampled bilinearly, so
/// the output has no splatting holes. Pixels whose pre-image falls outside
/// the reference stay black. Returns `None` when `I + J` is singular, i.e.
/// a physically degenerate strain state that folds the neighbourhood.
pub fn deform_image(
    reference: &ImageF32,
    field: &DisplacementField,
    center: Point,
) -> Option<ImageF32> {
    let forward = Matrix2::identity() + field.jacobian();
    let inverse = forward.try_inverse()?;
    let u = field.translation();

    let mut out = ImageF32::new(reference.w, reference.h);
    for y in 0..out.h {
        for x in 0..out.w {
            let q = Point::new(x as f64, y as f64);
            let d = inverse * (q - center - u);
            let s = sample(reference, center + d);
            if s.in_bounds {
                out.set(x, y, s.value as f32);
            }
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_field_reproduces_the_reference() {
        let reference = ImageF32::from_fn(24, 24, |x, y| ((x * 7 + y * 3) % 19) as f32 / 19.0);
        let out = deform_image(&reference, &DisplacementField::default(), Point::new(12.0, 12.0))
            .expect("identity warp");
        for y in 0..24 {
            for x in 0..24 {
                assert!(
                    (out.get(x, y) - reference.get(x, y)).abs() < 1e-6,
                    "pixel ({x}, {y}) changed under the zero field"
                );
            }
        }
    }

    #[test]
    fn integer_translation_shifts_the_content() {
        let reference = ImageF32::from_fn(20, 20, |x, y| ((x + 2 * y) % 11) as f32 / 11.0);
        let field = DisplacementField::new(3.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let out = deform_image(&reference, &field, Point::new(10.0, 10.0)).expect("pure shift");
        for y in 0..20 {
            for x in 4..20 {
                assert!(
                    (out.get(x, y) - reference.get(x - 3, y)).abs() < 1e-6,
                    "pixel ({x}, {y}) is not the reference shifted by 3"
                );
            }
        }
    }

    #[test]
    fn folding_strain_state_is_rejected() {
        let reference = ImageF32::new(8, 8);
        // du1dx1 = -1 makes I + J singular.
        let field = DisplacementField::new(0.0, 0.0, -1.0, 0.0, 0.0, 0.0);
        assert!(deform_image(&reference, &field, Point::new(4.0, 4.0)).is_none());
    }
}
