//! Sub-pixel grayscale sampling.

use crate::image::IntensityView;
use crate::types::Point;
use log::debug;

/// Outcome of a sub-pixel lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Interpolated intensity; 0.0 when the point was out of bounds.
    pub value: f64,
    pub in_bounds: bool,
}

impl Sample {
    const OUT_OF_BOUNDS: Self = Self {
        value: 0.0,
        in_bounds: false,
    };
}

/// Bilinear interpolation of `image` at a fractional pixel position.
///
/// Points outside `[0, width] × [0, height]` yield the zero sentinel with
/// `in_bounds = false`. Correlation windows may legitimately graze the image
/// border during a search, so this is a diagnostic condition, not an error;
/// callers that care aggregate the flag.
pub fn sample(image: &impl IntensityView, p: Point) -> Sample {
    let w = image.width();
    let h = image.height();
    if w == 0 || h == 0 || p.x < 0.0 || p.x > w as f64 || p.y < 0.0 || p.y > h as f64 {
        debug!(
            "sample outside image bounds: ({:.2}, {:.2}) vs {}x{}",
            p.x, p.y, w, h
        );
        return Sample::OUT_OF_BOUNDS;
    }

    let xf = p.x.floor();
    let yf = p.y.floor();
    let dx = p.x - xf;
    let dy = p.y - yf;
    // Neighbor fetches clamp to the last row/column so points grazing the
    // border stay in range.
    let x0 = (xf as usize).min(w - 1);
    let y0 = (yf as usize).min(h - 1);
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let v00 = image.get(x0, y0) as f64;
    let v10 = image.get(x1, y0) as f64;
    let v01 = image.get(x0, y1) as f64;
    let v11 = image.get(x1, y1) as f64;
    let dfx = v10 - v00;
    let dfy = v01 - v00;
    let dfxy = v00 + v11 - v01 - v10;
    Sample {
        value: v00 + dfx * dx + dfy * dy + dfxy * dx * dy,
        in_bounds: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageF32;

    #[test]
    fn lookup_at_integer_coordinates_is_exact() {
        let img = ImageF32::from_fn(5, 4, |x, y| (y * 5 + x) as f32 / 20.0);
        for y in 0..4 {
            for x in 0..5 {
                let s = sample(&img, Point::new(x as f64, y as f64));
                assert!(s.in_bounds);
                assert!((s.value - img.get(x, y) as f64).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn reproduces_bilinear_intensity_fields() {
        // Bilinear interpolation is exact for f(x, y) = a + bx + cy + dxy.
        let f = |x: f64, y: f64| 0.1 + 0.07 * x + 0.04 * y + 0.002 * x * y;
        let img = ImageF32::from_fn(8, 8, |x, y| f(x as f64, y as f64) as f32);
        for &(x, y) in &[(0.5, 0.5), (1.25, 2.75), (3.9, 0.1), (6.01, 6.99)] {
            let s = sample(&img, Point::new(x, y));
            assert!(s.in_bounds);
            assert!(
                (s.value - f(x, y)).abs() < 1e-5,
                "sampled {} expected {} at ({x}, {y})",
                s.value,
                f(x, y)
            );
        }
    }

    #[test]
    fn out_of_bounds_returns_zero_sentinel() {
        let img = ImageF32::from_fn(4, 4, |_, _| 0.5);
        for p in [
            Point::new(-0.1, 2.0),
            Point::new(2.0, -0.1),
            Point::new(4.5, 2.0),
            Point::new(2.0, 4.5),
        ] {
            let s = sample(&img, p);
            assert!(!s.in_bounds);
            assert_eq!(s.value, 0.0);
        }
    }

    #[test]
    fn border_graze_clamps_neighbors() {
        // x == width counts as in bounds and collapses onto the last column.
        let img = ImageF32::from_fn(4, 4, |x, y| (x + y) as f32 / 10.0);
        let s = sample(&img, Point::new(4.0, 1.0));
        assert!(s.in_bounds);
        assert!((s.value - img.get(3, 1) as f64).abs() < 1e-12);

        let s = sample(&img, Point::new(3.5, 3.5));
        assert!(s.in_bounds);
        assert!(s.value.is_finite());
    }
}
