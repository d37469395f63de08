//! Minimal grayscale drawing helpers for synthetic specimen textures.

use crate::image::ImageF32;

/// Fills the whole image with one intensity.
pub fn fill(image: &mut ImageF32, value: f32) {
    for y in 0..image.h {
        for px in image.row_mut(y) {
            *px = value;
        }
    }
}

/// Draws a straight segment of constant intensity between two pixel
/// positions, one sample per pixel of the longer axis. Samples landing
/// outside the image are skipped.
pub fn line_segment(image: &mut ImageF32, p0: (f64, f64), p1: (f64, f64), value: f32) {
    let dx = p1.0 - p0.0;
    let dy = p1.1 - p0.1;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
    let n = steps as usize;
    for k in 0..=n {
        let t = k as f64 / steps;
        let x = (p0.0 + t * dx).round();
        let y = (p0.1 + t * dy).round();
        if x >= 0.0 && y >= 0.0 && (x as usize) < image.w && (y as usize) < image.h {
            image.set(x as usize, y as usize, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_sets_every_pixel() {
        let mut img = ImageF32::new(5, 3);
        fill(&mut img, 0.25);
        assert!(img.data.iter().all(|&v| v == 0.25));
    }

    #[test]
    fn horizontal_line_covers_the_row() {
        let mut img = ImageF32::new(10, 10);
        line_segment(&mut img, (0.0, 4.0), (9.0, 4.0), 0.8);
        for x in 0..10 {
            assert_eq!(img.get(x, 4), 0.8);
        }
        assert_eq!(img.get(0, 3), 0.0);
    }

    #[test]
    fn out_of_frame_samples_are_clipped() {
        let mut img = ImageF32::new(4, 4);
        line_segment(&mut img, (-2.0, 1.0), (6.0, 1.0), 1.0);
        for x in 0..4 {
            assert_eq!(img.get(x, 1), 1.0);
        }
    }
}
