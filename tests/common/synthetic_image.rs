use dic_solver::image::ImageF32;

/// Smooth aperiodic texture mixing several spatial scales, rich enough for
/// a correlation window anywhere in the frame.
pub fn textured_f32(width: usize, height: usize) -> ImageF32 {
    ImageF32::from_fn(width, height, |x, y| {
        let (x, y) = (x as f64, y as f64);
        let v = 0.5
            + 0.18 * (0.12 * x).sin() * (0.09 * y).cos()
            + 0.12 * (0.31 * x + 0.21 * y).sin()
            + 0.10 * (0.23 * x - 0.17 * y).cos()
            + 0.08 * (0.05 * (x + y)).sin();
        v.clamp(0.02, 0.98) as f32
    })
}
