use vesselness::image::{ImageF32, ImageRgba};

/// Uniform gray frame.
pub fn constant_rgba(width: usize, height: usize, value: f32) -> ImageRgba {
    ImageRgba::filled(width, height, [value, value, value, 1.0])
}

/// Single bright 1 px column at `x` on a black background.
pub fn vertical_line_rgba(width: usize, height: usize, x: usize) -> ImageRgba {
    assert!(x < width, "line column must lie inside the image");
    let mut luma = ImageF32::new(width, height);
    for y in 0..height {
        luma.set(x, y, 1.0);
    }
    ImageRgba::from_luma(&luma)
}

/// Bright filled disk of `radius` pixels centred on pixel `(cx, cy)`.
pub fn disk_rgba(width: usize, height: usize, cx: usize, cy: usize, radius: f32) -> ImageRgba {
    let mut luma = ImageF32::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx as f32;
            let dy = y as f32 - cy as f32;
            if dx * dx + dy * dy <= radius * radius {
                luma.set(x, y, 1.0);
            }
        }
    }
    ImageRgba::from_luma(&luma)
}

/// Channel-wise `1 - v`, alpha kept.
pub fn inverted(img: &ImageRgba) -> ImageRgba {
    img.map(|px| [1.0 - px[0], 1.0 - px[1], 1.0 - px[2], px[3]])
}
