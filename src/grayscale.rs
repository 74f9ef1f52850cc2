//! RGB(A) → luminance reduction (ITU-R BT.601 weights).
//!
//! Later stages read a single-channel grid; [`ImageRgba::from_luma`] turns
//! it back into a replicated RGBA frame when one is needed.
use crate::image::{fill_rows, ImageF32, ImageRgba, ImageView};

pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

/// Luminance of one RGB(A) sample. Alpha is ignored.
#[inline]
pub fn luma(px: [f32; 4]) -> f32 {
    LUMA_R * px[0] + LUMA_G * px[1] + LUMA_B * px[2]
}

/// Reduce `src` into the pre-allocated `dst` (same dimensions).
pub fn grayscale_into(src: &ImageRgba, dst: &mut ImageF32) {
    debug_assert_eq!(src.dims(), dst.dims());
    fill_rows(dst, |y, out| {
        for (o, &px) in out.iter_mut().zip(src.row(y)) {
            *o = luma(px);
        }
    });
}

/// Allocating convenience wrapper around [`grayscale_into`].
pub fn grayscale(src: &ImageRgba) -> ImageF32 {
    let mut out = ImageF32::new(src.w, src.h);
    grayscale_into(src, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        assert!((luma([1.0, 1.0, 1.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn primaries_map_to_their_weights() {
        let img = ImageRgba::from_vec(
            3,
            1,
            vec![
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
            ],
        )
        .unwrap();
        let gray = grayscale(&img);
        assert!((gray.get(0, 0) - LUMA_R).abs() < 1e-7);
        assert!((gray.get(1, 0) - LUMA_G).abs() < 1e-7);
        assert!((gray.get(2, 0) - LUMA_B).abs() < 1e-7);
    }
}
