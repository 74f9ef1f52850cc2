use super::kernel::SeparableFilter;
use crate::image::{clamp_index, fill_rows, ImageF32, ImageView};

/// Horizontal pass: convolve every row of `src` with `filter` into `dst`.
pub fn blur_x_into<F: SeparableFilter + ?Sized>(src: &ImageF32, filter: &F, dst: &mut ImageF32) {
    debug_assert_eq!(src.dims(), dst.dims());
    let taps = filter.taps();
    let radius = filter.radius() as isize;
    fill_rows(dst, |y, out| {
        filter_row(src.row(y), out, taps, radius);
    });
}

/// Vertical pass: each output row is a weighted sum of clamped source rows.
pub fn blur_y_into<F: SeparableFilter + ?Sized>(src: &ImageF32, filter: &F, dst: &mut ImageF32) {
    debug_assert_eq!(src.dims(), dst.dims());
    let taps = filter.taps();
    let radius = filter.radius() as isize;
    let h = src.h;
    fill_rows(dst, |y, out| {
        out.fill(0.0);
        for (k, &tap) in taps.iter().enumerate() {
            let sy = clamp_index(y as isize + k as isize - radius, h);
            for (o, &s) in out.iter_mut().zip(src.row(sy)) {
                *o += tap * s;
            }
        }
    });
}

/// Two-pass separable blur using a scratch buffer for the intermediate.
pub fn blur<F: SeparableFilter + ?Sized>(src: &ImageF32, filter: &F) -> ImageF32 {
    let mut tmp = ImageF32::new(src.w, src.h);
    let mut out = ImageF32::new(src.w, src.h);
    blur_x_into(src, filter, &mut tmp);
    blur_y_into(&tmp, filter, &mut out);
    out
}

fn filter_row(row: &[f32], out: &mut [f32], taps: &[f32], radius: isize) {
    let len = row.len();
    for (x, dst_px) in out.iter_mut().enumerate() {
        let mut acc = 0.0f32;
        for (k, &tap) in taps.iter().enumerate() {
            let sx = clamp_index(x as isize + k as isize - radius, len);
            acc += tap * row[sx];
        }
        *dst_px = acc;
    }
}
