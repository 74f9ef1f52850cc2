//! First-order derivatives of the smoothed luminance field.
//!
//! - Sobel: 3×3 kernel pair, normalised by 8 so it estimates a per-sample
//!   derivative, with extra smoothing orthogonal to the derivative axis.
//! - Central difference: `(I(x+1) - I(x-1)) / 2h`.
//!
//! Both divide by the sample spacing `h` of the chosen [`DerivativeScale`].
//! Borders clamp to the edge. The output carries the smoothed value through
//! so the field can be reused downstream.
use super::{DerivativeScale, GradientStrategy};
use crate::image::{clamp_index, fill_rows, Image, ImageF32, ImageView};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];
const SOBEL_NORM: f32 = 1.0 / 8.0;

/// Per-pixel gradient sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gradient {
    /// ∂I/∂x
    pub fx: f32,
    /// ∂I/∂y (y grows downwards)
    pub fy: f32,
    /// Smoothed luminance at the pixel
    pub value: f32,
}

impl Gradient {
    #[inline]
    pub fn magnitude(&self) -> f32 {
        (self.fx * self.fx + self.fy * self.fy).sqrt()
    }
}

pub type GradientField = Image<Gradient>;

/// Estimate `(fx, fy)` for every pixel of `src` into `dst`.
pub fn gradients_into(
    src: &ImageF32,
    strategy: GradientStrategy,
    scale: DerivativeScale,
    dst: &mut GradientField,
) {
    debug_assert_eq!(src.dims(), dst.dims());
    let (w, h) = src.dims();
    if w == 0 || h == 0 {
        return;
    }
    let (hx, hy) = scale.spacing(w, h);
    match strategy {
        GradientStrategy::Sobel => {
            let inv_x = SOBEL_NORM / hx;
            let inv_y = SOBEL_NORM / hy;
            fill_rows(dst, |y, out| {
                let rows = [
                    src.row(y.saturating_sub(1)),
                    src.row(y),
                    src.row((y + 1).min(h - 1)),
                ];
                for (x, o) in out.iter_mut().enumerate() {
                    let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
                    let mut sum_x = 0.0;
                    let mut sum_y = 0.0;
                    for (ky, yy_row) in rows.iter().enumerate() {
                        let kx_row = &SOBEL_KERNEL_X[ky];
                        let ky_row = &SOBEL_KERNEL_Y[ky];
                        sum_x += yy_row[x_idx[0]] * kx_row[0]
                            + yy_row[x_idx[1]] * kx_row[1]
                            + yy_row[x_idx[2]] * kx_row[2];
                        sum_y += yy_row[x_idx[0]] * ky_row[0]
                            + yy_row[x_idx[1]] * ky_row[1]
                            + yy_row[x_idx[2]] * ky_row[2];
                    }
                    *o = Gradient {
                        fx: sum_x * inv_x,
                        fy: sum_y * inv_y,
                        value: rows[1][x],
                    };
                }
            });
        }
        GradientStrategy::CentralDifference => {
            let inv_x = 0.5 / hx;
            let inv_y = 0.5 / hy;
            fill_rows(dst, |y, out| {
                let up = src.row(clamp_index(y as isize - 1, h));
                let mid = src.row(y);
                let down = src.row(clamp_index(y as isize + 1, h));
                for (x, o) in out.iter_mut().enumerate() {
                    let xl = clamp_index(x as isize - 1, w);
                    let xr = clamp_index(x as isize + 1, w);
                    *o = Gradient {
                        fx: (mid[xr] - mid[xl]) * inv_x,
                        fy: (down[x] - up[x]) * inv_y,
                        value: mid[x],
                    };
                }
            });
        }
    }
}

/// Allocating convenience wrapper around [`gradients_into`].
pub fn gradients(src: &ImageF32, strategy: GradientStrategy, scale: DerivativeScale) -> GradientField {
    let mut out = GradientField::new(src.w, src.h);
    gradients_into(src, strategy, scale, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize, ax: f32, ay: f32) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set(x, y, ax * x as f32 + ay * y as f32);
            }
        }
        img
    }

    #[test]
    fn linear_ramp_gives_its_slope_in_the_interior() {
        let img = ramp(16, 12, 0.5, -0.25);
        for strategy in [GradientStrategy::Sobel, GradientStrategy::CentralDifference] {
            let g = gradients(&img, strategy, DerivativeScale::Pixel);
            for y in 1..11 {
                for x in 1..15 {
                    let s = g.get(x, y);
                    assert!((s.fx - 0.5).abs() < 1e-5, "{strategy:?} fx={}", s.fx);
                    assert!((s.fy + 0.25).abs() < 1e-5, "{strategy:?} fy={}", s.fy);
                    assert_eq!(s.value, img.get(x, y));
                }
            }
        }
    }

    #[test]
    fn normalized_spacing_scales_by_resolution() {
        let img = ramp(32, 16, 0.01, 0.02);
        let px = gradients(&img, GradientStrategy::CentralDifference, DerivativeScale::Pixel);
        let nz = gradients(&img, GradientStrategy::CentralDifference, DerivativeScale::Normalized);
        let (a, b) = (px.get(10, 8), nz.get(10, 8));
        assert!((b.fx - a.fx * 32.0).abs() < 1e-4);
        assert!((b.fy - a.fy * 16.0).abs() < 1e-4);
    }

    #[test]
    fn constant_field_has_zero_gradient_everywhere() {
        let img = ImageF32::filled(9, 7, 0.4);
        for strategy in [GradientStrategy::Sobel, GradientStrategy::CentralDifference] {
            let g = gradients(&img, strategy, DerivativeScale::Normalized);
            assert!(g.data.iter().all(|s| s.fx == 0.0 && s.fy == 0.0));
        }
    }

    #[test]
    fn border_uses_one_sided_clamped_difference() {
        let img = ramp(5, 1, 1.0, 0.0);
        let g = gradients(&img, GradientStrategy::CentralDifference, DerivativeScale::Pixel);
        // x = 0: (I(1) - I(0)) / 2
        assert!((g.get(0, 0).fx - 0.5).abs() < 1e-6);
        assert_eq!(g.get(0, 0).fy, 0.0);
    }
}
