//! Contrast-limited adaptive histogram equalisation (CLAHE).
//!
//! The frame is split into a `tiles × tiles` grid. Each tile gets its own
//! clipped, equalised 256-bin histogram and pixels are mapped through a
//! bilinear blend of the four nearest tile curves. [`Clahe::apply`] repeats
//! the pass until the frame reaches a target contrast, raising the clip limit
//! while the frame stays far below it.
use crate::image::{clamp_index, fill_rows, ImageF32, ImageView};
use log::trace;
use serde::{Deserialize, Serialize};

const BINS: usize = 256;

/// Upper bound the clip limit may grow to.
pub const MAX_CLIP_LIMIT: f32 = 4.0;
/// Factor applied to the clip limit after a pass that lands below half the target.
pub const CLIP_GROWTH: f32 = 1.2;
/// Guard added to the mean in [`contrast_ratio`].
pub const CONTRAST_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Clahe {
    /// Histogram clip limit, relative to a flat histogram of the tile.
    pub clip_limit: f32,
    /// Tiles per axis (clamped to the frame size).
    pub tiles: usize,
    /// Upper bound on equalisation passes.
    pub max_iterations: usize,
    /// Stop once [`contrast_ratio`] reaches this value.
    pub target_contrast: f32,
}

impl Default for Clahe {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles: 6,
            max_iterations: 2,
            target_contrast: 0.3,
        }
    }
}

/// What [`Clahe::apply`] did to a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClaheOutcome {
    /// Passes run (0 only when `max_iterations` is 0).
    pub iterations: usize,
    /// Clip limit after the last adjustment.
    pub clip_limit: f32,
    /// Contrast of the frame on return.
    pub contrast: f32,
}

impl Clahe {
    /// Equalise `img` in place, at most `max_iterations` times.
    pub fn apply(&self, img: &mut ImageF32) -> ClaheOutcome {
        let mut clip = self.clip_limit;
        let mut contrast = contrast_ratio(img);
        let mut iterations = 0;
        while iterations < self.max_iterations {
            equalize_in_place(img, self.tiles, clip);
            iterations += 1;
            contrast = contrast_ratio(img);
            trace!("clahe pass {iterations}: contrast {contrast:.4} clip {clip:.3}");
            if contrast >= self.target_contrast {
                break;
            }
            clip = next_clip_limit(clip, contrast, self.target_contrast);
        }
        ClaheOutcome {
            iterations,
            clip_limit: clip,
            contrast,
        }
    }
}

/// Clip limit for the next pass: grown by [`CLIP_GROWTH`] (capped at
/// [`MAX_CLIP_LIMIT`]) when `contrast` is below half of `target`.
pub fn next_clip_limit(clip: f32, contrast: f32, target: f32) -> f32 {
    if contrast < 0.5 * target {
        (clip * CLIP_GROWTH).min(MAX_CLIP_LIMIT)
    } else {
        clip
    }
}

/// `std / (mean + eps)` over every pixel.
pub fn contrast_ratio(img: &ImageF32) -> f32 {
    let n = (img.w * img.h) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let (sum, sum_sq) = img.rows().flatten().fold((0.0f64, 0.0f64), |(s, sq), &v| {
        let v = v as f64;
        (s + v, sq + v * v)
    });
    let mean = sum / n;
    let var = (sum_sq / n - mean * mean).max(0.0);
    (var.sqrt() / (mean + CONTRAST_EPSILON as f64)) as f32
}

#[inline]
fn bin_of(v: f32) -> usize {
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    (v * (BINS - 1) as f32).round() as usize
}

/// Equalisation curve of one tile: clipped histogram, excess spread evenly.
fn tile_curve(img: &ImageF32, xs: (usize, usize), ys: (usize, usize), clip_limit: f32) -> [f32; BINS] {
    let mut hist = [0usize; BINS];
    for y in ys.0..ys.1 {
        for &v in &img.row(y)[xs.0..xs.1] {
            hist[bin_of(v)] += 1;
        }
    }
    let area = (xs.1 - xs.0) * (ys.1 - ys.0);
    let limit = ((clip_limit * area as f32 / BINS as f32) as usize).max(1);

    let mut excess = 0;
    for h in hist.iter_mut() {
        if *h > limit {
            excess += *h - limit;
            *h = limit;
        }
    }
    let share = excess / BINS;
    let remainder = excess % BINS;
    for (i, h) in hist.iter_mut().enumerate() {
        *h += share + usize::from(i < remainder);
    }

    let mut curve = [0.0f32; BINS];
    let mut cdf = 0;
    for (c, &h) in curve.iter_mut().zip(&hist) {
        cdf += h;
        *c = cdf as f32 / area as f32;
    }
    curve
}

/// `(lower, upper, weight of upper)` for interpolating between tile centres.
#[inline]
fn neighbours(pos: usize, tile_size: f32, tiles: usize) -> (usize, usize, f32) {
    let f = (pos as f32 + 0.5) / tile_size - 0.5;
    let fl = f.floor();
    let i = fl as isize;
    (clamp_index(i, tiles), clamp_index(i + 1, tiles), f - fl)
}

/// One CLAHE pass over `img` with a `tiles × tiles` grid.
pub fn equalize_in_place(img: &mut ImageF32, tiles: usize, clip_limit: f32) {
    let (w, h) = img.dims();
    if w == 0 || h == 0 {
        return;
    }
    let nx = tiles.clamp(1, w);
    let ny = tiles.clamp(1, h);

    let mut curves = Vec::with_capacity(nx * ny);
    for ty in 0..ny {
        for tx in 0..nx {
            let xs = (tx * w / nx, (tx + 1) * w / nx);
            let ys = (ty * h / ny, (ty + 1) * h / ny);
            curves.push(tile_curve(img, xs, ys, clip_limit));
        }
    }

    let src = img.clone();
    let tile_w = w as f32 / nx as f32;
    let tile_h = h as f32 / ny as f32;
    fill_rows(img, |y, out| {
        let (ty0, ty1, ay) = neighbours(y, tile_h, ny);
        for (x, (o, &v)) in out.iter_mut().zip(src.row(y)).enumerate() {
            let (tx0, tx1, ax) = neighbours(x, tile_w, nx);
            let b = bin_of(v);
            let top = curves[ty0 * nx + tx0][b] * (1.0 - ax) + curves[ty0 * nx + tx1][b] * ax;
            let bottom = curves[ty1 * nx + tx0][b] * (1.0 - ax) + curves[ty1 * nx + tx1][b] * ax;
            *o = top * (1.0 - ay) + bottom * ay;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 8x4 frame, left half `lo`, right half `hi`.
    fn two_level(lo: f32, hi: f32) -> ImageF32 {
        let mut img = ImageF32::filled(8, 4, lo);
        for y in 0..4 {
            for x in 4..8 {
                img.set(x, y, hi);
            }
        }
        img
    }

    #[test]
    fn contrast_is_std_over_mean() {
        let img = two_level(0.4, 0.6);
        assert!((contrast_ratio(&img) - 0.2).abs() < 1e-5);
        assert_eq!(contrast_ratio(&ImageF32::filled(3, 3, 0.7)), 0.0);
        assert!(contrast_ratio(&ImageF32::new(3, 3)).is_finite());
    }

    #[test]
    fn unclipped_single_tile_is_plain_equalisation() {
        let mut img = two_level(0.4, 0.6);
        equalize_in_place(&mut img, 1, 1000.0);
        assert!((img.get(0, 0) - 0.5).abs() < 1e-6);
        assert!((img.get(7, 3) - 1.0).abs() < 1e-6);
        assert!((contrast_ratio(&img) - 1.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn uniform_frame_stays_uniform() {
        let mut img = ImageF32::filled(12, 9, 0.3);
        equalize_in_place(&mut img, 6, 2.0);
        let first = img.get(0, 0);
        assert!(img.data.iter().all(|&v| (v - first).abs() < 1e-6));
        assert!((0.0..=1.0).contains(&first));
    }

    #[test]
    fn stops_once_the_target_is_reached() {
        let clahe = Clahe {
            clip_limit: 1000.0,
            tiles: 1,
            max_iterations: 5,
            target_contrast: 0.3,
        };
        let mut img = two_level(0.4, 0.6);
        let outcome = clahe.apply(&mut img);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.clip_limit, 1000.0);
        assert!(outcome.contrast >= 0.3);
    }

    #[test]
    fn unreachable_target_runs_every_pass_and_grows_the_clip() {
        // a clip this tight flattens the halves to ~0.97 / 1.0
        let clahe = Clahe {
            clip_limit: 2.0,
            tiles: 1,
            max_iterations: 3,
            target_contrast: 0.9,
        };
        let mut img = two_level(0.4, 0.6);
        let outcome = clahe.apply(&mut img);
        assert_eq!(outcome.iterations, 3);
        assert!(outcome.contrast < 0.45);
        assert!((outcome.clip_limit - 2.0 * 1.2f32.powi(3)).abs() < 1e-5);
    }

    #[test]
    fn zero_iterations_leave_the_frame_alone() {
        let clahe = Clahe {
            max_iterations: 0,
            ..Clahe::default()
        };
        let mut img = two_level(0.4, 0.6);
        let before = img.clone();
        let outcome = clahe.apply(&mut img);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(img, before);
    }

    #[test]
    fn clip_grows_only_far_below_target() {
        // 0.2 is above half of 0.3: unchanged
        assert_eq!(next_clip_limit(2.0, 0.2, 0.3), 2.0);
        assert!((next_clip_limit(2.0, 0.1, 0.3) - 2.4).abs() < 1e-6);
        assert_eq!(next_clip_limit(3.8, 0.0, 0.3), MAX_CLIP_LIMIT);
    }
}
