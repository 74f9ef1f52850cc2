//! Binary vessel mask from the vesselness field, its overlay on the input
//! frame and the centred approval window check.
use crate::error::Error;
use crate::image::{fill_rows, Image, ImageF32, ImageRgb, ImageRgba, ImageView};
use serde::{Deserialize, Serialize};

/// Default vesselness threshold for [`segment`].
pub const DEFAULT_SEGMENTATION_THRESHOLD: f32 = 0.01;

/// `true` where `v > threshold`.
pub fn segment(v: &ImageF32, threshold: f32) -> Image<bool> {
    let mut mask = Image::<bool>::new(v.w, v.h);
    fill_rows(&mut mask, |y, row| {
        for (m, &s) in row.iter_mut().zip(v.row(y)) {
            *m = s > threshold;
        }
    });
    mask
}

/// Input RGB with masked pixels painted white.
pub fn overlay(input: &ImageRgba, mask: &Image<bool>) -> Result<ImageRgb, Error> {
    if input.dims() != mask.dims() {
        return Err(Error::DimensionMismatch {
            expected: input.dims(),
            actual: mask.dims(),
        });
    }
    let mut out = ImageRgb::new(input.w, input.h);
    fill_rows(&mut out, |y, row| {
        for ((o, px), &m) in row.iter_mut().zip(input.row(y)).zip(mask.row(y)) {
            let add = if m { 1.0 } else { 0.0 };
            *o = [
                (px[0] + add).clamp(0.0, 1.0),
                (px[1] + add).clamp(0.0, 1.0),
                (px[2] + add).clamp(0.0, 1.0),
            ];
        }
    });
    Ok(out)
}

/// Centred region that must be sufficiently covered by the mask.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalWindow {
    /// Window width in pixels (clipped to the frame)
    pub width: usize,
    /// Window height in pixels (clipped to the frame)
    pub height: usize,
    /// Minimum covered fraction for approval
    pub min_ratio: f32,
}

impl Default for ApprovalWindow {
    fn default() -> Self {
        Self {
            width: 200,
            height: 100,
            min_ratio: 0.5,
        }
    }
}

/// Outcome of [`ApprovalWindow::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub ratio: f32,
    pub approved: bool,
}

impl ApprovalWindow {
    /// `(x0, y0, x1, y1)` of the window in a `w × h` frame, half-open.
    pub fn bounds(&self, w: usize, h: usize) -> (usize, usize, usize, usize) {
        let ww = self.width.min(w);
        let wh = self.height.min(h);
        let x0 = (w - ww) / 2;
        let y0 = (h - wh) / 2;
        (x0, y0, x0 + ww, y0 + wh)
    }

    pub fn evaluate(&self, mask: &Image<bool>) -> Approval {
        let (x0, y0, x1, y1) = self.bounds(mask.w, mask.h);
        let area = (x1 - x0) * (y1 - y0);
        if area == 0 {
            return Approval {
                ratio: 0.0,
                approved: false,
            };
        }
        let covered: usize = (y0..y1)
            .map(|y| mask.row(y)[x0..x1].iter().filter(|&&m| m).count())
            .sum();
        let ratio = covered as f32 / area as f32;
        Approval {
            ratio,
            approved: ratio >= self.min_ratio,
        }
    }
}
