use crate::image::{ImageF32, ImageView};
use serde::Serialize;

/// Compact statistics of a vesselness field.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub max: f32,
    pub mean: f32,
    /// Pixel holding `max` (first in row-major order)
    pub peak: [usize; 2],
    /// Fraction of pixels with a strictly positive response
    pub nonzero_fraction: f32,
}

impl ResponseSummary {
    pub fn from_field(v: &ImageF32) -> Self {
        let n = v.w * v.h;
        if n == 0 {
            return Self::default();
        }
        let mut summary = Self::default();
        let mut sum = 0.0f64;
        let mut nonzero = 0usize;
        for (y, row) in v.rows().enumerate() {
            for (x, &s) in row.iter().enumerate() {
                sum += s as f64;
                if s > 0.0 {
                    nonzero += 1;
                }
                if s > summary.max {
                    summary.max = s;
                    summary.peak = [x, y];
                }
            }
        }
        summary.mean = (sum / n as f64) as f32;
        summary.nonzero_fraction = nonzero as f32 / n as f32;
        summary
    }
}
