//! Response mapper: vesselness → display colour.
//!
//! The response is clamped to `[0, 1]`, shaped by a monotonic
//! [`ContrastCurve`] and then coloured according to a [`DisplayMode`]. The
//! mapping is pure and depends only on the sample value.
use crate::error::Error;
use crate::image::{fill_rows, ImageF32, ImageRgb, ImageView};
use serde::{Deserialize, Serialize};

/// Output colouring of the vesselness field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// `(v, v, v)`
    #[default]
    Grayscale,
    /// Black → blue → teal-green → yellow → white.
    Heatmap,
    /// Warm tint `(v, 0.8 v, 0.4 v)`.
    TintedGradient,
}

impl DisplayMode {
    /// Map the numeric mode index used by front ends (0, 1, 2).
    pub fn from_index(index: u32) -> Result<Self, Error> {
        match index {
            0 => Ok(Self::Grayscale),
            1 => Ok(Self::Heatmap),
            2 => Ok(Self::TintedGradient),
            other => Err(Error::InvalidDisplayMode(other)),
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            Self::Grayscale => 0,
            Self::Heatmap => 1,
            Self::TintedGradient => 2,
        }
    }
}

/// Monotonic shaping applied before colouring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContrastCurve {
    /// `v²`, suppresses faint responses.
    #[default]
    Square,
    /// `v² (3 - 2v)`
    Smoothstep,
    Linear,
}

const HEATMAP_STOPS: [(f32, [f32; 3]); 5] = [
    (0.0, [0.0, 0.0, 0.0]),
    (0.25, [0.0, 0.0, 1.0]),
    (0.5, [0.0, 1.0, 0.5]),
    (0.75, [1.0, 1.0, 0.0]),
    (1.0, [1.0, 1.0, 1.0]),
];

/// Clamp `v` to `[0, 1]` and apply `curve`. NaN maps to 0.
#[inline]
pub fn shape(v: f32, curve: ContrastCurve) -> f32 {
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    match curve {
        ContrastCurve::Square => v * v,
        ContrastCurve::Smoothstep => v * v * (3.0 - 2.0 * v),
        ContrastCurve::Linear => v,
    }
}

fn heatmap(t: f32) -> [f32; 3] {
    for pair in HEATMAP_STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = ((t - t0) / (t1 - t0)).clamp(0.0, 1.0);
            return [
                c0[0] + (c1[0] - c0[0]) * f,
                c0[1] + (c1[1] - c0[1]) * f,
                c0[2] + (c1[2] - c0[2]) * f,
            ];
        }
    }
    HEATMAP_STOPS[HEATMAP_STOPS.len() - 1].1
}

/// Colour for one raw response value.
#[inline]
pub fn colorize_value(v: f32, mode: DisplayMode, curve: ContrastCurve) -> [f32; 3] {
    let t = shape(v, curve);
    match mode {
        DisplayMode::Grayscale => [t, t, t],
        DisplayMode::Heatmap => heatmap(t),
        DisplayMode::TintedGradient => [t, 0.8 * t, 0.4 * t],
    }
}

/// Colour a vesselness field with the default [`ContrastCurve`].
pub fn map_to_color(v: &ImageF32, mode: DisplayMode) -> ImageRgb {
    map_to_color_with(v, mode, ContrastCurve::default())
}

pub fn map_to_color_with(v: &ImageF32, mode: DisplayMode, curve: ContrastCurve) -> ImageRgb {
    let mut out = ImageRgb::new(v.w, v.h);
    fill_rows(&mut out, |y, row| {
        for (o, &s) in row.iter_mut().zip(v.row(y)) {
            *o = colorize_value(s, mode, curve);
        }
    });
    out
}
