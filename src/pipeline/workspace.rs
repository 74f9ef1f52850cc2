//! Stage buffers owned by a [`VesselnessFilter`](crate::VesselnessFilter).
//!
//! Every buffer is allocated once at the working resolution and overwritten
//! each frame. Each stage writes exactly one field and reads its
//! predecessor's, so the borrow checker rules out read/write aliasing.
use crate::derivatives::{GradientField, HessianField};
use crate::eigen::EigenField;
use crate::image::{fill_rows, Image, ImageF32, ImageView};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Intermediate stage rendered by [`Workspace::preview`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageView {
    /// Reducer output, before any preprocessing.
    Grayscale,
    Preprocessed,
    Blurred,
    GradientMagnitude,
    /// `|fxx| + |fyy|`
    Hessian,
    /// `|l2|`
    Eigenvalues,
    Vesselness,
    Orientation,
}

impl StageView {
    pub const ALL: [StageView; 8] = [
        Self::Grayscale,
        Self::Preprocessed,
        Self::Blurred,
        Self::GradientMagnitude,
        Self::Hessian,
        Self::Eigenvalues,
        Self::Vesselness,
        Self::Orientation,
    ];

    /// File-name friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Preprocessed => "preprocessed",
            Self::Blurred => "blurred",
            Self::GradientMagnitude => "gradient_magnitude",
            Self::Hessian => "hessian",
            Self::Eigenvalues => "eigenvalues",
            Self::Vesselness => "vesselness",
            Self::Orientation => "orientation",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Workspace {
    pub(crate) gray: ImageF32,
    pub(crate) preprocessed: ImageF32,
    pub(crate) blur_x: ImageF32,
    pub(crate) blur_y: ImageF32,
    pub(crate) gradient: GradientField,
    pub(crate) hessian: HessianField,
    pub(crate) eigen: EigenField,
    pub(crate) vesselness: ImageF32,
    pub(crate) orientation: ImageF32,
}

impl Workspace {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            gray: ImageF32::new(w, h),
            preprocessed: ImageF32::new(w, h),
            blur_x: ImageF32::new(w, h),
            blur_y: ImageF32::new(w, h),
            gradient: GradientField::new(w, h),
            hessian: HessianField::new(w, h),
            eigen: EigenField::new(w, h),
            vesselness: ImageF32::new(w, h),
            orientation: ImageF32::new(w, h),
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        self.gray.dims()
    }

    /// Luminance straight out of the reducer.
    pub fn grayscale(&self) -> &ImageF32 {
        &self.gray
    }

    /// Luminance after preprocessing (equals [`Self::grayscale`] when disabled).
    pub fn preprocessed(&self) -> &ImageF32 {
        &self.preprocessed
    }

    /// Output of the X blur pass.
    pub fn blur_x(&self) -> &ImageF32 {
        &self.blur_x
    }

    /// Fully smoothed field.
    pub fn blurred(&self) -> &ImageF32 {
        &self.blur_y
    }

    pub fn gradient(&self) -> &GradientField {
        &self.gradient
    }

    pub fn hessian(&self) -> &HessianField {
        &self.hessian
    }

    pub fn eigen(&self) -> &EigenField {
        &self.eigen
    }

    pub fn vesselness(&self) -> &ImageF32 {
        &self.vesselness
    }

    /// Vessel direction in `[0, π)`.
    pub fn orientation(&self) -> &ImageF32 {
        &self.orientation
    }

    /// Render one stage into `[0, 1]` for inspection.
    ///
    /// Luminance, vesselness and orientation have a known range and are
    /// mapped directly; derivative stages are scaled by their largest
    /// magnitude in the frame.
    pub fn preview(&self, view: StageView) -> ImageF32 {
        match view {
            StageView::Grayscale => self.gray.clone(),
            StageView::Preprocessed => self.preprocessed.clone(),
            StageView::Blurred => self.blur_y.clone(),
            StageView::Vesselness => self.vesselness.clone(),
            StageView::Orientation => self.orientation.map(|a| a / PI),
            StageView::GradientMagnitude => auto_gain(&self.gradient, |g| g.magnitude()),
            StageView::Hessian => auto_gain(&self.hessian, |hs| hs.fxx.abs() + hs.fyy.abs()),
            StageView::Eigenvalues => auto_gain(&self.eigen, |p| p.l2.abs()),
        }
    }
}

fn auto_gain<T, F>(src: &Image<T>, f: F) -> ImageF32
where
    T: Copy + Sync,
    F: Fn(&T) -> f32 + Sync + Send,
{
    let peak = src
        .data
        .iter()
        .map(&f)
        .filter(|v| v.is_finite())
        .fold(0.0f32, f32::max);
    let gain = if peak > 0.0 { 1.0 / peak } else { 0.0 };
    let mut out = ImageF32::new(src.w, src.h);
    fill_rows(&mut out, |y, row| {
        for (o, s) in row.iter_mut().zip(src.row(y)) {
            let v = f(s) * gain;
            *o = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        }
    });
    out
}
