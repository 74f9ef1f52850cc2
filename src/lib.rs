#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod colormap;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod segmentation;

// Stage internals – public so tools and tests can drive single stages.
pub mod derivatives;
pub mod eigen;
pub mod grayscale;
pub mod preprocess;
pub mod smoothing;
pub mod vesselness;

// Demo tooling configuration.
pub mod config;

// --- High-level re-exports -------------------------------------------------

pub use crate::colormap::{map_to_color, map_to_color_with, ContrastCurve, DisplayMode};
pub use crate::error::Error;
pub use crate::pipeline::{
    compute_vesselness, FilterParams, PipelineOptions, RecomputePolicy, StageView,
    VesselnessFilter, Workspace,
};
pub use crate::vesselness::{AutoC, Polarity};

pub use crate::diagnostics::{FrameReport, PipelineTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use vesselness::prelude::*;
///
/// # fn main() -> Result<(), Error> {
/// let (w, h) = (64usize, 64usize);
/// let bytes = vec![0u8; w * h * 4];
/// let frame = ImageRgba::from_rgba8(w, h, &bytes)?;
///
/// let v = compute_vesselness(&frame, &FilterParams::default())?;
/// let rgb = map_to_color(&v, DisplayMode::Heatmap);
/// println!("{}x{}", rgb.w, rgb.h);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageF32, ImageRgb, ImageRgba};
    pub use crate::{
        compute_vesselness, map_to_color, DisplayMode, Error, FilterParams, PipelineOptions,
        VesselnessFilter,
    };
}

// --- Stage-level API (for tools & advanced users) ---------------------------

pub mod stages {
    pub use crate::colormap::{colorize_value, shape};
    pub use crate::derivatives::{
        gradients_into, hessian_into, DerivativeScale, Gradient, GradientField, GradientStrategy,
        Hessian, HessianField,
    };
    pub use crate::eigen::{eigen_into, orientation_into, solve_symmetric_2x2, EigenField, EigenPair};
    pub use crate::grayscale::{grayscale_into, luma};
    pub use crate::preprocess::{preprocess_into, Clahe, GlobalContrast, Preprocess};
    pub use crate::smoothing::{blur_x_into, blur_y_into, GaussianKernel, KernelRadius, SeparableFilter};
    pub use crate::vesselness::{estimate_c, vesselness_into, vesselness_score};
}
