//! First and second derivatives of the smoothed luminance field.
//!
//! The gradient stage supports two strategies (Sobel or central differences);
//! one is picked per filter via [`GradientStrategy`] and applied to both axes.
//! The Hessian stage always central-differences the gradient components.
//!
//! Derivatives are taken with respect to a sample spacing `h`. The default
//! [`DerivativeScale::Normalized`] uses `h = 1/width` along x and
//! `h = 1/height` along y (texture coordinates), so the eigenvalue magnitudes
//! and therefore the `c` parameter are resolution dependent.

pub mod gradient;
pub mod hessian;

pub use gradient::{gradients, gradients_into, Gradient, GradientField};
pub use hessian::{hessian, hessian_into, Hessian, HessianField};

use serde::{Deserialize, Serialize};

/// First-derivative estimator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientStrategy {
    /// 3×3 Sobel pair normalised by 8.
    #[default]
    Sobel,
    /// `(I(x+1) - I(x-1)) / 2h`.
    CentralDifference,
}

/// Sample spacing used by both derivative stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivativeScale {
    /// `hx = 1/width`, `hy = 1/height`.
    #[default]
    Normalized,
    /// `hx = hy = 1`.
    Pixel,
}

impl DerivativeScale {
    /// `(hx, hy)` for a `w × h` grid.
    pub fn spacing(&self, w: usize, h: usize) -> (f32, f32) {
        match self {
            Self::Normalized => (1.0 / w.max(1) as f32, 1.0 / h.max(1) as f32),
            Self::Pixel => (1.0, 1.0),
        }
    }
}
