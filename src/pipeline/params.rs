//! Per-frame filter parameters.
use crate::colormap::DisplayMode;
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Immutable parameter record passed with every frame.
///
/// - `sigma`: Gaussian scale in pixels; picks the vessel width the filter is
///   tuned to.
/// - `beta`: blob suppression. Smaller values penalise isotropic structure
///   harder.
/// - `c`: structure threshold in derivative units. With the default
///   normalised derivative spacing it grows with the resolution, so a value
///   tuned at 512×512 does not transfer unchanged to other sizes.
/// - `mode`: colouring used by [`VesselnessFilter::colorize`](crate::VesselnessFilter::colorize).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub sigma: f32,
    pub beta: f32,
    pub c: f32,
    pub mode: DisplayMode,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            sigma: 1.5,
            beta: 0.5,
            c: 15.0,
            mode: DisplayMode::Grayscale,
        }
    }
}

impl FilterParams {
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_c(mut self, c: f32) -> Self {
        self.c = c;
        self
    }

    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check that `sigma`, `beta` and `c` are finite and strictly positive.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [("sigma", self.sigma), ("beta", self.beta), ("c", self.c)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}
