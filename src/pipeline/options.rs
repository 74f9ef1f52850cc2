//! Build-time strategy choices of a [`VesselnessFilter`](crate::VesselnessFilter).
//!
//! Options are fixed for the filter's lifetime; per-frame knobs live in
//! [`FilterParams`](super::FilterParams).
use crate::colormap::ContrastCurve;
use crate::derivatives::{DerivativeScale, GradientStrategy};
use crate::preprocess::Preprocess;
use crate::smoothing::KernelRadius;
use crate::vesselness::{AutoC, Polarity};
use serde::{Deserialize, Serialize};

/// Whether an unchanged frame is recomputed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputePolicy {
    /// Run every stage for every frame.
    #[default]
    Always,
    /// Skip the stages when the input pixels and parameters hash to the
    /// previous frame's fingerprint.
    ReuseUnchanged,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub gradient: GradientStrategy,
    pub kernel_radius: KernelRadius,
    pub derivative_scale: DerivativeScale,
    pub polarity: Polarity,
    pub contrast_curve: ContrastCurve,
    pub preprocess: Preprocess,
    /// Derive `c` from each frame instead of using `FilterParams::c`.
    pub auto_c: Option<AutoC>,
    pub recompute: RecomputePolicy,
}

impl PipelineOptions {
    pub fn with_gradient(mut self, gradient: GradientStrategy) -> Self {
        self.gradient = gradient;
        self
    }

    pub fn with_kernel_radius(mut self, kernel_radius: KernelRadius) -> Self {
        self.kernel_radius = kernel_radius;
        self
    }

    pub fn with_derivative_scale(mut self, scale: DerivativeScale) -> Self {
        self.derivative_scale = scale;
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_contrast_curve(mut self, curve: ContrastCurve) -> Self {
        self.contrast_curve = curve;
        self
    }

    pub fn with_preprocess(mut self, preprocess: Preprocess) -> Self {
        self.preprocess = preprocess;
        self
    }

    pub fn with_auto_c(mut self, auto_c: AutoC) -> Self {
        self.auto_c = Some(auto_c);
        self
    }

    pub fn with_recompute(mut self, recompute: RecomputePolicy) -> Self {
        self.recompute = recompute;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_parse_from_snake_case_json() {
        let json = r#"{
            "gradient": "central_difference",
            "kernel_radius": {"fixed": 7},
            "polarity": "dark",
            "auto_c": {"percentile": 95.0},
            "recompute": "reuse_unchanged"
        }"#;
        let opts: PipelineOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.gradient, GradientStrategy::CentralDifference);
        assert_eq!(opts.kernel_radius, KernelRadius::Fixed(7));
        assert_eq!(opts.polarity, Polarity::Dark);
        assert_eq!(opts.auto_c, Some(AutoC::Percentile(95.0)));
        assert_eq!(opts.recompute, RecomputePolicy::ReuseUnchanged);
        assert_eq!(opts.derivative_scale, DerivativeScale::Normalized);
        assert!(opts.preprocess.is_identity());
    }
}
