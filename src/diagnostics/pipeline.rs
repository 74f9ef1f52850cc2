use crate::diagnostics::{ResponseSummary, TimingBreakdown};
use crate::image::ImageF32;
use crate::pipeline::FilterParams;
use serde::Serialize;

/// Result produced by
/// [`VesselnessFilter::process_with_diagnostics`](crate::VesselnessFilter::process_with_diagnostics).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    #[serde(skip)]
    pub vesselness: ImageF32,
    pub trace: PipelineTrace,
}

/// What one frame went through.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub params: FilterParams,
    /// `c` actually used by the scorer (differs from `params.c` under auto-c)
    pub effective_c: f32,
    pub kernel_radius: usize,
    pub timings: TimingBreakdown,
    pub response: ResponseSummary,
    /// Buffers were kept from the previous frame.
    pub reused: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
}

impl PipelineTrace {
    /// One-line human readable summary used by the demo tool.
    pub fn summary_line(&self) -> String {
        format!(
            "{}x{} sigma={:.3} beta={:.3} c={:.4} radius={} max={:.4} mean={:.5} peak=({}, {}) coverage={:.4} total={:.3}ms{}",
            self.input.width,
            self.input.height,
            self.params.sigma,
            self.params.beta,
            self.effective_c,
            self.kernel_radius,
            self.response.max,
            self.response.mean,
            self.response.peak[0],
            self.response.peak[1],
            self.response.nonzero_fraction,
            self.timings.total_ms,
            if self.reused { " (reused)" } else { "" },
        )
    }
}
