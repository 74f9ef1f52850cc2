//! Diagnostics returned alongside the vesselness field.
//!
//! [`FrameReport`] is the entry point: it carries the response grid and a
//! [`PipelineTrace`] with the frame's parameters, effective `c`, per-stage
//! timings and a [`ResponseSummary`]. Everything except the grid serialises
//! to camelCase JSON.

pub mod pipeline;
pub mod response;
pub mod timing;

pub use pipeline::{FrameReport, InputDescriptor, PipelineTrace};
pub use response::ResponseSummary;
pub use timing::{StageTiming, TimingBreakdown};
