//! Separable Gaussian smoothing (X pass then Y pass).
//!
//! The kernel is sampled from `exp(-i^2 / 2 sigma^2)` over `[-R, R]` and
//! renormalised, so a constant field passes through unchanged for any sigma.
//! `R` follows a [`KernelRadius`] policy (sigma-scaled by default). Samples
//! outside the grid clamp to the edge.
//!
//! Each pass reads one buffer and writes another; the pipeline keeps the
//! intermediate in its own workspace buffer.

pub mod kernel;
pub mod separable;

pub use kernel::{GaussianKernel, KernelRadius, SeparableFilter};
pub use separable::{blur, blur_x_into, blur_y_into};
