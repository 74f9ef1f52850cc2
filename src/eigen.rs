//! Closed-form eigen-decomposition of the symmetric 2×2 Hessian.
//!
//! Convention: the smaller-magnitude eigenvalue comes first,
//! `|l1| <= |l2|`. On a bright line `l1` measures curvature along the line
//! (≈ 0) and `l2` curvature across it (strongly negative). The vesselness
//! scorer depends on this ordering.
use crate::derivatives::{Hessian, HessianField};
use crate::image::{fill_rows, Image, ImageF32, ImageView};
use std::f32::consts::PI;

/// Eigenvalues of one Hessian sample, ordered by magnitude.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EigenPair {
    /// Smaller-magnitude eigenvalue
    pub l1: f32,
    /// Larger-magnitude eigenvalue
    pub l2: f32,
}

impl EigenPair {
    /// `|l1| <= |l2|`.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.l1.abs() <= self.l2.abs()
    }
}

pub type EigenField = Image<EigenPair>;

/// Eigenvalues of `[[fxx, fxy], [fxy, fyy]]`.
///
/// The discriminant is clamped at zero before the square root; cancellation
/// can push it slightly negative for near-isotropic samples.
#[inline]
pub fn solve_symmetric_2x2(hs: &Hessian) -> EigenPair {
    let trace = hs.trace();
    let det = hs.det();
    let disc = (trace * trace - 4.0 * det).max(0.0);
    let root = disc.sqrt();
    let mut l1 = 0.5 * (trace + root);
    let mut l2 = 0.5 * (trace - root);
    if l1.abs() > l2.abs() {
        std::mem::swap(&mut l1, &mut l2);
    }
    let pair = EigenPair { l1, l2 };
    debug_assert!(
        pair.is_ordered() || !(l1.is_finite() && l2.is_finite()),
        "eigen ordering violated: {pair:?}"
    );
    pair
}

/// Direction of the `l1` eigenvector (along the vessel) in `[0, π)`.
///
/// Isotropic samples (both eigenvector candidates vanish) report 0.
pub fn vessel_direction(hs: &Hessian, pair: &EigenPair) -> f32 {
    // (A - l1 I) v = 0 → v ∝ (fxy, l1 - fxx) or (l1 - fyy, fxy)
    let a = (hs.fxy, pair.l1 - hs.fxx);
    let b = (pair.l1 - hs.fyy, hs.fxy);
    let na = a.0 * a.0 + a.1 * a.1;
    let nb = b.0 * b.0 + b.1 * b.1;
    let (vx, vy) = if na >= nb { a } else { b };
    if na.max(nb) <= f32::MIN_POSITIVE {
        return 0.0;
    }
    let theta = vy.atan2(vx).rem_euclid(PI);
    // rem_euclid can round up to exactly PI
    if theta >= PI {
        0.0
    } else {
        theta
    }
}

/// Solve every pixel of `src` into `dst`.
pub fn eigen_into(src: &HessianField, dst: &mut EigenField) {
    debug_assert_eq!(src.dims(), dst.dims());
    fill_rows(dst, |y, out| {
        for (o, hs) in out.iter_mut().zip(src.row(y)) {
            *o = solve_symmetric_2x2(hs);
        }
    });
}

/// Per-pixel vessel direction from the Hessian and its eigenvalues.
pub fn orientation_into(hessian: &HessianField, eigen: &EigenField, dst: &mut ImageF32) {
    debug_assert_eq!(hessian.dims(), dst.dims());
    debug_assert_eq!(eigen.dims(), dst.dims());
    fill_rows(dst, |y, out| {
        for ((o, hs), pair) in out.iter_mut().zip(hessian.row(y)).zip(eigen.row(y)) {
            *o = vessel_direction(hs, pair);
        }
    });
}
