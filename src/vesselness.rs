//! Frangi vesselness from ordered Hessian eigenvalues.
//!
//! For a candidate pixel
//!
//! ```text
//! Rb = l1 / l2
//! S  = sqrt(l1^2 + l2^2)
//! V  = exp(-Rb^2 / 2 beta^2) * (1 - exp(-S^2 / 2 c^2))
//! ```
//!
//! The first factor rejects blob-like (isotropic) structure, the second
//! rejects structure whose curvature is at noise level. A pixel is a
//! candidate only when the larger-magnitude eigenvalue has the ridge sign of
//! the selected [`Polarity`]; everything else scores 0.
use crate::eigen::{EigenField, EigenPair};
use crate::image::{fill_rows, ImageF32, ImageView};
use log::warn;
use serde::{Deserialize, Serialize};

/// Guard added to `|l2|` in the `Rb` ratio.
pub const RB_EPSILON: f32 = 1e-6;

/// Which ridges count as vessels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Bright structure on a dark background (`l2 < 0`).
    #[default]
    Bright,
    /// Dark structure on a bright background (`l2 > 0`).
    Dark,
}

impl Polarity {
    #[inline]
    pub fn accepts(&self, l2: f32) -> bool {
        match self {
            Self::Bright => l2 < 0.0,
            Self::Dark => l2 > 0.0,
        }
    }
}

/// Data-driven choice of `c` from the frame's structure strengths.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoC {
    /// Half of the largest `S` in the frame.
    HalfMaxNorm,
    /// Half of `S` at the given percentile of `S^2` (0..=100).
    Percentile(f32),
}

/// Score one eigenvalue pair. `beta` and `c` must be positive.
#[inline]
pub fn vesselness_score(pair: EigenPair, beta: f32, c: f32, polarity: Polarity) -> f32 {
    let EigenPair { l1, l2 } = pair;
    if !polarity.accepts(l2) {
        return 0.0;
    }
    // epsilon pushes the denominator away from zero on l2's side
    let rb = l1 / (l2 + RB_EPSILON.copysign(l2));
    let s2 = l1 * l1 + l2 * l2;
    let blob_term = (-(rb * rb) / (2.0 * beta * beta)).exp();
    let structure_term = 1.0 - (-s2 / (2.0 * c * c)).exp();
    let v = blob_term * structure_term;
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Score every pixel of `eigen` into `dst`.
pub fn vesselness_into(eigen: &EigenField, beta: f32, c: f32, polarity: Polarity, dst: &mut ImageF32) {
    debug_assert_eq!(eigen.dims(), dst.dims());
    fill_rows(dst, |y, out| {
        for (o, &pair) in out.iter_mut().zip(eigen.row(y)) {
            *o = vesselness_score(pair, beta, c, polarity);
        }
    });
}

/// Estimate `c` from the eigenvalue field, falling back to `fallback` when the
/// frame has no structure (flat input) or the estimate is not usable.
pub fn estimate_c(eigen: &EigenField, mode: AutoC, fallback: f32) -> f32 {
    let mut s2: Vec<f32> = eigen
        .data
        .iter()
        .map(|p| p.l1 * p.l1 + p.l2 * p.l2)
        .filter(|v| v.is_finite())
        .collect();
    if s2.is_empty() {
        warn!("auto c: no finite structure strengths, using c={fallback}");
        return fallback;
    }
    let pick = match mode {
        AutoC::HalfMaxNorm => s2.iter().copied().fold(0.0f32, f32::max),
        AutoC::Percentile(p) => {
            let p = p.clamp(0.0, 100.0);
            let idx = ((p / 100.0 * s2.len() as f32) as usize).min(s2.len() - 1);
            let (_, v, _) = s2.select_nth_unstable_by(idx, f32::total_cmp);
            *v
        }
    };
    let c = 0.5 * pick.sqrt();
    if c.is_finite() && c > 0.0 {
        c
    } else {
        warn!("auto c: estimate {c} unusable, using c={fallback}");
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(l1: f32, l2: f32) -> EigenPair {
        EigenPair { l1, l2 }
    }

    #[test]
    fn non_negative_major_eigenvalue_scores_zero() {
        for (l1, l2) in [(0.0, 0.0), (0.1, 5.0), (-0.5, 2.0), (0.0, 1e-9)] {
            assert_eq!(vesselness_score(pair(l1, l2), 0.5, 15.0, Polarity::Bright), 0.0);
        }
    }

    #[test]
    fn ideal_line_scores_near_one() {
        let v = vesselness_score(pair(0.0, -1000.0), 0.5, 15.0, Polarity::Bright);
        assert!((v - 1.0).abs() < 1e-6);
    }

    #[test]
    fn isotropic_blob_is_suppressed_by_beta() {
        // Rb = 1 → exp(-1 / (2 * 0.25)) = exp(-2)
        let v = vesselness_score(pair(-1000.0, -1000.0), 0.5, 15.0, Polarity::Bright);
        assert!((v - (-2.0f32).exp()).abs() < 1e-4);
    }

    #[test]
    fn weak_structure_is_suppressed_by_c() {
        let v = vesselness_score(pair(0.0, -0.1), 0.5, 15.0, Polarity::Bright);
        assert!(v < 1e-4);
    }

    #[test]
    fn dark_polarity_mirrors_bright() {
        for (l1, l2) in [(0.2, -40.0), (-3.0, -9.0), (0.0, -1.0)] {
            let bright = vesselness_score(pair(l1, l2), 0.5, 2.0, Polarity::Bright);
            let dark = vesselness_score(pair(-l1, -l2), 0.5, 2.0, Polarity::Dark);
            assert_eq!(bright, dark);
        }
        assert_eq!(vesselness_score(pair(0.0, -5.0), 0.5, 2.0, Polarity::Dark), 0.0);
    }

    #[test]
    fn tiny_major_eigenvalue_does_not_blow_up() {
        let v = vesselness_score(pair(-1e-12, -1e-12), 0.5, 1e-9, Polarity::Bright);
        assert!(v.is_finite());
        assert!((0.0..=1.0).contains(&v));
    }

    #[test]
    fn auto_c_uses_half_the_norm() {
        let field = EigenField::from_vec(
            2,
            2,
            vec![pair(0.0, 0.0), pair(3.0, 4.0), pair(0.0, -2.0), pair(0.0, 1.0)],
        )
        .unwrap();
        assert!((estimate_c(&field, AutoC::HalfMaxNorm, 15.0) - 2.5).abs() < 1e-6);
        // S^2 = [0, 25, 4, 1]; 50th percentile → index 2 of sorted [0, 1, 4, 25]
        assert!((estimate_c(&field, AutoC::Percentile(50.0), 15.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn auto_c_falls_back_on_flat_frames() {
        let field = EigenField::new(4, 4);
        assert_eq!(estimate_c(&field, AutoC::HalfMaxNorm, 15.0), 15.0);
        assert_eq!(estimate_c(&field, AutoC::Percentile(75.0), 7.5), 7.5);
    }
}
