use serde::{Deserialize, Serialize};

/// Trait implemented by separable 1D filters applied along one axis.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). Odd length, centre tap at
    /// `taps().len() / 2`.
    fn taps(&self) -> &[f32];

    fn radius(&self) -> usize {
        self.taps().len() / 2
    }
}

/// How the half-width `R` of the Gaussian window is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelRadius {
    /// `R = max(ceil(factor * sigma), min)`.
    SigmaScaled { factor: f32, min: usize },
    /// Window independent of sigma (e.g. 15 or 25 for 31/51 taps); large
    /// sigmas get truncated.
    Fixed(usize),
}

impl Default for KernelRadius {
    fn default() -> Self {
        Self::SigmaScaled {
            factor: 3.0,
            min: 1,
        }
    }
}

impl KernelRadius {
    pub fn resolve(&self, sigma: f32) -> usize {
        match *self {
            Self::SigmaScaled { factor, min } => {
                let r = (factor.max(0.0) * sigma).ceil();
                // non-finite or absurd sizes fall back to the floor
                let r = if r.is_finite() { r as usize } else { 0 };
                r.max(min)
            }
            Self::Fixed(r) => r,
        }
    }

    /// [`Self::resolve`] capped at `limit` (at least 1). Taps past the grid
    /// extent only ever see clamped edge samples, so the pipeline passes
    /// the larger image dimension here.
    pub fn resolve_within(&self, sigma: f32, limit: usize) -> usize {
        self.resolve(sigma).min(limit.max(1))
    }
}

/// Sampled Gaussian `exp(-i^2 / (2 sigma^2))` on `[-R, R]`, normalised so the
/// taps sum to one.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    sigma: f32,
    taps: Vec<f32>,
}

impl GaussianKernel {
    /// `sigma` must be positive; callers validate it at the pipeline boundary.
    pub fn new(sigma: f32, radius: KernelRadius) -> Self {
        Self::with_radius(sigma, radius.resolve(sigma))
    }

    /// Like [`Self::new`] with the radius capped at `limit`.
    pub fn bounded(sigma: f32, radius: KernelRadius, limit: usize) -> Self {
        Self::with_radius(sigma, radius.resolve_within(sigma, limit))
    }

    pub fn with_radius(sigma: f32, radius: usize) -> Self {
        let denom = 2.0 * sigma * sigma;
        let r = radius as isize;
        let mut taps: Vec<f32> = (-r..=r)
            .map(|i| (-((i * i) as f32) / denom).exp())
            .collect();
        let total: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= total;
        }
        Self { sigma, taps }
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }
}

impl SeparableFilter for GaussianKernel {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taps_sum_to_one_for_any_sigma() {
        for sigma in [0.05f32, 0.5, 1.0, 1.5, 3.7, 12.0] {
            let k = GaussianKernel::new(sigma, KernelRadius::default());
            let sum: f32 = k.taps().iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "sigma={sigma} sum={sum}");
        }
        let k = GaussianKernel::new(20.0, KernelRadius::Fixed(15));
        let sum: f32 = k.taps().iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn radius_scales_with_sigma() {
        let policy = KernelRadius::default();
        assert_eq!(policy.resolve(1.5), 5);
        assert_eq!(policy.resolve(0.1), 1);
        assert_eq!(policy.resolve(4.0), 12);
        assert_eq!(KernelRadius::Fixed(25).resolve(0.5), 25);
    }

    #[test]
    fn huge_sigma_is_capped_to_the_grid() {
        let policy = KernelRadius::default();
        assert_eq!(policy.resolve_within(1.0e9, 8), 8);
        assert_eq!(policy.resolve_within(1.5, 64), 5);
        assert_eq!(KernelRadius::Fixed(25).resolve_within(0.5, 0), 1);

        let k = GaussianKernel::bounded(1.0e9, policy, 8);
        assert_eq!(k.taps().len(), 17);
        assert!(k.taps().iter().all(|t| t.is_finite()));
        let sum: f32 = k.taps().iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn taps_are_symmetric_and_peaked() {
        let k = GaussianKernel::new(1.5, KernelRadius::default());
        let taps = k.taps();
        assert_eq!(taps.len(), 2 * k.radius() + 1);
        for i in 0..taps.len() {
            assert_eq!(taps[i], taps[taps.len() - 1 - i]);
        }
        let centre = taps[k.radius()];
        assert!(taps.iter().all(|&t| t <= centre));
    }
}
