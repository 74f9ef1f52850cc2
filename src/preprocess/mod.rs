//! Optional luminance conditioning applied before smoothing.
//!
//! Order is fixed: global contrast, then CLAHE, then inversion. With the
//! default (everything disabled) the stage is the identity.

pub mod clahe;

pub use clahe::{contrast_ratio, equalize_in_place, Clahe, ClaheOutcome};

use crate::image::{fill_rows, ImageF32, ImageView};
use log::debug;
use serde::{Deserialize, Serialize};

/// Linear contrast stretch around mid-gray.
///
/// `g' = clamp((g - 0.5) * contrast + 0.5 + brightness, 0, 1)`, with
/// `brightness` in normalized luminance units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalContrast {
    pub brightness: f32,
    pub contrast: f32,
}

impl Default for GlobalContrast {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
        }
    }
}

impl GlobalContrast {
    #[inline]
    pub fn apply(&self, g: f32) -> f32 {
        ((g - 0.5) * self.contrast + 0.5 + self.brightness).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preprocess {
    /// Replace `g` by `1 - g` (turns dark vessels into bright ones).
    pub invert: bool,
    pub global_contrast: Option<GlobalContrast>,
    /// Adaptive histogram equalisation after the global stretch.
    pub clahe: Option<Clahe>,
}

impl Preprocess {
    pub fn is_identity(&self) -> bool {
        !self.invert && self.global_contrast.is_none() && self.clahe.is_none()
    }

    /// Per-pixel part of the stage (global contrast and inversion). CLAHE
    /// depends on the neighbourhood and only runs in [`preprocess_into`].
    #[inline]
    pub fn apply(&self, g: f32) -> f32 {
        let g = match &self.global_contrast {
            Some(gc) => gc.apply(g),
            None => g,
        };
        if self.invert {
            1.0 - g
        } else {
            g
        }
    }
}

/// Write the conditioned copy of `src` into `dst`.
pub fn preprocess_into(src: &ImageF32, pre: &Preprocess, dst: &mut ImageF32) {
    debug_assert_eq!(src.dims(), dst.dims());
    let Some(clahe) = &pre.clahe else {
        fill_rows(dst, |y, out| {
            for (o, &g) in out.iter_mut().zip(src.row(y)) {
                *o = pre.apply(g);
            }
        });
        return;
    };

    let contrast = pre.global_contrast;
    fill_rows(dst, |y, out| {
        for (o, &g) in out.iter_mut().zip(src.row(y)) {
            *o = contrast.map_or(g, |gc| gc.apply(g));
        }
    });
    let outcome = clahe.apply(dst);
    debug!(
        "clahe: {} pass(es), clip limit {:.3}, contrast {:.4}",
        outcome.iterations, outcome.clip_limit, outcome.contrast
    );
    if pre.invert {
        fill_rows(dst, |_, out| {
            for o in out.iter_mut() {
                *o = 1.0 - *o;
            }
        });
    }
}
