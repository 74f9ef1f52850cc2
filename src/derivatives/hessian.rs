use super::gradient::GradientField;
use super::DerivativeScale;
use crate::image::{clamp_index, fill_rows, Image, ImageView};

/// Symmetric 2×2 Hessian `[[fxx, fxy], [fxy, fyy]]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hessian {
    pub fxx: f32,
    pub fxy: f32,
    pub fyy: f32,
}

impl Hessian {
    pub fn new(fxx: f32, fxy: f32, fyy: f32) -> Self {
        Self { fxx, fxy, fyy }
    }

    #[inline]
    pub fn trace(&self) -> f32 {
        self.fxx + self.fyy
    }

    #[inline]
    pub fn det(&self) -> f32 {
        self.fxx * self.fyy - self.fxy * self.fxy
    }
}

pub type HessianField = Image<Hessian>;

/// Central differences of the gradient components.
///
/// `fxy` is the y-derivative of `fx` only; the mixed term is not averaged
/// with the x-derivative of `fy`, which keeps the matrix symmetric by
/// construction.
pub fn hessian_into(grad: &GradientField, scale: DerivativeScale, dst: &mut HessianField) {
    debug_assert_eq!(grad.dims(), dst.dims());
    let (w, h) = grad.dims();
    if w == 0 || h == 0 {
        return;
    }
    let (hx, hy) = scale.spacing(w, h);
    let inv_x = 0.5 / hx;
    let inv_y = 0.5 / hy;
    fill_rows(dst, |y, out| {
        let up = grad.row(clamp_index(y as isize - 1, h));
        let mid = grad.row(y);
        let down = grad.row(clamp_index(y as isize + 1, h));
        for (x, o) in out.iter_mut().enumerate() {
            let xl = clamp_index(x as isize - 1, w);
            let xr = clamp_index(x as isize + 1, w);
            *o = Hessian {
                fxx: (mid[xr].fx - mid[xl].fx) * inv_x,
                fxy: (down[x].fx - up[x].fx) * inv_y,
                fyy: (down[x].fy - up[x].fy) * inv_y,
            };
        }
    });
}

pub fn hessian(grad: &GradientField, scale: DerivativeScale) -> HessianField {
    let mut out = HessianField::new(grad.w, grad.h);
    hessian_into(grad, scale, &mut out);
    out
}
