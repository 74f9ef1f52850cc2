//! Owned row-major pixel grid (stride == width).
//!
//! Every stage of the vesselness pipeline writes one of these and reads the
//! previous stage's. Neighbourhood reads go through [`clamp_index`] so that
//! out-of-range samples resolve to the nearest edge sample.
use crate::error::Error;

/// Owned grid of `T` samples in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<T>,
}

/// Scalar grid used for luminance, blur passes, vesselness and orientation.
pub type ImageF32 = Image<f32>;
/// Input grid, RGBA channels in `[0, 1]`.
pub type ImageRgba = Image<[f32; 4]>;
/// Display grid produced by the response mapper.
pub type ImageRgb = Image<[f32; 3]>;

impl<T: Copy + Default> Image<T> {
    /// Construct a default-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, T::default())
    }

    /// Construct a buffer of size `w × h` with every sample set to `value`.
    pub fn filled(w: usize, h: usize, value: T) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }
}

impl<T> Image<T> {
    /// Wrap an existing row-major buffer, checking its length.
    pub fn from_vec(w: usize, h: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = w.checked_mul(h).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    /// `(width, height)` pair, handy for dimension checks.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Build a same-size grid by applying `f` to every sample.
    pub fn map<U, F>(&self, f: F) -> Image<U>
    where
        F: Fn(&T) -> U,
    {
        Image {
            w: self.w,
            h: self.h,
            stride: self.w,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Copy> Image<T> {
    #[inline]
    /// Get the sample at (x, y).
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    /// Set the sample at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Sample with clamp-to-edge boundary handling.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> T {
        self.get(clamp_index(x, self.w), clamp_index(y, self.h))
    }
}

/// Map a possibly out-of-range index onto `[0, upper)` by clamping to the edge.
#[inline]
pub fn clamp_index(idx: isize, upper: usize) -> usize {
    if upper == 0 {
        return 0;
    }
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}

impl<T: Copy> crate::image::traits::ImageView for Image<T> {
    type Pixel = T;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[T] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}
