//! Constructors for the RGBA input grid from common 8-bit layouts.
use super::{ImageF32, ImageRgba};
use crate::error::Error;

const INV_255: f32 = 1.0 / 255.0;

impl ImageRgba {
    /// Interleaved RGBA8 bytes (`4 * w * h`) scaled to `[0, 1]`.
    pub fn from_rgba8(w: usize, h: usize, bytes: &[u8]) -> Result<Self, Error> {
        Self::from_interleaved(w, h, bytes, 4)
    }

    /// Interleaved RGB8 bytes (`3 * w * h`); alpha is set to 1.
    pub fn from_rgb8(w: usize, h: usize, bytes: &[u8]) -> Result<Self, Error> {
        Self::from_interleaved(w, h, bytes, 3)
    }

    /// Single-channel 8-bit bytes replicated into R, G and B.
    pub fn from_gray8(w: usize, h: usize, bytes: &[u8]) -> Result<Self, Error> {
        Self::from_interleaved(w, h, bytes, 1)
    }

    /// Luminance grid replicated into R, G and B with opaque alpha.
    pub fn from_luma(gray: &ImageF32) -> Self {
        gray.map(|&v| [v, v, v, 1.0])
    }

    fn from_interleaved(w: usize, h: usize, bytes: &[u8], channels: usize) -> Result<Self, Error> {
        let expected = w * h * channels;
        if bytes.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let data = bytes
            .chunks_exact(channels)
            .map(|px| match channels {
                1 => {
                    let v = px[0] as f32 * INV_255;
                    [v, v, v, 1.0]
                }
                3 => [
                    px[0] as f32 * INV_255,
                    px[1] as f32 * INV_255,
                    px[2] as f32 * INV_255,
                    1.0,
                ],
                _ => [
                    px[0] as f32 * INV_255,
                    px[1] as f32 * INV_255,
                    px[2] as f32 * INV_255,
                    px[3] as f32 * INV_255,
                ],
            })
            .collect();
        Self::from_vec(w, h, data)
    }
}
