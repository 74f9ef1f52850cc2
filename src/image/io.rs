//! I/O helpers for the demo tooling.
//!
//! - `load_rgba_image`: read a PNG/JPEG/etc. into an [`ImageRgba`] in [0, 1].
//! - `save_rgb_image`: write a colormapped [`ImageRgb`] to an RGB PNG.
//! - `save_grayscale_f32`: write an `ImageF32` in [0, 1] to a grayscale PNG.
//! - `save_mask`: write a segmentation mask as a black/white PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
//!
//! None of this is used by the numeric pipeline itself.
use super::{Image, ImageF32, ImageRgb, ImageRgba, ImageView};
use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as RGBA with channels scaled to [0, 1].
pub fn load_rgba_image(path: &Path) -> Result<ImageRgba, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgba8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageRgba::from_rgba8(width, height, img.as_raw())
        .map_err(|e| format!("Failed to convert {}: {e}", path.display()))
}

/// Save a color grid to an RGB PNG, clamping channels to [0, 255].
pub fn save_rgb_image(image: &ImageRgb, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = RgbImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Rgb(px.map(to_u8)));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a float image to a grayscale PNG, clamping values in [0, 255].
pub fn save_grayscale_f32(image: &ImageF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Luma([to_u8(px)]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a binary mask (true → white).
pub fn save_mask(mask: &Image<bool>, path: &Path) -> Result<(), String> {
    save_grayscale_f32(&mask.map(|&m| if m { 1.0 } else { 0.0 }), path)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
