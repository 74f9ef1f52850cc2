use crate::image::io::load_rgba_image;
use crate::image::{ImageF32, ImageRgba};
use crate::pipeline::{FilterParams, PipelineOptions};
use crate::segmentation::{ApprovalWindow, DEFAULT_SEGMENTATION_THRESHOLD};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the demo frame comes from.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// Image file decoded with the `image` crate.
    Path(PathBuf),
    Synthetic {
        pattern: SyntheticPattern,
        #[serde(default = "default_synthetic_size")]
        width: usize,
        #[serde(default = "default_synthetic_size")]
        height: usize,
    },
}

fn default_synthetic_size() -> usize {
    512
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticPattern {
    /// White background with black 10 px lines every 60 px, both axes,
    /// between 100 and 400.
    Grid,
    /// Single bright 1 px column at `width / 2` on black.
    VerticalLine,
    /// Bright disk of radius `min(width, height) / 8` at the centre.
    Disk,
}

impl SyntheticPattern {
    pub fn render(&self, w: usize, h: usize) -> ImageRgba {
        let mut luma = ImageF32::new(w, h);
        match self {
            Self::Grid => {
                let on_line = |p: usize| (100..400).contains(&p) && (p - 100) % 60 < 10;
                luma.data.fill(1.0);
                for y in 0..h {
                    for x in 0..w {
                        if on_line(x) || on_line(y) {
                            luma.set(x, y, 0.0);
                        }
                    }
                }
            }
            Self::VerticalLine => {
                let cx = w / 2;
                for y in 0..h {
                    luma.set(cx, y, 1.0);
                }
            }
            Self::Disk => {
                let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
                let r = w.min(h) as f32 / 8.0;
                for y in 0..h {
                    for x in 0..w {
                        let dx = x as f32 + 0.5 - cx;
                        let dy = y as f32 + 0.5 - cy;
                        if dx * dx + dy * dy <= r * r {
                            luma.set(x, y, 1.0);
                        }
                    }
                }
            }
        }
        ImageRgba::from_luma(&luma)
    }
}

impl InputSource {
    pub fn load(&self) -> Result<ImageRgba, String> {
        match self {
            Self::Path(path) => load_rgba_image(path),
            Self::Synthetic {
                pattern,
                width,
                height,
            } => {
                if *width == 0 || *height == 0 {
                    return Err(format!("synthetic input needs a non-zero size, got {width}x{height}"));
                }
                Ok(pattern.render(*width, *height))
            }
        }
    }
}

/// Optional mask / overlay / approval stage of the demo.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub threshold: f32,
    pub approval: Option<ApprovalWindow>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SEGMENTATION_THRESHOLD,
            approval: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub color_image: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    pub mask_image: Option<PathBuf>,
    pub overlay_image: Option<PathBuf>,
    /// Directory receiving one PNG per intermediate stage.
    pub debug_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DemoConfig {
    pub input: InputSource,
    #[serde(default)]
    pub params: FilterParams,
    #[serde(default)]
    pub options: PipelineOptions,
    #[serde(default)]
    pub segmentation: Option<SegmentationConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<DemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(data: &str) -> Result<DemoConfig, serde_json::Error> {
    serde_json::from_str(data)
}
