//! The resizer tool: target dimensions with an optional aspect lock, social
//! media presets, and resample-then-encode.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::decode::{self, DecodeError, FilterType, SourceImage};
use crate::encode::{encode_rgba, EncodeError, EncodedImage, ExportFormat};

/// A named target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocialPreset {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

const fn preset(label: &'static str, width: u32, height: u32) -> SocialPreset {
    SocialPreset {
        label,
        width,
        height,
    }
}

pub const SOCIAL_PRESETS: [SocialPreset; 9] = [
    preset("Instagram Post", 1080, 1080),
    preset("Instagram Story", 1080, 1920),
    preset("Facebook Cover", 820, 312),
    preset("Twitter Header", 1500, 500),
    preset("YouTube Thumbnail", 1280, 720),
    preset("LinkedIn Banner", 1584, 396),
    preset("Pinterest Pin", 1000, 1500),
    preset("OG Image", 1200, 630),
    preset("Favicon", 512, 512),
];

/// Look a preset up by label, case-insensitively.
pub fn find_preset(label: &str) -> Option<&'static SocialPreset> {
    SOCIAL_PRESETS
        .iter()
        .find(|p| p.label.eq_ignore_ascii_case(label.trim()))
}

#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("Invalid target size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Resizer settings for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeConfig {
    pub original_width: u32,
    pub original_height: u32,
    pub width: u32,
    pub height: u32,
    pub lock_aspect: bool,
    pub format: ExportFormat,
    /// 0 to 100.
    pub quality: u8,
    /// Label of the chosen preset, `None` for custom sizes.
    pub preset: Option<String>,
}

impl ResizeConfig {
    /// Start at the original size with the aspect locked.
    pub fn new(original_width: u32, original_height: u32) -> Self {
        Self {
            original_width,
            original_height,
            width: original_width,
            height: original_height,
            lock_aspect: true,
            format: ExportFormat::Png,
            quality: 92,
            preset: None,
        }
    }

    /// Set the width; with the aspect locked the height follows.
    pub fn set_width(&mut self, width: u32) {
        self.width = width;
        if self.lock_aspect && self.original_width > 0 {
            self.height = (width as f64 / self.original_width as f64
                * self.original_height as f64)
                .round() as u32;
        }
        self.preset = None;
    }

    /// Set the height; with the aspect locked the width follows.
    pub fn set_height(&mut self, height: u32) {
        self.height = height;
        if self.lock_aspect && self.original_height > 0 {
            self.width = (height as f64 / self.original_height as f64
                * self.original_width as f64)
                .round() as u32;
        }
        self.preset = None;
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.set_width(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.set_height(height);
        self
    }

    /// Jump to a preset size. Presets rarely share the source's ratio, so
    /// this unlocks the aspect.
    pub fn apply_preset(&mut self, preset: &SocialPreset) {
        self.width = preset.width;
        self.height = preset.height;
        self.lock_aspect = false;
        self.preset = Some(preset.label.to_string());
    }

    /// Target width as a whole percentage of the original; 100 when unknown.
    pub fn scale_percent(&self) -> u32 {
        if self.original_width == 0 {
            return 100;
        }
        (self.width as f64 / self.original_width as f64 * 100.0).round() as u32
    }

    /// Clamp quality to 0-100.
    pub fn normalized(mut self) -> Self {
        self.quality = self.quality.min(100);
        self
    }

    pub fn quality_fraction(&self) -> f64 {
        self.quality.min(100) as f64 / 100.0
    }
}

/// Resample `source` to `width x height` (no aspect preservation) and
/// encode it.
pub fn resize_image(
    source: &SourceImage,
    width: u32,
    height: u32,
    format: ExportFormat,
    quality: f64,
) -> Result<EncodedImage, ResizeError> {
    if width == 0 || height == 0 {
        return Err(ResizeError::InvalidSize { width, height });
    }

    let resized = decode::resize(source, width, height, FilterType::Lanczos3)?;
    let bytes = encode_rgba(&resized.pixels, width, height, format, quality)?;

    debug!(width, height, format = %format, bytes = bytes.len(), "resized image");

    Ok(EncodedImage {
        bytes,
        format,
        width,
        height,
    })
}
