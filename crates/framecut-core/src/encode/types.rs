//! Export formats, encode parameters and encoded results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quality used when none is given, matching the browser's canvas default
/// for lossy exports.
pub const DEFAULT_QUALITY: f64 = 0.92;

/// Errors that can occur while encoding pixels.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Webp];

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
        }
    }

    /// File extension without the dot: the MIME subtype.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Webp => "webp",
        }
    }

    /// Whether the quality parameter has any effect.
    pub fn is_lossy(self) -> bool {
        !matches!(self, ExportFormat::Png)
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ExportFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ExportFormat::Jpeg),
            "image/webp" => Some(ExportFormat::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Returned when a format name is not one of png, jpeg or webp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported export format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    /// Accepts extensions (`jpg`), names (`jpeg`) and MIME types.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(format) = ExportFormat::from_mime(s) {
            return Ok(format);
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            "webp" => Ok(ExportFormat::Webp),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Clamp a quality into `0.0..=1.0`. Non-finite values fall back to
/// `DEFAULT_QUALITY`.
pub fn normalize_quality(quality: f64) -> f64 {
    if quality.is_finite() {
        quality.clamp(0.0, 1.0)
    } else {
        DEFAULT_QUALITY
    }
}

/// Everything the compositing pipeline needs besides the pixels and region.
///
/// Immutable for the duration of a render call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeSpec {
    pub format: ExportFormat,
    /// 0.0 to 1.0, ignored for PNG.
    pub quality: f64,
    /// Clockwise degrees in display space.
    pub rotation_degrees: f64,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl Default for EncodeSpec {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: DEFAULT_QUALITY,
            rotation_degrees: 0.0,
            flip_horizontal: false,
            flip_vertical: false,
        }
    }
}

impl EncodeSpec {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = normalize_quality(quality);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_degrees = if degrees.is_finite() { degrees } else { 0.0 };
        self
    }

    pub fn with_flips(mut self, horizontal: bool, vertical: bool) -> Self {
        self.flip_horizontal = horizontal;
        self.flip_vertical = vertical;
        self
    }

    /// True when no rotation or flip is applied.
    pub fn is_identity_transform(&self) -> bool {
        self.rotation_degrees.rem_euclid(360.0) == 0.0
            && !self.flip_horizontal
            && !self.flip_vertical
    }
}

/// An encoded export, ready for the result sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}
