//! One-shot image report: dimensions, ratio, megapixels, size and format.

use serde::{Deserialize, Serialize};

use crate::decode::{detect_mime, probe_dimensions, DecodeError};
use crate::text::{format_file_size, simplified_ratio};

/// Landscape, portrait or square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Landscape,
    Portrait,
    Square,
}

impl Shape {
    pub fn of(width: u32, height: u32) -> Self {
        match width.cmp(&height) {
            std::cmp::Ordering::Greater => Shape::Landscape,
            std::cmp::Ordering::Less => Shape::Portrait,
            std::cmp::Ordering::Equal => Shape::Square,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shape::Landscape => "Landscape",
            Shape::Portrait => "Portrait",
            Shape::Square => "Square",
        }
    }
}

/// What the analyzer shows for a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub width: u32,
    pub height: u32,
    /// Reduced ratio, e.g. `"16:9"`.
    pub ratio: String,
    /// Megapixels with two decimals, e.g. `"12.00"`.
    pub megapixels: String,
    /// Formatted file size.
    pub size: String,
    /// MIME type, or `"unknown"`.
    pub format: String,
    pub orientation: Shape,
}

/// Build a report for `bytes`. `file_size` is the size the user's file
/// reported, which is normally `bytes.len()`.
///
/// Dimensions are the displayed ones, with EXIF orientation applied.
pub fn analyze(bytes: &[u8], file_size: u64) -> Result<ImageReport, DecodeError> {
    let (width, height) = probe_dimensions(bytes)?;

    Ok(ImageReport {
        width,
        height,
        ratio: simplified_ratio(width, height),
        megapixels: format!("{:.2}", width as f64 * height as f64 / 1_000_000.0),
        size: format_file_size(file_size),
        format: detect_mime(bytes).unwrap_or("unknown").to_string(),
        orientation: Shape::of(width, height),
    })
}
