//! RGBA8 encoders for the three export containers.
//!
//! PNG keeps the alpha channel and ignores quality. JPEG has no alpha, so
//! pixels are composited over black first, which is what a canvas export of
//! a partly transparent surface produces. WebP stays on the pure-Rust
//! lossless encoder; below full quality the colour channels are quantized to
//! a coarser palette first so that quality still trades detail for size.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::types::{normalize_quality, EncodeError, ExportFormat};

/// Encode straight RGBA8 pixels.
///
/// `quality` is in `0.0..=1.0` and clamped; PNG ignores it.
pub fn encode_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: ExportFormat,
    quality: f64,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut buffer = Vec::new();
    match format {
        ExportFormat::Png => PngEncoder::new(&mut buffer)
            .write_image(pixels, width, height, ExtendedColorType::Rgba8)
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?,
        ExportFormat::Jpeg => {
            let rgb = flatten_over_black(pixels);
            JpegEncoder::new_with_quality(&mut buffer, quality_percent(quality))
                .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?
        }
        ExportFormat::Webp => {
            let percent = quality_percent(quality);
            let quantized;
            let data = if percent < 100 {
                let mut copy = pixels.to_vec();
                quantize_rgb(&mut copy, percent);
                quantized = copy;
                quantized.as_slice()
            } else {
                pixels
            };
            WebPEncoder::new_lossless(&mut buffer)
                .write_image(data, width, height, ExtendedColorType::Rgba8)
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?
        }
    }

    Ok(buffer)
}

/// Map `0.0..=1.0` to the encoders' `1..=100` scale.
fn quality_percent(quality: f64) -> u8 {
    (normalize_quality(quality) * 100.0).round().clamp(1.0, 100.0) as u8
}

fn flatten_over_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u16;
        for &c in &px[..3] {
            rgb.push(((c as u16 * a + 127) / 255) as u8);
        }
    }
    rgb
}

/// Number of levels per colour channel for a WebP quality in `1..=100`.
fn webp_levels(percent: u8) -> u16 {
    if percent >= 100 {
        return 256;
    }
    let normalized = (percent as f32).clamp(1.0, 100.0) / 100.0;
    let levels = 2.0 + normalized * normalized * 254.0;
    levels.round().clamp(2.0, 256.0) as u16
}

/// Snap R, G and B to `webp_levels(percent)` evenly spaced values. Alpha is
/// untouched.
fn quantize_rgb(data: &mut [u8], percent: u8) {
    let levels = webp_levels(percent);
    if levels >= 256 {
        return;
    }
    let step = 255.0 / (levels as f32 - 1.0);
    for px in data.chunks_exact_mut(4) {
        for channel in px.iter_mut().take(3) {
            let bucket = (f32::from(*channel) / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}
