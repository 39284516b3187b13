//! Single-file format conversion: decode, then re-encode at a quality.
//!
//! Batches are the caller's loop; each file converts independently.

use thiserror::Error;
use tracing::debug;

use crate::decode::{decode_image, DecodeError};
use crate::encode::{encode_rgba, EncodeError, EncodedImage, ExportFormat};

/// Quality the converter starts at.
pub const DEFAULT_CONVERT_QUALITY: f64 = 0.8;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Convert an image file to `format`.
///
/// EXIF orientation is baked into the pixels, so the result displays the
/// same way without any metadata.
pub fn convert(
    bytes: &[u8],
    format: ExportFormat,
    quality: f64,
) -> Result<EncodedImage, ConvertError> {
    let source = decode_image(bytes)?;
    let encoded = encode_rgba(&source.pixels, source.width, source.height, format, quality)?;

    debug!(
        input_bytes = bytes.len(),
        output_bytes = encoded.len(),
        format = %format,
        "converted image"
    );

    Ok(EncodedImage {
        bytes: encoded,
        format,
        width: source.width,
        height: source.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::new();
        for i in 0..width * height {
            pixels.extend_from_slice(&[(i % 256) as u8, 90, 180, if i % 3 == 0 { 0 } else { 255 }]);
        }
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&pixels, width, height, ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    #[test]
    fn test_png_to_webp() {
        let result = convert(&png(12, 8), ExportFormat::Webp, DEFAULT_CONVERT_QUALITY).unwrap();
        assert_eq!(result.mime_type(), "image/webp");
        assert_eq!((result.width, result.height), (12, 8));
        assert_eq!(&result.bytes[8..12], b"WEBP");

        // Alpha survives the lossless container.
        let decoded = image::load_from_memory(&result.bytes).unwrap().into_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
        assert_eq!(decoded.get_pixel(1, 0).0[3], 255);
    }

    #[test]
    fn test_png_to_jpeg() {
        let result = convert(&png(12, 8), ExportFormat::Jpeg, 0.9).unwrap();
        assert_eq!(&result.bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_convert_invalid_input() {
        let result = convert(b"garbage", ExportFormat::Png, 1.0);
        assert!(matches!(result, Err(ConvertError::Decode(DecodeError::InvalidFormat))));
    }
}
