//! Decoding user-supplied image files with EXIF orientation handling.
//!
//! Browsers honour the EXIF orientation tag when they decode an `<img>`, so
//! the crop box and the exported pixels must agree with what the user sees.
//! The tag is applied here, before anything measures the image.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, Orientation, SourceImage};

fn reader_for(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }
    Ok(reader)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    reader_for(bytes)?
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Decode an image file (PNG, JPEG, WebP, GIF or BMP) into RGBA8, applying
/// EXIF orientation.
///
/// # Errors
///
/// - `DecodeError::EmptyInput` for an empty slice
/// - `DecodeError::InvalidFormat` when the container is not recognised
/// - `DecodeError::CorruptedFile` when the decoder gives up
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let img = decode_dynamic(bytes)?;
    let oriented = apply_orientation(img, get_orientation(bytes));
    Ok(SourceImage::from_rgba_image(oriented.into_rgba8()))
}

/// Read the displayed `(width, height)` from the header without decoding
/// pixel data. Orientation is taken into account.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    let (width, height) = reader_for(bytes)?
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if get_orientation(bytes).swaps_dimensions() {
        Ok((height, width))
    } else {
        Ok((width, height))
    }
}

/// MIME type of the container, sniffed from the magic bytes.
pub fn detect_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

/// EXIF orientation of the file. `Orientation::Normal` when absent or
/// unreadable.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 40) as u8, (y * 40) as u8, 200, 255]);
            }
        }
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&pixels, width, height, ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    /// A JPEG carrying an EXIF APP1 segment with the given orientation.
    fn jpeg_with_orientation(width: u32, height: u32, orientation: u8) -> Vec<u8> {
        let pixels = vec![128u8; (width * height * 3) as usize];
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, 90)
            .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
            .unwrap();

        #[rustfmt::skip]
        let app1: Vec<u8> = vec![
            0xFF, 0xE1, 0x00, 0x22,
            b'E', b'x', b'i', b'f', 0x00, 0x00,
            // Big-endian TIFF header, IFD0 at offset 8
            0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08,
            // One entry: Orientation (0x0112), SHORT, count 1
            0x00, 0x01,
            0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01,
            0x00, orientation, 0x00, 0x00,
            // No next IFD
            0x00, 0x00, 0x00, 0x00,
        ];

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_decode_png_to_rgba() {
        let img = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.pixels.len(), 3 * 2 * 4);
        assert_eq!(img.pixel(2, 1), [80, 40, 200, 255]);
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::EmptyInput)));
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(16, 16);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_exif_orientation_is_applied() {
        let bytes = jpeg_with_orientation(4, 2, 6);
        assert_eq!(get_orientation(&bytes), Orientation::Rotate90CW);

        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (2, 4));

        let raw = decode_dynamic(&bytes).unwrap();
        assert_eq!((raw.width(), raw.height()), (4, 2));
    }

    #[test]
    fn test_probe_dimensions() {
        assert_eq!(probe_dimensions(&png_bytes(7, 5)).unwrap(), (7, 5));
        assert_eq!(
            probe_dimensions(&jpeg_with_orientation(4, 2, 8)).unwrap(),
            (2, 4)
        );
        assert!(probe_dimensions(&[]).is_err());
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(get_orientation(&png_bytes(2, 2)), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_detect_mime() {
        assert_eq!(detect_mime(&png_bytes(1, 1)), Some("image/png"));
        assert_eq!(
            detect_mime(&jpeg_with_orientation(1, 1, 1)),
            Some("image/jpeg")
        );
        assert_eq!(detect_mime(b"hello"), None);
    }

    #[test]
    fn test_apply_orientation_rotate180() {
        let rgba = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgba8(rgba), Orientation::Rotate180);
        let result = result.into_rgba8();
        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }
}
