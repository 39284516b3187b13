//! Compositing pipeline: rotate, flip, cut the crop region and encode.
//!
//! # Pipeline
//!
//! 1. Place the source on a square [`WorkingSurface`] that fits it at any
//!    rotation, applying rotation and flips about the surface centre
//! 2. Cut a `round(width) x round(height)` window at
//!    `round(side / 2 - source_width / 2 + region.x)` (likewise y)
//! 3. Encode the window with the requested format and quality
//!
//! Only the window is ever rasterised. Pixels outside the drawn image are
//! fully transparent (black once flattened into a JPEG).
//!
//! # Coordinate System
//!
//! - The region is in unrotated source pixels, exactly as the crop box
//!   reports it
//! - Positive rotation is clockwise

mod surface;

pub use surface::WorkingSurface;

use thiserror::Error;
use tracing::debug;

use crate::decode::SourceImage;
use crate::encode::{encode_rgba, EncodeError, EncodeSpec, EncodedImage};
use crate::geometry::SourceCropRegion;

/// Largest output a browser canvas will allocate (16384 x 16384).
pub const MAX_OUTPUT_PIXELS: u64 = 16384 * 16384;

/// Errors from the compositing pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The source image has no pixels.
    #[error("Source image is empty")]
    EmptySource,

    /// The pixel buffer does not match the stated dimensions.
    #[error("Pixel buffer is {actual} bytes, expected {expected:?} for {width}x{height}")]
    MalformedSource {
        width: u32,
        height: u32,
        expected: Option<usize>,
        actual: usize,
    },

    /// The region rounds to a zero-area output.
    #[error("Crop region is empty: {width}x{height}")]
    EmptyRegion { width: u32, height: u32 },

    /// The output would not fit in a canvas.
    #[error("Crop region too large: {width}x{height}")]
    RegionTooLarge { width: u32, height: u32 },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[inline]
fn output_extent(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Output dimensions for `region`: each side rounded to whole pixels.
pub fn output_size(region: &SourceCropRegion) -> (u32, u32) {
    (output_extent(region.width), output_extent(region.height))
}

/// Rotate, flip and cut `region` out of `source`, returning straight RGBA.
///
/// Neither input is modified.
pub fn composite(
    source: &SourceImage,
    region: &SourceCropRegion,
    spec: &EncodeSpec,
) -> Result<SourceImage, RenderError> {
    if source.is_empty() {
        return Err(RenderError::EmptySource);
    }
    if !source.has_valid_buffer() {
        return Err(RenderError::MalformedSource {
            width: source.width,
            height: source.height,
            expected: source.expected_len(),
            actual: source.pixels.len(),
        });
    }

    let (width, height) = output_size(region);
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyRegion { width, height });
    }
    if width as u64 * height as u64 > MAX_OUTPUT_PIXELS {
        return Err(RenderError::RegionTooLarge { width, height });
    }

    let surface = WorkingSurface::new(source, spec);
    let (origin_x, origin_y) = surface.draw_origin();
    let offset_x = (origin_x + finite_or_zero(region.x)).round() as i64;
    let offset_y = (origin_y + finite_or_zero(region.y)).round() as i64;

    let pixels = surface.rasterize_window(offset_x, offset_y, width, height);
    Ok(SourceImage::new(width, height, pixels))
}

/// Composite and encode in one go.
pub fn render(
    source: &SourceImage,
    region: &SourceCropRegion,
    spec: &EncodeSpec,
) -> Result<EncodedImage, RenderError> {
    let output = composite(source, region, spec)?;
    let bytes = encode_rgba(
        &output.pixels,
        output.width,
        output.height,
        spec.format,
        spec.quality,
    )?;

    debug!(
        width = output.width,
        height = output.height,
        format = %spec.format,
        quality = spec.quality,
        bytes = bytes.len(),
        "rendered crop"
    );

    Ok(EncodedImage {
        bytes,
        format: spec.format,
        width: output.width,
        height: output.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::ExportFormat;

    /// Opaque image where every pixel encodes its own coordinates.
    fn coords(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, ((x + y) % 251) as u8, 255]);
            }
        }
        SourceImage::new(width, height, pixels)
    }

    /// Region that captures the whole image after a quarter turn.
    fn quarter_turn(image: &SourceImage) -> SourceImage {
        let (w, h) = (image.width as f64, image.height as f64);
        let region = SourceCropRegion::new((w - h) / 2.0, (h - w) / 2.0, h, w);
        composite(image, &region, &EncodeSpec::default().with_rotation(90.0)).unwrap()
    }

    #[test]
    fn test_identity_crop_copies_sub_rectangle() {
        let source = coords(40, 30);
        let region = SourceCropRegion::new(5.0, 7.0, 10.0, 4.0);
        let out = composite(&source, &region, &EncodeSpec::default()).unwrap();
        assert_eq!((out.width, out.height), (10, 4));
        for y in 0..4 {
            for x in 0..10 {
                assert_eq!(out.pixel(x, y), source.pixel(x + 5, y + 7));
            }
        }
    }

    #[test]
    fn test_output_size_is_rounded_region() {
        let source = coords(40, 30);
        let region = SourceCropRegion::new(0.3, 0.4, 12.6, 9.4);
        let out = composite(&source, &region, &EncodeSpec::default()).unwrap();
        assert_eq!((out.width, out.height), (13, 9));
    }

    #[test]
    fn test_region_outside_image_is_transparent() {
        let source = coords(20, 20);
        let region = SourceCropRegion::new(15.0, 0.0, 10.0, 2.0);
        let out = composite(&source, &region, &EncodeSpec::default()).unwrap();
        assert_eq!(out.pixel(4, 0), source.pixel(19, 0));
        assert_eq!(out.pixel(5, 0), [0, 0, 0, 0]);
        assert_eq!(out.pixel(9, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_horizontal_flip_mirrors_rows() {
        let source = coords(16, 8);
        let spec = EncodeSpec::default().with_flips(true, false);
        let out = composite(&source, &SourceCropRegion::full(16, 8), &spec).unwrap();
        for x in 0..16 {
            assert_eq!(out.pixel(x, 3), source.pixel(15 - x, 3));
        }
    }

    #[test]
    fn test_half_turn_equals_double_flip() {
        let source = coords(12, 6);
        let region = SourceCropRegion::full(12, 6);
        let turned = composite(&source, &region, &EncodeSpec::default().with_rotation(180.0));
        let flipped = composite(&source, &region, &EncodeSpec::default().with_flips(true, true));
        assert_eq!(turned.unwrap(), flipped.unwrap());
    }

    #[test]
    fn test_quarter_turn_layout() {
        let source = coords(10, 6);
        let out = quarter_turn(&source);
        assert_eq!((out.width, out.height), (6, 10));
        // Clockwise: output(x, y) = source(y, h - 1 - x)
        for y in 0..10 {
            for x in 0..6 {
                assert_eq!(out.pixel(x, y), source.pixel(y, 5 - x));
            }
        }
    }

    #[test]
    fn test_four_quarter_turns_round_trip() {
        let source = coords(100, 60);
        let mut image = source.clone();
        for _ in 0..4 {
            image = quarter_turn(&image);
        }
        assert_eq!(image, source);
    }

    #[test]
    fn test_empty_region_error() {
        let source = coords(10, 10);
        let region = SourceCropRegion::new(0.0, 0.0, 0.4, 10.0);
        let result = composite(&source, &region, &EncodeSpec::default());
        assert!(matches!(
            result,
            Err(RenderError::EmptyRegion {
                width: 0,
                height: 10
            })
        ));

        let nan = SourceCropRegion::new(0.0, 0.0, f64::NAN, 10.0);
        assert!(composite(&source, &nan, &EncodeSpec::default()).is_err());
    }

    #[test]
    fn test_empty_source_error() {
        let source = SourceImage::new(0, 0, vec![]);
        let result = composite(&source, &SourceCropRegion::full(1, 1), &EncodeSpec::default());
        assert!(matches!(result, Err(RenderError::EmptySource)));
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let source = SourceImage {
            width: 4,
            height: 4,
            pixels: vec![255; 12],
        };
        let result = composite(&source, &SourceCropRegion::full(4, 4), &EncodeSpec::default());
        assert!(matches!(
            result,
            Err(RenderError::MalformedSource { expected: Some(64), actual: 12, .. })
        ));
    }

    #[test]
    fn test_far_away_region_is_transparent() {
        let source = SourceImage::filled(4, 4, [1, 2, 3, 255]);
        let spec = EncodeSpec::default();
        for region in [
            SourceCropRegion::new(1e19, 0.0, 2.0, 2.0),
            SourceCropRegion::new(0.0, -1e19, 2.0, 2.0),
            SourceCropRegion::new(f64::MAX, f64::MIN, 2.0, 2.0),
        ] {
            let out = composite(&source, &region, &spec).unwrap();
            assert_eq!((out.width, out.height), (2, 2));
            assert!(out.pixels.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_region_too_large() {
        let source = coords(2, 2);
        let region = SourceCropRegion::new(0.0, 0.0, 20000.0, 20000.0);
        let result = composite(&source, &region, &EncodeSpec::default());
        assert!(matches!(result, Err(RenderError::RegionTooLarge { .. })));
    }

    #[test]
    fn test_render_png_round_trip() {
        let source = coords(30, 20);
        let region = SourceCropRegion::new(2.0, 3.0, 8.0, 5.0);
        let encoded = render(&source, &region, &EncodeSpec::default()).unwrap();
        assert_eq!(encoded.mime_type(), "image/png");
        assert_eq!((encoded.width, encoded.height), (8, 5));
        assert_eq!(encoded.byte_length(), encoded.bytes.len());

        let decoded = image::load_from_memory(&encoded.bytes).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (8, 5));
        assert_eq!(decoded.get_pixel(0, 0).0, source.pixel(2, 3));
    }

    #[test]
    fn test_render_jpeg() {
        let source = coords(30, 20);
        let spec = EncodeSpec::new(ExportFormat::Jpeg).with_quality(0.8);
        let encoded = render(&source, &SourceCropRegion::full(30, 20), &spec).unwrap();
        assert_eq!(&encoded.bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(encoded.format, ExportFormat::Jpeg);
    }

    #[test]
    fn test_render_does_not_touch_inputs() {
        let source = coords(10, 10);
        let before = source.clone();
        let spec = EncodeSpec::default().with_rotation(33.0);
        let _ = render(&source, &SourceCropRegion::full(10, 10), &spec).unwrap();
        assert_eq!(source, before);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn checker(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 2 + y / 2) % 2 == 0 { 230 } else { 20 };
                pixels.extend_from_slice(&[v, 255 - v, 128, 255]);
            }
        }
        SourceImage::new(width, height, pixels)
    }

    proptest! {
        /// Property: The lazily rasterised window equals the same window cut
        /// from the fully rasterised surface.
        #[test]
        fn prop_window_matches_full_surface(
            width in 1u32..=24,
            height in 1u32..=24,
            degrees in -360.0f64..=360.0,
            flip_h in any::<bool>(),
            flip_v in any::<bool>(),
            rx in -10.0f64..=30.0,
            ry in -10.0f64..=30.0,
            rw in 1.0f64..=30.0,
            rh in 1.0f64..=30.0,
        ) {
            let source = checker(width, height);
            let spec = EncodeSpec::default().with_rotation(degrees).with_flips(flip_h, flip_v);
            let region = SourceCropRegion::new(rx, ry, rw, rh);

            let out = composite(&source, &region, &spec).unwrap();
            let surface = WorkingSurface::new(&source, &spec);
            let full = surface.rasterize_full();
            let (ox, oy) = surface.draw_origin();
            let off_x = (ox + rx).round() as i64;
            let off_y = (oy + ry).round() as i64;

            for y in 0..out.height {
                for x in 0..out.width {
                    let (fx, fy) = (off_x + x as i64, off_y + y as i64);
                    let expected = if fx >= 0 && fy >= 0
                        && fx < full.width as i64 && fy < full.height as i64
                    {
                        full.pixel(fx as u32, fy as u32)
                    } else {
                        [0, 0, 0, 0]
                    };
                    prop_assert_eq!(out.pixel(x, y), expected);
                }
            }
        }

        /// Property: Output dimensions always equal the rounded region size.
        #[test]
        fn prop_output_dimensions(
            degrees in -720.0f64..=720.0,
            rw in 0.5f64..=80.0,
            rh in 0.5f64..=80.0,
        ) {
            let source = checker(16, 9);
            let spec = EncodeSpec::default().with_rotation(degrees);
            let region = SourceCropRegion::new(1.0, 1.0, rw, rh);
            let out = composite(&source, &region, &spec).unwrap();
            prop_assert_eq!(out.width, rw.round() as u32);
            prop_assert_eq!(out.height, rh.round() as u32);
            prop_assert_eq!(out.pixels.len(), (out.width * out.height * 4) as usize);
        }

        /// Property: Four quarter turns of an even-sized image are lossless.
        #[test]
        fn prop_quarter_turns_lossless(half_w in 1u32..=12, half_h in 1u32..=12) {
            let source = checker(half_w * 2, half_h * 2);
            let mut image = source.clone();
            for _ in 0..4 {
                let (w, h) = (image.width as f64, image.height as f64);
                let region = SourceCropRegion::new((w - h) / 2.0, (h - w) / 2.0, h, w);
                let spec = EncodeSpec::default().with_rotation(90.0);
                image = composite(&image, &region, &spec).unwrap();
            }
            prop_assert_eq!(image, source);
        }
    }
}
