//! RGBA resampling used by the resizer and for display-sized previews.
//!
//! All functions return new `SourceImage` instances without modifying the
//! input.

use super::{DecodeError, FilterType, SourceImage};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for a zero target dimension and
/// `DecodeError::CorruptedFile` when the pixel buffer does not match the
/// declared size.
pub fn resize(
    image: &SourceImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<SourceImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba = image
        .to_rgba_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbaImage".to_string()))?;

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(SourceImage::from_rgba_image(resized))
}

/// Downscale so the longest edge is at most `max_edge`, preserving the
/// aspect ratio. Images that already fit are returned unchanged.
pub fn resize_to_fit(
    image: &SourceImage,
    max_edge: u32,
    filter: FilterType,
) -> Result<SourceImage, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(image.clone());
    }

    let (width, height) = fit_dimensions(image.width, image.height, max_edge);
    resize(image, width, height, filter)
}

/// Dimensions that fit inside a `max_edge` square with the same aspect ratio.
pub fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}
