//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_image`] - Encode a `JsSourceImage` as PNG, JPEG or WebP
//! - [`encode_rgba`] - Encode raw RGBA pixels
//!
//! # Example
//!
//! ```typescript
//! import { encode_image } from '@framecut/wasm';
//!
//! const webp = encode_image(image, 'webp', 0.8);
//! const blob = new Blob([webp.bytes()], { type: webp.mime_type });
//! ```

use crate::types::{parse_format, JsEncodedImage, JsSourceImage};
use framecut_core::encode::{self, EncodedImage};
use wasm_bindgen::prelude::*;

/// Encode straight RGBA pixel data.
///
/// # Arguments
///
/// * `format` - `"png"`, `"jpeg"`/`"jpg"`, `"webp"` or a MIME type
/// * `quality` - 0.0 to 1.0; ignored for PNG
///
/// # Errors
///
/// Returns an error for an unknown format, zero dimensions, or a pixel
/// buffer that doesn't match width * height * 4.
#[wasm_bindgen]
pub fn encode_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: &str,
    quality: f64,
) -> Result<JsEncodedImage, JsValue> {
    let format = parse_format(format)?;
    encode::encode_rgba(pixels, width, height, format, quality)
        .map(|bytes| {
            JsEncodedImage::from_encoded(EncodedImage {
                bytes,
                format,
                width,
                height,
            })
        })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a decoded image without cropping or transforming it.
#[wasm_bindgen]
pub fn encode_image(
    image: &JsSourceImage,
    format: &str,
    quality: f64,
) -> Result<JsEncodedImage, JsValue> {
    let source = image.source();
    encode_rgba(&source.pixels, source.width, source.height, format, quality)
}
