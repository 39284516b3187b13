//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode PNG, JPEG, WebP, GIF or BMP bytes to RGBA
//! - [`probe_dimensions`] - Read display dimensions without a full decode
//! - [`detect_mime`] - Guess the MIME type from the file signature
//! - [`resize`] - Resize an image to exact dimensions
//! - [`resize_to_fit`] - Downscale to a max edge, preserving aspect ratio
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_to_fit } from '@framecut/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const preview = resize_to_fit(image, 2048, 1); // Bilinear
//! ```

use crate::types::{filter_from_u8, JsSourceImage};
use framecut_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image file, applying its EXIF orientation.
///
/// # Errors
///
/// Returns an error if the bytes are empty, not a supported format, or
/// corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Display dimensions as `[width, height]`, orientation applied.
#[wasm_bindgen]
pub fn probe_dimensions(bytes: &[u8]) -> Result<Vec<u32>, JsValue> {
    decode::probe_dimensions(bytes)
        .map(|(width, height)| vec![width, height])
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// MIME type guessed from the file signature, if recognised.
#[wasm_bindgen]
pub fn detect_mime(bytes: &[u8]) -> Option<String> {
    decode::detect_mime(bytes).map(str::to_string)
}

/// Resize an image to exact dimensions.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize(
    image: &JsSourceImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsSourceImage, JsValue> {
    decode::resize(image.source(), width, height, filter_from_u8(filter))
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Downscale so the longest edge is at most `max_edge`.
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsSourceImage,
    max_edge: u32,
    filter: u8,
) -> Result<JsSourceImage, JsValue> {
    decode::resize_to_fit(image.source(), max_edge, filter_from_u8(filter))
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
