//! WASM-compatible wrapper types for images and crop regions.
//!
//! These wrap the core framecut types and handle the conversion between Rust
//! and JavaScript data representations.

use framecut_core::decode::{FilterType, SourceImage, RGBA_CHANNELS};
use framecut_core::encode::{EncodedImage, ExportFormat};
use framecut_core::geometry::SourceCropRegion;
use wasm_bindgen::prelude::*;

/// A decoded image held in WASM memory.
///
/// # Memory Management
///
/// The pixel data stays in WASM memory. `pixels()` copies it out as a
/// `Uint8Array`, so keep the image on the Rust side and only pull pixels
/// when a canvas actually needs them.
#[wasm_bindgen]
pub struct JsSourceImage {
    inner: SourceImage,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Wrap straight RGBA pixels (4 bytes per pixel, row-major).
    ///
    /// Fails when the buffer length doesn't match the dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsSourceImage, JsValue> {
        Self::from_rgba(width, height, pixels).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4).
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as a `Uint8Array` copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer handles cleanup otherwise.
    pub fn free(self) {}
}

impl JsSourceImage {
    pub(crate) fn from_source(inner: SourceImage) -> Self {
        Self { inner }
    }

    pub(crate) fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, String> {
        let expected = width as usize * height as usize * RGBA_CHANNELS;
        if pixels.len() != expected {
            return Err(format!(
                "Invalid pixel data: expected {} bytes (width * height * 4), got {}",
                expected,
                pixels.len()
            ));
        }
        Ok(Self::from_source(SourceImage::new(width, height, pixels)))
    }

    pub(crate) fn source(&self) -> &SourceImage {
        &self.inner
    }
}

/// An encoded export.
#[wasm_bindgen]
pub struct JsEncodedImage {
    inner: EncodedImage,
}

#[wasm_bindgen]
impl JsEncodedImage {
    /// The encoded file as a `Uint8Array` copy, ready for a `Blob`.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_length()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    /// File extension without the dot.
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.inner.format.extension().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }
}

impl JsEncodedImage {
    pub(crate) fn from_encoded(inner: EncodedImage) -> Self {
        Self { inner }
    }
}

/// A crop region in source pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[wasm_bindgen]
impl JsCropRegion {
    #[wasm_bindgen(constructor)]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> JsCropRegion {
        JsCropRegion {
            x,
            y,
            width,
            height,
        }
    }

    /// The region covering a whole `width x height` image.
    pub fn full(width: u32, height: u32) -> JsCropRegion {
        SourceCropRegion::full(width, height).into()
    }
}

impl From<SourceCropRegion> for JsCropRegion {
    fn from(region: SourceCropRegion) -> Self {
        Self::new(region.x, region.y, region.width, region.height)
    }
}

impl From<JsCropRegion> for SourceCropRegion {
    fn from(region: JsCropRegion) -> Self {
        SourceCropRegion::new(region.x, region.y, region.width, region.height)
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Lanczos3, the browser-like default.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        1 => FilterType::Bilinear,
        _ => FilterType::Lanczos3,
    }
}

/// Parse a format name, extension or MIME type.
pub(crate) fn parse_format(value: &str) -> Result<ExportFormat, JsValue> {
    value
        .parse::<ExportFormat>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
