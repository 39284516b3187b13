//! Framecut WASM - WebAssembly bindings for Framecut
//!
//! This crate exposes the framecut-core crop and export engine to the
//! browser UI.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for images, encoded output and regions
//! - `decode` - Decoding, probing and resampling
//! - `encode` - Plain encoding without a crop
//! - `crop` - The interactive crop box
//! - `render` - Crop export, with the optional size budget
//! - `estimate` - Debounced output-size readout
//! - `preview` - Preview object URL book-keeping
//! - `tools` - Analyzer, converter, resizer and shared helpers
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsCropBox, export_crop } from '@framecut/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const crop = new JsCropBox(800, 600, image.width, image.height);
//! const out = export_crop(image, crop.region, { exportFormat: 'webp', quality: 80 });
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod decode;
mod encode;
mod estimate;
mod preview;
mod render;
mod tools;
mod types;

// Re-export public types
pub use crop::JsCropBox;
pub use decode::{decode_image, detect_mime, probe_dimensions, resize, resize_to_fit};
pub use encode::{encode_image, encode_rgba};
pub use estimate::JsEstimator;
pub use preview::JsPreviewSlot;
pub use render::{export_crop, export_name, render_crop};
pub use tools::{
    analyze_image, aspect_presets, convert_image, default_convert_quality, export_file_name,
    export_formats, format_file_size, resize_image, social_presets, JsResizeConfig,
};
pub use types::{JsCropRegion, JsEncodedImage, JsSourceImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
