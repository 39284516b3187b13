//! WASM bindings for the compositing pipeline.
//!
//! Settings come in as a plain object matching `CropConfig`:
//!
//! ```typescript
//! const config = {
//!   aspectRatio: { kind: 'free' },
//!   rotationDegrees: 90,
//!   flipHorizontal: false,
//!   flipVertical: false,
//!   exportFormat: 'jpeg',
//!   quality: 92,
//!   targetSizeKb: 500, // or null
//! };
//! const out = export_crop(image, crop.region, config);
//! const blob = new Blob([out.bytes()], { type: out.mime_type });
//! downloadBlob(blob, export_name('photo.png', config));
//! ```
//!
//! Missing fields take their defaults.

use crate::types::{JsCropRegion, JsEncodedImage, JsSourceImage};
use framecut_core::config::CropConfig;
use framecut_core::render;
use wasm_bindgen::prelude::*;

pub(crate) fn config_from_js(config: JsValue) -> Result<CropConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(CropConfig::default());
    }
    let config: CropConfig =
        serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(config.normalized())
}

/// Render the region at the configured quality, ignoring any size budget.
///
/// Used for previews.
#[wasm_bindgen]
pub fn render_crop(
    image: &JsSourceImage,
    region: &JsCropRegion,
    config: JsValue,
) -> Result<JsEncodedImage, JsValue> {
    let config = config_from_js(config)?;
    render::render(image.source(), &(*region).into(), &config.encode_spec())
        .map(JsEncodedImage::from_encoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render the final export, searching for a quality under `targetSizeKb`
/// when one is set.
#[wasm_bindgen]
pub fn export_crop(
    image: &JsSourceImage,
    region: &JsCropRegion,
    config: JsValue,
) -> Result<JsEncodedImage, JsValue> {
    let config = config_from_js(config)?;
    config
        .export(image.source(), &(*region).into())
        .map(JsEncodedImage::from_encoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Download name for the export, e.g. `photo_edited.jpeg`.
#[wasm_bindgen]
pub fn export_name(original: &str, config: JsValue) -> Result<String, JsValue> {
    Ok(config_from_js(config)?.export_file_name(original))
}
