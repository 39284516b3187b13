//! WASM bindings for the standalone tools: analyzer, converter, resizer,
//! plus the naming and preset helpers the UI shares.

use crate::types::{parse_format, JsEncodedImage, JsSourceImage};
use framecut_core::analyze;
use framecut_core::config::AspectRatio;
use framecut_core::convert;
use framecut_core::encode::ExportFormat;
use framecut_core::resize::{self, find_preset, ResizeConfig, SOCIAL_PRESETS};
use framecut_core::text;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Analyze an image file.
///
/// Returns `{width, height, ratio, megapixels, size, format, orientation}`.
#[wasm_bindgen]
pub fn analyze_image(bytes: &[u8], file_size: f64) -> Result<JsValue, JsValue> {
    let report = analyze::analyze(bytes, file_size.max(0.0) as u64)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert an image file to another format.
#[wasm_bindgen]
pub fn convert_image(bytes: &[u8], format: &str, quality: f64) -> Result<JsEncodedImage, JsValue> {
    let format = parse_format(format)?;
    convert::convert(bytes, format, quality)
        .map(JsEncodedImage::from_encoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Default converter quality (0.0 to 1.0).
#[wasm_bindgen]
pub fn default_convert_quality() -> f64 {
    convert::DEFAULT_CONVERT_QUALITY
}

/// Resample to exactly `width x height` and encode.
#[wasm_bindgen]
pub fn resize_image(
    image: &JsSourceImage,
    width: u32,
    height: u32,
    format: &str,
    quality: f64,
) -> Result<JsEncodedImage, JsValue> {
    let format = parse_format(format)?;
    resize::resize_image(image.source(), width, height, format, quality)
        .map(JsEncodedImage::from_encoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resizer settings with the aspect-lock arithmetic.
#[wasm_bindgen]
pub struct JsResizeConfig {
    inner: ResizeConfig,
}

#[wasm_bindgen]
impl JsResizeConfig {
    #[wasm_bindgen(constructor)]
    pub fn new(original_width: u32, original_height: u32) -> JsResizeConfig {
        JsResizeConfig {
            inner: ResizeConfig::new(original_width, original_height),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// With the aspect locked the height follows.
    #[wasm_bindgen(setter)]
    pub fn set_width(&mut self, width: u32) {
        self.inner.set_width(width);
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// With the aspect locked the width follows.
    #[wasm_bindgen(setter)]
    pub fn set_height(&mut self, height: u32) {
        self.inner.set_height(height);
    }

    #[wasm_bindgen(getter)]
    pub fn lock_aspect(&self) -> bool {
        self.inner.lock_aspect
    }

    #[wasm_bindgen(setter)]
    pub fn set_lock_aspect(&mut self, lock: bool) {
        self.inner.lock_aspect = lock;
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.quality
    }

    #[wasm_bindgen(setter)]
    pub fn set_quality(&mut self, quality: u8) {
        self.inner.quality = quality.min(100);
    }

    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.inner.format.to_string()
    }

    /// Accepts a name, extension or MIME type.
    pub fn set_format(&mut self, format: &str) -> Result<(), JsValue> {
        self.inner.format = parse_format(format)?;
        Ok(())
    }

    /// Label of the applied preset, if the size still comes from one.
    #[wasm_bindgen(getter)]
    pub fn preset(&self) -> Option<String> {
        self.inner.preset.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn scale_percent(&self) -> u32 {
        self.inner.scale_percent()
    }

    /// Jump to a social preset by label. Unlocks the aspect.
    pub fn apply_preset(&mut self, label: &str) -> Result<(), JsValue> {
        let preset = find_preset(label)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown preset: {}", label)))?;
        self.inner.apply_preset(preset);
        Ok(())
    }

    /// Resize and encode `image` with these settings.
    pub fn apply(&self, image: &JsSourceImage) -> Result<JsEncodedImage, JsValue> {
        resize::resize_image(
            image.source(),
            self.inner.width,
            self.inner.height,
            self.inner.format,
            self.inner.quality_fraction(),
        )
        .map(JsEncodedImage::from_encoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Download name, e.g. `photo_resized_1080x1080.png`.
    pub fn file_name(&self, original: &str) -> String {
        text::export_file_name(
            original,
            &text::resized_suffix(self.inner.width, self.inner.height),
            self.inner.format,
        )
    }
}

/// Social media size presets as `[{label, width, height}, ...]`.
#[wasm_bindgen]
pub fn social_presets() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&SOCIAL_PRESETS).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[derive(Serialize)]
struct AspectOption {
    label: String,
    value: Option<f64>,
    aspect: AspectRatio,
}

fn aspect_options() -> Vec<AspectOption> {
    AspectRatio::PRESETS
        .iter()
        .map(|aspect| AspectOption {
            label: aspect.label(),
            value: aspect.value(),
            aspect: *aspect,
        })
        .collect()
}

/// Crop aspect choices as `[{label, value, aspect}, ...]`; `aspect` is the
/// object to put in the crop config.
#[wasm_bindgen]
pub fn aspect_presets() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&aspect_options()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `"1.5 KB"`-style size.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    text::format_file_size(bytes.max(0.0) as u64)
}

/// `{base}_{suffix}.{ext}` for `original`.
#[wasm_bindgen]
pub fn export_file_name(original: &str, suffix: &str, format: &str) -> Result<String, JsValue> {
    Ok(text::export_file_name(original, suffix, parse_format(format)?))
}

/// Export formats as MIME types, in menu order.
#[wasm_bindgen]
pub fn export_formats() -> Vec<String> {
    ExportFormat::ALL
        .iter()
        .map(|f| f.mime_type().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_config_lock() {
        let mut config = JsResizeConfig::new(1600, 900);
        config.set_width(800);
        assert_eq!(config.height(), 450);
        assert_eq!(config.scale_percent(), 50);

        config.set_lock_aspect(false);
        config.set_height(100);
        assert_eq!(config.width(), 800);
    }

    #[test]
    fn test_resize_file_name() {
        let mut config = JsResizeConfig::new(100, 100);
        config.set_width(64);
        assert_eq!(config.file_name("icon.jpeg"), "icon_resized_64x64.png");
    }

    #[test]
    fn test_resize_quality_capped() {
        let mut config = JsResizeConfig::new(10, 10);
        config.set_quality(250);
        assert_eq!(config.quality(), 100);
    }

    #[test]
    fn test_aspect_options() {
        let options = aspect_options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[0].label, "Free");
        assert_eq!(options[0].value, None);
        assert_eq!(options[3].label, "16:9");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0.0), "0 B");
        assert_eq!(format_file_size(-5.0), "0 B");
        assert_eq!(format_file_size(2048.0), "2 KB");
    }

    #[test]
    fn test_export_formats() {
        assert_eq!(export_formats(), ["image/png", "image/jpeg", "image/webp"]);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_apply_preset() {
        let mut config = JsResizeConfig::new(4000, 3000);
        config.apply_preset("Instagram Story").unwrap();
        assert_eq!((config.width(), config.height()), (1080, 1920));
        assert!(!config.lock_aspect());
        assert!(config.apply_preset("Nope").is_err());
    }

    #[wasm_bindgen_test]
    fn test_resize_apply() {
        let image = JsSourceImage::new(20, 10, vec![50u8; 20 * 10 * 4]).unwrap();
        let mut config = JsResizeConfig::new(20, 10);
        config.set_width(10);
        let out = config.apply(&image).unwrap();
        assert_eq!((out.width(), out.height()), (10, 5));
    }

    #[wasm_bindgen_test]
    fn test_analyze_invalid() {
        assert!(analyze_image(&[1, 2, 3], 3.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_convert_unknown_format() {
        assert!(convert_image(&[1, 2, 3], "tiff", 0.8).is_err());
    }

    #[wasm_bindgen_test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name("a.png", "converted", "webp").unwrap(),
            "a_converted.webp"
        );
    }

    #[wasm_bindgen_test]
    fn test_presets_serialise() {
        assert!(social_presets().unwrap().is_object());
        assert!(aspect_presets().unwrap().is_object());
    }
}
