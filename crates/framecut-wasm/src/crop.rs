//! WASM bindings for the interactive crop box.
//!
//! The UI forwards pointer events in viewport coordinates and reads back
//! the source-space region after each change.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const crop = new JsCropBox(el.clientWidth, el.clientHeight, image.width, image.height);
//!
//! el.onpointerdown = (e) => crop.pointer_down_at(e.offsetX, e.offsetY);
//! el.onpointermove = (e) => {
//!   const region = crop.pointer_move(e.offsetX, e.offsetY);
//!   if (region) scheduleEstimate(region);
//!   el.style.cursor = crop.cursor_at(e.offsetX, e.offsetY);
//! };
//! el.onpointerup = () => crop.pointer_up();
//! ```

use crate::types::JsCropRegion;
use framecut_core::crop::{CropBox, HandleKind};
use framecut_core::geometry::{compute_bounds, Point};
use wasm_bindgen::prelude::*;

/// Crop box state for one loaded image.
#[wasm_bindgen]
pub struct JsCropBox {
    inner: CropBox,
    source_width: u32,
    source_height: u32,
}

#[wasm_bindgen]
impl JsCropBox {
    /// Fit a `source_width x source_height` image into the viewport and
    /// place the initial crop box.
    #[wasm_bindgen(constructor)]
    pub fn new(
        viewport_width: f64,
        viewport_height: f64,
        source_width: u32,
        source_height: u32,
    ) -> JsCropBox {
        let bounds = compute_bounds(viewport_width, viewport_height, source_width, source_height);
        JsCropBox {
            inner: CropBox::new(bounds),
            source_width,
            source_height,
        }
    }

    /// The viewport was resized. Keeps the same source region.
    pub fn set_viewport(&mut self, viewport_width: f64, viewport_height: f64) -> JsCropRegion {
        let bounds = compute_bounds(
            viewport_width,
            viewport_height,
            self.source_width,
            self.source_height,
        );
        self.inner.set_bounds(bounds).into()
    }

    /// Current region in source pixels.
    #[wasm_bindgen(getter)]
    pub fn region(&self) -> JsCropRegion {
        self.inner.source_region().into()
    }

    /// Current crop rectangle in viewport pixels, as `{x, y, width, height}`.
    pub fn rect(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.rect())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Displayed image bounds, as `{originX, originY, width, height, scale}`.
    pub fn bounds(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.bounds())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    /// Code of the handle being dragged (`"tl"`, `"move"`, ...).
    #[wasm_bindgen(getter)]
    pub fn active_handle(&self) -> Option<String> {
        self.inner.active_handle().map(|h| h.code().to_string())
    }

    /// Handle code under the point, if any.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<String> {
        self.inner
            .hit_test(Point::new(x, y))
            .map(|h| h.code().to_string())
    }

    /// CSS cursor for the point: the dragged handle's while dragging.
    pub fn cursor_at(&self, x: f64, y: f64) -> String {
        self.inner
            .active_handle()
            .or_else(|| self.inner.hit_test(Point::new(x, y)))
            .map_or("default", HandleKind::cursor)
            .to_string()
    }

    /// Start a drag on an explicit handle code.
    pub fn pointer_down(&mut self, x: f64, y: f64, handle: &str) -> Result<(), JsValue> {
        let handle = handle
            .parse::<HandleKind>()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner.pointer_down(Point::new(x, y), handle);
        Ok(())
    }

    /// Hit-test and start a drag on whatever is under the point.
    ///
    /// Returns the grabbed handle code, or `undefined` when the point
    /// misses the box.
    pub fn pointer_down_at(&mut self, x: f64, y: f64) -> Option<String> {
        let point = Point::new(x, y);
        let handle = self.inner.hit_test(point)?;
        self.inner.pointer_down(point, handle);
        Some(handle.code().to_string())
    }

    /// Returns the new region, or `undefined` when no drag is active.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<JsCropRegion> {
        self.inner.pointer_move(Point::new(x, y)).map(Into::into)
    }

    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    /// Lock to `ratio` (width / height), or unlock with `undefined`.
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> JsCropRegion {
        self.inner.set_aspect_ratio(ratio).into()
    }

    #[wasm_bindgen(getter)]
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.inner.aspect_ratio()
    }

    /// Back to the initial box, cancelling any drag.
    pub fn reset(&mut self) -> JsCropRegion {
        self.inner.reset().into()
    }

    /// The four dimming rectangles around the box (top, bottom, left,
    /// right) as an array of `{x, y, width, height}`.
    pub fn overlay_regions(
        &self,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.overlay_regions(viewport_width, viewport_height))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Rule-of-thirds guides as `[[from, to], ...]` point pairs.
    pub fn thirds_grid(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.thirds_grid())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Anchor positions of the eight resize handles, in paint order, as
    /// `[{handle, x, y}, ...]`.
    pub fn handles(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.handle_anchors())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[derive(serde::Serialize)]
struct HandleAnchor {
    handle: &'static str,
    x: f64,
    y: f64,
}

impl JsCropBox {
    fn handle_anchors(&self) -> Vec<HandleAnchor> {
        let rect = self.inner.rect();
        HandleKind::RESIZE_HANDLES
            .iter()
            .map(|handle| {
                let anchor = handle.anchor(rect);
                HandleAnchor {
                    handle: handle.code(),
                    x: anchor.x,
                    y: anchor.y,
                }
            })
            .collect()
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_pointer_down_unknown_handle() {
        let mut crop = JsCropBox::new(100.0, 100.0, 100, 100);
        assert!(crop.pointer_down(10.0, 10.0, "north").is_err());
        assert!(crop.pointer_down(10.0, 10.0, "tl").is_ok());
        assert_eq!(crop.active_handle().as_deref(), Some("tl"));
    }

    #[wasm_bindgen_test]
    fn test_geometry_serialises() {
        let crop = JsCropBox::new(100.0, 100.0, 100, 100);
        assert!(crop.rect().unwrap().is_object());
        assert!(crop.overlay_regions(100.0, 100.0).unwrap().is_object());
        assert!(crop.thirds_grid().unwrap().is_object());
        assert!(crop.handles().unwrap().is_object());
    }
}
