//! Book-keeping for the preview object URL.
//!
//! The slot only stores the URL string; creating and revoking it stays in
//! JS, where `URL.createObjectURL` lives.
//!
//! ```typescript
//! const previous = slot.replace(URL.createObjectURL(blob));
//! if (previous) URL.revokeObjectURL(previous);
//! ```

use framecut_core::preview::PreviewSlot;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Default)]
pub struct JsPreviewSlot {
    inner: PreviewSlot<String>,
}

#[wasm_bindgen]
impl JsPreviewSlot {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsPreviewSlot {
        JsPreviewSlot::default()
    }

    /// Store `url`, returning the URL it displaces so it can be revoked.
    pub fn replace(&mut self, url: String) -> Option<String> {
        self.inner.replace(url)
    }

    /// Empty the slot, returning the URL to revoke.
    pub fn release(&mut self) -> Option<String> {
        self.inner.release()
    }

    #[wasm_bindgen(getter)]
    pub fn current(&self) -> Option<String> {
        self.inner.current().cloned()
    }
}
