//! Debounced size estimate for the export readout.
//!
//! JS calls `request()` on every settings change and `poll()` from a timer;
//! only the newest request ever produces a number.
//!
//! ```typescript
//! const estimator = new JsEstimator();
//! function onChange() {
//!   estimator.request();
//!   setTimeout(() => {
//!     const label = estimator.poll(image, crop.region, config);
//!     if (label !== undefined) sizeEl.textContent = label;
//!   }, estimator.quiet_period_ms);
//! }
//! ```

use crate::render::config_from_js;
use crate::types::{JsCropRegion, JsSourceImage};
use framecut_core::config::CropConfig;
use framecut_core::decode::SourceImage;
use framecut_core::estimate::{estimate_size, EstimateScheduler, SizeEstimate, QUIET_PERIOD_MS};
use framecut_core::geometry::SourceCropRegion;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct JsEstimator {
    scheduler: EstimateScheduler,
    estimate: SizeEstimate,
}

impl Default for JsEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsEstimator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsEstimator {
        JsEstimator {
            scheduler: EstimateScheduler::new(),
            estimate: SizeEstimate::Unavailable,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn quiet_period_ms(&self) -> f64 {
        QUIET_PERIOD_MS
    }

    /// Settings changed: supersede any pending estimate.
    pub fn request(&mut self) -> f64 {
        self.request_at(js_sys::Date::now())
    }

    /// Run the pending estimate if its quiet period is over.
    ///
    /// Returns the new readout label, or `undefined` when nothing was due.
    pub fn poll(
        &mut self,
        image: &JsSourceImage,
        region: &JsCropRegion,
        config: JsValue,
    ) -> Result<Option<String>, JsValue> {
        let config = config_from_js(config)?;
        let label = self.poll_at(js_sys::Date::now(), image.source(), &(*region).into(), &config);
        Ok(label)
    }

    /// Drop any pending estimate, e.g. when the image is closed.
    pub fn cancel(&mut self) {
        self.scheduler.cancel();
        self.estimate = SizeEstimate::Unavailable;
    }

    /// Current readout text.
    #[wasm_bindgen(getter)]
    pub fn label(&self) -> String {
        self.estimate.label()
    }

    /// Estimated byte count, when one is available.
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Option<usize> {
        match self.estimate {
            SizeEstimate::Ready(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl JsEstimator {
    /// Returns the ticket generation.
    pub(crate) fn request_at(&mut self, now_ms: f64) -> f64 {
        self.estimate = SizeEstimate::Calculating;
        self.scheduler.schedule(now_ms).generation as f64
    }

    pub(crate) fn poll_at(
        &mut self,
        now_ms: f64,
        source: &SourceImage,
        region: &SourceCropRegion,
        config: &CropConfig,
    ) -> Option<String> {
        let ticket = self.scheduler.take_due(now_ms)?;
        let result = estimate_size(source, region, config);
        if !self.scheduler.accept(&ticket) {
            return None;
        }

        self.estimate = match result {
            Ok(bytes) => SizeEstimate::Ready(bytes),
            Err(e) => {
                report_failure(&e.to_string());
                SizeEstimate::Unavailable
            }
        };
        Some(self.estimate.label())
    }
}

#[cfg(target_arch = "wasm32")]
fn report_failure(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(&format!("size estimate failed: {}", message)));
}

#[cfg(not(target_arch = "wasm32"))]
fn report_failure(_message: &str) {}
