//! Crop session settings: aspect ratio, transform, export format and the
//! optional size budget.
//!
//! `CropConfig` is what the UI sends across the wasm boundary as a plain
//! object. Values arrive unvalidated and are clamped by [`CropConfig::normalized`]
//! before use.

use serde::{Deserialize, Serialize};

use crate::decode::SourceImage;
use crate::encode::{EncodeSpec, EncodedImage, ExportFormat};
use crate::geometry::SourceCropRegion;
use crate::render::{render, RenderError};
use crate::search::search_quality;
use crate::text;

/// Slider range for export quality, in percent.
pub const MIN_QUALITY_PERCENT: u8 = 10;
pub const MAX_QUALITY_PERCENT: u8 = 100;
pub const DEFAULT_QUALITY_PERCENT: u8 = 92;

/// Rotation slider range, in degrees.
pub const MAX_ROTATION_DEGREES: f64 = 180.0;

/// Largest accepted size budget, in KB.
pub const MAX_TARGET_SIZE_KB: u32 = 50_000;
/// Budget offered when the user first enables it.
pub const DEFAULT_TARGET_SIZE_KB: u32 = 500;

/// Largest custom ratio part.
pub const MAX_CUSTOM_PART: u32 = 100;

/// Suffix appended to exported crop file names.
pub const EXPORT_SUFFIX: &str = "edited";

/// Aspect constraint for the crop box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AspectRatio {
    #[default]
    Free,
    Square,
    FourThree,
    SixteenNine,
    TwentyOneNine,
    NineSixteen,
    Custom {
        width: u32,
        height: u32,
    },
}

impl AspectRatio {
    /// The fixed choices, in display order. `Custom` is built by the caller.
    pub const PRESETS: [AspectRatio; 6] = [
        AspectRatio::Free,
        AspectRatio::Square,
        AspectRatio::FourThree,
        AspectRatio::SixteenNine,
        AspectRatio::TwentyOneNine,
        AspectRatio::NineSixteen,
    ];

    pub fn label(&self) -> String {
        match self {
            AspectRatio::Free => "Free".to_string(),
            AspectRatio::Square => "1:1".to_string(),
            AspectRatio::FourThree => "4:3".to_string(),
            AspectRatio::SixteenNine => "16:9".to_string(),
            AspectRatio::TwentyOneNine => "21:9".to_string(),
            AspectRatio::NineSixteen => "9:16".to_string(),
            AspectRatio::Custom { width, height } => format!("{}:{}", width, height),
        }
    }

    /// Width over height, or `None` when the box is unconstrained.
    ///
    /// A custom ratio with a zero part counts as free.
    pub fn value(&self) -> Option<f64> {
        match *self {
            AspectRatio::Free => None,
            AspectRatio::Square => Some(1.0),
            AspectRatio::FourThree => Some(4.0 / 3.0),
            AspectRatio::SixteenNine => Some(16.0 / 9.0),
            AspectRatio::TwentyOneNine => Some(21.0 / 9.0),
            AspectRatio::NineSixteen => Some(9.0 / 16.0),
            AspectRatio::Custom { width, height } if width > 0 && height > 0 => {
                Some(width as f64 / height as f64)
            }
            AspectRatio::Custom { .. } => None,
        }
    }

    fn normalized(self) -> Self {
        match self {
            AspectRatio::Custom { width, height } => AspectRatio::Custom {
                width: width.min(MAX_CUSTOM_PART),
                height: height.min(MAX_CUSTOM_PART),
            },
            other => other,
        }
    }
}

/// Everything the user can set for one crop export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    pub aspect_ratio: AspectRatio,
    /// Clockwise degrees, -180 to 180.
    pub rotation_degrees: f64,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub export_format: ExportFormat,
    /// Percent, 10 to 100.
    pub quality: u8,
    /// Size budget in KB; `None` when disabled.
    pub target_size_kb: Option<u32>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Free,
            rotation_degrees: 0.0,
            flip_horizontal: false,
            flip_vertical: false,
            export_format: ExportFormat::Png,
            quality: DEFAULT_QUALITY_PERCENT,
            target_size_kb: None,
        }
    }
}

impl CropConfig {
    /// Clamp every field into the range the controls allow.
    pub fn normalized(mut self) -> Self {
        self.aspect_ratio = self.aspect_ratio.normalized();
        self.rotation_degrees = if self.rotation_degrees.is_finite() {
            self.rotation_degrees
                .clamp(-MAX_ROTATION_DEGREES, MAX_ROTATION_DEGREES)
        } else {
            0.0
        };
        self.quality = self.quality.clamp(MIN_QUALITY_PERCENT, MAX_QUALITY_PERCENT);
        self.target_size_kb = match self.target_size_kb {
            Some(0) | None => None,
            Some(kb) => Some(kb.min(MAX_TARGET_SIZE_KB)),
        };
        self
    }

    pub fn quality_fraction(&self) -> f64 {
        self.quality as f64 / 100.0
    }

    /// Encode parameters at the chosen quality.
    pub fn encode_spec(&self) -> EncodeSpec {
        EncodeSpec::new(self.export_format)
            .with_quality(self.quality_fraction())
            .with_rotation(self.rotation_degrees)
            .with_flips(self.flip_horizontal, self.flip_vertical)
    }

    /// Budget in bytes, when one applies. PNG ignores quality, so it never
    /// has a budget.
    pub fn target_bytes(&self) -> Option<usize> {
        match self.target_size_kb {
            Some(kb) if kb > 0 && self.export_format.is_lossy() => Some(kb as usize * 1024),
            _ => None,
        }
    }

    /// Render the final export, searching for a quality under the budget
    /// when one is set.
    pub fn export(
        &self,
        source: &SourceImage,
        region: &SourceCropRegion,
    ) -> Result<EncodedImage, RenderError> {
        let config = self.normalized();
        let spec = config.encode_spec();
        match config.target_bytes() {
            Some(target) => Ok(search_quality(source, region, &spec, target)?.image),
            None => render(source, region, &spec),
        }
    }

    /// Download name for the export of `original`.
    pub fn export_file_name(&self, original: &str) -> String {
        text::export_file_name(original, EXPORT_SUFFIX, self.export_format)
    }

    /// Back to defaults, as the reset button does.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
