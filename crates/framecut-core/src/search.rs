//! Target-size search: find an encoder quality whose output fits a byte
//! budget.
//!
//! # Algorithm
//!
//! 1. Render at the requested quality. If it fits, done
//! 2. Otherwise bisect on `[MIN_SEARCH_QUALITY, requested]` for exactly
//!    `SEARCH_ITERATIONS` rounds: too large moves the upper bound down,
//!    anything else moves the lower bound up
//!
//! Encoded size is treated as non-decreasing in quality but this is never
//! relied upon for correctness: the result is the best render seen, i.e. the
//! largest one that fits, or the smallest one when nothing fits.

use tracing::{debug, info};

use crate::decode::SourceImage;
use crate::encode::{encode_rgba, normalize_quality, EncodeSpec, EncodedImage};
use crate::geometry::SourceCropRegion;
use crate::render::{composite, RenderError};

/// Lower bound of the quality bisection.
pub const MIN_SEARCH_QUALITY: f64 = 0.05;

/// Number of bisection rounds after the initial render.
pub const SEARCH_ITERATIONS: usize = 10;

/// Result of a target-size search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub image: EncodedImage,
    /// Quality the returned image was encoded at.
    pub quality: f64,
    /// Number of encodes performed, 1 or `SEARCH_ITERATIONS + 1`.
    pub renders: usize,
    pub met_target: bool,
}

/// State of one bisection run.
///
/// Starts from the render at the requested quality, which is always the
/// first candidate.
#[derive(Debug, Clone)]
pub struct TargetSizeSearch {
    target_bytes: usize,
    low_quality: f64,
    high_quality: f64,
    best_quality: f64,
    best_result: EncodedImage,
}

impl TargetSizeSearch {
    pub fn new(target_bytes: usize, initial_quality: f64, initial: EncodedImage) -> Self {
        Self {
            target_bytes,
            low_quality: MIN_SEARCH_QUALITY,
            high_quality: initial_quality,
            best_quality: initial_quality,
            best_result: initial,
        }
    }

    pub fn target_bytes(&self) -> usize {
        self.target_bytes
    }

    /// Current `(low, high)` quality interval.
    pub fn interval(&self) -> (f64, f64) {
        (self.low_quality, self.high_quality)
    }

    pub fn midpoint(&self) -> f64 {
        (self.low_quality + self.high_quality) / 2.0
    }

    fn fits(&self, image: &EncodedImage) -> bool {
        image.byte_length() <= self.target_bytes
    }

    /// Whether the best candidate so far fits the budget.
    pub fn met_target(&self) -> bool {
        self.fits(&self.best_result)
    }

    /// Keep `image` if it beats the best candidate so far.
    pub fn consider(&mut self, quality: f64, image: EncodedImage) {
        let len = image.byte_length();
        let best_len = self.best_result.byte_length();
        let better = match (self.fits(&image), self.met_target()) {
            (true, false) => true,
            (true, true) => len > best_len,
            (false, false) => len < best_len,
            (false, true) => false,
        };
        if better {
            self.best_quality = quality;
            self.best_result = image;
        }
    }

    /// Narrow the interval with the render produced at `quality`.
    pub fn step(&mut self, quality: f64, image: EncodedImage) {
        if self.fits(&image) {
            self.low_quality = quality;
        } else {
            self.high_quality = quality;
        }
        self.consider(quality, image);
    }

    /// The best candidate and the quality it was encoded at.
    pub fn into_best(self) -> (f64, EncodedImage) {
        (self.best_quality, self.best_result)
    }
}

/// Run the bisection with an arbitrary renderer.
///
/// `render` is called with a quality in `0.0..=1.0` and must produce the
/// encoded output for it. Its errors are returned unchanged.
pub fn bisect_quality<E, F>(
    initial_quality: f64,
    target_bytes: usize,
    mut render: F,
) -> Result<SearchOutcome, E>
where
    F: FnMut(f64) -> Result<EncodedImage, E>,
{
    let initial_quality = normalize_quality(initial_quality);
    let initial = render(initial_quality)?;
    let mut search = TargetSizeSearch::new(target_bytes, initial_quality, initial);

    let mut renders = 1;
    if !search.met_target() {
        for iteration in 0..SEARCH_ITERATIONS {
            let quality = search.midpoint();
            let image = render(quality)?;
            renders += 1;
            debug!(
                iteration,
                quality,
                bytes = image.byte_length(),
                target_bytes,
                "size search step"
            );
            search.step(quality, image);
        }
    }

    let met_target = search.met_target();
    let (quality, image) = search.into_best();
    Ok(SearchOutcome {
        image,
        quality,
        renders,
        met_target,
    })
}

/// Render `region` so the encoded output fits in `target_bytes` if at all
/// possible.
///
/// PNG ignores quality, so it is rendered once and returned as is. For JPEG
/// and WebP the region is composited once and only the encode step is
/// repeated.
pub fn search_quality(
    source: &SourceImage,
    region: &SourceCropRegion,
    spec: &EncodeSpec,
    target_bytes: usize,
) -> Result<SearchOutcome, RenderError> {
    let pixels = composite(source, region, spec)?;

    let encode = |quality: f64| -> Result<EncodedImage, RenderError> {
        let bytes = encode_rgba(
            &pixels.pixels,
            pixels.width,
            pixels.height,
            spec.format,
            quality,
        )?;
        Ok(EncodedImage {
            bytes,
            format: spec.format,
            width: pixels.width,
            height: pixels.height,
        })
    };

    if !spec.format.is_lossy() {
        let image = encode(spec.quality)?;
        return Ok(SearchOutcome {
            met_target: image.byte_length() <= target_bytes,
            quality: spec.quality,
            renders: 1,
            image,
        });
    }

    let outcome = bisect_quality(spec.quality, target_bytes, encode)?;
    info!(
        format = %spec.format,
        quality = outcome.quality,
        bytes = outcome.image.byte_length(),
        target_bytes,
        renders = outcome.renders,
        met_target = outcome.met_target,
        "size search finished"
    );
    Ok(outcome)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
