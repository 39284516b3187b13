//! Letterbox geometry and coordinate mapping.
//!
//! The crop box lives in *display* space: the pixel grid of the fixed-size
//! viewport that shows the source image scaled to fit and centred. Export
//! needs the same rectangle in *source* space, the pixel grid of the
//! decoded image.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downwards
//! - `ViewportBounds` is the letterboxed footprint of the image inside the
//!   viewport, together with the uniform display scale
//! - `to_source_space` and `to_viewport_space` are inverses of each other for
//!   every bounds with a non-zero scale

use serde::{Deserialize, Serialize};

/// Fraction of the fitted image left free on each side of a fresh crop box.
pub const INITIAL_MARGIN: f64 = 0.1;

/// Tolerance used when checking containment of floating point rectangles.
const CONTAINMENT_EPSILON: f64 = 1e-9;

/// A point in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where the source image is drawn inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportBounds {
    /// Left edge of the drawn image in display pixels
    pub origin_x: f64,
    /// Top edge of the drawn image in display pixels
    pub origin_y: f64,
    /// Drawn width in display pixels
    pub width: f64,
    /// Drawn height in display pixels
    pub height: f64,
    /// Display pixels per source pixel
    pub scale: f64,
}

impl ViewportBounds {
    /// Bounds with no extent and unit scale.
    ///
    /// Returned for empty sources or viewports so that callers can keep
    /// dividing by `scale` without special cases.
    pub fn degenerate(origin_x: f64, origin_y: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            width: 0.0,
            height: 0.0,
            scale: 1.0,
        }
    }

    /// Check if the bounds have no drawable area.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Right edge of the drawn image.
    pub fn right(&self) -> f64 {
        self.origin_x + self.width
    }

    /// Bottom edge of the drawn image.
    pub fn bottom(&self) -> f64 {
        self.origin_y + self.height
    }

    /// Check whether `rect` lies fully inside these bounds.
    pub fn contains(&self, rect: &CropRect) -> bool {
        rect.x >= self.origin_x - CONTAINMENT_EPSILON
            && rect.y >= self.origin_y - CONTAINMENT_EPSILON
            && rect.right() <= self.right() + CONTAINMENT_EPSILON
            && rect.bottom() <= self.bottom() + CONTAINMENT_EPSILON
    }
}

/// The crop rectangle in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if `point` falls inside the rectangle (edges included).
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// The crop rectangle in source pixel space, as handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceCropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceCropRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering a whole `width x height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    /// Snap the region to whole pixels, as the export path does before
    /// rasterising.
    pub fn rounded(&self) -> Self {
        Self::new(
            self.x.round(),
            self.y.round(),
            self.width.round(),
            self.height.round(),
        )
    }
}

/// Compute where a `source_width x source_height` image is drawn inside a
/// `viewport_width x viewport_height` surface.
///
/// The image is scaled uniformly by
/// `min(viewport_width / source_width, viewport_height / source_height)` and
/// centred. A zero-sized source or viewport yields degenerate bounds (zero
/// extent, `scale = 1`) centred in the viewport instead of dividing by zero.
pub fn compute_bounds(
    viewport_width: f64,
    viewport_height: f64,
    source_width: u32,
    source_height: u32,
) -> ViewportBounds {
    let viewport_width = if viewport_width.is_finite() {
        viewport_width.max(0.0)
    } else {
        0.0
    };
    let viewport_height = if viewport_height.is_finite() {
        viewport_height.max(0.0)
    } else {
        0.0
    };

    if source_width == 0 || source_height == 0 || viewport_width == 0.0 || viewport_height == 0.0
    {
        return ViewportBounds::degenerate(viewport_width / 2.0, viewport_height / 2.0);
    }

    let (src_w, src_h) = (source_width as f64, source_height as f64);
    let scale = (viewport_width / src_w).min(viewport_height / src_h);
    let width = src_w * scale;
    let height = src_h * scale;

    ViewportBounds {
        origin_x: (viewport_width - width) / 2.0,
        origin_y: (viewport_height - height) / 2.0,
        width,
        height,
        scale,
    }
}

/// The crop box shown right after an image loads: the fitted image minus a
/// 10% margin on every side.
pub fn initial_crop_rect(bounds: &ViewportBounds) -> CropRect {
    CropRect {
        x: bounds.origin_x + bounds.width * INITIAL_MARGIN,
        y: bounds.origin_y + bounds.height * INITIAL_MARGIN,
        width: bounds.width * (1.0 - 2.0 * INITIAL_MARGIN),
        height: bounds.height * (1.0 - 2.0 * INITIAL_MARGIN),
    }
}

#[inline]
fn usable_scale(bounds: &ViewportBounds) -> f64 {
    if bounds.scale.is_finite() && bounds.scale > 0.0 {
        bounds.scale
    } else {
        1.0
    }
}

/// Map a display-space rectangle into source pixels.
///
/// Positions left of or above the drawn image are clamped to 0.
pub fn to_source_space(rect: &CropRect, bounds: &ViewportBounds) -> SourceCropRegion {
    let scale = usable_scale(bounds);
    SourceCropRegion {
        x: ((rect.x - bounds.origin_x) / scale).max(0.0),
        y: ((rect.y - bounds.origin_y) / scale).max(0.0),
        width: rect.width / scale,
        height: rect.height / scale,
    }
}

/// Map a source-space region back into display space.
pub fn to_viewport_space(region: &SourceCropRegion, bounds: &ViewportBounds) -> CropRect {
    let scale = usable_scale(bounds);
    CropRect {
        x: bounds.origin_x + region.x * scale,
        y: bounds.origin_y + region.y * scale,
        width: region.width * scale,
        height: region.height * scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_landscape_source_letterboxed_vertically() {
        let bounds = compute_bounds(500.0, 500.0, 1000, 500);
        assert_eq!(
            bounds,
            ViewportBounds {
                origin_x: 0.0,
                origin_y: 125.0,
                width: 500.0,
                height: 250.0,
                scale: 0.5,
            }
        );
    }

    #[test]
    fn test_portrait_source_letterboxed_horizontally() {
        let bounds = compute_bounds(800.0, 500.0, 300, 600);
        assert_close(bounds.scale, 500.0 / 600.0);
        assert_close(bounds.height, 500.0);
        assert_close(bounds.width, 250.0);
        assert_close(bounds.origin_x, 275.0);
        assert_close(bounds.origin_y, 0.0);
    }

    #[test]
    fn test_small_source_is_upscaled() {
        let bounds = compute_bounds(400.0, 400.0, 100, 100);
        assert_close(bounds.scale, 4.0);
        assert_close(bounds.width, 400.0);
    }

    #[test]
    fn test_zero_source_gives_degenerate_bounds() {
        for (w, h) in [(0, 100), (100, 0), (0, 0)] {
            let bounds = compute_bounds(500.0, 400.0, w, h);
            assert_eq!(bounds.scale, 1.0);
            assert_eq!(bounds.width, 0.0);
            assert_eq!(bounds.height, 0.0);
            assert!(bounds.is_degenerate());
            assert!(bounds.scale.is_finite());
        }
    }

    #[test]
    fn test_zero_viewport_gives_degenerate_bounds() {
        let bounds = compute_bounds(0.0, 0.0, 640, 480);
        assert_eq!(bounds.scale, 1.0);
        assert!(bounds.is_degenerate());

        let bounds = compute_bounds(f64::NAN, 300.0, 640, 480);
        assert!(bounds.is_degenerate());
    }

    #[test]
    fn test_degenerate_bounds_do_not_produce_nan() {
        let bounds = compute_bounds(500.0, 500.0, 0, 0);
        let region = to_source_space(&CropRect::new(10.0, 10.0, 50.0, 50.0), &bounds);
        assert!(region.x.is_finite() && region.width.is_finite());
    }

    #[test]
    fn test_initial_crop_rect_is_centred_80_percent() {
        let bounds = compute_bounds(500.0, 500.0, 1000, 500);
        let rect = initial_crop_rect(&bounds);
        assert_eq!(rect, CropRect::new(50.0, 150.0, 400.0, 200.0));
        assert!(bounds.contains(&rect));
    }

    #[test]
    fn test_to_source_space() {
        let bounds = compute_bounds(500.0, 500.0, 1000, 500);
        let region = to_source_space(&CropRect::new(50.0, 150.0, 400.0, 200.0), &bounds);
        assert_eq!(region, SourceCropRegion::new(100.0, 50.0, 800.0, 400.0));
    }

    #[test]
    fn test_to_source_space_clamps_negative_offsets() {
        let bounds = compute_bounds(500.0, 500.0, 1000, 500);
        let region = to_source_space(&CropRect::new(-10.0, 100.0, 40.0, 40.0), &bounds);
        assert_eq!(region.x, 0.0);
        assert_eq!(region.y, 0.0);
    }

    #[test]
    fn test_to_viewport_space_inverts_to_source_space() {
        let bounds = compute_bounds(640.0, 480.0, 1920, 1080);
        let rect = CropRect::new(100.0, 120.0, 300.0, 150.0);
        let back = to_viewport_space(&to_source_space(&rect, &bounds), &bounds);
        assert_close(back.x, rect.x);
        assert_close(back.y, rect.y);
        assert_close(back.width, rect.width);
        assert_close(back.height, rect.height);
    }

    #[test]
    fn test_contains_tolerates_rounding() {
        let bounds = compute_bounds(500.0, 500.0, 1000, 500);
        let rect = CropRect::new(0.0, 125.0, 500.0 + 1e-12, 250.0);
        assert!(bounds.contains(&rect));
        let outside = CropRect::new(0.0, 124.0, 500.0, 250.0);
        assert!(!bounds.contains(&outside));
    }

    #[test]
    fn test_region_rounding() {
        let region = SourceCropRegion::new(10.4, 10.6, 99.5, 20.49);
        assert_eq!(region.rounded(), SourceCropRegion::new(10.0, 11.0, 100.0, 20.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
