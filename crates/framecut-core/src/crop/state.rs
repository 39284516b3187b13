//! The crop box and the pointer-drag state machine that edits it.
//!
//! # States
//!
//! - `Idle`: no gesture in progress
//! - `Dragging`: a pointer went down on the box body or a handle
//!
//! Every pointer-move while dragging recomputes the rectangle from the rect
//! and pointer position captured at pointer-down, never from the live rect,
//! so a long gesture cannot accumulate rounding drift.
//!
//! # Invariants
//!
//! After any mutation the rectangle lies inside the viewport bounds and is at
//! least `MIN_SIZE` on each side. When the drawn image itself is narrower
//! than `MIN_SIZE` the image extent wins and the box fills that axis.

use crate::crop::handle::{EdgeSide, HandleKind};
use crate::geometry::{
    initial_crop_rect, to_source_space, to_viewport_space, CropRect, Point, SourceCropRegion,
    ViewportBounds,
};

/// Smallest crop box edge in display pixels.
pub const MIN_SIZE: f64 = 30.0;

/// A gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragInteraction {
    pub handle: HandleKind,
    pub start_pointer: Point,
    pub start_rect: CropRect,
}

/// State of the pointer-drag machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragInteraction),
}

/// Apply a drag delta to `start` as seen from `handle`, without clamping.
///
/// Resizing handles keep the opposite edge fixed and never shrink below
/// `MIN_SIZE`; `Move` translates.
pub fn resize_rect(start: &CropRect, handle: HandleKind, dx: f64, dy: f64) -> CropRect {
    let mut rect = *start;

    if handle == HandleKind::Move {
        rect.x = start.x + dx;
        rect.y = start.y + dy;
        return rect;
    }

    match handle.horizontal() {
        EdgeSide::Start => {
            let width = (start.width - dx).max(MIN_SIZE);
            rect.x = start.x + (start.width - width);
            rect.width = width;
        }
        EdgeSide::End => rect.width = (start.width + dx).max(MIN_SIZE),
        EdgeSide::None => {}
    }

    match handle.vertical() {
        EdgeSide::Start => {
            let height = (start.height - dy).max(MIN_SIZE);
            rect.y = start.y + (start.height - height);
            rect.height = height;
        }
        EdgeSide::End => rect.height = (start.height + dy).max(MIN_SIZE),
        EdgeSide::None => {}
    }

    rect
}

#[inline]
fn clamp_extent(size: f64, extent: f64) -> f64 {
    let extent = extent.max(0.0);
    size.max(MIN_SIZE.min(extent)).min(extent)
}

/// Force `rect` inside `bounds`.
///
/// Size is clamped before position: a size no larger than the bounds is
/// what makes the position clamp satisfiable.
pub fn clamp_rect(rect: &CropRect, bounds: &ViewportBounds) -> CropRect {
    let width = clamp_extent(rect.width, bounds.width);
    let height = clamp_extent(rect.height, bounds.height);

    let x = rect.x.min(bounds.right() - width).max(bounds.origin_x);
    let y = rect.y.min(bounds.bottom() - height).max(bounds.origin_y);

    // NaN positions collapse to the bounds origin.
    let x = if x.is_finite() { x } else { bounds.origin_x };
    let y = if y.is_finite() { y } else { bounds.origin_y };

    CropRect {
        x,
        y,
        width,
        height,
    }
}

/// Clamp a ratio-locked size to the bounds, keeping the ratio where the
/// bounds allow it.
fn fit_locked_size(width: f64, height: f64, ratio: f64, bounds: &ViewportBounds) -> (f64, f64) {
    let max_w = bounds.width.max(0.0);
    let max_h = bounds.height.max(0.0);
    let (mut w, mut h) = (width, height);

    if w < MIN_SIZE.min(max_w) {
        w = MIN_SIZE.min(max_w);
        h = w / ratio;
    }
    if h < MIN_SIZE.min(max_h) {
        h = MIN_SIZE.min(max_h);
        w = h * ratio;
    }
    if w > max_w {
        w = max_w;
        h = w / ratio;
    }
    if h > max_h {
        h = max_h;
        w = h * ratio;
    }

    (w, h)
}

/// Resize with the width/height ratio locked.
fn resize_locked(
    start: &CropRect,
    handle: HandleKind,
    dx: f64,
    dy: f64,
    ratio: f64,
    bounds: &ViewportBounds,
) -> CropRect {
    let free = resize_rect(start, handle, dx, dy);

    let (w, h) = match (handle.horizontal(), handle.vertical()) {
        (EdgeSide::None, _) => (free.height * ratio, free.height),
        (_, EdgeSide::None) => (free.width, free.width / ratio),
        _ => {
            // The axis that moved further (relative to its size) drives.
            let rel_w = (free.width - start.width).abs() / start.width.max(f64::EPSILON);
            let rel_h = (free.height - start.height).abs() / start.height.max(f64::EPSILON);
            if rel_w >= rel_h {
                (free.width, free.width / ratio)
            } else {
                (free.height * ratio, free.height)
            }
        }
    };
    let (w, h) = fit_locked_size(w, h, ratio, bounds);

    let center = start.center();
    let x = match handle.horizontal() {
        EdgeSide::Start => start.right() - w,
        EdgeSide::End => start.x,
        EdgeSide::None => center.x - w / 2.0,
    };
    let y = match handle.vertical() {
        EdgeSide::Start => start.bottom() - h,
        EdgeSide::End => start.y,
        EdgeSide::None => center.y - h / 2.0,
    };

    clamp_rect(&CropRect::new(x, y, w, h), bounds)
}

/// Largest rect of `ratio` inside `rect`, centred on it.
fn fit_to_ratio(rect: &CropRect, ratio: f64, bounds: &ViewportBounds) -> CropRect {
    let (w, h) = if rect.width / rect.height.max(f64::EPSILON) > ratio {
        (rect.height * ratio, rect.height)
    } else {
        (rect.width, rect.width / ratio)
    };
    let (w, h) = fit_locked_size(w, h, ratio, bounds);
    let center = rect.center();
    clamp_rect(
        &CropRect::new(center.x - w / 2.0, center.y - h / 2.0, w, h),
        bounds,
    )
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// The interactive crop box.
///
/// Owns the display-space rectangle, the optional aspect lock and the
/// ephemeral drag interaction. Callers feed pointer events in arrival order
/// and forward the returned `SourceCropRegion` to whatever needs it.
#[derive(Debug, Clone)]
pub struct CropBox {
    bounds: ViewportBounds,
    rect: CropRect,
    aspect_ratio: Option<f64>,
    drag: DragState,
}

impl CropBox {
    /// Create a crop box for freshly loaded image bounds.
    pub fn new(bounds: ViewportBounds) -> Self {
        Self {
            bounds,
            rect: clamp_rect(&initial_crop_rect(&bounds), &bounds),
            aspect_ratio: None,
            drag: DragState::Idle,
        }
    }

    /// Create a crop box with an aspect lock already applied.
    pub fn with_aspect_ratio(bounds: ViewportBounds, ratio: Option<f64>) -> Self {
        let mut crop = Self::new(bounds);
        crop.set_aspect_ratio(ratio);
        crop
    }

    pub fn bounds(&self) -> &ViewportBounds {
        &self.bounds
    }

    pub fn rect(&self) -> &CropRect {
        &self.rect
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging(_))
    }

    /// Handle of the gesture in progress, if any.
    pub fn active_handle(&self) -> Option<HandleKind> {
        match self.drag {
            DragState::Dragging(interaction) => Some(interaction.handle),
            DragState::Idle => None,
        }
    }

    /// Current rectangle in source pixels.
    pub fn source_region(&self) -> SourceCropRegion {
        to_source_space(&self.rect, &self.bounds)
    }

    /// Find what a pointer-down at `point` would grab.
    ///
    /// Handles take precedence over the box body; among overlapping handles
    /// the one painted last wins.
    pub fn hit_test(&self, point: Point) -> Option<HandleKind> {
        HandleKind::RESIZE_HANDLES
            .iter()
            .rev()
            .copied()
            .find(|handle| handle.hit(&self.rect, point))
            .or_else(|| HandleKind::Move.hit(&self.rect, point).then_some(HandleKind::Move))
    }

    /// Start a gesture. Replaces any gesture already in progress.
    pub fn pointer_down(&mut self, point: Point, handle: HandleKind) {
        self.drag = DragState::Dragging(DragInteraction {
            handle,
            start_pointer: point,
            start_rect: self.rect,
        });
    }

    /// Continue the gesture.
    ///
    /// Returns the updated source region, or `None` when no gesture is in
    /// progress.
    pub fn pointer_move(&mut self, point: Point) -> Option<SourceCropRegion> {
        let DragState::Dragging(interaction) = self.drag else {
            return None;
        };

        let dx = finite_or_zero(point.x - interaction.start_pointer.x);
        let dy = finite_or_zero(point.y - interaction.start_pointer.y);

        self.rect = match (interaction.handle, self.aspect_ratio) {
            (HandleKind::Move, _) | (_, None) => clamp_rect(
                &resize_rect(&interaction.start_rect, interaction.handle, dx, dy),
                &self.bounds,
            ),
            (handle, Some(ratio)) => {
                resize_locked(&interaction.start_rect, handle, dx, dy, ratio, &self.bounds)
            }
        };

        Some(self.source_region())
    }

    /// End the gesture. Always returns to `Idle`.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Lock (or with `None`, unlock) the width/height ratio.
    ///
    /// Locking refits the box to the largest rectangle of that ratio inside
    /// the current one. Non-positive or non-finite ratios unlock.
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> SourceCropRegion {
        self.aspect_ratio = ratio.filter(|r| r.is_finite() && *r > 0.0);
        if let Some(ratio) = self.aspect_ratio {
            self.rect = fit_to_ratio(&self.rect, ratio, &self.bounds);
        }
        self.source_region()
    }

    /// Replace the rectangle, clamping it into the bounds.
    pub fn set_rect(&mut self, rect: CropRect) -> SourceCropRegion {
        self.rect = match self.aspect_ratio {
            Some(ratio) => fit_to_ratio(&rect, ratio, &self.bounds),
            None => clamp_rect(&rect, &self.bounds),
        };
        self.source_region()
    }

    /// React to a viewport resize.
    ///
    /// The box keeps covering the same source pixels; any gesture in progress
    /// is dropped since its start rect belongs to the old bounds.
    pub fn set_bounds(&mut self, bounds: ViewportBounds) -> SourceCropRegion {
        let rect = if self.bounds.is_degenerate() {
            initial_crop_rect(&bounds)
        } else {
            to_viewport_space(&self.source_region(), &bounds)
        };
        self.bounds = bounds;
        self.drag = DragState::Idle;
        self.set_rect(rect)
    }

    /// Back to the initial centred box. The aspect lock is kept.
    pub fn reset(&mut self) -> SourceCropRegion {
        self.drag = DragState::Idle;
        self.set_rect(initial_crop_rect(&self.bounds))
    }

    /// The four dimming panels around the box: top, bottom, left, right.
    pub fn overlay_regions(&self, viewport_width: f64, viewport_height: f64) -> [CropRect; 4] {
        let r = &self.rect;
        [
            CropRect::new(r.x, 0.0, r.width, r.y.max(0.0)),
            CropRect::new(
                r.x,
                r.bottom(),
                r.width,
                (viewport_height - r.bottom()).max(0.0),
            ),
            CropRect::new(0.0, 0.0, r.x.max(0.0), viewport_height),
            CropRect::new(r.right(), 0.0, (viewport_width - r.right()).max(0.0), viewport_height),
        ]
    }

    /// Rule-of-thirds guides as line segments: two verticals, two horizontals.
    pub fn thirds_grid(&self) -> [(Point, Point); 4] {
        let r = &self.rect;
        let x1 = r.x + r.width / 3.0;
        let x2 = r.x + r.width * 2.0 / 3.0;
        let y1 = r.y + r.height / 3.0;
        let y2 = r.y + r.height * 2.0 / 3.0;
        [
            (Point::new(x1, r.y), Point::new(x1, r.bottom())),
            (Point::new(x2, r.y), Point::new(x2, r.bottom())),
            (Point::new(r.x, y1), Point::new(r.right(), y1)),
            (Point::new(r.x, y2), Point::new(r.right(), y2)),
        ]
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
