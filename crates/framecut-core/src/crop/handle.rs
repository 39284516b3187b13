//! Drag targets on the crop box: the box body and its 8 resize handles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{CropRect, Point};

/// Hit area of a corner handle, in display pixels.
pub const CORNER_HANDLE_SIZE: f64 = 14.0;

/// Hit area of an edge-midpoint handle, in display pixels.
pub const EDGE_HANDLE_SIZE: f64 = 10.0;

/// What a pointer-down grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandleKind {
    /// The box body: translate without resizing.
    Move,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    TopMiddle,
    BottomMiddle,
    MiddleLeft,
    MiddleRight,
}

/// Which edge of the rectangle a handle drags along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSide {
    /// The handle drags the left (or top) edge.
    Start,
    /// The handle drags the right (or bottom) edge.
    End,
    /// The handle does not resize along this axis.
    None,
}

impl HandleKind {
    /// The 8 resize handles in paint order (later entries are drawn on top).
    pub const RESIZE_HANDLES: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::TopRight,
        HandleKind::BottomLeft,
        HandleKind::BottomRight,
        HandleKind::TopMiddle,
        HandleKind::BottomMiddle,
        HandleKind::MiddleLeft,
        HandleKind::MiddleRight,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft
                | HandleKind::TopRight
                | HandleKind::BottomLeft
                | HandleKind::BottomRight
        )
    }

    pub fn is_resize(self) -> bool {
        self != HandleKind::Move
    }

    /// Edge dragged along the x axis.
    pub fn horizontal(self) -> EdgeSide {
        match self {
            HandleKind::TopLeft | HandleKind::BottomLeft | HandleKind::MiddleLeft => {
                EdgeSide::Start
            }
            HandleKind::TopRight | HandleKind::BottomRight | HandleKind::MiddleRight => {
                EdgeSide::End
            }
            _ => EdgeSide::None,
        }
    }

    /// Edge dragged along the y axis.
    pub fn vertical(self) -> EdgeSide {
        match self {
            HandleKind::TopLeft | HandleKind::TopRight | HandleKind::TopMiddle => EdgeSide::Start,
            HandleKind::BottomLeft | HandleKind::BottomRight | HandleKind::BottomMiddle => {
                EdgeSide::End
            }
            _ => EdgeSide::None,
        }
    }

    /// The handle diagonally (or directly) across the box.
    pub fn opposite(self) -> HandleKind {
        match self {
            HandleKind::Move => HandleKind::Move,
            HandleKind::TopLeft => HandleKind::BottomRight,
            HandleKind::TopRight => HandleKind::BottomLeft,
            HandleKind::BottomLeft => HandleKind::TopRight,
            HandleKind::BottomRight => HandleKind::TopLeft,
            HandleKind::TopMiddle => HandleKind::BottomMiddle,
            HandleKind::BottomMiddle => HandleKind::TopMiddle,
            HandleKind::MiddleLeft => HandleKind::MiddleRight,
            HandleKind::MiddleRight => HandleKind::MiddleLeft,
        }
    }

    /// CSS cursor shown while hovering the handle.
    pub fn cursor(self) -> &'static str {
        match self {
            HandleKind::Move => "move",
            HandleKind::TopLeft | HandleKind::BottomRight => "nwse-resize",
            HandleKind::TopRight | HandleKind::BottomLeft => "nesw-resize",
            HandleKind::TopMiddle | HandleKind::BottomMiddle => "ns-resize",
            HandleKind::MiddleLeft | HandleKind::MiddleRight => "ew-resize",
        }
    }

    /// Side length of the square hit area centred on the handle.
    pub fn hit_size(self) -> f64 {
        match self {
            HandleKind::Move => 0.0,
            h if h.is_corner() => CORNER_HANDLE_SIZE,
            _ => EDGE_HANDLE_SIZE,
        }
    }

    /// Where the handle sits on `rect`. `Move` maps to the centre.
    pub fn anchor(self, rect: &CropRect) -> Point {
        let x = match self.horizontal() {
            EdgeSide::Start => rect.x,
            EdgeSide::End => rect.right(),
            EdgeSide::None => rect.x + rect.width / 2.0,
        };
        let y = match self.vertical() {
            EdgeSide::Start => rect.y,
            EdgeSide::End => rect.bottom(),
            EdgeSide::None => rect.y + rect.height / 2.0,
        };
        Point::new(x, y)
    }

    /// Check whether `point` lands on this handle's hit area.
    pub fn hit(self, rect: &CropRect, point: Point) -> bool {
        if self == HandleKind::Move {
            return rect.contains_point(point);
        }
        let anchor = self.anchor(rect);
        let half = self.hit_size() / 2.0;
        (point.x - anchor.x).abs() <= half && (point.y - anchor.y).abs() <= half
    }

    /// Short code used by the UI layer.
    pub fn code(self) -> &'static str {
        match self {
            HandleKind::Move => "move",
            HandleKind::TopLeft => "tl",
            HandleKind::TopRight => "tr",
            HandleKind::BottomLeft => "bl",
            HandleKind::BottomRight => "br",
            HandleKind::TopMiddle => "tm",
            HandleKind::BottomMiddle => "bm",
            HandleKind::MiddleLeft => "ml",
            HandleKind::MiddleRight => "mr",
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a handle code is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown crop handle: {0}")]
pub struct UnknownHandle(pub String);

impl FromStr for HandleKind {
    type Err = UnknownHandle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let handle = match s {
            "move" => HandleKind::Move,
            "tl" | "topLeft" => HandleKind::TopLeft,
            "tr" | "topRight" => HandleKind::TopRight,
            "bl" | "bottomLeft" => HandleKind::BottomLeft,
            "br" | "bottomRight" => HandleKind::BottomRight,
            "tm" | "topMiddle" => HandleKind::TopMiddle,
            "bm" | "bottomMiddle" => HandleKind::BottomMiddle,
            "ml" | "middleLeft" => HandleKind::MiddleLeft,
            "mr" | "middleRight" => HandleKind::MiddleRight,
            other => return Err(UnknownHandle(other.to_string())),
        };
        Ok(handle)
    }
}
