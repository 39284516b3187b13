//! Interactive crop box: handles, hit testing and the drag state machine.
//!
//! # Coordinate System
//!
//! - Everything here is in display space (see [`crate::geometry`])
//! - Pointer deltas are measured from the position captured at pointer-down
//! - Results are reported to callers in source space via `SourceCropRegion`

mod handle;
mod state;

pub use handle::{EdgeSide, HandleKind, UnknownHandle, CORNER_HANDLE_SIZE, EDGE_HANDLE_SIZE};
pub use state::{clamp_rect, resize_rect, CropBox, DragInteraction, DragState, MIN_SIZE};
