//! Image decoding for framecut.
//!
//! This module provides functionality for:
//! - Decoding PNG, JPEG, WebP, GIF and BMP files into straight RGBA8
//! - Applying EXIF orientation the way browsers do
//! - Reading dimensions and MIME type without a full decode
//! - Resampling decoded images
//!
//! # Architecture
//!
//! Decoding is synchronous and single-threaded, driven from the wasm
//! bindings. The decoded `SourceImage` is never mutated afterwards; every
//! crop, resize or export reads from it.

mod load;
mod resize;
mod types;

pub use load::{decode_image, detect_mime, get_orientation, probe_dimensions};
pub use resize::{fit_dimensions, resize, resize_to_fit};
pub use types::{DecodeError, FilterType, Orientation, SourceImage, RGBA_CHANNELS};
