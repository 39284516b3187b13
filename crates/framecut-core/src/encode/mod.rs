//! Image encoding for export.
//!
//! This module provides functionality for:
//! - Encoding RGBA8 pixels to PNG, JPEG or WebP
//! - Describing an export (`EncodeSpec`) and its result (`EncodedImage`)
//!
//! # Architecture
//!
//! Encoding is synchronous and single-threaded. Quality is a `0.0..=1.0`
//! fraction everywhere in this crate; the user-facing 0-100 scale lives in
//! [`crate::config`].

mod codec;
mod types;

pub use codec::encode_rgba;
pub use types::{
    normalize_quality, EncodeError, EncodeSpec, EncodedImage, ExportFormat, UnknownFormat,
    DEFAULT_QUALITY,
};
