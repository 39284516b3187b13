//! Framecut Core - Crop and export engine
//!
//! This crate provides the core functionality for Framecut: the interactive
//! crop box, the rotate/flip/crop compositing pipeline, size-targeted
//! encoding, and the small resize, convert and analyze tools built on the
//! same decode and encode layers.

pub mod analyze;
pub mod config;
pub mod convert;
pub mod crop;
pub mod decode;
pub mod encode;
pub mod estimate;
pub mod geometry;
pub mod preview;
pub mod render;
pub mod resize;
pub mod search;
pub mod text;

pub use config::{AspectRatio, CropConfig};
pub use crop::{CropBox, DragState, HandleKind};
pub use decode::{decode_image, DecodeError, SourceImage};
pub use encode::{EncodeError, EncodeSpec, EncodedImage, ExportFormat};
pub use geometry::{compute_bounds, CropRect, Point, SourceCropRegion, ViewportBounds};
pub use render::{render, RenderError};
pub use search::{search_quality, SearchOutcome};

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 3) as u8, (y * 5) as u8, 128, 255]);
            }
        }
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&pixels, width, height, ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    #[test]
    fn test_load_crop_export() {
        let source = decode_image(&png(80, 40)).unwrap();

        // 800x400 viewport shows the image at 10x.
        let bounds = compute_bounds(800.0, 400.0, source.width, source.height);
        assert_eq!(bounds.scale, 10.0);

        let mut crop = CropBox::new(bounds);
        let region = crop.source_region();
        assert!((region.x - 8.0).abs() < 1e-9);
        assert!((region.width - 64.0).abs() < 1e-9);

        // Drag the bottom-right handle 100px left and up.
        let corner = Point::new(crop.rect().right(), crop.rect().bottom());
        assert_eq!(crop.hit_test(corner), Some(HandleKind::BottomRight));
        crop.pointer_down(corner, HandleKind::BottomRight);
        let region = crop
            .pointer_move(Point::new(corner.x - 100.0, corner.y - 100.0))
            .unwrap();
        crop.pointer_up();
        assert!(!crop.is_dragging());
        assert!((region.width - 54.0).abs() < 1e-9);
        assert!((region.height - 22.0).abs() < 1e-9);

        let config = CropConfig {
            export_format: ExportFormat::Jpeg,
            ..CropConfig::default()
        };
        let encoded = config.export(&source, &region).unwrap();
        assert_eq!((encoded.width, encoded.height), (54, 22));
        assert_eq!(encoded.mime_type(), "image/jpeg");
        assert_eq!(config.export_file_name("scan.png"), "scan_edited.jpeg");
    }
}
