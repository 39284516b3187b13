//! The rotated working surface the crop is cut from.
//!
//! # Algorithm
//!
//! The source is drawn centred on a square surface large enough to hold it
//! at any rotation. The surface transform is, in order: translate to the
//! centre, rotate, scale by the flips, translate back. Pixels are produced by
//! inverse mapping each surface pixel centre into source space:
//!
//! ```text
//! d   = (px + 0.5 - c, py + 0.5 - c)
//! x   =  dx * cos(θ) + dy * sin(θ)
//! y   = -dx * sin(θ) + dy * cos(θ)
//! src = (x * fx + w / 2 - 0.5, y * fy + h / 2 - 0.5)
//! ```
//!
//! where `c` is half the surface side and `fx`, `fy` are `±1`.
//!
//! # Coordinate System
//!
//! - y grows downwards, so a positive angle turns the image clockwise
//! - source pixel centres sit at integer coordinates

use std::f64::consts::SQRT_2;

use crate::decode::SourceImage;
use crate::encode::EncodeSpec;

/// Sample positions this close to a pixel centre are snapped onto it.
const SNAP_EPSILON: f64 = 1e-6;

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// `sin` and `cos` with exact values at multiples of 90 degrees.
fn exact_sin_cos(degrees: f64) -> (f64, f64) {
    if !degrees.is_finite() {
        return (0.0, 1.0);
    }
    let d = degrees.rem_euclid(360.0);
    if d == 0.0 {
        (0.0, 1.0)
    } else if d == 90.0 {
        (1.0, 0.0)
    } else if d == 180.0 {
        (0.0, -1.0)
    } else if d == 270.0 {
        (-1.0, 0.0)
    } else {
        d.to_radians().sin_cos()
    }
}

#[inline]
fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < SNAP_EPSILON {
        r
    } else {
        v
    }
}

/// A source image placed on the rotated/flipped square surface.
///
/// Nothing is allocated up front; pixels are computed for whatever window
/// is asked for.
#[derive(Debug, Clone, Copy)]
pub struct WorkingSurface<'a> {
    source: &'a SourceImage,
    side: u32,
    center: f64,
    sin: f64,
    cos: f64,
    flip_x: f64,
    flip_y: f64,
}

impl<'a> WorkingSurface<'a> {
    /// Side of the square surface for a `width x height` source: twice the
    /// half-diagonal of a square on the longest edge, rounded up.
    pub fn side_for(width: u32, height: u32) -> u32 {
        let longest = width.max(height) as f64;
        ((longest / 2.0 * SQRT_2).ceil() as u32).saturating_mul(2)
    }

    pub fn new(source: &'a SourceImage, spec: &EncodeSpec) -> Self {
        let side = Self::side_for(source.width, source.height);
        let (sin, cos) = exact_sin_cos(spec.rotation_degrees);
        Self {
            source,
            side,
            center: side as f64 / 2.0,
            sin,
            cos,
            flip_x: if spec.flip_horizontal { -1.0 } else { 1.0 },
            flip_y: if spec.flip_vertical { -1.0 } else { 1.0 },
        }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    /// Top-left corner of the source's unrotated footprint on the surface.
    pub fn draw_origin(&self) -> (f64, f64) {
        (
            self.center - self.source.width as f64 / 2.0,
            self.center - self.source.height as f64 / 2.0,
        )
    }

    /// Source-space position sampled by surface pixel `(px, py)`.
    fn inverse_map(&self, px: i64, py: i64) -> (f64, f64) {
        let dx = px as f64 + 0.5 - self.center;
        let dy = py as f64 + 0.5 - self.center;

        let x = dx * self.cos + dy * self.sin;
        let y = -dx * self.sin + dy * self.cos;

        (
            snap(x * self.flip_x + self.source.width as f64 / 2.0 - 0.5),
            snap(y * self.flip_y + self.source.height as f64 / 2.0 - 0.5),
        )
    }

    /// Bilinear sample with premultiplied weights. Transparent outside the
    /// image footprint, clamp-to-edge inside it.
    fn sample(&self, sx: f64, sy: f64) -> [u8; 4] {
        let w = self.source.width as f64;
        let h = self.source.height as f64;
        if !(sx >= -0.5 && sx < w - 0.5 && sy >= -0.5 && sy < h - 0.5) {
            return TRANSPARENT;
        }

        let sx = sx.clamp(0.0, w - 1.0);
        let sy = sy.clamp(0.0, h - 1.0);
        let x0 = sx.floor() as u32;
        let y0 = sy.floor() as u32;
        let x1 = (x0 + 1).min(self.source.width - 1);
        let y1 = (y0 + 1).min(self.source.height - 1);
        let fx = sx - x0 as f64;
        let fy = sy - y0 as f64;

        let taps = [
            (x0, y0, (1.0 - fx) * (1.0 - fy)),
            (x1, y0, fx * (1.0 - fy)),
            (x0, y1, (1.0 - fx) * fy),
            (x1, y1, fx * fy),
        ];

        let mut acc = [0.0f64; 4];
        for (x, y, weight) in taps {
            if weight == 0.0 {
                continue;
            }
            let p = self.source.pixel(x, y);
            let a = p[3] as f64 * weight;
            acc[0] += p[0] as f64 * a;
            acc[1] += p[1] as f64 * a;
            acc[2] += p[2] as f64 * a;
            acc[3] += a;
        }

        if acc[3] <= 0.0 {
            return TRANSPARENT;
        }
        [
            (acc[0] / acc[3]).round().clamp(0.0, 255.0) as u8,
            (acc[1] / acc[3]).round().clamp(0.0, 255.0) as u8,
            (acc[2] / acc[3]).round().clamp(0.0, 255.0) as u8,
            acc[3].round().clamp(0.0, 255.0) as u8,
        ]
    }

    /// Surface pixel at `(px, py)`. Transparent off the surface.
    pub fn pixel(&self, px: i64, py: i64) -> [u8; 4] {
        let side = self.side as i64;
        if px < 0 || py < 0 || px >= side || py >= side {
            return TRANSPARENT;
        }
        let (sx, sy) = self.inverse_map(px, py);
        self.sample(sx, sy)
    }

    /// RGBA pixels of the `width x height` window whose top-left is at
    /// `(x, y)` on the surface. The window may extend past the surface.
    pub fn rasterize_window(&self, x: i64, y: i64, width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(width as usize * height as usize * 4);
        for oy in 0..height as i64 {
            for ox in 0..width as i64 {
                out.extend_from_slice(&self.pixel(x.saturating_add(ox), y.saturating_add(oy)));
            }
        }
        out
    }

    /// The whole surface as an image.
    pub fn rasterize_full(&self) -> SourceImage {
        SourceImage::new(
            self.side,
            self.side,
            self.rasterize_window(0, 0, self.side, self.side),
        )
    }
}
