//! Geometric alignment of the thermal image onto the camera's pixel grid.
//!
//! Alignment is two steps. The normalized thermal image is first resized to
//! the camera resolution with Catmull-Rom (cubic) interpolation. The result
//! is then warped by a single rotation + uniform scale about the image
//! center, keeping the camera-sized canvas. "Scale" is therefore a fraction
//! of the camera's field of view regardless of the thermal sensor's native
//! resolution. Pixels that map outside the resized image are zero.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use tracing::debug;

use crate::fusion_pipeline::config::types::FusionConfig;
use crate::fusion_pipeline::frame::types::{AlignedThermalFrame, NormalizedThermalFrame};

const SINGULAR_EPSILON: f64 = 1e-12;

/// 2x3 affine matrix mapping source coordinates to destination coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub matrix: [[f64; 3]; 2],
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            matrix: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    /// Rotation by `angle` degrees (counter-clockwise, y axis pointing down)
    /// combined with uniform `scale`, both about `center`.
    pub fn rotation(center: (f64, f64), angle: f64, scale: f64) -> Self {
        let (cx, cy) = center;
        let radians = angle.to_radians();
        let alpha = scale * radians.cos();
        let beta = scale * radians.sin();

        Self {
            matrix: [
                [alpha, beta, (1.0 - alpha) * cx - beta * cy],
                [-beta, alpha, beta * cx + (1.0 - alpha) * cy],
            ],
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [[a, b, tx], [c, d, ty]] = self.matrix;
        (a * x + b * y + tx, c * x + d * y + ty)
    }

    /// `None` when the linear part is singular.
    pub fn inverse(&self) -> Option<Self> {
        let [[a, b, tx], [c, d, ty]] = self.matrix;
        let det = a * d - b * c;
        if det.abs() < SINGULAR_EPSILON {
            return None;
        }

        let (ia, ib, ic, id) = (d / det, -b / det, -c / det, a / det);
        Some(Self {
            matrix: [
                [ia, ib, -(ia * tx + ib * ty)],
                [ic, id, -(ic * tx + id * ty)],
            ],
        })
    }
}

#[derive(Debug, Clone)]
pub struct GeometricAligner {
    angle: f64,
    scale: f64,
}

impl GeometricAligner {
    pub fn new(angle: f64, scale: f64) -> Self {
        Self { angle, scale }
    }

    pub fn from_config(config: &FusionConfig) -> Self {
        Self::new(config.angle, config.scale)
    }

    /// Transform applied to a resized image of the given size. The center is
    /// the integer pixel `(width / 2, height / 2)`, the same point the
    /// cropper centers on.
    pub fn transform_for(&self, width: u32, height: u32) -> AffineTransform {
        let center = (f64::from(width / 2), f64::from(height / 2));
        AffineTransform::rotation(center, self.angle, self.scale)
    }

    pub fn align(&self, normalized: &NormalizedThermalFrame, target: (u32, u32)) -> AlignedThermalFrame {
        let (width, height) = target;
        debug!(
            "Aligning thermal frame {}x{} onto {}x{} (angle={}, scale={})",
            normalized.width(),
            normalized.height(),
            width,
            height,
            self.angle,
            self.scale
        );

        let resized = if normalized.dimensions() == target {
            normalized.clone()
        } else {
            imageops::resize(normalized, width, height, FilterType::CatmullRom)
        };

        warp_affine(&resized, &self.transform_for(width, height))
    }
}

/// Inverse-maps every destination pixel and samples bilinearly. Neighbours
/// outside the source count as zero.
fn warp_affine(src: &GrayImage, transform: &AffineTransform) -> GrayImage {
    let (width, height) = src.dimensions();
    let Some(inverse) = transform.inverse() else {
        return GrayImage::new(width, height);
    };

    let fetch = |x: i64, y: i64| -> f64 {
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            0.0
        } else {
            f64::from(src.get_pixel(x as u32, y as u32).0[0])
        }
    };

    GrayImage::from_fn(width, height, |x, y| {
        let (sx, sy) = inverse.apply(f64::from(x), f64::from(y));
        if sx <= -1.0 || sy <= -1.0 || sx >= f64::from(width) || sy >= f64::from(height) {
            return Luma([0]);
        }

        let (x0, y0) = (sx.floor(), sy.floor());
        let (fx, fy) = (sx - x0, sy - y0);
        let (ix, iy) = (x0 as i64, y0 as i64);

        let value = (1.0 - fx) * (1.0 - fy) * fetch(ix, iy)
            + fx * (1.0 - fy) * fetch(ix + 1, iy)
            + (1.0 - fx) * fy * fetch(ix, iy + 1)
            + fx * fy * fetch(ix + 1, iy + 1);

        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}
