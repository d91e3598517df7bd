use image::RgbImage;
use image::imageops;

use crate::fusion_pipeline::common::error::{FusionError, Result};

/// Absorbs float error in `size * scale` so e.g. `640 * 0.7` yields 448.
const SCALE_EPSILON: f64 = 1e-9;

/// Centered rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Extracts the part of the composite that the aligned thermal data covers.
#[derive(Debug, Clone)]
pub struct Cropper {
    scale: f64,
}

impl Cropper {
    /// Scales above 1 would crop outside the frame and are refused.
    pub fn new(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
            return Err(FusionError::Configuration(format!(
                "crop scale must be in (0, 1], got {}",
                scale
            )));
        }
        Ok(Self { scale })
    }

    fn scaled(&self, size: u32) -> u32 {
        ((f64::from(size) * self.scale + SCALE_EPSILON).floor() as u32).min(size)
    }

    pub fn region(&self, width: u32, height: u32) -> CropRegion {
        let crop_width = self.scaled(width);
        let crop_height = self.scaled(height);
        CropRegion {
            x: width / 2 - crop_width / 2,
            y: height / 2 - crop_height / 2,
            width: crop_width,
            height: crop_height,
        }
    }

    pub fn crop(&self, composite: &RgbImage) -> RgbImage {
        let region = self.region(composite.width(), composite.height());
        imageops::crop_imm(composite, region.x, region.y, region.width, region.height).to_image()
    }
}
