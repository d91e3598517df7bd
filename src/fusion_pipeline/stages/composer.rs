use image::{GrayImage, Rgb, RgbImage};

use crate::fusion_pipeline::common::error::{FusionError, Result};
use crate::fusion_pipeline::frame::types::AlignedThermalFrame;

/// Fixed channel mix: a muted grayscale camera view with the thermal
/// highlight in channel 2.
///
/// | channel | value                         |
/// |---------|-------------------------------|
/// | 0       | camera                        |
/// | 1       | camera / 2                    |
/// | 2       | thermal * 4, saturating at 255 |
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorComposer;

const THERMAL_GAIN: u8 = 4;

impl ColorComposer {
    pub fn compose(&self, camera: &GrayImage, thermal: &AlignedThermalFrame) -> Result<RgbImage> {
        if camera.dimensions() != thermal.dimensions() {
            return Err(FusionError::DimensionMismatch {
                camera: camera.dimensions(),
                thermal: thermal.dimensions(),
            });
        }

        let mut out = RgbImage::new(camera.width(), camera.height());
        for ((pixel, cam), heat) in out.pixels_mut().zip(camera.pixels()).zip(thermal.pixels()) {
            let c = cam.0[0];
            *pixel = Rgb([c, c / 2, heat.0[0].saturating_mul(THERMAL_GAIN)]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_channel_mix_saturates_thermal() {
        let camera = GrayImage::from_pixel(16, 8, Luma([200]));
        let thermal = GrayImage::from_pixel(16, 8, Luma([100]));

        let out = ColorComposer.compose(&camera, &thermal).unwrap();

        assert_eq!(out.dimensions(), (16, 8));
        assert!(out.pixels().all(|p| p.0 == [200, 100, 255]));
    }

    #[test]
    fn test_channel_mix_below_saturation() {
        let camera = GrayImage::from_pixel(2, 2, Luma([129]));
        let thermal = GrayImage::from_pixel(2, 2, Luma([63]));

        let out = ColorComposer.compose(&camera, &thermal).unwrap();
        assert_eq!(out.get_pixel(1, 1).0, [129, 64, 252]);
    }

    #[test]
    fn test_zero_thermal_leaves_channel_dark() {
        let camera = GrayImage::from_pixel(3, 3, Luma([255]));
        let thermal = GrayImage::new(3, 3);

        let out = ColorComposer.compose(&camera, &thermal).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [255, 127, 0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let camera = GrayImage::new(640, 480);
        let thermal = GrayImage::new(207, 156);

        let err = ColorComposer.compose(&camera, &thermal).unwrap_err();
        assert!(matches!(
            err,
            FusionError::DimensionMismatch { camera: (640, 480), thermal: (207, 156) }
        ));
    }
}
