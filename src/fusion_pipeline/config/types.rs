//! Fusion configuration types

use crate::fusion_pipeline::common::error::{FusionError, Result};
use crate::fusion_pipeline::stages::Cropper;

/// Largest accepted median blur aperture
pub const MAX_BLUR_KERNEL: u32 = 31;

/// Constants driving one fusion cycle.
///
/// Defaults: `{min_raw: 0x7e50, max_raw: 0x8250, scale: 0.7, angle: 0.0, blur_kernel: 3}`,
/// a 30 px statistics half-width and a 640x480 camera.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionConfig {
    /// Raw thermal value mapped to intensity 0
    pub min_raw: u16,
    /// Raw thermal value mapped to intensity 255
    pub max_raw: u16,
    /// Fraction of the camera field of view covered by the thermal image, in `(0, 1]`
    pub scale: f64,
    /// Rotation of the thermal image about the frame center, in degrees (counter-clockwise)
    pub angle: f64,
    /// Median blur aperture applied after normalization (odd, 1 disables the blur)
    pub blur_kernel: u32,
    /// Half-width of the central square sampled for the mean raw value
    pub region_half_width: u32,
    /// Expected camera frame width
    pub camera_width: u32,
    /// Expected camera frame height
    pub camera_height: u32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            min_raw: 0x7e50,
            max_raw: 0x8250,
            scale: 0.7,
            angle: 0.0,
            blur_kernel: 3,
            region_half_width: 30,
            camera_width: 640,
            camera_height: 480,
        }
    }
}

impl FusionConfig {
    pub fn builder() -> FusionConfigBuilder {
        FusionConfigBuilder::default()
    }

    /// Rejects settings no frame could be processed with.
    pub fn validate(&self) -> Result<()> {
        if self.min_raw >= self.max_raw {
            return Err(FusionError::Configuration(format!(
                "min_raw ({:#06x}) must be below max_raw ({:#06x})",
                self.min_raw, self.max_raw
            )));
        }

        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(FusionError::Configuration(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }

        if self.scale > 1.0 {
            return Err(FusionError::Configuration(format!(
                "scale {} exceeds 1.0, the crop would leave the composite frame",
                self.scale
            )));
        }

        if !self.angle.is_finite() {
            return Err(FusionError::Configuration(format!(
                "angle must be finite, got {}",
                self.angle
            )));
        }

        if self.blur_kernel == 0 || self.blur_kernel % 2 == 0 {
            return Err(FusionError::Configuration(format!(
                "blur_kernel must be odd, got {}",
                self.blur_kernel
            )));
        }

        if self.blur_kernel > MAX_BLUR_KERNEL {
            return Err(FusionError::Configuration(format!(
                "blur_kernel {} exceeds the maximum of {}",
                self.blur_kernel, MAX_BLUR_KERNEL
            )));
        }

        if self.camera_width == 0 || self.camera_height == 0 {
            return Err(FusionError::Configuration(format!(
                "camera size must be non-zero, got {}x{}",
                self.camera_width, self.camera_height
            )));
        }

        let crop = Cropper::new(self.scale)?.region(self.camera_width, self.camera_height);
        if crop.width == 0 || crop.height == 0 {
            return Err(FusionError::Configuration(format!(
                "scale {} leaves an empty {}x{} crop of the {}x{} camera frame",
                self.scale, crop.width, crop.height, self.camera_width, self.camera_height
            )));
        }

        Ok(())
    }

    pub fn camera_dimensions(&self) -> (u32, u32) {
        (self.camera_width, self.camera_height)
    }
}

/// Builder for FusionConfig
#[derive(Default)]
pub struct FusionConfigBuilder {
    min_raw: Option<u16>,
    max_raw: Option<u16>,
    scale: Option<f64>,
    angle: Option<f64>,
    blur_kernel: Option<u32>,
    region_half_width: Option<u32>,
    camera_size: Option<(u32, u32)>,
}

impl FusionConfigBuilder {
    pub fn min_raw(mut self, min_raw: u16) -> Self {
        self.min_raw = Some(min_raw);
        self
    }

    pub fn max_raw(mut self, max_raw: u16) -> Self {
        self.max_raw = Some(max_raw);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle = Some(degrees);
        self
    }

    pub fn blur_kernel(mut self, size: u32) -> Self {
        self.blur_kernel = Some(size);
        self
    }

    pub fn region_half_width(mut self, half_width: u32) -> Self {
        self.region_half_width = Some(half_width);
        self
    }

    pub fn camera_size(mut self, width: u32, height: u32) -> Self {
        self.camera_size = Some((width, height));
        self
    }

    pub fn build(self) -> FusionConfig {
        let default = FusionConfig::default();
        let (camera_width, camera_height) = self.camera_size.unwrap_or(default.camera_dimensions());
        FusionConfig {
            min_raw: self.min_raw.unwrap_or(default.min_raw),
            max_raw: self.max_raw.unwrap_or(default.max_raw),
            scale: self.scale.unwrap_or(default.scale),
            angle: self.angle.unwrap_or(default.angle),
            blur_kernel: self.blur_kernel.unwrap_or(default.blur_kernel),
            region_half_width: self.region_half_width.unwrap_or(default.region_half_width),
            camera_width,
            camera_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FusionConfig::default();
        assert_eq!(config.min_raw, 0x7e50);
        assert_eq!(config.max_raw, 0x8250);
        assert_eq!(config.scale, 0.7);
        assert_eq!(config.angle, 0.0);
        assert_eq!(config.blur_kernel, 3);
        assert_eq!(config.region_half_width, 30);
        assert_eq!(config.camera_dimensions(), (640, 480));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = FusionConfig::builder()
            .scale(0.5)
            .angle(12.5)
            .blur_kernel(5)
            .camera_size(320, 240)
            .build();

        assert_eq!(config.scale, 0.5);
        assert_eq!(config.angle, 12.5);
        assert_eq!(config.blur_kernel, 5);
        assert_eq!(config.camera_dimensions(), (320, 240));
        assert_eq!(config.min_raw, 0x7e50);
    }

    #[test]
    fn test_scale_above_one_rejected() {
        let config = FusionConfig::builder().scale(1.2).build();
        assert!(matches!(config.validate(), Err(FusionError::Configuration(_))));
    }

    #[test]
    fn test_scale_of_one_accepted() {
        let config = FusionConfig::builder().scale(1.0).build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_largest_blur_kernel_accepted() {
        let config = FusionConfig::builder().blur_kernel(MAX_BLUR_KERNEL).build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_crop_rejected() {
        let cases = [
            FusionConfig::builder().scale(0.001).build(),
            FusionConfig::builder().camera_size(1, 1).build(),
            FusionConfig::builder().camera_size(640, 1).build(),
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(FusionError::Configuration(_))),
                "expected rejection for {:?}",
                config
            );
        }

        let smallest = FusionConfig::builder().camera_size(2, 2).scale(0.5).build();
        assert!(smallest.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let cases = [
            FusionConfig::builder().scale(0.0).build(),
            FusionConfig::builder().scale(f64::NAN).build(),
            FusionConfig::builder().angle(f64::INFINITY).build(),
            FusionConfig::builder().blur_kernel(4).build(),
            FusionConfig::builder().blur_kernel(0).build(),
            FusionConfig::builder().blur_kernel(33).build(),
            FusionConfig::builder().blur_kernel(65537).build(),
            FusionConfig::builder().min_raw(0x8250).max_raw(0x7e50).build(),
            FusionConfig::builder().camera_size(0, 480).build(),
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(FusionError::Configuration(_))),
                "expected rejection for {:?}",
                config
            );
        }
    }
}
