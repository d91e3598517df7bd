use image::GrayImage;
use tracing::debug;

use crate::fusion_pipeline::config::types::FusionConfig;
use crate::fusion_pipeline::frame::types::{NormalizedThermalFrame, ThermalImage};

/// Maps raw thermal samples onto the 8-bit display range, then median-filters
/// the result to knock out single-pixel sensor spikes.
#[derive(Debug, Clone)]
pub struct ThermalNormalizer {
    min_raw: u16,
    max_raw: u16,
    blur_kernel: u32,
}

impl ThermalNormalizer {
    pub fn new(min_raw: u16, max_raw: u16, blur_kernel: u32) -> Self {
        Self {
            min_raw,
            max_raw,
            blur_kernel,
        }
    }

    pub fn from_config(config: &FusionConfig) -> Self {
        Self::new(config.min_raw, config.max_raw, config.blur_kernel)
    }

    /// Linear remap of one raw sample; values outside `[min_raw, max_raw]` clamp.
    pub fn normalize_sample(&self, sample: u16) -> u8 {
        let span = f32::from(self.max_raw) - f32::from(self.min_raw);
        let v = (f32::from(sample) - f32::from(self.min_raw)) / span;
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    pub fn normalize(&self, raw: &ThermalImage) -> NormalizedThermalFrame {
        let (width, height) = raw.dimensions();
        debug!("Normalizing thermal frame: {}x{}", width, height);

        let mapped = GrayImage::from_fn(width, height, |x, y| {
            image::Luma([self.normalize_sample(raw.get_pixel(x, y).0[0])])
        });

        median_blur(&mapped, self.blur_kernel)
    }
}

/// Square median filter; borders replicate the edge pixels.
fn median_blur(src: &GrayImage, kernel: u32) -> GrayImage {
    if kernel <= 1 {
        return src.clone();
    }

    let (width, height) = src.dimensions();
    let radius = (kernel / 2) as i64;
    let mut window = Vec::with_capacity(kernel as usize * kernel as usize);

    let mut out = GrayImage::new(width, height);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        window.clear();
        for dy in -radius..=radius {
            let sy = (y as i64 + dy).clamp(0, height as i64 - 1) as u32;
            for dx in -radius..=radius {
                let sx = (x as i64 + dx).clamp(0, width as i64 - 1) as u32;
                window.push(src.get_pixel(sx, sy).0[0]);
            }
        }
        let mid = window.len() / 2;
        let (_, median, _) = window.select_nth_unstable(mid);
        pixel.0[0] = *median;
    }
    out
}
