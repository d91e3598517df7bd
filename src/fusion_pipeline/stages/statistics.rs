use tracing::debug;

use crate::fusion_pipeline::common::error::{FusionError, Result};
use crate::fusion_pipeline::frame::types::ThermalImage;

/// Mean raw value over the central sampling square, for operator display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    pub mean: f64,
    pub count: usize,
    /// Sampled region as `(x, y, width, height)` after clipping
    pub region: (u32, u32, u32, u32),
}

/// Samples `[c - half_width, c + half_width)` on both axes around the frame
/// center `c = size / 2`, clipped to the frame. Raw samples only.
#[derive(Debug, Clone)]
pub struct RegionStatistics {
    half_width: u32,
}

impl RegionStatistics {
    pub fn new(half_width: u32) -> Self {
        Self { half_width }
    }

    fn span(size: u32, half_width: u32) -> (u32, u32) {
        let center = size / 2;
        let start = center.saturating_sub(half_width);
        let end = center.saturating_add(half_width).min(size);
        (start, end)
    }

    pub fn compute(&self, raw: &ThermalImage) -> Result<RegionStats> {
        let (width, height) = raw.dimensions();
        let (x0, x1) = Self::span(width, self.half_width);
        let (y0, y1) = Self::span(height, self.half_width);

        let count = ((x1 - x0) as usize) * ((y1 - y0) as usize);
        if count == 0 {
            return Err(FusionError::DegenerateRegion { width, height });
        }

        let sum: u64 = (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .map(|(x, y)| u64::from(raw.get_pixel(x, y).0[0]))
            .sum();

        let mean = sum as f64 / count as f64;
        debug!(mean, count, "Region statistics computed");

        Ok(RegionStats {
            mean,
            count,
            region: (x0, y0, x1 - x0, y1 - y0),
        })
    }
}
