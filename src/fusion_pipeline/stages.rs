//! Fusion stages
//!
//! Each stage is a bounded, synchronous transform over fixed-size buffers.
//! They run in this order: normalize, region statistics, align, compose, crop.

mod aligner;
mod composer;
mod cropper;
mod normalizer;
mod statistics;

pub use aligner::{AffineTransform, GeometricAligner};
pub use composer::ColorComposer;
pub use cropper::{CropRegion, Cropper};
pub use normalizer::ThermalNormalizer;
pub use statistics::{RegionStatistics, RegionStats};
