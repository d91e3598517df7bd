//! Fusion configuration module

pub mod types;

pub use types::{FusionConfig, FusionConfigBuilder, MAX_BLUR_KERNEL};
