//! Fusion orchestration
//!
//! Ties ingestion, the frame store, the stages and the output sink together.

mod pipeline;


pub use pipeline::{FusionOutcome, FusionPipeline};
