pub mod fusion_pipeline;
pub mod logger;
