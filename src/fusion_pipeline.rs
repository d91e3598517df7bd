//! Thermal / visible fusion pipeline
//!
//! This module turns a stream of visible-light frames and a stream of raw
//! thermal frames into false-color overlay frames. Ingestion, the per-stage
//! transforms, the shared frame store and the output sinks live in separate
//! submodules; `fusion` wires them together.

pub mod common;
pub mod config;
pub mod frame;
pub mod ingest;
pub mod stages;
pub mod store;
pub mod sink;
pub mod fusion;

pub use common::{
    FusionError,
    Result,
    StreamKind,
};

pub use config::{
    FusionConfig,
    FusionConfigBuilder,
};

pub use frame::{
    AlignedThermalFrame,
    CameraFrame,
    CompositeFrame,
    FrameHeader,
    NormalizedThermalFrame,
    ThermalFrame,
    ThermalImage,
};

pub use ingest::{
    Encoding,
    FrameDecoder,
    ImageMessage,
    SensorMessageDecoder,
};

pub use stages::{
    AffineTransform,
    ColorComposer,
    CropRegion,
    Cropper,
    GeometricAligner,
    RegionStatistics,
    RegionStats,
    ThermalNormalizer,
};

pub use store::FrameStore;

pub use sink::{
    ChannelSink,
    FrameSink,
    TiffCompression,
    TiffFrameSink,
};

pub use fusion::{
    FusionOutcome,
    FusionPipeline,
};
