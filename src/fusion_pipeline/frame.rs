//! Frame types exchanged between the fusion stages

pub mod types;

pub use types::{
    AlignedThermalFrame, CameraFrame, CompositeFrame, FrameHeader, NormalizedThermalFrame,
    ThermalFrame, ThermalImage,
};
