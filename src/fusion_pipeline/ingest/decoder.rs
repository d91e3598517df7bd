use crate::fusion_pipeline::common::error::Result;
use crate::fusion_pipeline::frame::types::{CameraFrame, ThermalFrame};
use crate::fusion_pipeline::ingest::message::ImageMessage;

pub trait FrameDecoder {
    fn decode_camera(&self, message: &ImageMessage) -> Result<CameraFrame>;
    fn decode_thermal(&self, message: &ImageMessage) -> Result<ThermalFrame>;
}
