use crate::fusion_pipeline::common::error::Result;
use crate::fusion_pipeline::frame::types::CompositeFrame;

pub trait FrameSink {
    fn publish(&mut self, frame: CompositeFrame) -> Result<()>;
}
