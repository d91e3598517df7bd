use std::sync::mpsc::Sender;

use crate::fusion_pipeline::common::error::{FusionError, Result};
use crate::fusion_pipeline::frame::types::CompositeFrame;
use crate::fusion_pipeline::sink::writer::FrameSink;

/// Hands composites to another thread over an mpsc channel.
pub struct ChannelSink {
    sender: Sender<CompositeFrame>,
}

impl ChannelSink {
    pub fn new(sender: Sender<CompositeFrame>) -> Self {
        Self { sender }
    }
}

impl FrameSink for ChannelSink {
    fn publish(&mut self, frame: CompositeFrame) -> Result<()> {
        self.sender
            .send(frame)
            .map_err(|_| FusionError::Publish("receiver disconnected".to_string()))
    }
}
