//! Frame ingestion module
//!
//! Transport messages are decoded into typed frames here. Anything that does
//! not match the expected bit depth and channel count for its stream is
//! rejected with a format error before it can reach the pipeline.

mod decoder;
mod message;
mod sensor_message_decoder;

pub use decoder::FrameDecoder;
pub use message::{Encoding, ImageMessage};
pub use sensor_message_decoder::SensorMessageDecoder;
