//! Output sinks
//!
//! A sink receives ownership of every composite frame the pipeline emits.

mod channel_sink;
mod tiff_frame_sink;
pub mod types;
mod writer;

pub use channel_sink::ChannelSink;
pub use tiff_frame_sink::TiffFrameSink;
pub use types::TiffCompression;
pub use writer::FrameSink;
