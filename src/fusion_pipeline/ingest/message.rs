//! Transport-level image message

use std::fmt;

use crate::fusion_pipeline::frame::types::FrameHeader;

/// Pixel encodings a frame source may announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Mono8,
    Mono16,
    Rgb8,
    Bgr8,
}

impl Encoding {
    /// Parses the transport's encoding name. `8UC1` and `16UC1` are accepted as
    /// aliases of the mono encodings.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "mono8" | "8UC1" => Some(Encoding::Mono8),
            "mono16" | "16UC1" => Some(Encoding::Mono16),
            "rgb8" => Some(Encoding::Rgb8),
            "bgr8" => Some(Encoding::Bgr8),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Mono8 => "mono8",
            Encoding::Mono16 => "mono16",
            Encoding::Rgb8 => "rgb8",
            Encoding::Bgr8 => "bgr8",
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            Encoding::Mono8 | Encoding::Mono16 => 1,
            Encoding::Rgb8 | Encoding::Bgr8 => 3,
        }
    }

    /// Bits per channel sample.
    pub fn bit_depth(&self) -> usize {
        self.bytes_per_pixel() * 8 / self.channels()
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Encoding::Mono8 => 1,
            Encoding::Mono16 => 2,
            Encoding::Rgb8 | Encoding::Bgr8 => 3,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} channel, {}-bit)", self.name(), self.channels(), self.bit_depth())
    }
}

/// Image as delivered by a frame source: packed rows of `step` bytes each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageMessage {
    pub header: FrameHeader,
    pub width: u32,
    pub height: u32,
    /// Encoding name as announced by the source (e.g. `mono8`, `mono16`)
    pub encoding: String,
    /// Byte order of multi-byte samples
    pub is_bigendian: bool,
    /// Row length in bytes, including any padding
    pub step: u32,
    pub data: Vec<u8>,
}

impl ImageMessage {
    /// Tightly packed mono8 message.
    pub fn mono8(header: FrameHeader, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            header,
            width,
            height,
            encoding: Encoding::Mono8.name().to_string(),
            is_bigendian: false,
            step: width,
            data,
        }
    }

    /// Tightly packed little-endian mono16 message.
    pub fn mono16(header: FrameHeader, width: u32, height: u32, samples: &[u16]) -> Self {
        Self {
            header,
            width,
            height,
            encoding: Encoding::Mono16.name().to_string(),
            is_bigendian: false,
            step: width * 2,
            data: samples.iter().flat_map(|s| s.to_le_bytes()).collect(),
        }
    }
}
