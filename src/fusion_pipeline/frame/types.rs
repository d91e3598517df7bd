//! Frame data types

use image::{GrayImage, ImageBuffer, Luma, RgbImage};

/// Single-channel 16-bit raw thermal samples
pub type ThermalImage = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Thermal image mapped to 8-bit intensities, same size as the raw frame
pub type NormalizedThermalFrame = GrayImage;

/// Normalized thermal image remapped onto the camera's pixel grid
pub type AlignedThermalFrame = GrayImage;

/// Transport metadata carried alongside a frame.
///
/// The pipeline never interprets it; a composite inherits the header of the
/// thermal frame that triggered it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameHeader {
    /// Sequence number assigned by the transport
    pub seq: u32,
    /// Capture timestamp in nanoseconds since the transport's epoch
    pub stamp_nanos: u64,
    /// Sensor frame identifier
    pub frame_id: String,
}

/// Visible-light frame (8-bit, single channel)
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    pub header: FrameHeader,
    pub image: GrayImage,
}

impl CameraFrame {
    pub fn new(header: FrameHeader, image: GrayImage) -> Self {
        Self { header, image }
    }

    /// All-black frame, used before the first camera frame arrives.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            header: FrameHeader::default(),
            image: GrayImage::new(width, height),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Raw thermal frame (16-bit, single channel)
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalFrame {
    pub header: FrameHeader,
    pub image: ThermalImage,
}

impl ThermalFrame {
    pub fn new(header: FrameHeader, image: ThermalImage) -> Self {
        Self { header, image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Fused output frame: 3 channels, 8 bits each
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeFrame {
    pub header: FrameHeader,
    pub image: RgbImage,
}

impl CompositeFrame {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
