//! Decoder for sensor image messages.
//!
//! Each stream has exactly one accepted pixel layout: the camera stream must
//! carry single-channel 8-bit images and the thermal stream single-channel
//! 16-bit images. There is no colour conversion; a mismatching message is a
//! format error naming the stream, the expected layout and what arrived.

use image::{GrayImage, ImageBuffer};
use tracing::debug;

use crate::fusion_pipeline::common::error::{FusionError, Result, StreamKind};
use crate::fusion_pipeline::frame::types::{CameraFrame, ThermalFrame, ThermalImage};
use crate::fusion_pipeline::ingest::decoder::FrameDecoder;
use crate::fusion_pipeline::ingest::message::{Encoding, ImageMessage};

pub struct SensorMessageDecoder;

impl SensorMessageDecoder {
    /// Checks the encoding and buffer geometry, returning the payload rows.
    fn rows<'a>(
        message: &'a ImageMessage,
        stream: StreamKind,
        expected: Encoding,
    ) -> Result<impl Iterator<Item = &'a [u8]>> {
        let encoding = Encoding::parse(&message.encoding).ok_or_else(|| {
            FusionError::format(stream, expected.to_string(), format!("unknown encoding '{}'", message.encoding))
        })?;

        if encoding != expected {
            return Err(FusionError::format(stream, expected.to_string(), encoding.to_string()));
        }

        if message.width == 0 || message.height == 0 {
            return Err(FusionError::format(
                stream,
                "non-empty image",
                format!("{}x{}", message.width, message.height),
            ));
        }

        let row_bytes = message.width as usize * expected.bytes_per_pixel();
        let step = message.step as usize;
        if step < row_bytes {
            return Err(FusionError::format(
                stream,
                format!("row step >= {} bytes", row_bytes),
                format!("row step {} bytes", step),
            ));
        }

        let needed = step * message.height as usize;
        if message.data.len() < needed {
            return Err(FusionError::format(
                stream,
                format!("{} bytes of pixel data", needed),
                format!("{} bytes", message.data.len()),
            ));
        }

        Ok(message
            .data
            .chunks(step)
            .take(message.height as usize)
            .map(move |row| &row[..row_bytes]))
    }
}

impl FrameDecoder for SensorMessageDecoder {
    fn decode_camera(&self, message: &ImageMessage) -> Result<CameraFrame> {
        let pixels: Vec<u8> = Self::rows(message, StreamKind::Camera, Encoding::Mono8)?
            .flat_map(|row| row.iter().copied())
            .collect();

        debug!("Decoded camera frame: {}x{}", message.width, message.height);

        let image = GrayImage::from_raw(message.width, message.height, pixels).ok_or_else(|| {
            FusionError::format(StreamKind::Camera, "complete mono8 buffer", "short buffer")
        })?;

        Ok(CameraFrame::new(message.header.clone(), image))
    }

    fn decode_thermal(&self, message: &ImageMessage) -> Result<ThermalFrame> {
        let big_endian = message.is_bigendian;
        let samples: Vec<u16> = Self::rows(message, StreamKind::Thermal, Encoding::Mono16)?
            .flat_map(|row| {
                row.chunks_exact(2).map(move |pair| {
                    let bytes = [pair[0], pair[1]];
                    if big_endian {
                        u16::from_be_bytes(bytes)
                    } else {
                        u16::from_le_bytes(bytes)
                    }
                })
            })
            .collect();

        debug!("Decoded thermal frame: {}x{}", message.width, message.height);

        let image: ThermalImage = ImageBuffer::from_raw(message.width, message.height, samples)
            .ok_or_else(|| {
                FusionError::format(StreamKind::Thermal, "complete mono16 buffer", "short buffer")
            })?;

        Ok(ThermalFrame::new(message.header.clone(), image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion_pipeline::frame::types::FrameHeader;

    fn header() -> FrameHeader {
        FrameHeader {
            seq: 7,
            stamp_nanos: 1_000,
            frame_id: "seek".to_string(),
        }
    }

    #[test]
    fn test_decode_mono8_camera() {
        let message = ImageMessage::mono8(header(), 3, 2, vec![1, 2, 3, 4, 5, 6]);
        let frame = SensorMessageDecoder.decode_camera(&message).unwrap();

        assert_eq!(frame.dimensions(), (3, 2));
        assert_eq!(frame.image.get_pixel(2, 1).0, [6]);
        assert_eq!(frame.header, header());
    }

    #[test]
    fn test_decode_camera_skips_row_padding() {
        let mut message = ImageMessage::mono8(header(), 2, 2, vec![1, 2, 99, 3, 4, 99]);
        message.step = 3;
        let frame = SensorMessageDecoder.decode_camera(&message).unwrap();

        assert_eq!(frame.image.as_raw(), &vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_decode_mono16_thermal_little_endian() {
        let message = ImageMessage::mono16(header(), 2, 1, &[0x8000, 0x7e50]);
        let frame = SensorMessageDecoder.decode_thermal(&message).unwrap();

        assert_eq!(frame.image.as_raw(), &vec![0x8000, 0x7e50]);
    }

    #[test]
    fn test_decode_mono16_thermal_big_endian() {
        let message = ImageMessage {
            header: header(),
            width: 1,
            height: 1,
            encoding: "16UC1".to_string(),
            is_bigendian: true,
            step: 2,
            data: vec![0x82, 0x50],
        };
        let frame = SensorMessageDecoder.decode_thermal(&message).unwrap();

        assert_eq!(frame.image.get_pixel(0, 0).0, [0x8250]);
    }

    #[test]
    fn test_camera_rejects_mono16() {
        let message = ImageMessage::mono16(header(), 2, 2, &[0; 4]);
        let err = SensorMessageDecoder.decode_camera(&message).unwrap_err();

        match err {
            FusionError::Format { stream, expected, actual } => {
                assert_eq!(stream, StreamKind::Camera);
                assert!(expected.starts_with("mono8"));
                assert!(actual.starts_with("mono16"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_thermal_rejects_color() {
        let mut message = ImageMessage::mono8(header(), 1, 1, vec![0, 0, 0]);
        message.encoding = "rgb8".to_string();
        message.step = 3;

        let err = SensorMessageDecoder.decode_thermal(&message).unwrap_err();
        assert!(matches!(err, FusionError::Format { stream: StreamKind::Thermal, .. }));
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let mut message = ImageMessage::mono8(header(), 1, 1, vec![0]);
        message.encoding = "yuv422".to_string();

        let err = SensorMessageDecoder.decode_camera(&message).unwrap_err();
        assert!(err.to_string().contains("yuv422"));
    }

    #[test]
    fn test_short_buffer_rejected() {
        let message = ImageMessage::mono8(header(), 4, 4, vec![0; 10]);
        assert!(matches!(
            SensorMessageDecoder.decode_camera(&message),
            Err(FusionError::Format { .. })
        ));
    }

    #[test]
    fn test_step_smaller_than_row_rejected() {
        let mut message = ImageMessage::mono16(header(), 4, 1, &[0; 4]);
        message.step = 4;
        assert!(matches!(
            SensorMessageDecoder.decode_thermal(&message),
            Err(FusionError::Format { .. })
        ));
    }

    #[test]
    fn test_empty_frame_rejected() {
        let message = ImageMessage::mono16(header(), 0, 0, &[]);
        assert!(matches!(
            SensorMessageDecoder.decode_thermal(&message),
            Err(FusionError::Format { .. })
        ));
    }
}
