use std::io::{Cursor, Write};

use tiff::encoder::colortype::RGB8;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tracing::debug;

use crate::fusion_pipeline::common::error::{FusionError, Result};
use crate::fusion_pipeline::frame::types::CompositeFrame;
use crate::fusion_pipeline::sink::types::TiffCompression;
use crate::fusion_pipeline::sink::writer::FrameSink;

/// Encodes each composite as a standalone RGB8 TIFF and writes it to a byte
/// stream, e.g. a pipe feeding a viewer.
pub struct TiffFrameSink<W: Write> {
    output: W,
    compression: TiffCompression,
    frames_written: u64,
}

impl<W: Write> TiffFrameSink<W> {
    pub fn new(output: W, compression: TiffCompression) -> Self {
        Self {
            output,
            compression,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn encode(&self, frame: &CompositeFrame) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();

        let compression = match self.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| FusionError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder
            .write_image::<RGB8>(frame.image.width(), frame.image.height(), frame.image.as_raw())
            .map_err(|e| FusionError::EncodeError(e.to_string()))?;

        Ok(buffer)
    }
}

impl<W: Write> FrameSink for TiffFrameSink<W> {
    fn publish(&mut self, frame: CompositeFrame) -> Result<()> {
        debug!(
            "Encoding composite frame {} as TIFF: {}x{}",
            frame.header.seq,
            frame.image.width(),
            frame.image.height()
        );

        let encoded = self.encode(&frame)?;
        self.output.write_all(&encoded)?;
        self.output.flush()?;
        self.frames_written += 1;

        debug!("TIFF encoding complete, {} bytes", encoded.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion_pipeline::frame::types::FrameHeader;
    use image::{Rgb, RgbImage};

    fn composite() -> CompositeFrame {
        CompositeFrame {
            header: FrameHeader::default(),
            image: RgbImage::from_pixel(8, 6, Rgb([200, 100, 255])),
        }
    }

    #[test]
    fn test_writes_decodable_tiff() {
        let mut sink = TiffFrameSink::new(Vec::new(), TiffCompression::None);
        sink.publish(composite()).unwrap();
        assert_eq!(sink.frames_written(), 1);

        let bytes = sink.into_inner();
        let mut decoder = tiff::decoder::Decoder::new(Cursor::new(bytes)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (8, 6));
        assert_eq!(decoder.colortype().unwrap(), tiff::ColorType::RGB(8));
    }

    #[test]
    fn test_compressed_output_decodes() {
        for compression in [TiffCompression::Lzw, TiffCompression::DeflateBalanced] {
            let mut sink = TiffFrameSink::new(Vec::new(), compression);
            sink.publish(composite()).unwrap();

            let mut decoder = tiff::decoder::Decoder::new(Cursor::new(sink.into_inner())).unwrap();
            match decoder.read_image().unwrap() {
                tiff::decoder::DecodingResult::U8(data) => {
                    assert_eq!(data.len(), 8 * 6 * 3);
                    assert_eq!(&data[..3], &[200, 100, 255]);
                }
                _ => panic!("unexpected sample type"),
            }
        }
    }
}
