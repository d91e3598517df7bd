use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thermal_fusion_rs::fusion_pipeline::{
    ChannelSink, FrameHeader, FrameSink, FusionConfig, FusionPipeline, ImageMessage,
    SensorMessageDecoder, TiffCompression, TiffFrameSink,
};
use thermal_fusion_rs::logger;

use tracing::{info, warn};

const CAMERA_FRAMES: u32 = 90;
const THERMAL_FRAMES: u32 = 27;
const THERMAL_SIZE: (u32, u32) = (207, 156);

/// Moving horizontal gradient standing in for the visible camera.
fn synthetic_camera(seq: u32, width: u32, height: u32) -> ImageMessage {
    let data = (0..height)
        .flat_map(|_| (0..width).map(move |x| ((x + seq * 4) % 256) as u8))
        .collect();
    let header = FrameHeader { seq, stamp_nanos: u64::from(seq) * 33_333_333, frame_id: "usb_cam".to_string() };
    ImageMessage::mono8(header, width, height, data)
}

/// Warm background with a hot spot drifting across the thermal sensor.
fn synthetic_thermal(seq: u32) -> ImageMessage {
    let (width, height) = THERMAL_SIZE;
    let spot_x = (seq * 7) % width;
    let spot_y = height / 2;
    let samples: Vec<u16> = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                let d2 = (x as i64 - spot_x as i64).pow(2) + (y as i64 - spot_y as i64).pow(2);
                if d2 < 15 * 15 { 0x8200 } else { 0x7f00 }
            })
        })
        .collect();
    let header = FrameHeader { seq, stamp_nanos: u64::from(seq) * 111_111_111, frame_id: "seek".to_string() };
    ImageMessage::mono16(header, width, height, &samples)
}

/// Feeds both synthetic streams into `pipeline` from their own threads.
fn spawn_sources<S>(
    pipeline: &Arc<FusionPipeline<SensorMessageDecoder, S>>,
) -> anyhow::Result<Vec<JoinHandle<()>>>
where
    S: FrameSink + Send + 'static,
{
    let (width, height) = pipeline.config().camera_dimensions();

    let camera_source = {
        let pipeline = Arc::clone(pipeline);
        thread::Builder::new().name("camera".into()).spawn(move || {
            for seq in 0..CAMERA_FRAMES {
                // rejections are already logged by the pipeline
                let _ = pipeline.on_camera_frame(&synthetic_camera(seq, width, height));
                thread::sleep(Duration::from_millis(33));
            }
        })?
    };

    let thermal_source = {
        let pipeline = Arc::clone(pipeline);
        thread::Builder::new().name("thermal".into()).spawn(move || {
            for seq in 0..THERMAL_FRAMES {
                let _ = pipeline.on_thermal_frame(&synthetic_thermal(seq));
                thread::sleep(Duration::from_millis(111));
            }
        })?
    };

    Ok(vec![camera_source, thermal_source])
}

fn join_sources(sources: Vec<JoinHandle<()>>) {
    for source in sources {
        if source.join().is_err() {
            warn!("A frame source thread panicked");
        }
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting thermal fusion...");

    let config = FusionConfig::builder()
        .scale(0.7)
        .angle(0.0)
        .build();

    info!("Raw clamp: {:#06x}..{:#06x}", config.min_raw, config.max_raw);
    info!("Scale: {}, angle: {}", config.scale, config.angle);

    // `--tiff-stdout` streams every composite as a TIFF on stdout for a
    // downstream viewer; logs go to stderr in that mode.
    if std::env::args().any(|arg| arg == "--tiff-stdout") {
        let sink = TiffFrameSink::new(std::io::stdout(), TiffCompression::Lzw);
        let pipeline = Arc::new(FusionPipeline::new(config, sink)?);
        info!("Fusion pipeline initialized, publishing TIFF frames to stdout");

        let sources = spawn_sources(&pipeline)?;
        join_sources(sources);
    } else {
        let (tx, rx) = mpsc::channel();
        let pipeline = Arc::new(FusionPipeline::new(config, ChannelSink::new(tx))?);
        info!("Fusion pipeline initialized");

        let sources = spawn_sources(&pipeline)?;
        drop(pipeline);

        for composite in rx {
            let (w, h) = composite.dimensions();
            let hot = composite.image.pixels().filter(|p| p.0[2] == 255).count();
            info!(seq = composite.header.seq, "Composite {}x{}, {} saturated thermal pixels", w, h, hot);
        }

        join_sources(sources);
    }

    info!("All sources finished");
    Ok(())
}
