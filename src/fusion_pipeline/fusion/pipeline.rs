use std::sync::{Mutex, PoisonError};

use tracing::{error, info, instrument, warn};

use crate::fusion_pipeline::{
    common::error::{FusionError, Result, StreamKind},
    config::FusionConfig,
    frame::{CameraFrame, CompositeFrame, ThermalFrame},
    ingest::{FrameDecoder, ImageMessage, SensorMessageDecoder},
    sink::FrameSink,
    stages::{ColorComposer, Cropper, GeometricAligner, RegionStatistics, RegionStats, ThermalNormalizer},
    store::FrameStore,
};

/// Result of one completed fusion cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionOutcome {
    /// Width of the emitted composite
    pub width: u32,
    /// Height of the emitted composite
    pub height: u32,
    /// Region statistics, `None` when the sampling region was empty
    pub statistics: Option<RegionStats>,
}

/// Fuses every incoming thermal frame with the latest camera frame.
///
/// Both handlers take `&self`, so one pipeline can be shared between the two
/// notification threads. Fusion cycles are serialised on the sink lock; a
/// camera update only holds the store lock long enough to swap a pointer.
pub struct FusionPipeline<D: FrameDecoder, S: FrameSink> {
    decoder: D,
    sink: Mutex<S>,
    store: FrameStore,
    config: FusionConfig,
    normalizer: ThermalNormalizer,
    statistics: RegionStatistics,
    aligner: GeometricAligner,
    composer: ColorComposer,
    cropper: Cropper,
}

impl<S: FrameSink> FusionPipeline<SensorMessageDecoder, S> {
    pub fn new(config: FusionConfig, sink: S) -> Result<Self> {
        Self::with_custom(SensorMessageDecoder, sink, config)
    }
}

impl<D: FrameDecoder, S: FrameSink> FusionPipeline<D, S> {
    /// Validates `config` before anything else; no frame is ever processed
    /// with a rejected configuration.
    pub fn with_custom(decoder: D, sink: S, config: FusionConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            decoder,
            sink: Mutex::new(sink),
            store: FrameStore::new(config.camera_width, config.camera_height),
            normalizer: ThermalNormalizer::from_config(&config),
            statistics: RegionStatistics::new(config.region_half_width),
            aligner: GeometricAligner::from_config(&config),
            composer: ColorComposer,
            cropper: Cropper::new(config.scale)?,
            config,
        })
    }

    fn check_camera_size(&self, frame: CameraFrame) -> Result<CameraFrame> {
        let expected = self.config.camera_dimensions();
        if frame.dimensions() != expected {
            return Err(FusionError::format(
                StreamKind::Camera,
                format!("{}x{}", expected.0, expected.1),
                format!("{}x{}", frame.image.width(), frame.image.height()),
            ));
        }
        Ok(frame)
    }

    /// Replaces the stored camera frame. A malformed frame is dropped and the
    /// previous one stays in place.
    #[instrument(skip_all, fields(seq = message.header.seq))]
    pub fn on_camera_frame(&self, message: &ImageMessage) -> Result<()> {
        let frame = self
            .decoder
            .decode_camera(message)
            .and_then(|frame| self.check_camera_size(frame))
            .inspect_err(|e| {
                warn!(stream = %StreamKind::Camera, error = %e, "Dropping camera frame, keeping last known good");
            })?;

        self.store.replace_camera(frame);
        Ok(())
    }

    /// Runs one fusion cycle against the current camera frame and publishes
    /// the composite. A malformed thermal frame skips the cycle; nothing is
    /// emitted and nothing is retried.
    #[instrument(skip_all, fields(seq = message.header.seq))]
    pub fn on_thermal_frame(&self, message: &ImageMessage) -> Result<FusionOutcome> {
        let thermal = self.decoder.decode_thermal(message).inspect_err(|e| {
            warn!(stream = %StreamKind::Thermal, error = %e, "Skipping fusion cycle");
        })?;

        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let camera = self.store.camera();

        let (composite, statistics) = self.fuse(&camera, &thermal).inspect_err(|e| {
            error!(error = %e, "Fusion cycle failed, nothing emitted");
        })?;
        let (width, height) = composite.dimensions();

        {
            let _span = tracing::info_span!("publish", width, height).entered();
            sink.publish(composite).inspect_err(|e| {
                error!(error = %e, "Failed to publish composite frame");
            })?;
        }

        info!(width, height, "Composite frame emitted");
        Ok(FusionOutcome {
            width,
            height,
            statistics,
        })
    }

    /// Pure fusion of one camera/thermal pair; touches neither store nor sink.
    pub fn fuse(
        &self,
        camera: &CameraFrame,
        thermal: &ThermalFrame,
    ) -> Result<(CompositeFrame, Option<RegionStats>)> {
        let normalized = {
            let _span = tracing::info_span!("normalize").entered();
            self.normalizer.normalize(&thermal.image)
        };

        let statistics = {
            let _span = tracing::info_span!("region_statistics").entered();
            match self.statistics.compute(&thermal.image) {
                Ok(stats) => {
                    info!(mean = stats.mean, count = stats.count, "Thermal region mean");
                    Some(stats)
                }
                Err(e) => {
                    warn!(error = %e, "No region statistics for this frame");
                    None
                }
            }
        };

        let aligned = {
            let _span = tracing::info_span!("align").entered();
            self.aligner.align(&normalized, self.config.camera_dimensions())
        };

        let composite = {
            let _span = tracing::info_span!("compose").entered();
            self.composer.compose(&camera.image, &aligned)?
        };

        let image = {
            let _span = tracing::info_span!("crop").entered();
            self.cropper.crop(&composite)
        };

        Ok((
            CompositeFrame {
                header: thermal.header.clone(),
                image,
            },
            statistics,
        ))
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Consumes the pipeline and hands back its sink.
    pub fn into_sink(self) -> S {
        self.sink.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
