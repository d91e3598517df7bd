use std::fmt;

use thiserror::Error;

/// The input stream a frame arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Camera,
    Thermal,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Camera => write!(f, "camera"),
            StreamKind::Thermal => write!(f, "thermal"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FusionError {
    #[error("Unexpected {stream} frame format: expected {expected}, got {actual}")]
    Format {
        stream: StreamKind,
        expected: String,
        actual: String,
    },

    #[error("Dimension mismatch: camera {camera:?}, aligned thermal {thermal:?}")]
    DimensionMismatch {
        camera: (u32, u32),
        thermal: (u32, u32),
    },

    #[error("Sampling region is empty for a {width}x{height} thermal frame")]
    DegenerateRegion { width: u32, height: u32 },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Failed to publish composite frame: {0}")]
    Publish(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FusionError {
    pub(crate) fn format(
        stream: StreamKind,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        FusionError::Format {
            stream,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FusionError>;
