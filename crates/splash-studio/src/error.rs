use std::path::PathBuf;

use splash_engine::raster::RasterError;
use thiserror::Error;

use crate::capture::CaptureError;

/// Errors surfaced by the studio to its host.
///
/// Capture and encoding failures never reach the user directly: the editor
/// shell logs them and queues a failure notice instead.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("capture produced no image")]
    EmptyCapture,

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] RasterError),

    #[error("invalid model {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
