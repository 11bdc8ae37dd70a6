// Ports - Interface contracts for external collaborators

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Opaque reference to loaded or derived media.
///
/// `path` points at the backing artifact (a source file or an intermediate
/// produced by the engine); `duration` is the engine-reported length in
/// seconds.
#[derive(Debug, Clone)]
pub struct MediaHandle {
    pub path: PathBuf,
    pub duration: f64,
}

impl MediaHandle {
    pub fn new(path: impl Into<PathBuf>, duration: f64) -> Self {
        Self {
            path: path.into(),
            duration,
        }
    }
}

/// Errors surfaced by a media engine implementation
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to probe media '{path}': {message}")]
    Probe { path: String, message: String },

    #[error("engine process failed: {message}")]
    Process { message: String },

    #[error("unsupported engine operation: {message}")]
    Unsupported { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Port for the external media-processing engine.
///
/// The pipeline core computes validated segment plans; everything that
/// actually decodes, encodes, or manipulates frames goes through this
/// contract. Implementations own their intermediate artifacts.
#[async_trait]
pub trait MediaEnginePort: Send + Sync {
    /// Load a media file and report its duration
    async fn load(&self, path: &Path) -> EngineResult<MediaHandle>;

    /// Extract the `[start, end)` segment, in seconds
    async fn extract_segment(
        &self,
        handle: &MediaHandle,
        start: f64,
        end: f64,
    ) -> EngineResult<MediaHandle>;

    /// Concatenate handles in the given order
    async fn concatenate(&self, handles: &[MediaHandle]) -> EngineResult<MediaHandle>;

    /// Scale playback speed by a positive factor.
    ///
    /// Implementations scale the audio time base together with the video so
    /// the streams stay in sync for whole-timeline speed changes.
    async fn scale_speed(&self, handle: &MediaHandle, factor: f64) -> EngineResult<MediaHandle>;

    /// Insert a frozen frame grabbed at `time` for `duration` seconds
    async fn freeze_frame_at(
        &self,
        handle: &MediaHandle,
        time: f64,
        duration: f64,
    ) -> EngineResult<MediaHandle>;

    /// Write the handle's media to the given path
    async fn write_output(&self, handle: &MediaHandle, path: &Path) -> EngineResult<()>;

    /// Extract the audio track to `path` with the given codec and bitrate
    async fn extract_audio(
        &self,
        handle: &MediaHandle,
        path: &Path,
        codec: &str,
        bitrate: &str,
    ) -> EngineResult<()>;
}
