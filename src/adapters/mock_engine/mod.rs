// Mock engine adapter - In-memory media engine for tests and dry runs
//
// Computes derived durations with the same arithmetic a real engine would
// report, records every call for assertions, and never touches actual media.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{EngineResult, MediaEnginePort, MediaHandle};

/// One recorded engine invocation
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(PathBuf),
    ExtractSegment { start: f64, end: f64 },
    Concatenate { parts: usize },
    ScaleSpeed { factor: f64 },
    FreezeFrameAt { time: f64, duration: f64 },
    WriteOutput(PathBuf),
    ExtractAudio(PathBuf),
}

/// In-memory media engine
pub struct MockEngine {
    source_duration: f64,
    calls: Mutex<Vec<EngineCall>>,
    next_id: AtomicU64,
}

impl MockEngine {
    /// Every loaded source reports this duration
    pub fn with_source_duration(source_duration: f64) -> Self {
        Self {
            source_duration,
            calls: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Calls recorded so far, in invocation order
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn derived_handle(&self, duration: f64) -> MediaHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        MediaHandle::new(format!("mock://derived/{id}"), duration)
    }
}

#[async_trait]
impl MediaEnginePort for MockEngine {
    async fn load(&self, path: &Path) -> EngineResult<MediaHandle> {
        self.record(EngineCall::Load(path.to_path_buf()));
        Ok(MediaHandle::new(path, self.source_duration))
    }

    async fn extract_segment(
        &self,
        _handle: &MediaHandle,
        start: f64,
        end: f64,
    ) -> EngineResult<MediaHandle> {
        self.record(EngineCall::ExtractSegment { start, end });
        Ok(self.derived_handle(end - start))
    }

    async fn concatenate(&self, handles: &[MediaHandle]) -> EngineResult<MediaHandle> {
        self.record(EngineCall::Concatenate {
            parts: handles.len(),
        });
        let total = handles.iter().map(|h| h.duration).sum();
        Ok(self.derived_handle(total))
    }

    async fn scale_speed(&self, handle: &MediaHandle, factor: f64) -> EngineResult<MediaHandle> {
        self.record(EngineCall::ScaleSpeed { factor });
        Ok(self.derived_handle(handle.duration / factor))
    }

    async fn freeze_frame_at(
        &self,
        handle: &MediaHandle,
        time: f64,
        duration: f64,
    ) -> EngineResult<MediaHandle> {
        self.record(EngineCall::FreezeFrameAt { time, duration });
        Ok(self.derived_handle(handle.duration + duration))
    }

    async fn write_output(&self, _handle: &MediaHandle, path: &Path) -> EngineResult<()> {
        self.record(EngineCall::WriteOutput(path.to_path_buf()));
        Ok(())
    }

    async fn extract_audio(
        &self,
        _handle: &MediaHandle,
        path: &Path,
        _codec: &str,
        _bitrate: &str,
    ) -> EngineResult<()> {
        self.record(EngineCall::ExtractAudio(path.to_path_buf()));
        Ok(())
    }
}
