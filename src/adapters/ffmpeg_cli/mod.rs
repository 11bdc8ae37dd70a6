// FFmpeg CLI adapter - Drives the ffmpeg/ffprobe binaries
//
// All decoding, encoding, and frame manipulation happens in the external
// engine; this adapter only builds command lines and tracks intermediate
// artifacts in a scratch directory that lives as long as the adapter.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

use crate::ports::{EngineError, EngineResult, MediaEnginePort, MediaHandle};

// Re-encode settings for intermediate segments. Uniform codecs keep the
// concat demuxer in stream-copy territory.
const VIDEO_CODEC_ARGS: [&str; 4] = ["-c:v", "libx264", "-b:v", "8000k"];
const AUDIO_CODEC_ARGS: [&str; 2] = ["-c:a", "aac"];

/// Media engine backed by the `ffmpeg` and `ffprobe` command-line tools
pub struct FfmpegCliEngine {
    ffmpeg: String,
    ffprobe: String,
    workdir: TempDir,
    next_id: AtomicU64,
}

impl FfmpegCliEngine {
    /// Create an engine using `ffmpeg`/`ffprobe` from `PATH`
    pub fn new() -> EngineResult<Self> {
        Self::with_binaries("ffmpeg", "ffprobe")
    }

    /// Create an engine with explicit binary paths
    pub fn with_binaries(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> EngineResult<Self> {
        Ok(Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            workdir: tempfile::tempdir()?,
            next_id: AtomicU64::new(0),
        })
    }

    fn scratch_path(&self, stem: &str, extension: &str) -> PathBuf {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.workdir
            .path()
            .join(format!("{stem}_{id}.{extension}"))
    }

    async fn run(&self, program: &str, args: &[String]) -> EngineResult<Vec<u8>> {
        debug!(program, ?args, "invoking engine process");
        let output = Command::new(program).args(args).output().await?;
        if !output.status.success() {
            return Err(EngineError::Process {
                message: format!(
                    "{} exited with {}: {}",
                    program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(output.stdout)
    }

    async fn probe_duration(&self, path: &Path) -> EngineResult<f64> {
        let args: Vec<String> = [
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
        ]
        .iter()
        .map(|s| s.to_string())
        .chain([path.display().to_string()])
        .collect();

        let stdout = self.run(&self.ffprobe, &args).await?;
        let probe: Value = serde_json::from_slice(&stdout).map_err(|e| EngineError::Probe {
            path: path.display().to_string(),
            message: format!("unparseable ffprobe output: {e}"),
        })?;

        probe["format"]["duration"]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| EngineError::Probe {
                path: path.display().to_string(),
                message: "no duration reported".to_string(),
            })
    }

    /// Grab a single frame at `time` into a still image
    async fn grab_frame(&self, handle: &MediaHandle, time: f64) -> EngineResult<PathBuf> {
        let frame_path = self.scratch_path("frame", "png");
        let args = vec![
            "-y".to_string(),
            "-ss".to_string(),
            format!("{time}"),
            "-i".to_string(),
            handle.path.display().to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            frame_path.display().to_string(),
        ];
        self.run(&self.ffmpeg, &args).await?;
        Ok(frame_path)
    }

    /// Turn a still image into a clip with silent audio
    async fn still_clip(&self, frame: &Path, duration: f64) -> EngineResult<MediaHandle> {
        let out = self.scratch_path("still", "mp4");
        let mut args = vec![
            "-y".to_string(),
            "-loop".to_string(),
            "1".to_string(),
            "-framerate".to_string(),
            "30".to_string(),
            "-t".to_string(),
            format!("{duration}"),
            "-i".to_string(),
            frame.display().to_string(),
            "-f".to_string(),
            "lavfi".to_string(),
            "-t".to_string(),
            format!("{duration}"),
            "-i".to_string(),
            "anullsrc=r=44100:cl=stereo".to_string(),
        ];
        args.extend(VIDEO_CODEC_ARGS.iter().map(|s| s.to_string()));
        args.extend(["-pix_fmt".to_string(), "yuv420p".to_string()]);
        args.extend(AUDIO_CODEC_ARGS.iter().map(|s| s.to_string()));
        args.extend(["-shortest".to_string(), out.display().to_string()]);
        self.run(&self.ffmpeg, &args).await?;
        Ok(MediaHandle::new(out, duration))
    }
}

/// Split an audio tempo factor into stages the `atempo` filter accepts
/// (each within [0.5, 2.0]).
fn atempo_chain(factor: f64) -> String {
    let mut remaining = factor;
    let mut stages = Vec::new();
    while remaining > 2.0 {
        stages.push("atempo=2.0".to_string());
        remaining /= 2.0;
    }
    while remaining < 0.5 {
        stages.push("atempo=0.5".to_string());
        remaining *= 2.0;
    }
    stages.push(format!("atempo={remaining}"));
    stages.join(",")
}

#[async_trait]
impl MediaEnginePort for FfmpegCliEngine {
    async fn load(&self, path: &Path) -> EngineResult<MediaHandle> {
        let duration = self.probe_duration(path).await?;
        Ok(MediaHandle::new(path, duration))
    }

    async fn extract_segment(
        &self,
        handle: &MediaHandle,
        start: f64,
        end: f64,
    ) -> EngineResult<MediaHandle> {
        let out = self.scratch_path("segment", "mp4");
        let mut args = vec![
            "-y".to_string(),
            "-ss".to_string(),
            format!("{start}"),
            "-to".to_string(),
            format!("{end}"),
            "-i".to_string(),
            handle.path.display().to_string(),
        ];
        args.extend(VIDEO_CODEC_ARGS.iter().map(|s| s.to_string()));
        args.extend(AUDIO_CODEC_ARGS.iter().map(|s| s.to_string()));
        args.push(out.display().to_string());
        self.run(&self.ffmpeg, &args).await?;
        Ok(MediaHandle::new(out, end - start))
    }

    async fn concatenate(&self, handles: &[MediaHandle]) -> EngineResult<MediaHandle> {
        let list_path = self.scratch_path("concat", "txt");
        let mut listing = String::new();
        for handle in handles {
            listing.push_str(&format!("file '{}'\n", handle.path.display()));
        }
        tokio::fs::write(&list_path, listing).await?;

        let out = self.scratch_path("joined", "mp4");
        let args = vec![
            "-y".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            list_path.display().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            out.display().to_string(),
        ];
        self.run(&self.ffmpeg, &args).await?;

        let total = handles.iter().map(|h| h.duration).sum();
        Ok(MediaHandle::new(out, total))
    }

    async fn scale_speed(&self, handle: &MediaHandle, factor: f64) -> EngineResult<MediaHandle> {
        let out = self.scratch_path("retimed", "mp4");
        let filter = format!(
            "[0:v]setpts=PTS/{factor}[v];[0:a]{}[a]",
            atempo_chain(factor)
        );
        let mut args = vec![
            "-y".to_string(),
            "-i".to_string(),
            handle.path.display().to_string(),
            "-filter_complex".to_string(),
            filter,
            "-map".to_string(),
            "[v]".to_string(),
            "-map".to_string(),
            "[a]".to_string(),
        ];
        args.extend(VIDEO_CODEC_ARGS.iter().map(|s| s.to_string()));
        args.extend(AUDIO_CODEC_ARGS.iter().map(|s| s.to_string()));
        args.push(out.display().to_string());
        self.run(&self.ffmpeg, &args).await?;
        Ok(MediaHandle::new(out, handle.duration / factor))
    }

    async fn freeze_frame_at(
        &self,
        handle: &MediaHandle,
        time: f64,
        duration: f64,
    ) -> EngineResult<MediaHandle> {
        let head = self.extract_segment(handle, 0.0, time).await?;
        let frame = self.grab_frame(handle, time).await?;
        let still = self.still_clip(&frame, duration).await?;
        let tail = self.extract_segment(handle, time, handle.duration).await?;
        self.concatenate(&[head, still, tail]).await
    }

    async fn write_output(&self, handle: &MediaHandle, path: &Path) -> EngineResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::copy(&handle.path, path).await?;
        Ok(())
    }

    async fn extract_audio(
        &self,
        handle: &MediaHandle,
        path: &Path,
        codec: &str,
        bitrate: &str,
    ) -> EngineResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            handle.path.display().to_string(),
            "-vn".to_string(),
            "-c:a".to_string(),
            codec.to_string(),
            "-b:a".to_string(),
            bitrate.to_string(),
            path.display().to_string(),
        ];
        self.run(&self.ffmpeg, &args).await?;
        Ok(())
    }
}
