//! Pipeline runner - Executes a declarative operation list
//!
//! Each operation is validated through the timeline rules before any engine
//! call is issued, so malformed input never produces partial output. The
//! runner itself does no media work; it feeds computed segment plans to the
//! [`MediaEnginePort`] collaborator.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{OperationSpec, PipelineConfig};
use crate::domain::errors::{TimelineError, TimelineResult};
use crate::domain::model::{Interval, SpeedMapEntry};
use crate::domain::rules::{
    compute_speed_map, normalize_intervals, resolve_freeze_point, total_output_duration,
    FreezePosition, WindowPlan,
};
use crate::error::ReelcutResult;
use crate::ports::{MediaEnginePort, MediaHandle};
use crate::subtitle;

/// Computed plan for one operation, without any media side effects
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationPlan {
    Concat {
        inputs: Vec<PathBuf>,
        output: PathBuf,
        total_duration: f64,
    },
    Trim {
        input: PathBuf,
        media_duration: f64,
        segments: Vec<Interval>,
        output: PathBuf,
    },
    SlidingWindow {
        input: PathBuf,
        media_duration: f64,
        windows: Vec<Interval>,
        output_dir: PathBuf,
    },
    ChangeSpeed {
        input: PathBuf,
        media_duration: f64,
        entries: Vec<SpeedMapEntry>,
        output_duration: f64,
        output: PathBuf,
    },
    FreezeFrame {
        input: PathBuf,
        freeze_at: f64,
        freeze_duration: f64,
        output: PathBuf,
    },
    RetimeSubtitles {
        input: PathBuf,
        factor: f64,
        output: PathBuf,
    },
    ExtractAudio {
        input: PathBuf,
        output: PathBuf,
        format: String,
        bitrate: String,
    },
}

/// Full pipeline plan, one entry per configured operation
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub operations: Vec<OperationPlan>,
}

/// Orchestrates configured operations against a media engine
pub struct PipelineRunner {
    engine: Arc<dyn MediaEnginePort>,
    assumed_duration: Option<f64>,
}

impl PipelineRunner {
    pub fn new(engine: Arc<dyn MediaEnginePort>) -> Self {
        Self {
            engine,
            assumed_duration: None,
        }
    }

    /// Use a fixed duration for every input instead of probing the engine.
    /// Useful for planning without media files present.
    pub fn with_assumed_duration(mut self, duration: Option<f64>) -> Self {
        self.assumed_duration = duration;
        self
    }

    /// Execute every operation in order
    pub async fn run(&self, config: &PipelineConfig) -> ReelcutResult<()> {
        let total = config.operations.len();
        for (index, operation) in config.operations.iter().enumerate() {
            info!("running operation {}/{}", index + 1, total);
            self.run_operation(operation).await?;
        }
        Ok(())
    }

    /// Compute the segment plan for every operation without touching media.
    /// The engine is only consulted for input durations, and not even for
    /// those when an assumed duration is set.
    pub async fn plan(&self, config: &PipelineConfig) -> ReelcutResult<PipelineReport> {
        let mut operations = Vec::with_capacity(config.operations.len());
        for operation in &config.operations {
            operations.push(self.plan_operation(operation).await?);
        }
        Ok(PipelineReport { operations })
    }

    async fn duration_of(&self, path: &Path) -> ReelcutResult<f64> {
        match self.assumed_duration {
            Some(duration) => Ok(duration),
            None => Ok(self.engine.load(path).await?.duration),
        }
    }

    async fn run_operation(&self, operation: &OperationSpec) -> ReelcutResult<()> {
        match operation {
            OperationSpec::Concat { inputs, output } => self.run_concat(inputs, output).await,
            OperationSpec::Trim {
                input,
                intervals,
                output,
            } => self.run_trim(input, intervals, output).await,
            OperationSpec::SlidingWindow {
                input,
                window_length,
                slide_step,
                start_time,
                end_time,
                output_dir,
            } => {
                self.run_sliding_window(
                    input,
                    *window_length,
                    *slide_step,
                    start_time.as_deref(),
                    end_time.as_deref(),
                    output_dir,
                )
                .await
            }
            OperationSpec::ChangeSpeed {
                input,
                factor,
                intervals,
                output,
            } => {
                self.run_change_speed(input, *factor, intervals.as_deref(), output)
                    .await
            }
            OperationSpec::FreezeFrame {
                input,
                position,
                freeze_time,
                freeze_duration,
                output,
            } => {
                self.run_freeze_frame(input, *position, *freeze_time, *freeze_duration, output)
                    .await
            }
            OperationSpec::RetimeSubtitles {
                input,
                factor,
                output,
            } => self.run_retime_subtitles(input, *factor, output).await,
            OperationSpec::ExtractAudio {
                input,
                output,
                format,
                bitrate,
            } => self.run_extract_audio(input, output, format, bitrate).await,
        }
    }

    async fn plan_operation(&self, operation: &OperationSpec) -> ReelcutResult<OperationPlan> {
        match operation {
            OperationSpec::Concat { inputs, output } => {
                if inputs.is_empty() {
                    return Err(TimelineError::EmptyInput.into());
                }
                let mut total_duration = 0.0;
                for input in inputs {
                    total_duration += self.duration_of(input).await?;
                }
                Ok(OperationPlan::Concat {
                    inputs: inputs.clone(),
                    output: output.clone(),
                    total_duration,
                })
            }
            OperationSpec::Trim {
                input,
                intervals,
                output,
            } => {
                let media_duration = self.duration_of(input).await?;
                let segments = normalize_intervals(intervals, media_duration)?;
                Ok(OperationPlan::Trim {
                    input: input.clone(),
                    media_duration,
                    segments,
                    output: output.clone(),
                })
            }
            OperationSpec::SlidingWindow {
                input,
                window_length,
                slide_step,
                start_time,
                end_time,
                output_dir,
            } => {
                let media_duration = self.duration_of(input).await?;
                let plan = WindowPlan::new(
                    media_duration,
                    *window_length,
                    *slide_step,
                    start_time.as_deref(),
                    end_time.as_deref(),
                )?;
                Ok(OperationPlan::SlidingWindow {
                    input: input.clone(),
                    media_duration,
                    windows: plan.iter().collect(),
                    output_dir: output_dir.clone(),
                })
            }
            OperationSpec::ChangeSpeed {
                input,
                factor,
                intervals,
                output,
            } => {
                let media_duration = self.duration_of(input).await?;
                let entries = speed_map_for(media_duration, *factor, intervals.as_deref())?;
                let output_duration = total_output_duration(&entries);
                Ok(OperationPlan::ChangeSpeed {
                    input: input.clone(),
                    media_duration,
                    entries,
                    output_duration,
                    output: output.clone(),
                })
            }
            OperationSpec::FreezeFrame {
                input,
                position,
                freeze_time,
                freeze_duration,
                output,
            } => {
                validate_freeze_duration(*freeze_duration)?;
                let media_duration = self.duration_of(input).await?;
                let freeze_at = resolve_freeze_point(media_duration, *position, *freeze_time)?;
                Ok(OperationPlan::FreezeFrame {
                    input: input.clone(),
                    freeze_at,
                    freeze_duration: *freeze_duration,
                    output: output.clone(),
                })
            }
            OperationSpec::RetimeSubtitles {
                input,
                factor,
                output,
            } => {
                validate_factor(*factor)?;
                Ok(OperationPlan::RetimeSubtitles {
                    input: input.clone(),
                    factor: *factor,
                    output: output.clone(),
                })
            }
            OperationSpec::ExtractAudio {
                input,
                output,
                format,
                bitrate,
            } => {
                audio_codec_for(format)?;
                Ok(OperationPlan::ExtractAudio {
                    input: input.clone(),
                    output: output.clone(),
                    format: format.clone(),
                    bitrate: bitrate.clone(),
                })
            }
        }
    }

    async fn run_concat(&self, inputs: &[PathBuf], output: &Path) -> ReelcutResult<()> {
        if inputs.is_empty() {
            return Err(TimelineError::EmptyInput.into());
        }
        let mut handles = Vec::with_capacity(inputs.len());
        for input in inputs {
            handles.push(self.engine.load(input).await?);
        }
        let joined = self.engine.concatenate(&handles).await?;
        self.engine.write_output(&joined, output).await?;
        info!("concatenated {} files into {}", inputs.len(), output.display());
        Ok(())
    }

    async fn run_trim(
        &self,
        input: &Path,
        intervals: &[(String, String)],
        output: &Path,
    ) -> ReelcutResult<()> {
        let handle = self.engine.load(input).await?;
        let segments = normalize_intervals(intervals, handle.duration)?;

        let mut parts = Vec::with_capacity(segments.len());
        for (index, segment) in segments.iter().enumerate() {
            info!(
                "processing interval {}/{}: {}",
                index + 1,
                segments.len(),
                segment
            );
            parts.push(self.extract(&handle, segment).await?);
        }

        if output.is_dir() {
            for (index, part) in parts.iter().enumerate() {
                self.engine
                    .write_output(part, &output.join(format!("{index}.mp4")))
                    .await?;
            }
        } else {
            let joined = self.engine.concatenate(&parts).await?;
            self.engine.write_output(&joined, output).await?;
        }
        Ok(())
    }

    async fn run_sliding_window(
        &self,
        input: &Path,
        window_length: f64,
        slide_step: f64,
        start_time: Option<&str>,
        end_time: Option<&str>,
        output_dir: &Path,
    ) -> ReelcutResult<()> {
        let handle = self.engine.load(input).await?;
        let plan = WindowPlan::new(
            handle.duration,
            window_length,
            slide_step,
            start_time,
            end_time,
        )?;

        tokio::fs::create_dir_all(output_dir).await?;
        let mut count = 0usize;
        for (index, window) in plan.iter().enumerate() {
            let clip = self.extract(&handle, &window).await?;
            self.engine
                .write_output(&clip, &output_dir.join(format!("clip_{index}.mp4")))
                .await?;
            count += 1;
        }
        info!("wrote {} clips to {}", count, output_dir.display());
        Ok(())
    }

    async fn run_change_speed(
        &self,
        input: &Path,
        factor: f64,
        intervals: Option<&[(String, String)]>,
        output: &Path,
    ) -> ReelcutResult<()> {
        let handle = self.engine.load(input).await?;
        let entries = speed_map_for(handle.duration, factor, intervals)?;

        let result = if entries.len() == 1 && entries[0].is_scaled() {
            // Whole-timeline change: the engine rescales the audio time base
            // together with the video, keeping the streams in sync.
            self.engine.scale_speed(&handle, factor).await?
        } else {
            // Known limitation: for interval-scoped speed changes the engine
            // may not support segment-local audio retiming, so audio can
            // keep its original timing in the affected segments.
            warn!("interval-scoped speed change: audio timing may not be rescaled per segment");
            let mut parts = Vec::with_capacity(entries.len());
            for entry in &entries {
                let part = self.extract(&handle, &entry.interval).await?;
                let part = if entry.is_scaled() {
                    self.engine.scale_speed(&part, entry.factor).await?
                } else {
                    part
                };
                parts.push(part);
            }
            self.engine.concatenate(&parts).await?
        };

        self.engine.write_output(&result, output).await?;
        info!(
            "wrote {} ({}x speed, output duration {:.3}s)",
            output.display(),
            factor,
            total_output_duration(&entries)
        );
        Ok(())
    }

    async fn run_freeze_frame(
        &self,
        input: &Path,
        position: FreezePosition,
        freeze_time: Option<f64>,
        freeze_duration: f64,
        output: &Path,
    ) -> ReelcutResult<()> {
        validate_freeze_duration(freeze_duration)?;
        let handle = self.engine.load(input).await?;
        let freeze_at = resolve_freeze_point(handle.duration, position, freeze_time)?;

        info!("freezing frame at {:.3}s for {:.3}s", freeze_at, freeze_duration);
        let frozen = self
            .engine
            .freeze_frame_at(&handle, freeze_at, freeze_duration)
            .await?;
        self.engine.write_output(&frozen, output).await?;
        Ok(())
    }

    async fn run_retime_subtitles(
        &self,
        input: &Path,
        factor: f64,
        output: &Path,
    ) -> ReelcutResult<()> {
        let text = tokio::fs::read_to_string(input).await?;
        let lines = subtitle::retime(text.lines(), factor)?;

        let mut body = lines.join("\n");
        body.push('\n');
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(output, body).await?;
        info!("retimed subtitles written to {}", output.display());
        Ok(())
    }

    async fn run_extract_audio(
        &self,
        input: &Path,
        output: &Path,
        format: &str,
        bitrate: &str,
    ) -> ReelcutResult<()> {
        let codec = audio_codec_for(format)?;
        let handle = self.engine.load(input).await?;
        self.engine
            .extract_audio(&handle, output, codec, bitrate)
            .await?;
        info!("extracted {} audio to {}", format, output.display());
        Ok(())
    }

    async fn extract(&self, handle: &MediaHandle, interval: &Interval) -> ReelcutResult<MediaHandle> {
        Ok(self
            .engine
            .extract_segment(
                handle,
                interval.start.as_seconds(),
                interval.end.as_seconds(),
            )
            .await?)
    }
}

fn speed_map_for(
    media_duration: f64,
    factor: f64,
    intervals: Option<&[(String, String)]>,
) -> TimelineResult<Vec<SpeedMapEntry>> {
    match intervals {
        None => compute_speed_map(media_duration, factor, None),
        Some(raw) => {
            let intervals = normalize_intervals(raw, media_duration)?;
            compute_speed_map(media_duration, factor, Some(&intervals))
        }
    }
}

fn validate_factor(factor: f64) -> TimelineResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TimelineError::invalid_parameter("factor", factor));
    }
    Ok(())
}

fn validate_freeze_duration(freeze_duration: f64) -> TimelineResult<()> {
    if !freeze_duration.is_finite() || freeze_duration <= 0.0 {
        return Err(TimelineError::invalid_parameter(
            "freeze_duration",
            freeze_duration,
        ));
    }
    Ok(())
}

/// Encoder name for a requested audio container format
fn audio_codec_for(format: &str) -> TimelineResult<&'static str> {
    match format.to_ascii_lowercase().as_str() {
        "mp3" => Ok("libmp3lame"),
        "wav" => Ok("pcm_s16le"),
        "ogg" => Ok("libvorbis"),
        "aac" | "m4a" => Ok("aac"),
        _ => Err(TimelineError::invalid_parameter("format", format)),
    }
}
