// Pipeline configuration - Declarative YAML operation list
//
// Operations are a tagged enum rather than string-keyed dispatch: unknown
// kinds and missing fields are rejected at deserialization, and the
// application layer matches exhaustively.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::rules::FreezePosition;

/// Errors raised while loading a pipeline file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

/// A declarative list of editing operations, executed in order
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub operations: Vec<OperationSpec>,
}

impl PipelineConfig {
    /// Load and parse a YAML pipeline file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

/// One editing operation
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationSpec {
    /// Concatenate input files, in order, into one output
    Concat {
        inputs: Vec<PathBuf>,
        output: PathBuf,
    },

    /// Cut the listed intervals out of the input. A file output is the
    /// concatenation of all segments; a directory output receives one file
    /// per segment (`0.mp4`, `1.mp4`, ...).
    Trim {
        input: PathBuf,
        intervals: Vec<(String, String)>,
        output: PathBuf,
    },

    /// Cut fixed-length clips advanced by a fixed stride into `output_dir`
    /// (`clip_0.mp4`, `clip_1.mp4`, ...)
    SlidingWindow {
        input: PathBuf,
        window_length: f64,
        slide_step: f64,
        #[serde(default)]
        start_time: Option<String>,
        #[serde(default)]
        end_time: Option<String>,
        output_dir: PathBuf,
    },

    /// Change playback speed, for the whole timeline or only within the
    /// given intervals
    ChangeSpeed {
        input: PathBuf,
        factor: f64,
        #[serde(default)]
        intervals: Option<Vec<(String, String)>>,
        output: PathBuf,
    },

    /// Insert a frozen frame at the chosen position
    FreezeFrame {
        input: PathBuf,
        position: FreezePosition,
        #[serde(default)]
        freeze_time: Option<f64>,
        freeze_duration: f64,
        output: PathBuf,
    },

    /// Rescale the timing lines of an SRT caption stream
    RetimeSubtitles {
        input: PathBuf,
        factor: f64,
        output: PathBuf,
    },

    /// Extract the audio track
    ExtractAudio {
        input: PathBuf,
        output: PathBuf,
        #[serde(default = "default_audio_format")]
        format: String,
        #[serde(default = "default_audio_bitrate")]
        bitrate: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_pipeline() {
        let yaml = r#"
operations:
  - kind: trim
    input: talk.mp4
    intervals:
      - ["00:10", "00:20"]
      - ["01:00", "end"]
    output: highlights.mp4
  - kind: sliding_window
    input: talk.mp4
    window_length: 3.0
    slide_step: 2.0
    output_dir: clips
  - kind: change_speed
    input: talk.mp4
    factor: 2.0
    intervals:
      - ["00:10", "00:20"]
    output: fast.mp4
  - kind: freeze_frame
    input: talk.mp4
    position: middle
    freeze_time: 42.0
    freeze_duration: 3.0
    output: frozen.mp4
  - kind: retime_subtitles
    input: talk.srt
    factor: 2.0
    output: fast.srt
  - kind: concat
    inputs: [a.mp4, b.mp4]
    output: joined.mp4
  - kind: extract_audio
    input: talk.mp4
    output: talk.mp3
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.operations.len(), 7);

        match &config.operations[0] {
            OperationSpec::Trim { intervals, .. } => {
                assert_eq!(intervals[1], ("01:00".to_string(), "end".to_string()));
            }
            other => panic!("expected trim, got {other:?}"),
        }
        match &config.operations[6] {
            OperationSpec::ExtractAudio { format, bitrate, .. } => {
                assert_eq!(format, "mp3");
                assert_eq!(bitrate, "192k");
            }
            other => panic!("expected extract_audio, got {other:?}"),
        }
    }

    #[test]
    fn test_sliding_window_defaults() {
        let yaml = r#"
operations:
  - kind: sliding_window
    input: talk.mp4
    window_length: 3.0
    slide_step: 2.0
    output_dir: clips
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        match &config.operations[0] {
            OperationSpec::SlidingWindow {
                start_time,
                end_time,
                ..
            } => {
                assert!(start_time.is_none());
                assert!(end_time.is_none());
            }
            other => panic!("expected sliding_window, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let yaml = r#"
operations:
  - kind: explode
    input: talk.mp4
"#;
        assert!(serde_yaml::from_str::<PipelineConfig>(yaml).is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let yaml = r#"
operations:
  - kind: trim
    input: talk.mp4
    output: out.mp4
"#;
        assert!(serde_yaml::from_str::<PipelineConfig>(yaml).is_err());
    }
}
