// Adapters - Media engine implementations

pub mod ffmpeg_cli;
pub mod mock_engine;

pub use ffmpeg_cli::FfmpegCliEngine;
pub use mock_engine::{EngineCall, MockEngine};
