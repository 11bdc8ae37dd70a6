//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Pipeline configuration file (YAML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Media engine backend
    #[arg(long, default_value = "ffmpeg")]
    pub engine: String,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Pipeline configuration file (YAML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Media engine backend (used only to probe input durations)
    #[arg(long, default_value = "ffmpeg")]
    pub engine: String,

    /// Assume this duration (seconds) for every input instead of probing
    #[arg(long)]
    pub assume_duration: Option<f64>,
}
