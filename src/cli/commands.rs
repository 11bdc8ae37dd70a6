//! Command implementations

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::{FfmpegCliEngine, MockEngine};
use crate::app::PipelineRunner;
use crate::cli::args::{PlanArgs, RunArgs};
use crate::config::PipelineConfig;
use crate::ports::MediaEnginePort;

/// Duration reported by the mock engine for every loaded input
const MOCK_SOURCE_DURATION: f64 = 600.0;

/// Execute the run command
pub async fn run(args: RunArgs) -> Result<()> {
    info!("loading pipeline from {}", args.config.display());
    let config = PipelineConfig::load(&args.config)?;
    info!("pipeline has {} operations", config.operations.len());

    let engine = build_engine(&args.engine)?;
    PipelineRunner::new(engine)
        .run(&config)
        .await
        .context("pipeline execution failed")?;

    info!("pipeline completed");
    Ok(())
}

/// Execute the plan command
pub async fn plan(args: PlanArgs) -> Result<()> {
    let config = PipelineConfig::load(&args.config)?;

    let engine = build_engine(&args.engine)?;
    let report = PipelineRunner::new(engine)
        .with_assumed_duration(args.assume_duration)
        .plan(&config)
        .await
        .context("pipeline planning failed")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn build_engine(name: &str) -> Result<Arc<dyn MediaEnginePort>> {
    match name {
        "ffmpeg" => Ok(Arc::new(FfmpegCliEngine::new()?)),
        "mock" => Ok(Arc::new(MockEngine::with_source_duration(
            MOCK_SOURCE_DURATION,
        ))),
        other => anyhow::bail!("unknown engine '{}', expected 'ffmpeg' or 'mock'", other),
    }
}
