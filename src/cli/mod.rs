//! CLI module for reelcut
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// Reelcut - Configuration-driven video and subtitle editing pipeline
///
/// Runs a declarative YAML list of editing operations (concatenate, trim,
/// sliding-window segmentation, speed change, frozen frame, subtitle
/// retiming) against an external media engine.
#[derive(Parser)]
#[command(name = "reelcut")]
#[command(about = "Reelcut - Declarative video and subtitle editing pipeline")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Execute every operation in a pipeline file
    Run(args::RunArgs),
    /// Compute and print the segment plan without producing media
    Plan(args::PlanArgs),
}
