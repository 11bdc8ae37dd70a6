//! Error handling module for reelcut

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::errors::TimelineError;
use crate::ports::EngineError;

/// Top-level error type covering every pipeline failure mode
#[derive(Error, Debug)]
pub enum ReelcutError {
    /// Timeline validation or segmentation failure
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// External media engine failure
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Pipeline configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for reelcut operations
pub type ReelcutResult<T> = std::result::Result<T, ReelcutError>;
