//! Reelcut - Configuration-driven video and subtitle editing pipeline
//!
//! The core of the crate is the timeline segmentation and time-arithmetic
//! engine in [`domain`]: textual timecodes become validated, ordered segment
//! lists, sliding-window plans, and speed maps. Media decoding and encoding
//! are delegated to an external engine behind [`ports::MediaEnginePort`].

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod subtitle;

// Re-export commonly used types
pub use config::{OperationSpec, PipelineConfig};
pub use domain::errors::{TimelineError, TimelineResult};
pub use domain::model::{Interval, SpeedMapEntry, Timecode};
pub use error::{ReelcutError, ReelcutResult};
