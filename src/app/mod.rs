// Application layer - Pipeline orchestration

pub mod pipeline;

pub use pipeline::{OperationPlan, PipelineReport, PipelineRunner};
