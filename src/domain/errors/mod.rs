// Domain errors - Error types for the timeline layer

use thiserror::Error;

/// Errors raised by timeline validation and segmentation.
///
/// All variants are detected synchronously, before any media engine call is
/// issued, so a failed operation never produces partial output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Malformed timecode or subtitle timing line
    #[error("invalid time format: '{value}'")]
    InvalidFormat { value: String },

    /// End not after start, out of bounds, or out-of-order intervals
    #[error("invalid time range: start '{start}', end '{end}'")]
    InvalidRange { start: String, end: String },

    /// Non-positive window/stride/factor, or window shorter than stride
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// No intervals supplied
    #[error("no intervals supplied")]
    EmptyInput,

    /// Symbolic "end" used without a known media duration
    #[error("cannot resolve '{value}' without a known media duration")]
    MissingDuration { value: String },
}

impl TimelineError {
    pub(crate) fn invalid_format(value: impl Into<String>) -> Self {
        Self::InvalidFormat {
            value: value.into(),
        }
    }

    pub(crate) fn invalid_range(start: impl ToString, end: impl ToString) -> Self {
        Self::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub(crate) fn invalid_parameter(name: &'static str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}

/// Result type alias for timeline operations
pub type TimelineResult<T> = std::result::Result<T, TimelineError>;
