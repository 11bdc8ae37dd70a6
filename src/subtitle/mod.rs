//! Subtitle re-timing
//!
//! Applies a uniform global time scale to the timing lines of a line-oriented
//! caption stream (index line, `HH:MM:SS,mmm --> HH:MM:SS,mmm` timing line,
//! text lines, blank separator). Only timing lines are transformed; every
//! other line passes through unchanged, in its original order. The pass is
//! streaming and needs no lookback or lookahead.

use crate::domain::errors::{TimelineError, TimelineResult};
use crate::domain::model::Timecode;

/// Marker that distinguishes a timing line from subtitle text
pub const TIMING_SEPARATOR: &str = " --> ";

/// Re-time a single line.
///
/// Timing lines are scaled by `1/factor` (a factor above 1 speeds playback
/// up and compresses timing) and re-emitted in the `"A --> B"` shape; other
/// lines are returned verbatim.
pub fn retime_line(line: &str, factor: f64) -> TimelineResult<String> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TimelineError::invalid_parameter("factor", factor));
    }

    if !line.contains(TIMING_SEPARATOR) {
        return Ok(line.to_string());
    }

    let (start_text, end_text) = line
        .trim()
        .split_once(TIMING_SEPARATOR)
        .ok_or_else(|| TimelineError::invalid_format(line))?;

    let multiplier = 1.0 / factor;
    let start = Timecode::parse_long(start_text)?.scaled(multiplier);
    let end = Timecode::parse_long(end_text)?.scaled(multiplier);

    Ok(format!(
        "{}{}{}",
        start.format_long(),
        TIMING_SEPARATOR,
        end.format_long()
    ))
}

/// Re-time an ordered sequence of caption lines in a single pass.
///
/// Lines are taken without terminators (as produced by [`str::lines`]).
pub fn retime<'a, I>(lines: I, factor: f64) -> TimelineResult<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(|line| retime_line(line, factor))
        .collect()
}
