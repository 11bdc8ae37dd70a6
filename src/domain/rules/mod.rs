// Domain rules - Timeline segmentation and time arithmetic

use serde::{Deserialize, Serialize};

use crate::domain::errors::{TimelineError, TimelineResult};
use crate::domain::model::{Interval, SpeedMapEntry, Timecode};

/// Validate a raw list of textual intervals against a known media duration.
///
/// Starts are parsed as `MM:SS`, ends accept the `"end"` sentinel. Each
/// interval must satisfy `start < end <= duration`; ordering and overlap
/// across intervals are deliberately not enforced, since callers may request
/// arbitrary, even overlapping, cuts. Output order equals input order.
pub fn normalize_intervals<S: AsRef<str>>(
    raw_intervals: &[(S, S)],
    media_duration: f64,
) -> TimelineResult<Vec<Interval>> {
    if raw_intervals.is_empty() {
        return Err(TimelineError::EmptyInput);
    }

    let mut intervals = Vec::with_capacity(raw_intervals.len());
    for (start_text, end_text) in raw_intervals {
        let (start_text, end_text) = (start_text.as_ref(), end_text.as_ref());
        let start = Timecode::parse_short(start_text)?;
        let end = Timecode::resolve_end(end_text, Some(media_duration))?;

        if end.as_seconds() <= start.as_seconds() || end.as_seconds() > media_duration {
            return Err(TimelineError::invalid_range(start_text, end_text));
        }

        intervals.push(Interval::new(start, end)?);
    }

    Ok(intervals)
}

/// An immutable sliding-window plan over a sub-range of the timeline.
///
/// Windows have fixed length and advance by a fixed stride; consecutive
/// windows overlap by `window_length - slide_step`. The plan holds no
/// iteration state, so [`WindowPlan::iter`] can be called any number of
/// times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowPlan {
    start: f64,
    end: f64,
    window_length: f64,
    slide_step: f64,
}

impl WindowPlan {
    /// Build a validated plan.
    ///
    /// `start_text` defaults to `"00:00"`, `end_text` to the media duration
    /// (the `"end"` sentinel is accepted). The window must be at least one
    /// stride wide, which guarantees consecutive windows leave no gap.
    pub fn new(
        media_duration: f64,
        window_length: f64,
        slide_step: f64,
        start_text: Option<&str>,
        end_text: Option<&str>,
    ) -> TimelineResult<Self> {
        if !window_length.is_finite() || window_length <= 0.0 {
            return Err(TimelineError::invalid_parameter(
                "window_length",
                window_length,
            ));
        }
        if !slide_step.is_finite() || slide_step <= 0.0 {
            return Err(TimelineError::invalid_parameter("slide_step", slide_step));
        }
        if window_length < slide_step {
            return Err(TimelineError::invalid_parameter(
                "window_length",
                format!("{} is shorter than slide_step {}", window_length, slide_step),
            ));
        }

        let start = Timecode::parse_short(start_text.unwrap_or("00:00"))?.as_seconds();
        let end =
            Timecode::resolve_end(end_text.unwrap_or("end"), Some(media_duration))?.as_seconds();

        if start >= end || end > media_duration {
            return Err(TimelineError::invalid_range(start, end));
        }

        Ok(Self {
            start,
            end,
            window_length,
            slide_step,
        })
    }

    /// Fresh lazy iterator over the plan's windows.
    ///
    /// A trailing partial window that would cross the range end is dropped,
    /// never truncated, so every emitted interval has exactly
    /// `window_length` duration.
    pub fn iter(&self) -> Windows {
        Windows {
            cursor: self.start,
            end: self.end,
            window_length: self.window_length,
            slide_step: self.slide_step,
        }
    }
}

impl<'a> IntoIterator for &'a WindowPlan {
    type Item = Interval;
    type IntoIter = Windows;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy, finite iterator produced by [`WindowPlan::iter`]
#[derive(Debug, Clone)]
pub struct Windows {
    cursor: f64,
    end: f64,
    window_length: f64,
    slide_step: f64,
}

impl Iterator for Windows {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        if self.cursor + self.window_length > self.end {
            return None;
        }
        let window = Interval::from_seconds(self.cursor, self.cursor + self.window_length)
            .expect("window bounds are validated by WindowPlan::new");
        self.cursor += self.slide_step;
        Some(window)
    }
}

/// Partition the full timeline into alternating normal-speed and scaled
/// segments.
///
/// Without `applied_intervals` a single entry covers `[0, duration]` at
/// `factor`. Otherwise the intervals are walked in caller order: gaps before
/// each interval and the remainder after the last one become factor-1.0
/// entries. Intervals must be supplied in non-decreasing, non-overlapping
/// order and must not extend past the duration; this is a precondition on
/// the caller, not auto-sorted, so misconfigured input fails early.
///
/// The resulting entries tile `[0, duration]` exactly, with no gaps or
/// overlaps.
pub fn compute_speed_map(
    media_duration: f64,
    factor: f64,
    applied_intervals: Option<&[Interval]>,
) -> TimelineResult<Vec<SpeedMapEntry>> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TimelineError::invalid_parameter("factor", factor));
    }

    let intervals = match applied_intervals {
        None => {
            let whole = Interval::from_seconds(0.0, media_duration)?;
            return Ok(vec![SpeedMapEntry::new(whole, factor)]);
        }
        Some(intervals) => intervals,
    };

    if intervals.is_empty() {
        return Err(TimelineError::EmptyInput);
    }

    let mut entries = Vec::new();
    let mut cursor = 0.0;

    for interval in intervals {
        let (start, end) = (interval.start.as_seconds(), interval.end.as_seconds());
        if start < cursor || end > media_duration {
            return Err(TimelineError::invalid_range(
                interval.start.format_long(),
                interval.end.format_long(),
            ));
        }

        if start > cursor {
            entries.push(SpeedMapEntry::new(
                Interval::from_seconds(cursor, start)?,
                1.0,
            ));
        }
        entries.push(SpeedMapEntry::new(*interval, factor));
        cursor = end;
    }

    if cursor < media_duration {
        entries.push(SpeedMapEntry::new(
            Interval::from_seconds(cursor, media_duration)?,
            1.0,
        ));
    }

    Ok(entries)
}

/// Sum of the output durations contributed by a speed map
pub fn total_output_duration(entries: &[SpeedMapEntry]) -> f64 {
    entries.iter().map(SpeedMapEntry::output_duration).sum()
}

/// Where to insert a frozen frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreezePosition {
    Beginning,
    Middle,
    End,
}

/// Freeze points pinned to the timeline edges sit this far inside, so the
/// frame grab never lands outside the decoded range.
const FREEZE_EDGE_INSET: f64 = 0.01;

/// Resolve the timestamp at which a frame is frozen.
///
/// `Middle` requires an explicit `freeze_time` within the media duration;
/// `Beginning` and `End` ignore it.
pub fn resolve_freeze_point(
    media_duration: f64,
    position: FreezePosition,
    freeze_time: Option<f64>,
) -> TimelineResult<f64> {
    match position {
        FreezePosition::Beginning => Ok(FREEZE_EDGE_INSET.min(media_duration)),
        FreezePosition::End => Ok((media_duration - FREEZE_EDGE_INSET).max(0.0)),
        FreezePosition::Middle => {
            let time = freeze_time.ok_or_else(|| {
                TimelineError::invalid_parameter(
                    "freeze_time",
                    "required when position is 'middle'",
                )
            })?;
            if !time.is_finite() || time < 0.0 || time > media_duration {
                return Err(TimelineError::invalid_range(time, media_duration));
            }
            Ok(time)
        }
    }
}

#[cfg(test)]
mod tests;
