// Domain models - Core types and data structures

use std::fmt;

use serde::Serialize;

use crate::domain::errors::{TimelineError, TimelineResult};

/// A point in time within a media stream, in seconds with fractional
/// precision. Millisecond resolution when derived from the subtitle format.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Timecode {
    seconds: f64,
}

impl Timecode {
    /// Create a new Timecode from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Time in seconds
    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Whole milliseconds, truncating sub-millisecond residue.
    pub fn as_millis(&self) -> u64 {
        // The nudge compensates for binary representation error when the
        // value is an exact millisecond count (e.g. 0.1 s stored as
        // 0.1000000000000000055). It is far below the 1 ms granularity.
        (self.seconds * 1000.0 + 1e-4) as u64
    }

    /// Parse a short timecode in `MM:SS` format.
    ///
    /// Minutes are unbounded, seconds must be 0-59.
    pub fn parse_short(text: &str) -> TimelineResult<Self> {
        let trimmed = text.trim();
        let (minutes_str, seconds_str) = trimmed
            .split_once(':')
            .ok_or_else(|| TimelineError::invalid_format(text))?;

        if seconds_str.contains(':') {
            return Err(TimelineError::invalid_format(text));
        }

        let minutes: u64 = minutes_str
            .parse()
            .map_err(|_| TimelineError::invalid_format(text))?;
        let seconds: u64 = seconds_str
            .parse()
            .map_err(|_| TimelineError::invalid_format(text))?;

        if seconds >= 60 {
            return Err(TimelineError::invalid_format(text));
        }

        Ok(Self::from_seconds((minutes * 60 + seconds) as f64))
    }

    /// Parse a long timecode in `HH:MM:SS,mmm` subtitle format.
    pub fn parse_long(text: &str) -> TimelineResult<Self> {
        let trimmed = text.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() != 3 {
            return Err(TimelineError::invalid_format(text));
        }

        let (seconds_str, millis_str) = parts[2]
            .split_once(',')
            .ok_or_else(|| TimelineError::invalid_format(text))?;

        let hours: u64 = parts[0]
            .parse()
            .map_err(|_| TimelineError::invalid_format(text))?;
        let minutes: u64 = parts[1]
            .parse()
            .map_err(|_| TimelineError::invalid_format(text))?;
        let seconds: u64 = seconds_str
            .parse()
            .map_err(|_| TimelineError::invalid_format(text))?;
        let millis: u64 = millis_str
            .parse()
            .map_err(|_| TimelineError::invalid_format(text))?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(TimelineError::invalid_format(text));
        }

        let total_millis = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis;
        Ok(Self::from_seconds(total_millis as f64 / 1000.0))
    }

    /// Format as zero-padded `MM:SS`. Inverse of [`Timecode::parse_short`]
    /// for whole-second values.
    pub fn format_short(&self) -> String {
        let total_seconds = self.as_millis() / 1000;
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Format as zero-padded `HH:MM:SS,mmm`. Inverse of
    /// [`Timecode::parse_long`], truncating sub-millisecond residue.
    pub fn format_long(&self) -> String {
        let total_millis = self.as_millis();
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis % 3_600_000) / 60_000;
        let seconds = (total_millis % 60_000) / 1_000;
        let millis = total_millis % 1_000;
        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Resolve an interval end specification against a known media duration.
    ///
    /// The case-insensitive sentinel `"end"` resolves to the media duration;
    /// any other text is parsed as a short timecode. The sentinel is accepted
    /// everywhere an interval end is accepted.
    pub fn resolve_end(text: &str, media_duration: Option<f64>) -> TimelineResult<Self> {
        if text.trim().eq_ignore_ascii_case("end") {
            match media_duration {
                Some(duration) => Ok(Self::from_seconds(duration)),
                None => Err(TimelineError::MissingDuration {
                    value: text.to_string(),
                }),
            }
        } else {
            Self::parse_short(text)
        }
    }

    /// Scale this timecode by a multiplier, e.g. for subtitle retiming.
    pub fn scaled(&self, multiplier: f64) -> Self {
        Self::from_seconds(self.seconds * multiplier)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_long())
    }
}

/// A half-open `[start, end)` time range within a media duration.
///
/// Invariant: `end > start`, both non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub start: Timecode,
    pub end: Timecode,
}

impl Interval {
    /// Create a validated interval
    pub fn new(start: Timecode, end: Timecode) -> TimelineResult<Self> {
        if start.as_seconds() < 0.0 || end.as_seconds() <= start.as_seconds() {
            return Err(TimelineError::invalid_range(
                start.format_long(),
                end.format_long(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Create a validated interval from raw seconds
    pub fn from_seconds(start: f64, end: f64) -> TimelineResult<Self> {
        Self::new(Timecode::from_seconds(start), Timecode::from_seconds(end))
    }

    /// Source duration in seconds
    pub fn duration(&self) -> f64 {
        self.end.as_seconds() - self.start.as_seconds()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}s-{:.3}s",
            self.start.as_seconds(),
            self.end.as_seconds()
        )
    }
}

/// A source interval tagged with a playback-speed multiplier.
///
/// `factor == 1.0` denotes unmodified playback; any other positive factor
/// scales the segment's local duration (and, conceptually, its audio
/// timing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedMapEntry {
    pub interval: Interval,
    pub factor: f64,
}

impl SpeedMapEntry {
    pub fn new(interval: Interval, factor: f64) -> Self {
        Self { interval, factor }
    }

    /// Whether this entry changes playback speed
    pub fn is_scaled(&self) -> bool {
        self.factor != 1.0
    }

    /// Duration this entry contributes to the output timeline.
    ///
    /// Speed-up shortens, slow-down lengthens.
    pub fn output_duration(&self) -> f64 {
        self.interval.duration() / self.factor
    }
}
