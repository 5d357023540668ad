#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::path::Path;
use thiserror::Error;

/*
Breakpoint Envelope Implementation
==================================

This module implements a piecewise-linear time→value curve built from an
ordered list of breakpoints. Voices stretch one shared envelope over their
own duration to shape amplitude across a note's life.

Vocabulary
----------

  breakpoint  One (time, value) pair. Times are in seconds, values are
              unitless gain (typically 0.0 to 1.0, but not clamped).

  segment     The straight line between two adjacent breakpoints. Queries
              between breakpoints interpolate linearly along the segment.

  max_time    The last breakpoint's time. `value_at_fraction` maps the
              whole curve onto [0, 1] by scaling against this.


The Shape: Connected Line Segments
----------------------------------

  Value
    1.0 ┤        ●
        │       ╱ ╲
        │      ╱   ╲______●
        │     ╱           ╲
    0.0 ●────●             ●──→ Time
        0

Any number of breakpoints is allowed (minimum one). The first breakpoint
must sit at time 0, and times must never decrease. Nothing else is
constrained, so attack/decay/swell shapes of arbitrary complexity all use
the same evaluator.


The Math: Segment Lookup + Linear Interpolation
-----------------------------------------------

For a query time t, find the first segment whose END lies past t, then:

    value = v_i + (v_{i+1} - v_i) * (t - t_i) / (t_{i+1} - t_i)

End-of-range: once t reaches or passes the final breakpoint's time, the
scan finds no later breakpoint and the final breakpoint's value is held.
Queries at negative times are a caller bug, but a non-fatal one: they log
a diagnostic and return silence (0.0) instead of failing the render path.
*/

/// One time/value pair of an [`Envelope`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Seconds from the start of the curve.
    pub time: f32,
    /// Unitless gain at that instant.
    pub value: f32,
}

/// Errors from constructing or parsing an envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope needs at least one breakpoint")]
    Empty,

    #[error("first breakpoint must start at time 0, got {0}")]
    FirstTimeNonZero(f32),

    #[error("breakpoint times must not decrease (entry {index})")]
    TimeNotMonotonic { index: usize },

    #[error("malformed breakpoint line {line}: {text:?}")]
    Malformed { line: usize, text: String },

    #[error("failed to read breakpoint file: {0}")]
    Io(#[from] std::io::Error),
}

/// An immutable piecewise-linear time→value curve.
///
/// Envelopes are validated at construction and never mutated afterwards,
/// so one envelope can be shared read-only by any number of voices across
/// threads.
#[derive(Debug, Clone)]
pub struct Envelope {
    points: Vec<Breakpoint>,
    max_time: f32,
}

impl Envelope {
    /// Build an envelope from breakpoints, validating the invariants:
    /// non-empty, first time exactly 0, times non-decreasing.
    pub fn from_points(points: Vec<Breakpoint>) -> Result<Self, EnvelopeError> {
        let first = points.first().ok_or(EnvelopeError::Empty)?;
        if first.time != 0.0 {
            return Err(EnvelopeError::FirstTimeNonZero(first.time));
        }

        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].time < pair[0].time {
                return Err(EnvelopeError::TimeNotMonotonic { index: index + 1 });
            }
        }

        let max_time = points.last().map(|p| p.time).unwrap_or(0.0);
        Ok(Self { points, max_time })
    }

    /// Parse the plain-text breakpoint format: one `time,value` pair per
    /// line, comma separated, surrounding whitespace ignored. Blank lines
    /// are skipped, a deliberate tolerance for trailing newlines and
    /// spacer lines in hand-written files; any other line that fails to
    /// parse is an error.
    pub fn parse(input: &str) -> Result<Self, EnvelopeError> {
        let mut points = Vec::new();

        for (number, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let malformed = || EnvelopeError::Malformed {
                line: number + 1,
                text: raw.to_string(),
            };

            let (time, value) = line.split_once(',').ok_or_else(|| malformed())?;
            points.push(Breakpoint {
                time: time.trim().parse().map_err(|_| malformed())?,
                value: value.trim().parse().map_err(|_| malformed())?,
            });
        }

        Self::from_points(points)
    }

    /// Load a breakpoint file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EnvelopeError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Evaluate the curve at `time` seconds.
    ///
    /// Between breakpoints the value is linearly interpolated. At or past
    /// the final breakpoint the final value is held. Negative times log a
    /// warning and return 0.0 — the render path must never fail.
    pub fn value_at_time(&self, time: f32) -> f32 {
        if time < 0.0 {
            log::warn!("envelope queried at negative time {time}, returning silence");
            return 0.0;
        }

        // Find the first segment whose end lies past `time`.
        let mut index = self.points.len() - 1;
        for (i, pair) in self.points.windows(2).enumerate() {
            if pair[1].time > time {
                index = i;
                break;
            }
        }

        // No later breakpoint: hold the final value.
        if index == self.points.len() - 1 {
            return self.points[index].value;
        }

        let a = self.points[index];
        let b = self.points[index + 1];
        let dt = b.time - a.time;
        if dt <= 0.0 {
            return b.value;
        }

        a.value + (b.value - a.value) * (time - a.time) / dt
    }

    /// Evaluate the curve at a fraction (0.0–1.0) of its total length.
    ///
    /// This is how one fixed envelope shape stretches to fit any note
    /// duration: a voice maps its playback progress onto the curve.
    pub fn value_at_fraction(&self, fraction: f32) -> f32 {
        self.value_at_time(self.max_time * fraction)
    }

    /// The last breakpoint's time, in seconds.
    pub fn max_time(&self) -> f32 {
        self.max_time
    }

    /// Number of breakpoints in the curve.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
