//! Write-path quality gate for captured sessions.
//!
//! Checks run in a fixed order and stop at the first violation, so a
//! rejected capture always carries exactly one reason.

use crate::error::{Bound, ValidationError};
use crate::track::{RawSession, TrajectorySession};

pub const DEFAULT_MIN_TIME_MS: i64 = 500;
/// The maximum duration stated in the converter's own usage text.
pub const DOCUMENTED_MAX_TIME_MS: i64 = 3000;
/// The maximum duration the converter's flag actually defaults to, and the
/// one [`Config::default`](crate::config::Config) uses.
pub const CONFIGURED_MAX_TIME_MS: i64 = 5000;
pub const DEFAULT_MIN_POINTS: usize = 10;

/// Duration window and point-count floor a capture must satisfy.
///
/// No `Default`: callers pick a maximum duration
/// from [`DOCUMENTED_MAX_TIME_MS`] or [`CONFIGURED_MAX_TIME_MS`] (or their own).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityGate {
    pub min_time_ms: i64,
    pub max_time_ms: i64,
    pub min_points: usize,
}

impl QualityGate {
    pub fn new(min_time_ms: i64, max_time_ms: i64, min_points: usize) -> Self {
        Self {
            min_time_ms,
            max_time_ms,
            min_points,
        }
    }

    /// Validate a raw capture and, if it passes, hand back the typed session.
    pub fn validate(&self, raw: &RawSession) -> Result<TrajectorySession, ValidationError> {
        let tracks = raw
            .tracks
            .as_ref()
            .ok_or(ValidationError::MissingField { field: "tracks" })?;
        let target_distance = raw.target_distance.ok_or(ValidationError::MissingField {
            field: "targetDistance",
        })?;
        let canvas_length = raw.canvas_length.ok_or(ValidationError::MissingField {
            field: "canvasLength",
        })?;

        if tracks.len() < self.min_points {
            return Err(ValidationError::InsufficientPoints {
                actual: tracks.len(),
                required: self.min_points,
            });
        }

        // A point without `c` contributes nothing here; it is rejected below.
        // Summed wide so extreme capture values cannot overflow.
        let total: i128 = tracks.iter().map(|t| i128::from(t.c.unwrap_or(0))).sum();
        if total < i128::from(self.min_time_ms) {
            return Err(ValidationError::DurationOutOfRange {
                actual: saturate(total),
                bound: self.min_time_ms,
                direction: Bound::Below,
            });
        }
        if total > i128::from(self.max_time_ms) {
            return Err(ValidationError::DurationOutOfRange {
                actual: saturate(total),
                bound: self.max_time_ms,
                direction: Bound::Above,
            });
        }

        let points = tracks
            .iter()
            .enumerate()
            .map(|(index, t)| t.to_point().ok_or(ValidationError::MalformedPoint { index }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrajectorySession::new(points, target_distance, canvas_length))
    }
}

fn saturate(total: i128) -> i64 {
    i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX })
}

/// Shorthand for a one-off check with explicit bounds.
pub fn validate(
    raw: &RawSession,
    min_time_ms: i64,
    max_time_ms: i64,
    min_points: usize,
) -> Result<TrajectorySession, ValidationError> {
    QualityGate::new(min_time_ms, max_time_ms, min_points).validate(raw)
}
