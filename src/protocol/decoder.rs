//! Read-path decoder for generated text.
//!
//! Generated output is untrusted: markers may be missing, the terminator may
//! be cut off and individual points may be garbage. Decoding never fails.
//! Bad points are dropped one by one, surviving values are clamped into
//! range and the result is repaired so it starts at the origin and, when it
//! has more than one point, ends exactly on the target.

use tracing::{debug, warn};

use super::{
    DEFAULT_CANVAS_LENGTH, END_MARKER, FIELD_SEPARATOR, INPUT_MARKER, OUTPUT_MARKER,
    POINT_SEPARATOR,
};
use crate::track::{TrackPoint, TrajectorySession};

pub const DY_RANGE: (i64, i64) = (-30, 5);
pub const DT_RANGE: (i64, i64) = (1, 400);
/// Horizontal overshoot allowed past the target before clamping.
pub const DX_OVERSHOOT: f64 = 1.1;

/// Per-field bounds applied to every parsed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamp {
    pub dx: (i64, i64),
    pub dy: (i64, i64),
    pub dt: (i64, i64),
}

impl Clamp {
    pub fn for_target(target_distance: i64) -> Self {
        let dx_max = (target_distance as f64 * DX_OVERSHOOT).round() as i64;
        Self {
            dx: (0, dx_max.max(0)),
            dy: DY_RANGE,
            dt: DT_RANGE,
        }
    }

    pub fn apply(&self, p: TrackPoint) -> TrackPoint {
        TrackPoint::new(
            p.dx.clamp(self.dx.0, self.dx.1),
            p.dy.clamp(self.dy.0, self.dy.1),
            p.dt.clamp(self.dt.0, self.dt.1),
        )
    }
}

/// Decode generated text into a usable session for `target_distance`.
///
/// The returned session always has at least one point and its first point
/// has `dx == 0`. The canvas length is read back from the echoed prompt
/// header when present, else [`DEFAULT_CANVAS_LENGTH`] is assumed.
pub fn decode(raw_text: &str, target_distance: i64) -> TrajectorySession {
    let canvas_length = echoed_canvas(raw_text).unwrap_or(DEFAULT_CANVAS_LENGTH);
    let clamp = Clamp::for_target(target_distance);

    let points = match extract_output(raw_text) {
        Some(body) => body
            .split(POINT_SEPARATOR)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(|token| {
                let parsed = parse_point(token);
                if parsed.is_none() {
                    debug!(token, "dropping unparseable point");
                }
                parsed
            })
            .map(|p| clamp.apply(p))
            .collect(),
        None => {
            warn!("generated text has no output marker, falling back to origin");
            Vec::new()
        }
    };

    TrajectorySession::new(repair(points, target_distance), target_distance, canvas_length)
}

/// The text between the output marker and the end marker, or the end of
/// input when generation was truncated before the terminator.
fn extract_output(raw_text: &str) -> Option<&str> {
    let start = raw_text.find(OUTPUT_MARKER)? + OUTPUT_MARKER.len();
    let rest = &raw_text[start..];
    let body = match rest.find(END_MARKER) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(body.trim())
}

fn echoed_canvas(raw_text: &str) -> Option<i64> {
    let start = raw_text.find(INPUT_MARKER)? + INPUT_MARKER.len();
    let header = &raw_text[start..];
    let header = header.find(OUTPUT_MARKER).map_or(header, |end| &header[..end]);
    header
        .split(FIELD_SEPARATOR)
        .find_map(|kv| kv.trim().strip_prefix("canvas:"))
        .and_then(|v| v.trim().parse().ok())
}

/// Parse one `dx,dy,dt` token. Fractional values truncate toward zero;
/// anything else that is not exactly three finite numbers yields `None`.
pub fn parse_point(token: &str) -> Option<TrackPoint> {
    let mut fields = token.split(FIELD_SEPARATOR);
    let dx = parse_field(fields.next()?)?;
    let dy = parse_field(fields.next()?)?;
    let dt = parse_field(fields.next()?)?;
    if fields.next().is_some() {
        return None;
    }
    Some(TrackPoint::new(dx, dy, dt))
}

fn parse_field(field: &str) -> Option<i64> {
    let value: f64 = field.trim().parse().ok()?;
    value.is_finite().then(|| value.trunc() as i64)
}

fn repair(mut points: Vec<TrackPoint>, target_distance: i64) -> Vec<TrackPoint> {
    if points.first().map_or(true, |p| p.dx != 0) {
        points.insert(0, TrackPoint::origin());
    }
    if points.len() > 1 {
        if let Some(last) = points.last_mut() {
            last.dx = target_distance;
        }
    }
    points
}
