use serde::{Deserialize, Serialize};

/// One `(dx, dy, dt)` sample of a slider drag.
///
/// Serialized with the capture format's short field names so decoded
/// trajectories can be written back out in the same shape they were read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// horizontal displacement from the session origin
    #[serde(rename = "a")]
    pub dx: i64,
    /// vertical deviation
    #[serde(rename = "b")]
    pub dy: i64,
    /// milliseconds since the previous point
    #[serde(rename = "c")]
    pub dt: i64,
}

impl TrackPoint {
    pub fn new(dx: i64, dy: i64, dt: i64) -> Self {
        Self { dx, dy, dt }
    }

    pub fn origin() -> Self {
        Self::new(0, 0, 0)
    }
}

impl From<(i64, i64, i64)> for TrackPoint {
    fn from(v: (i64, i64, i64)) -> Self {
        TrackPoint::new(v.0, v.1, v.2)
    }
}

impl From<TrackPoint> for (i64, i64, i64) {
    fn from(p: TrackPoint) -> Self {
        (p.dx, p.dy, p.dt)
    }
}

/// A complete trajectory together with the drag target and canvas width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrajectorySession {
    pub points: Vec<TrackPoint>,
    pub target_distance: i64,
    pub canvas_length: i64,
}

impl TrajectorySession {
    pub fn new(points: Vec<TrackPoint>, target_distance: i64, canvas_length: i64) -> Self {
        Self {
            points,
            target_distance,
            canvas_length,
        }
    }

    /// Sum of all `dt` values in milliseconds, saturating at the `i64` range.
    pub fn total_duration_ms(&self) -> i64 {
        self.points
            .iter()
            .fold(0i64, |acc, p| acc.saturating_add(p.dt))
    }
}

/// A track entry exactly as it appears in a capture file. Every field is
/// optional here; the quality gate decides whether a gap is fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrack {
    pub a: Option<i64>,
    pub b: Option<i64>,
    pub c: Option<i64>,
}

impl RawTrack {
    pub fn complete(a: i64, b: i64, c: i64) -> Self {
        Self {
            a: Some(a),
            b: Some(b),
            c: Some(c),
        }
    }

    pub fn to_point(&self) -> Option<TrackPoint> {
        Some(TrackPoint::new(self.a?, self.b?, self.c?))
    }
}

/// A capture file before validation. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSession {
    pub tracks: Option<Vec<RawTrack>>,
    pub target_distance: Option<i64>,
    pub canvas_length: Option<i64>,
}

impl RawSession {
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

impl From<&TrajectorySession> for RawSession {
    fn from(session: &TrajectorySession) -> Self {
        Self {
            tracks: Some(
                session
                    .points
                    .iter()
                    .map(|p| RawTrack::complete(p.dx, p.dy, p.dt))
                    .collect(),
            ),
            target_distance: Some(session.target_distance),
            canvas_length: Some(session.canvas_length),
        }
    }
}
