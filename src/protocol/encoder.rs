use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{prompt, END_MARKER, FIELD_SEPARATOR, POINT_SEPARATOR};
use crate::track::{TrackPoint, TrajectorySession};

/// Render a validated session in the canonical protocol form.
pub fn encode(session: &TrajectorySession) -> String {
    let points = session.points.iter().map(render_point).join(&POINT_SEPARATOR.to_string());
    format!(
        "{}{points}{END_MARKER}",
        prompt(session.target_distance, session.canvas_length)
    )
}

fn render_point(p: &TrackPoint) -> String {
    format!(
        "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
        p.dx, p.dy, p.dt
    )
}

/// One corpus line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub text: String,
}

impl TrainingRecord {
    /// The record as written to the corpus: `{"text": "..."}`, with a space
    /// after the colon and no trailing newline.
    pub fn to_json_line(&self) -> String {
        let quoted = serde_json::Value::String(self.text.clone());
        format!("{{\"text\": {quoted}}}")
    }

    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

impl From<&TrajectorySession> for TrainingRecord {
    fn from(session: &TrajectorySession) -> Self {
        Self {
            text: encode(session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TrajectorySession {
        TrajectorySession::new(
            vec![(0, 0, 0).into(), (5, -2, 30).into(), (12, -3, 28).into()],
            120,
            280,
        )
    }

    #[test]
    fn encodes_canonical_grammar() {
        assert_eq!(
            encode(&session()),
            "<|input|>distance:120,canvas:280<|output|>0,0,0;5,-2,30;12,-3,28<|end|>"
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let s = session();
        assert_eq!(encode(&s), encode(&s.clone()));
    }

    #[test]
    fn empty_point_list_still_closes_record() {
        let s = TrajectorySession::new(Vec::new(), 40, 300);
        assert_eq!(encode(&s), "<|input|>distance:40,canvas:300<|output|><|end|>");
    }

    #[test]
    fn json_line_layout() {
        let record = TrainingRecord::from(&session());
        assert_eq!(
            record.to_json_line(),
            r#"{"text": "<|input|>distance:120,canvas:280<|output|>0,0,0;5,-2,30;12,-3,28<|end|>"}"#
        );
        assert_eq!(
            TrainingRecord::from_json_line(&record.to_json_line()).unwrap(),
            record
        );
    }
}
