use proptest::prelude::*;

use slidetrack::protocol::decoder::{Clamp, DT_RANGE, DY_RANGE};
use slidetrack::quality::QualityGate;
use slidetrack::track::{RawSession, RawTrack};
use slidetrack::{decode, encode, TrackPoint, TrajectorySession, ValidationError};

fn point_token() -> impl Strategy<Value = String> {
    prop_oneof![
        (-500i64..500, -100i64..100, -50i64..900).prop_map(|(a, b, c)| format!("{a},{b},{c}")),
        (-500.0f64..500.0, -100.0f64..100.0, 0.0f64..900.0)
            .prop_map(|(a, b, c)| format!("{a:.2},{b:.2},{c:.2}")),
        "[a-z0-9,.\\- ]{0,12}",
    ]
}

fn generated_text() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        prop::collection::vec(point_token(), 0..30),
        any::<bool>(),
        ".{0,10}",
    )
        .prop_map(|(marker, tokens, end, tail)| {
            let mut text = String::new();
            if marker {
                text.push_str("<|input|>distance:80,canvas:280<|output|>");
            }
            text.push_str(&tokens.join(";"));
            if end {
                text.push_str("<|end|>");
            }
            text.push_str(&tail);
            text
        })
}

proptest! {
    #[test]
    fn decode_is_total_and_starts_at_origin(text in ".*", target in -50i64..1000) {
        let s = decode(&text, target);
        prop_assert!(!s.points.is_empty());
        prop_assert_eq!(s.points[0].dx, 0);
    }

    #[test]
    fn decoded_points_respect_clamps_and_target(text in generated_text(), target in 1i64..400) {
        let s = decode(&text, target);
        let clamp = Clamp::for_target(target);

        prop_assert_eq!(s.points[0].dx, 0);
        for (i, p) in s.points.iter().enumerate() {
            // A synthetic origin carries dt 0; everything parsed is clamped.
            if !(i == 0 && *p == TrackPoint::origin()) {
                prop_assert!((DT_RANGE.0..=DT_RANGE.1).contains(&p.dt));
            }
            prop_assert!((DY_RANGE.0..=DY_RANGE.1).contains(&p.dy));
            if i + 1 < s.points.len() || s.points.len() == 1 {
                prop_assert!((clamp.dx.0..=clamp.dx.1).contains(&p.dx));
            }
        }
        if s.points.len() > 1 {
            prop_assert_eq!(s.points.last().unwrap().dx, target);
        }
    }

    #[test]
    fn decode_handles_far_targets(
        text in generated_text(),
        target in (i64::MAX / 2 - 1000)..(i64::MAX / 2),
    ) {
        let s = decode(&text, target);
        prop_assert_eq!(s.points[0].dx, 0);
        prop_assert!(Clamp::for_target(target).dx.1 >= target);
        if s.points.len() > 1 {
            prop_assert_eq!(s.points.last().unwrap().dx, target);
        }
    }

    #[test]
    fn encode_is_deterministic(
        pts in prop::collection::vec((0i64..300, -30i64..6, 0i64..400), 0..40),
        target in 0i64..300,
        canvas in 200i64..400,
    ) {
        let points: Vec<TrackPoint> = pts.into_iter().map(TrackPoint::from).collect();
        let session = TrajectorySession::new(points, target, canvas);
        prop_assert_eq!(encode(&session), encode(&session.clone()));
    }

    #[test]
    fn sessions_inside_bounds_validate(n in 10usize..60, dt in 10i64..60) {
        let gate = QualityGate::new(500, 5000, 10);
        let tracks: Vec<RawTrack> = (0..n).map(|i| RawTrack::complete(i as i64, 0, dt)).collect();
        let total = dt * n as i64;
        let raw = RawSession { tracks: Some(tracks), target_distance: Some(n as i64), canvas_length: Some(280) };
        let result = gate.validate(&raw);
        if (500..=5000).contains(&total) {
            prop_assert!(result.is_ok());
        } else {
            let is_duration_error = matches!(result, Err(ValidationError::DurationOutOfRange { .. }));
            prop_assert!(is_duration_error);
        }
    }
}

#[test]
fn validated_session_encodes_as_corpus_line() {
    let mut tracks = vec![RawTrack::complete(0, 0, 0), RawTrack::complete(5, -2, 30)];
    tracks.extend((2..12).map(|i| RawTrack::complete(i * 10, -1, 117)));
    let raw = RawSession {
        tracks: Some(tracks),
        target_distance: Some(120),
        canvas_length: Some(280),
    };
    let session = QualityGate::new(500, 3000, 10).validate(&raw).unwrap();
    assert_eq!(session.total_duration_ms(), 1200);
    let text = encode(&session);
    assert!(text.starts_with("<|input|>distance:120,canvas:280<|output|>0,0,0;5,-2,30;20,-1,117;"));
    assert!(text.ends_with("110,-1,117<|end|>"));
}
