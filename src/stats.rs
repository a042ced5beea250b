use serde::Serialize;
use std::fmt;

use crate::track::TrajectorySession;

/// Shape summary of a single trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySummary {
    pub points: usize,
    pub total_duration_ms: i64,
    pub final_dx: Option<i64>,
    pub mean_dt_ms: Option<f64>,
    pub dy_std_dev: Option<f64>,
}

impl TrajectorySummary {
    pub fn of(session: &TrajectorySession) -> Self {
        let dts: Vec<f64> = session.points.iter().map(|p| p.dt as f64).collect();
        let dys: Vec<f64> = session.points.iter().map(|p| p.dy as f64).collect();

        Self {
            points: session.points.len(),
            total_duration_ms: session.total_duration_ms(),
            final_dx: session.points.last().map(|p| p.dx),
            mean_dt_ms: mean(&dts),
            dy_std_dev: std_dev(&dys),
        }
    }
}

impl fmt::Display for TrajectorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "points: {}, total: {}ms",
            self.points, self.total_duration_ms
        )?;
        if let Some(dx) = self.final_dx {
            write!(f, ", final dx: {dx}")?;
        }
        if let Some(m) = self.mean_dt_ms {
            write!(f, ", mean dt: {m:.1}ms")?;
        }
        Ok(())
    }
}

fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackPoint;

    #[test]
    fn summarises_points() {
        let session = TrajectorySession::new(
            vec![(0, 0, 0).into(), (10, -2, 30).into(), (40, 2, 60).into()],
            40,
            280,
        );
        let summary = TrajectorySummary::of(&session);
        assert_eq!(summary.points, 3);
        assert_eq!(summary.total_duration_ms, 90);
        assert_eq!(summary.final_dx, Some(40));
        assert_eq!(summary.mean_dt_ms, Some(30.0));
        let sd = summary.dy_std_dev.unwrap();
        assert!((sd - 1.632993161855452).abs() < 1e-10);
        assert_eq!(
            summary.to_string(),
            "points: 3, total: 90ms, final dx: 40, mean dt: 30.0ms"
        );
    }

    #[test]
    fn origin_only_session() {
        let session = TrajectorySession::new(vec![TrackPoint::origin()], 50, 280);
        let summary = TrajectorySummary::of(&session);
        assert_eq!(summary.mean_dt_ms, Some(0.0));
        assert_eq!(summary.dy_std_dev, Some(0.0));
    }

    #[test]
    fn empty_session_has_no_averages() {
        let session = TrajectorySession::new(Vec::new(), 50, 280);
        let summary = TrajectorySummary::of(&session);
        assert_eq!(summary.final_dx, None);
        assert_eq!(summary.mean_dt_ms, None);
        assert_eq!(summary.to_string(), "points: 0, total: 0ms");
    }
}
