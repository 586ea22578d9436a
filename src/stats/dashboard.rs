//! Dashboard aggregates for one user.

use super::sort_newest_first;
use crate::db::SessionRecord;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_sessions: usize,
    /// Mean of each session's average score; sessions without feedback count as 0.
    pub average_score: f64,
    /// `"8.0/10"`, or `"0/10"` when there are no sessions.
    pub average_display: String,
    /// Sessions created within the trailing seven days.
    pub last_7_days: usize,
    /// 1 when the user has any session, else 0. Not a consecutive-day count.
    pub streak: u8,
    /// All sessions, newest first.
    pub recent: Vec<SessionRecord>,
}

impl DashboardSummary {
    pub fn from_sessions(mut sessions: Vec<SessionRecord>, now: DateTime<Utc>) -> Self {
        sort_newest_first(&mut sessions);

        let total_sessions = sessions.len();
        let (average_score, average_display) = if total_sessions == 0 {
            (0.0, "0/10".to_string())
        } else {
            let mean = sessions.iter().map(SessionRecord::average_score).sum::<f64>()
                / total_sessions as f64;
            (mean, format!("{:.1}/10", mean))
        };

        let week_ago = now - Duration::days(7);
        let last_7_days = sessions.iter().filter(|s| s.timestamp >= week_ago).count();

        Self {
            total_sessions,
            average_score,
            average_display,
            last_7_days,
            streak: u8::from(total_sessions > 0),
            recent: sessions,
        }
    }
}
