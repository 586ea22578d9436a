//! Profile summary: lifetime totals, per-skill averages and recent activity.

use super::{round_to, sort_newest_first};
use crate::db::SessionRecord;
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillAverages {
    pub grammar: f64,
    pub confidence: f64,
    pub clarity: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub day: &'static str,
    pub sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

/// Shown when the user has no sessions.
pub const NO_FAVORITE_TOPIC: &str = "None yet";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub total_sessions: usize,
    /// Whole minutes across all sessions.
    pub total_minutes: u64,
    /// Highest session average, one decimal place. 0 without sessions.
    pub best_score: f64,
    /// Most debated topic; ties go to the topic seen first, newest first.
    pub favorite_topic: String,
    /// Weaknesses from the newest session's feedback.
    pub improvement_areas: Vec<String>,
    pub achievements: Vec<Achievement>,
    /// One decimal place. `None` without sessions.
    pub averages: Option<SkillAverages>,
    /// Sessions per weekday over the trailing seven days, Monday first.
    pub weekly_activity: Vec<DayActivity>,
    /// Three most recent sessions.
    pub recent: Vec<SessionRecord>,
}

const WEEK: [(Weekday, &str); 7] = [
    (Weekday::Mon, "Mon"),
    (Weekday::Tue, "Tue"),
    (Weekday::Wed, "Wed"),
    (Weekday::Thu, "Thu"),
    (Weekday::Fri, "Fri"),
    (Weekday::Sat, "Sat"),
    (Weekday::Sun, "Sun"),
];

impl ProfileSummary {
    pub fn from_sessions(mut sessions: Vec<SessionRecord>, now: DateTime<Utc>) -> Self {
        sort_newest_first(&mut sessions);

        let total_sessions = sessions.len();
        let total_seconds: u64 = sessions.iter().map(|s| s.duration).sum();

        let averages = (total_sessions > 0).then(|| {
            let n = total_sessions as f64;
            let mean = |pick: fn(&SessionRecord) -> f64| {
                round_to(sessions.iter().map(pick).sum::<f64>() / n, 1)
            };
            SkillAverages {
                grammar: mean(|s| s.feedback.as_ref().map_or(0.0, |f| f.grammar)),
                confidence: mean(|s| s.feedback.as_ref().map_or(0.0, |f| f.confidence)),
                clarity: mean(|s| s.feedback.as_ref().map_or(0.0, |f| f.clarity)),
                overall: mean(SessionRecord::average_score),
            }
        });

        let week_ago = now - Duration::days(7);
        let weekly_activity = if total_sessions == 0 {
            Vec::new()
        } else {
            WEEK.iter()
                .map(|&(weekday, day)| DayActivity {
                    day,
                    sessions: sessions
                        .iter()
                        .filter(|s| s.timestamp >= week_ago && s.timestamp.weekday() == weekday)
                        .count(),
                })
                .collect()
        };

        let best = sessions
            .iter()
            .map(SessionRecord::average_score)
            .fold(0.0, f64::max);
        let improvement_areas = sessions
            .first()
            .and_then(|s| s.feedback.as_ref())
            .map(|f| f.weaknesses.clone())
            .unwrap_or_default();
        let achievements = achievements(&sessions);
        let favorite_topic = favorite_topic(&sessions);

        sessions.truncate(3);

        Self {
            total_sessions,
            total_minutes: total_seconds / 60,
            best_score: round_to(best, 1),
            favorite_topic,
            improvement_areas,
            achievements,
            averages,
            weekly_activity,
            recent: sessions,
        }
    }
}

/// Sessions must be newest first.
fn favorite_topic(sessions: &[SessionRecord]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for s in sessions {
        match counts.iter_mut().find(|(topic, _)| *topic == s.topic) {
            Some((_, n)) => *n += 1,
            None => counts.push((s.topic.as_str(), 1)),
        }
    }

    let mut favorite = None;
    let mut max = 0;
    for (topic, n) in counts {
        if n > max {
            max = n;
            favorite = Some(topic);
        }
    }
    favorite.unwrap_or(NO_FAVORITE_TOPIC).to_string()
}

fn achievements(sessions: &[SessionRecord]) -> Vec<Achievement> {
    let total = sessions.len();
    vec![
        Achievement {
            title: "First Debate",
            description: "Complete your first debate",
            unlocked: total >= 1,
        },
        Achievement {
            title: "Debate Master",
            description: "Complete 5 debates",
            unlocked: total >= 5,
        },
        Achievement {
            title: "Consistent Learner",
            description: "Complete 10 debates",
            unlocked: total >= 10,
        },
        Achievement {
            title: "High Scorer",
            description: "Score 9 or above",
            unlocked: sessions.iter().any(|s| s.average_score() >= 9.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Feedback;
    use crate::test_helpers::helpers::{at, feedback, record};

    #[test]
    fn test_empty_profile() {
        let profile = ProfileSummary::from_sessions(vec![], at("2025-06-10T00:00:00Z"));
        assert_eq!(profile.total_sessions, 0);
        assert_eq!(profile.total_minutes, 0);
        assert!(profile.averages.is_none());
        assert!(profile.weekly_activity.is_empty());
        assert_eq!(profile.best_score, 0.0);
        assert_eq!(profile.favorite_topic, NO_FAVORITE_TOPIC);
        assert!(profile.improvement_areas.is_empty());
        assert_eq!(profile.achievements.len(), 4);
        assert!(profile.achievements.iter().all(|a| !a.unlocked));
    }

    #[test]
    fn test_best_score_and_improvement_areas() {
        let mut newest = record("n", "u@example.com", "2025-06-09T10:00:00Z", None);
        newest.feedback = Some(Feedback {
            weaknesses: vec!["articles".to_string()],
            ..feedback(5.0, 6.0, 6.0)
        });
        let older = record("o", "u@example.com", "2025-06-01T10:00:00Z", Some(8.25));

        let profile = ProfileSummary::from_sessions(vec![older, newest], at("2025-06-10T00:00:00Z"));
        assert_eq!(profile.best_score, 8.3);
        assert_eq!(profile.improvement_areas, vec!["articles"]);
    }

    #[test]
    fn test_favorite_topic_tie_goes_to_first_seen() {
        let mut sessions = vec![
            record("a", "u@example.com", "2025-06-05T00:00:00Z", None),
            record("b", "u@example.com", "2025-06-04T00:00:00Z", None),
            record("c", "u@example.com", "2025-06-03T00:00:00Z", None),
            record("d", "u@example.com", "2025-06-02T00:00:00Z", None),
            record("e", "u@example.com", "2025-06-01T00:00:00Z", None),
        ];
        sessions[0].topic = "Space Exploration".to_string();
        sessions[1].topic = "Remote Work Future".to_string();
        sessions[2].topic = "Remote Work Future".to_string();
        sessions[3].topic = "Space Exploration".to_string();
        sessions[4].topic = "AI in Education".to_string();

        // Reverse input order to show ranking runs on newest-first order.
        sessions.reverse();
        let profile = ProfileSummary::from_sessions(sessions, at("2025-06-10T00:00:00Z"));
        assert_eq!(profile.favorite_topic, "Space Exploration");
    }

    #[test]
    fn test_achievements_unlock() {
        let mut sessions: Vec<_> = (0..5)
            .map(|i| {
                record(
                    &format!("s{i}"),
                    "u@example.com",
                    &format!("2025-06-0{}T00:00:00Z", i + 1),
                    Some(6.0),
                )
            })
            .collect();

        let unlocked = |sessions: Vec<SessionRecord>| -> Vec<&'static str> {
            ProfileSummary::from_sessions(sessions, at("2025-06-10T00:00:00Z"))
                .achievements
                .into_iter()
                .filter(|a| a.unlocked)
                .map(|a| a.title)
                .collect()
        };

        assert_eq!(unlocked(sessions.clone()), vec!["First Debate", "Debate Master"]);

        sessions[2].feedback = Some(feedback(9.0, 9.0, 9.0));
        assert_eq!(
            unlocked(sessions),
            vec!["First Debate", "Debate Master", "High Scorer"]
        );
    }

    #[test]
    fn test_totals_and_averages() {
        let mut a = record("a", "u@example.com", "2025-06-09T10:00:00Z", Some(6.0));
        a.duration = 130;
        let mut b = record("b", "u@example.com", "2025-06-02T10:00:00Z", Some(7.0));
        b.duration = 100;
        let c = record("c", "u@example.com", "2025-06-08T10:00:00Z", None);
        let d = record("d", "u@example.com", "2025-05-01T10:00:00Z", Some(10.0));

        let profile = ProfileSummary::from_sessions(vec![a, b, c, d], at("2025-06-10T00:00:00Z"));

        assert_eq!(profile.total_sessions, 4);
        assert_eq!(profile.total_minutes, (130 + 100 + 60 + 60) / 60);
        let averages = profile.averages.unwrap();
        assert_eq!(averages.grammar, 5.8);
        assert_eq!(averages.overall, 5.8);
        assert_eq!(
            profile.recent.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "c", "b"]
        );
    }

    #[test]
    fn test_weekly_activity_counts_trailing_week() {
        // 2025-06-09 is a Monday, 2025-06-08 a Sunday
        let sessions = vec![
            record("mon", "u@example.com", "2025-06-09T10:00:00Z", None),
            record("sun", "u@example.com", "2025-06-08T10:00:00Z", None),
            record("sun2", "u@example.com", "2025-06-08T18:00:00Z", None),
            record("old-mon", "u@example.com", "2025-06-02T10:00:00Z", None),
        ];
        let profile = ProfileSummary::from_sessions(sessions, at("2025-06-10T00:00:00Z"));

        assert_eq!(profile.weekly_activity.len(), 7);
        assert_eq!(profile.weekly_activity[0], DayActivity { day: "Mon", sessions: 1 });
        assert_eq!(profile.weekly_activity[6], DayActivity { day: "Sun", sessions: 2 });
        assert_eq!(profile.weekly_activity[2].sessions, 0);
    }
}
