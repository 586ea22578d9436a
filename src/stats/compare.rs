//! Side-by-side comparison of a session with the one before it.
//!
//! "Previous" is the next entry after the selected session once all of the
//! owner's sessions are sorted newest first.

use super::{round_to, sort_newest_first};
use crate::db::SessionRecord;
use crate::feedback::Feedback;
use serde::Serialize;

/// Radar chart row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub skill: &'static str,
    pub current: f64,
    pub previous: f64,
}

/// Bar chart row. Same values as [`ChartPoint`], keyed by `category`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub category: &'static str,
    pub current: f64,
    pub previous: f64,
}

/// One point on the average-score trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub session: &'static str,
    pub avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub current: SessionRecord,
    pub previous: SessionRecord,
    pub radar: Vec<ChartPoint>,
    pub bar: Vec<BarPoint>,
    pub line: Vec<TrendPoint>,
    pub current_strengths: Vec<String>,
    pub previous_weaknesses: Vec<String>,
}

impl Comparison {
    /// Resolve the session preceding `selected_id`.
    ///
    /// Sessions owned by a different email than the selected one are ignored.
    /// Returns `None` when the selected session is unknown or is the oldest.
    pub fn resolve(selected_id: &str, mut sessions: Vec<SessionRecord>) -> Option<Self> {
        let owner = sessions.iter().find(|s| s.id == selected_id)?.user.email.clone();
        sessions.retain(|s| s.user.email == owner);
        sort_newest_first(&mut sessions);

        let index = sessions.iter().position(|s| s.id == selected_id)?;
        let previous = sessions.get(index + 1)?.clone();
        let current = sessions.swap_remove(index);

        Some(Self::between(current, previous))
    }

    pub fn between(current: SessionRecord, previous: SessionRecord) -> Self {
        let cur = Scores::of(current.feedback.as_ref());
        let prev = Scores::of(previous.feedback.as_ref());

        let skills = [
            ("Grammar", cur.grammar, prev.grammar),
            ("Confidence", cur.confidence, prev.confidence),
            ("Clarity", cur.clarity, prev.clarity),
        ];
        let radar: Vec<ChartPoint> = skills
            .iter()
            .map(|&(skill, current, previous)| ChartPoint {
                skill,
                current,
                previous,
            })
            .collect();
        let bar = skills
            .iter()
            .map(|&(category, current, previous)| BarPoint {
                category,
                current,
                previous,
            })
            .collect();

        let line = vec![
            TrendPoint {
                session: "Previous",
                avg: round_to(prev.average(), 2),
            },
            TrendPoint {
                session: "Current",
                avg: round_to(cur.average(), 2),
            },
        ];

        let current_strengths = current
            .feedback
            .as_ref()
            .map(|f| f.strengths.clone())
            .unwrap_or_default();
        let previous_weaknesses = previous
            .feedback
            .as_ref()
            .map(|f| f.weaknesses.clone())
            .unwrap_or_default();

        Self {
            bar,
            radar,
            line,
            current_strengths,
            previous_weaknesses,
            current,
            previous,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Scores {
    grammar: f64,
    clarity: f64,
    confidence: f64,
}

impl Scores {
    fn of(feedback: Option<&Feedback>) -> Self {
        feedback
            .map(|f| Self {
                grammar: f.grammar,
                clarity: f.clarity,
                confidence: f.confidence,
            })
            .unwrap_or_default()
    }

    fn average(&self) -> f64 {
        (self.grammar + self.clarity + self.confidence) / 3.0
    }
}
