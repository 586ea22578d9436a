//! Plain-text rendering of the stats views for the terminal.

use crate::db::SessionRecord;
use crate::feedback::Feedback;
use crate::stats::{Comparison, DashboardSummary, ProfileSummary, Topic};
use std::fmt::Write;

pub fn topics(topics: &[Topic]) -> String {
    let mut out = String::new();
    for t in topics {
        let _ = writeln!(
            out,
            "{:>2}  {:<26} {:<13} {:<12} {}",
            t.id, t.title, t.level, t.category, t.desc
        );
    }
    out
}

fn score(value: f64) -> String {
    format!("{:.1}/10", value)
}

fn session_line(s: &SessionRecord) -> String {
    format!(
        "{}  {}  {:<26} {:>5}s  {}",
        s.id,
        s.timestamp.format("%Y-%m-%d %H:%M"),
        s.topic,
        s.duration,
        score(s.average_score())
    )
}

pub fn session_list(sessions: &[SessionRecord]) -> String {
    if sessions.is_empty() {
        return "No sessions yet.\n".to_string();
    }
    let mut out = String::new();
    for s in sessions {
        let _ = writeln!(out, "{}", session_line(s));
    }
    out
}

fn list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{heading}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

pub fn feedback(f: &Feedback) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Grammar {}  Clarity {}  Confidence {}  Average {}",
        score(f.grammar),
        score(f.clarity),
        score(f.confidence),
        score(f.average_score)
    );
    list(&mut out, "Strengths", &f.strengths);
    list(&mut out, "Weaknesses", &f.weaknesses);
    if !f.detailed_feedback.is_empty() {
        let _ = writeln!(out, "\n{}", f.detailed_feedback);
    }
    out
}

pub fn session_detail(s: &SessionRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Session {}", s.id);
    let _ = writeln!(out, "Topic:    {}", s.topic);
    let _ = writeln!(out, "When:     {}", s.timestamp.to_rfc3339());
    let _ = writeln!(out, "Duration: {}m {}s", s.duration / 60, s.duration % 60);
    let _ = writeln!(out, "User:     {} <{}>", s.user.name, s.user.email);
    let _ = writeln!(out, "\nReplies:");
    for (i, reply) in s.user_replies.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, reply);
    }
    match &s.feedback {
        Some(f) => {
            let _ = write!(out, "\n{}", feedback(f));
        }
        None => {
            let _ = writeln!(out, "\nNo feedback recorded.");
        }
    }
    out
}

pub fn comparison(c: &Comparison) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Current:  {}", session_line(&c.current));
    let _ = writeln!(out, "Previous: {}", session_line(&c.previous));
    let _ = writeln!(out);
    for row in &c.radar {
        let delta = row.current - row.previous;
        let _ = writeln!(
            out,
            "{:<11} {:>5.1} -> {:>5.1}  ({:+.1})",
            row.skill, row.previous, row.current, delta
        );
    }
    for point in &c.line {
        let _ = writeln!(out, "{:<11} avg {:.2}", point.session, point.avg);
    }
    list(&mut out, "\nCurrent strengths", &c.current_strengths);
    list(&mut out, "\nPrevious weaknesses", &c.previous_weaknesses);
    out
}

pub fn dashboard(d: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total sessions: {}", d.total_sessions);
    let _ = writeln!(out, "Average score:  {}", d.average_display);
    let _ = writeln!(out, "Last 7 days:    {}", d.last_7_days);
    let _ = writeln!(out, "Streak:         {}", d.streak);
    if !d.recent.is_empty() {
        let _ = write!(out, "\nRecent:\n{}", session_list(&d.recent));
    }
    out
}

pub fn profile(p: &ProfileSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total sessions: {}", p.total_sessions);
    let _ = writeln!(out, "Total minutes:  {}", p.total_minutes);
    let _ = writeln!(out, "Best score:     {}", score(p.best_score));
    let _ = writeln!(out, "Favorite topic: {}", p.favorite_topic);
    if let Some(a) = &p.averages {
        let _ = writeln!(
            out,
            "Averages: grammar {:.1}, confidence {:.1}, clarity {:.1}, overall {:.1}",
            a.grammar, a.confidence, a.clarity, a.overall
        );
    }
    if !p.weekly_activity.is_empty() {
        let days: Vec<String> = p
            .weekly_activity
            .iter()
            .map(|d| format!("{} {}", d.day, d.sessions))
            .collect();
        let _ = writeln!(out, "This week: {}", days.join("  "));
    }
    list(&mut out, "\nAreas for improvement", &p.improvement_areas);
    let _ = writeln!(out, "\nAchievements:");
    for a in &p.achievements {
        let mark = if a.unlocked { "x" } else { " " };
        let _ = writeln!(out, "  [{}] {} - {}", mark, a.title, a.description);
    }
    if !p.recent.is_empty() {
        let _ = write!(out, "\nRecent:\n{}", session_list(&p.recent));
    }
    out
}
