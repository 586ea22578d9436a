//! Read-only views over stored sessions: topic catalog, dashboard, compare
//! and profile summaries.

pub mod compare;
pub mod dashboard;
pub mod profile;
pub mod topics;

pub use compare::{BarPoint, ChartPoint, Comparison, TrendPoint};
pub use dashboard::DashboardSummary;
pub use profile::{Achievement, ProfileSummary};
pub use topics::Topic;

use crate::db::SessionRecord;

/// Sort newest first. Equal timestamps keep their store order.
pub fn sort_newest_first(sessions: &mut [SessionRecord]) {
    sessions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Round to `places` decimal places for display.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
