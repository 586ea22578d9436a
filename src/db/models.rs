//! Session records as stored and as served.

use crate::feedback::Feedback;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owner of a session. Email is the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

/// A completed debate, as written by the client that ran it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Store-assigned identifier
    pub id: String,
    pub topic: String,
    /// Elapsed seconds
    pub duration: u64,
    pub user_replies: Vec<String>,
    pub feedback: Option<Feedback>,
    pub user: SessionUser,
    pub timestamp: DateTime<Utc>,
}

impl SessionRecord {
    /// Feedback average, counting a session without feedback as zero.
    pub fn average_score(&self) -> f64 {
        self.feedback.as_ref().map_or(0.0, |f| f.average_score)
    }
}

/// Input for [`crate::db::SessionRepository::append`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub topic: String,
    pub duration: u64,
    pub user_replies: Vec<String>,
    pub feedback: Option<Feedback>,
    pub user: SessionUser,
    /// Creation instant. `None` stamps the current time.
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewSession {
    pub fn new(topic: impl Into<String>, user: SessionUser) -> Self {
        Self {
            topic: topic.into(),
            duration: 0,
            user_replies: Vec::new(),
            feedback: None,
            user,
            timestamp: None,
        }
    }
}
