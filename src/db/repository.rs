//! Session repository: append-only writes, lookups by owner email and id.

use super::database::Database;
use super::error::StoreError;
use super::models::{NewSession, SessionRecord, SessionUser};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{OptionalExtension, Row, params};
use uuid::Uuid;

const SELECT_COLUMNS: &str =
    "SELECT id, topic, duration, user_replies, feedback, user_name, user_email, timestamp
     FROM debate_sessions";

#[derive(Clone)]
pub struct SessionRepository {
    db: Database,
}

impl SessionRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new session and return it with its assigned id and timestamp.
    ///
    /// Two sessions for the same user are independent inserts.
    pub async fn append(&self, session: NewSession) -> Result<SessionRecord, StoreError> {
        let record = SessionRecord {
            id: Uuid::new_v4().to_string(),
            topic: session.topic,
            duration: session.duration,
            user_replies: session.user_replies,
            feedback: session.feedback,
            user: session.user,
            // Stored with microsecond precision; trim now so the returned
            // record equals what a later read produces.
            timestamp: session.timestamp.unwrap_or_else(Utc::now).trunc_subsecs(6),
        };

        let row = record.clone();
        self.db
            .execute(move |conn| {
                let duration = i64::try_from(row.duration).map_err(|e| StoreError::InvalidColumn {
                    column: "duration",
                    message: e.to_string(),
                })?;
                let feedback = row
                    .feedback
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?;

                conn.execute(
                    "INSERT INTO debate_sessions
                        (id, topic, duration, user_replies, feedback, user_name, user_email, timestamp)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        row.id,
                        row.topic,
                        duration,
                        serde_json::to_string(&row.user_replies)?,
                        feedback,
                        row.user.name,
                        row.user.email,
                        row.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
                    ],
                )?;
                Ok(())
            })
            .await?;

        tracing::info!(
            "Stored session {} for {} ({} replies)",
            record.id,
            record.user.email,
            record.user_replies.len()
        );
        Ok(record)
    }

    /// All sessions owned by `email`, in insertion order.
    pub async fn query_by_email(&self, email: &str) -> Result<Vec<SessionRecord>, StoreError> {
        let email = email.to_string();
        self.db
            .execute(move |conn| {
                let mut stmt =
                    conn.prepare(&format!("{SELECT_COLUMNS} WHERE user_email = ?1 ORDER BY seq"))?;
                let rows = stmt.query_map(params![email], RawSession::from_row)?;

                let mut sessions = Vec::new();
                for raw in rows {
                    sessions.push(raw?.into_record()?);
                }
                Ok(sessions)
            })
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                let raw = conn
                    .query_row(
                        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                        params![id],
                        RawSession::from_row,
                    )
                    .optional()?;
                raw.map(RawSession::into_record).transpose()
            })
            .await
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .db
            .execute(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM debate_sessions", [], |row| {
                    row.get(0)
                })?)
            })
            .await?;
        Ok(count.max(0) as u64)
    }
}

/// Column values before JSON/timestamp decoding.
struct RawSession {
    id: String,
    topic: String,
    duration: i64,
    user_replies: String,
    feedback: Option<String>,
    user_name: String,
    user_email: String,
    timestamp: String,
}

impl RawSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            topic: row.get("topic")?,
            duration: row.get("duration")?,
            user_replies: row.get("user_replies")?,
            feedback: row.get("feedback")?,
            user_name: row.get("user_name")?,
            user_email: row.get("user_email")?,
            timestamp: row.get("timestamp")?,
        })
    }

    fn into_record(self) -> Result<SessionRecord, StoreError> {
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|e| StoreError::InvalidColumn {
                column: "timestamp",
                message: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(SessionRecord {
            id: self.id,
            topic: self.topic,
            duration: u64::try_from(self.duration).map_err(|e| StoreError::InvalidColumn {
                column: "duration",
                message: e.to_string(),
            })?,
            user_replies: serde_json::from_str(&self.user_replies)?,
            feedback: self
                .feedback
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            user: SessionUser {
                name: self.user_name,
                email: self.user_email,
            },
            timestamp,
        })
    }
}
