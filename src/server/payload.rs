//! Request and response bodies.
//!
//! Required fields follow JavaScript truthiness, which is what the browser
//! client was written against: absent, `null`, `false`, `0` and `""` count
//! as missing, while arrays and objects (even empty ones) are present.

use crate::db::{NewSession, SessionRecord, SessionUser};
use crate::feedback::Feedback;
use crate::prompts;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The field as prompt text, or `None` when it is missing.
pub fn required_text(value: &Value) -> Option<String> {
    is_truthy(value).then(|| render(value))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(render).collect();
            prompts::join_replies(&parts)
        }
        other => other.to_string(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DebateRequest {
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub topic: Value,
}

#[derive(Debug, Serialize)]
pub struct DebateResponse {
    pub reply: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub replies: Value,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: Feedback,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartMessageRequest {
    #[serde(default)]
    pub title: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartMessageResponse {
    pub start_message: String,
}

/// `/end-session` body.
///
/// Only `user.email` is required. Every other field is taken as loosely as
/// the browser client sends it: values of the wrong shape fall back to their
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionRequest {
    #[serde(default)]
    pub topic: Value,
    #[serde(default)]
    pub duration: Value,
    #[serde(default)]
    pub user_replies: Value,
    #[serde(default)]
    pub feedback: Value,
    #[serde(default)]
    pub user: Value,
}

impl EndSessionRequest {
    /// Build the session to store. `None` when the user or their email is missing.
    pub fn into_new_session(self) -> Option<NewSession> {
        let email = self
            .user
            .get("email")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|e| !e.is_empty())?
            .to_string();
        let name = self
            .user
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(NewSession {
            topic: self.topic.as_str().unwrap_or_default().to_string(),
            duration: whole_seconds(&self.duration),
            user_replies: reply_list(self.user_replies),
            feedback: lenient_feedback(self.feedback),
            user: SessionUser { name, email },
            timestamp: None,
        })
    }
}

/// Non-negative whole seconds from a number or numeric string, else 0.
fn whole_seconds(value: &Value) -> u64 {
    let seconds = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s.trunc() as u64,
        _ => 0,
    }
}

fn reply_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    }
}

fn lenient_feedback(value: Value) -> Option<Feedback> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(feedback) => Some(feedback),
        Err(e) => {
            tracing::warn!("Storing session without feedback, unreadable feedback: {}", e);
            None
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub success: bool,
    pub saved: SessionRecord,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}
