//! Coach service: the glue between prompts, the model gateway, feedback
//! extraction and the session store. Shared by the HTTP handlers and the CLI.

use crate::db::{NewSession, SessionRecord, SessionRepository};
use crate::error::Result;
use crate::feedback::{self, ExtractError, Feedback};
use crate::llm::{GenerateRequest, ModelGateway};
use crate::prompts;
use std::sync::Arc;

/// Reply used when the model answers without text.
pub const NO_REPLY: &str = "No reply";

/// Opening statement used when the model answers without text.
pub const START_MESSAGE_FALLBACK: &str = "Failed to generate start message";

pub struct Coach {
    gateway: Arc<dyn ModelGateway>,
    sessions: SessionRepository,
    json_mode: bool,
}

impl Coach {
    pub fn new(gateway: Arc<dyn ModelGateway>, sessions: SessionRepository, json_mode: bool) -> Self {
        Self {
            gateway,
            sessions,
            json_mode,
        }
    }

    pub fn sessions(&self) -> &SessionRepository {
        &self.sessions
    }

    /// Opening statement for a debate titled `title`.
    pub async fn opening_statement(&self, title: &str) -> Result<String> {
        let request = GenerateRequest::text(prompts::opening_statement(title));
        let text = self.gateway.generate(&request).await?;

        Ok(text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("{} returned no opening statement for {:?}", self.gateway.name(), title);
                START_MESSAGE_FALLBACK.to_string()
            }))
    }

    /// Counter-argument to one user turn.
    pub async fn counter_argument(&self, message: &str, topic: Option<&str>) -> Result<String> {
        let request = GenerateRequest::text(prompts::counter_argument(message, topic));
        let text = self.gateway.generate(&request).await?;

        Ok(text.filter(|t| !t.is_empty()).unwrap_or_else(|| {
            tracing::warn!("{} returned no debate reply", self.gateway.name());
            NO_REPLY.to_string()
        }))
    }

    /// Score the user's replies.
    pub async fn feedback(&self, replies: &str) -> Result<Feedback> {
        let prompt = prompts::feedback_request(replies);
        let request = if self.json_mode {
            GenerateRequest::json(prompt)
        } else {
            GenerateRequest::text(prompt)
        };

        let raw = self
            .gateway
            .generate(&request)
            .await?
            .ok_or(ExtractError::Empty)?;

        let scored = feedback::extract_feedback(&raw)?;
        tracing::info!(
            "Feedback scored: grammar={}, clarity={}, confidence={}, average={:.2}",
            scored.grammar,
            scored.clarity,
            scored.confidence,
            scored.average_score
        );
        Ok(scored)
    }

    /// Persist a completed session.
    pub async fn end_session(&self, mut session: NewSession) -> Result<SessionRecord> {
        session.feedback = session.feedback.map(Feedback::normalized);
        Ok(self.sessions.append(session).await?)
    }
}
