//! Shared test helpers.

#[cfg(test)]
pub mod helpers {
    use crate::coach::Coach;
    use crate::db::{Database, NewSession, SessionRecord, SessionRepository, SessionUser};
    use crate::feedback::Feedback;
    use crate::llm::{GatewayError, GenerateRequest, ModelGateway};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::{Arc, Mutex};

    /// What the scripted gateway answers with.
    #[derive(Debug, Clone)]
    pub enum Script {
        Reply(Option<String>),
        Fail(u16),
    }

    /// Gateway that returns a canned answer and records every request.
    pub struct ScriptedGateway {
        script: Script,
        pub requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedGateway {
        pub fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                requests: Mutex::new(Vec::new()),
            })
        }

        pub fn replying(text: &str) -> Arc<Self> {
            Self::new(Script::Reply(Some(text.to_string())))
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.requests
                .lock()
                .unwrap()
                .last()
                .map(|r| r.prompt.clone())
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        async fn generate(
            &self,
            request: &GenerateRequest,
        ) -> Result<Option<String>, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.script {
                Script::Reply(text) => Ok(text.clone()),
                Script::Fail(status) => Err(GatewayError::Api {
                    status: *status,
                    message: "upstream unavailable".to_string(),
                }),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Repository backed by a fresh, migrated in-memory database.
    pub async fn in_memory_repository() -> SessionRepository {
        let db = Database::connect_in_memory().await.expect("in-memory db");
        db.run_migrations().await.expect("migrations");
        SessionRepository::new(db)
    }

    pub async fn coach_with(gateway: Arc<ScriptedGateway>) -> Coach {
        Coach::new(gateway, in_memory_repository().await, false)
    }

    pub fn feedback(grammar: f64, clarity: f64, confidence: f64) -> Feedback {
        Feedback {
            grammar,
            clarity,
            confidence,
            average_score: 0.0,
            strengths: vec![],
            weaknesses: vec![],
            detailed_feedback: String::new(),
        }
        .normalized()
    }

    pub fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    /// A stored-looking record without touching the database.
    pub fn record(id: &str, email: &str, timestamp: &str, score: Option<f64>) -> SessionRecord {
        SessionRecord {
            id: id.to_string(),
            topic: "Social Media Impact".to_string(),
            duration: 60,
            user_replies: vec!["reply".to_string()],
            feedback: score.map(|s| feedback(s, s, s)),
            user: SessionUser {
                name: "Test".to_string(),
                email: email.to_string(),
            },
            timestamp: at(timestamp),
        }
    }

    pub fn new_session(email: &str, timestamp: &str, scores: (f64, f64, f64)) -> NewSession {
        let mut session = NewSession::new(
            "Climate Change Solutions",
            SessionUser {
                name: "Test".to_string(),
                email: email.to_string(),
            },
        );
        session.feedback = Some(feedback(scores.0, scores.1, scores.2));
        session.timestamp = Some(at(timestamp));
        session
    }
}
