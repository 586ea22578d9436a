//! Interactive debate in the terminal.
//!
//! Prints the AI's opening statement, then alternates user turns and
//! counter-arguments. `/end` scores the replies and stores the session;
//! `/quit` leaves without saving.

use super::{commands, render};
use crate::coach::Coach;
use crate::config::Config;
use crate::db::{NewSession, SessionRecord, SessionUser};
use crate::prompts;
use crate::stats::topics;
use anyhow::Result;
use std::io::Write;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

pub(super) async fn cmd_debate(
    config: &Config,
    topic: &str,
    name: String,
    email: String,
) -> Result<()> {
    if email.trim().is_empty() {
        anyhow::bail!("User data missing. Pass --email or set DEBATE_COACH_EMAIL.");
    }

    let title = topics::find(topic).map_or_else(|| topic.trim().to_string(), |t| t.title.to_string());
    let coach = commands::build_coach(config).await?;
    let user = SessionUser { name, email };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_debate(&coach, &title, user, stdin, &mut stdout).await?;
    Ok(())
}

/// Drive one debate over `input`, writing the transcript to `out`.
///
/// Returns the stored session, or `None` when the user quit or never replied.
pub(super) async fn run_debate<R, W>(
    coach: &Coach,
    title: &str,
    user: SessionUser,
    input: R,
    out: &mut W,
) -> Result<Option<SessionRecord>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let started = Instant::now();

    let opening = match coach.opening_statement(title).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Error generating start message: {}", e);
            crate::coach::START_MESSAGE_FALLBACK.to_string()
        }
    };
    writeln!(out, "== {} ==\n", title)?;
    writeln!(out, "AI: {}\n", opening)?;
    writeln!(out, "Type your argument. /end to finish and get feedback, /quit to leave.")?;

    let mut replies: Vec<String> = Vec::new();
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" => {
                writeln!(out, "Session discarded.")?;
                return Ok(None);
            }
            "/end" => break,
            _ => {}
        }

        replies.push(line.to_string());
        match coach.counter_argument(line, Some(title)).await {
            Ok(reply) => writeln!(out, "\nAI: {}\n", reply)?,
            Err(e) => {
                tracing::error!("Debate error: {}", e);
                writeln!(out, "\n(Gemini debate failed, try again)\n")?;
            }
        }
    }

    let elapsed = started.elapsed().as_secs();
    writeln!(out, "Session length {}:{:02}", elapsed / 60, elapsed % 60)?;

    if replies.is_empty() {
        writeln!(out, "No replies, nothing to score.")?;
        return Ok(None);
    }

    let feedback = match coach.feedback(&prompts::join_replies(&replies)).await {
        Ok(f) => {
            write!(out, "\n{}", render::feedback(&f))?;
            Some(f)
        }
        Err(e) => {
            tracing::error!("Feedback error: {}", e);
            writeln!(out, "Feedback unavailable: {}", e)?;
            None
        }
    };

    let mut session = NewSession::new(title, user);
    session.duration = elapsed;
    session.user_replies = replies;
    session.feedback = feedback;

    let saved = coach.end_session(session).await.map_err(|e| {
        tracing::error!("Error saving session: {}", e);
        anyhow::anyhow!("Failed to store session")
    })?;
    writeln!(out, "\nSession saved: {}", saved.id)?;

    let mut history = coach.sessions().query_by_email(&saved.user.email).await?;
    crate::stats::sort_newest_first(&mut history);
    write!(out, "\n{}", render::session_list(&history))?;

    Ok(Some(saved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::helpers::{self, Script, ScriptedGateway};

    fn user() -> SessionUser {
        SessionUser {
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_full_debate_is_scored_and_stored() {
        let gateway = ScriptedGateway::replying(
            r#"{"grammar":8,"clarity":7,"confidence":9,"strengths":["pace"]}"#,
        );
        let coach = helpers::coach_with(gateway.clone()).await;
        let input: &[u8] = b"Remote work saves time\n\nOffices build culture\n/end\n";
        let mut out = Vec::new();

        let saved = run_debate(&coach, "Remote Work Future", user(), input, &mut out)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(saved.topic, "Remote Work Future");
        assert_eq!(saved.user_replies, vec!["Remote work saves time", "Offices build culture"]);
        assert_eq!(saved.average_score(), 8.0);

        // opening + two turns + feedback
        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 4);
        assert!(requests[3].prompt.contains("Remote work saves time\nOffices build culture"));
        drop(requests);

        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("Strengths:"));
        assert!(transcript.contains(&saved.id));
        assert_eq!(coach.sessions().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_quit_discards_session() {
        let coach = helpers::coach_with(ScriptedGateway::replying("Not so fast.")).await;
        let input: &[u8] = b"Point one\n/quit\n";
        let mut out = Vec::new();

        let saved = run_debate(&coach, "AI in Education", user(), input, &mut out)
            .await
            .unwrap();
        assert!(saved.is_none());
        assert_eq!(coach.sessions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_no_replies_is_not_saved() {
        let coach = helpers::coach_with(ScriptedGateway::replying("Hello.")).await;
        let mut out = Vec::new();
        let saved = run_debate(&coach, "x", user(), &b"/end\n"[..], &mut out)
            .await
            .unwrap();
        assert!(saved.is_none());
    }

    #[tokio::test]
    async fn test_upstream_failure_keeps_session_without_feedback() {
        let coach = helpers::coach_with(ScriptedGateway::new(Script::Fail(503))).await;
        let mut out = Vec::new();

        let saved = run_debate(&coach, "x", user(), &b"An argument\n"[..], &mut out)
            .await
            .unwrap()
            .unwrap();

        assert!(saved.feedback.is_none());
        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains(crate::coach::START_MESSAGE_FALLBACK));
        assert!(transcript.contains("Gemini debate failed"));
    }
}
