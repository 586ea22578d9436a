//! Prompt templates sent to the model.
//!
//! User text is interpolated as-is. Callers reject missing input before
//! building a prompt.

/// Topic used when a debate turn arrives without one.
pub const DEFAULT_TOPIC: &str = "General";

/// Counter-argument for one user turn.
pub fn counter_argument(message: &str, topic: Option<&str>) -> String {
    let topic = topic
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TOPIC);

    format!(
        r#"
You are debating against the user. Reply in 3-5 lines.

Topic: {topic}
User said: "{message}"

Your job:
- Give a strong counter-argument
- Give clear reasoning
- End with ONE question to continue the debate
"#
    )
}

/// Feedback request over everything the user said in a session.
///
/// The reply is expected to carry a single JSON object; see [`crate::feedback`].
pub fn feedback_request(replies: &str) -> String {
    format!(
        r#"
Analyze the user's debate message: "{replies}"
Focus more on the english and less on the content.
Don't include feedback for punctuations (like missing commas or fullstops).
Return ONLY a raw JSON object:

{{
  "grammar": number (rating out of 10),
  "clarity": number (rating out of 10),
  "confidence": number (rating out of 10),
  "average_score": number (average of grammar, clarity and confidence),
  "strengths": ["string"],
  "weaknesses": ["string"],
  "detailed_feedback": "string"
}}

Do NOT add backticks, code blocks, or extra text.
"#
    )
}

/// Opening statement for a debate titled `title`.
pub fn opening_statement(title: &str) -> String {
    format!(
        r#"
Generate ONLY the opening statement for a debate on the topic: "{title}".
Rules:
- Do NOT start with "Sure!", "Here's", "Absolutely", etc.
- Give only the debate introduction.
- Keep it sharp, neutral, and topic-focused.
- No explanations, no extra sentences outside the intro.
"#
    )
}

/// Render a list of replies into the opaque text block used by [`feedback_request`].
pub fn join_replies<S: AsRef<str>>(replies: &[S]) -> String {
    replies
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}
