//! Feedback scores and their extraction from free-text model output.
//!
//! The model is asked for a bare JSON object but often wraps it in code
//! fences or surrounds it with prose. Extraction strips the fences, locates
//! the object span with a string-aware brace scanner and parses it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json)?").expect("valid fence regex"));

/// Scoring result for one session's replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub grammar: f64,
    pub clarity: f64,
    pub confidence: f64,
    /// Always `(grammar + clarity + confidence) / 3`; see [`Feedback::normalized`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detailed_feedback: String,
}

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Feedback {
    /// Mean of the three sub-scores.
    pub fn computed_average(&self) -> f64 {
        (self.grammar + self.clarity + self.confidence) / 3.0
    }

    /// Replace `average_score` with the locally computed mean.
    ///
    /// The model's own average is discarded so every view reads the same number.
    pub fn normalized(mut self) -> Self {
        let computed = self.computed_average();
        if (self.average_score - computed).abs() > 0.05 {
            tracing::debug!(
                "Model average {} differs from computed {}, using computed",
                self.average_score,
                computed
            );
        }
        self.average_score = computed;
        self
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Model returned empty feedback")]
    Empty,

    #[error("No JSON found in model response")]
    NoJson,

    #[error("Invalid feedback JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a [`Feedback`] out of raw model text.
pub fn extract_feedback(raw: &str) -> Result<Feedback, ExtractError> {
    if raw.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    let cleaned = strip_fences(raw);
    let span = find_json_object(&cleaned).ok_or(ExtractError::NoJson)?;
    let feedback: Feedback = serde_json::from_str(span)?;

    Ok(feedback.normalized())
}

/// Remove every ```` ```json ```` and ```` ``` ```` marker.
pub fn strip_fences(raw: &str) -> String {
    FENCE.replace_all(raw, "").trim().to_string()
}

/// Locate the first JSON object in `text`.
///
/// Scans from the first `{`, tracking depth outside string literals, and
/// returns the span that closes at depth zero. When the braces never
/// balance, falls back to first `{` through last `}`.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
