//! Gateway trait and request type.

use super::error::Result;
use async_trait::async_trait;

/// One prompt bound for the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Ask the provider for a JSON response body instead of free text.
    pub json_response: bool,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            json_response: false,
        }
    }

    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            json_response: true,
        }
    }
}

/// A generative-language backend.
///
/// `Ok(None)` means the call succeeded but the response carried no text at
/// the expected position. Callers decide whether that is a fallback or an error.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<Option<String>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
