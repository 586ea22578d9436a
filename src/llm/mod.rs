//! Model Gateway
//!
//! Forwards a prompt to a generative-language service and hands back the
//! first candidate's text.

pub mod error;
mod gateway;
pub mod gemini;

pub use error::{GatewayError, Result};
pub use gateway::{GenerateRequest, ModelGateway};
pub use gemini::GeminiGateway;
