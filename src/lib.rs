//! debate-coach - Practise English by debating an AI
//!
//! A small backend that builds debate prompts, forwards them to Google
//! Gemini, extracts structured feedback scores from the reply and stores
//! finished sessions in SQLite so they can be listed, summarised and compared.
//!
//! ## Components
//!
//! - **Prompts:** fixed templates for the opening statement, counter-arguments and scoring
//! - **Model Gateway:** `ModelGateway` trait with a Gemini `generateContent` client
//! - **Feedback:** locates and parses the JSON scores in free-form model output
//! - **Session Store:** append-only SQLite repository keyed by user email
//! - **Stats:** dashboard, compare and profile aggregates
//! - **Server:** axum HTTP API with a single-origin CORS policy
//!
//! ## Quick Start
//!
//! ```bash
//! # HTTP server on :5000
//! GEMINI_API_KEY=... debate-coach serve
//!
//! # Debate in the terminal
//! debate-coach debate --topic "Space Exploration" --email you@example.com
//! ```

pub mod cli;
pub mod coach;
pub mod config;
pub mod db;
pub mod error;
pub mod feedback;
pub mod llm;
pub mod logging;
pub mod prompts;
pub mod server;
pub mod stats;

#[cfg(test)]
mod test_helpers;

pub use error::CoachError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
