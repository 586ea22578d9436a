//! POST routes: debate turn, feedback, opening statement, end of session.

use super::AppState;
use super::error::ApiError;
use super::payload::*;
use crate::error::CoachError;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

/// POST /debate
pub(super) async fn debate(
    State(state): State<AppState>,
    payload: Result<Json<DebateRequest>, JsonRejection>,
) -> Result<Json<DebateResponse>, ApiError> {
    let Json(req) = payload?;
    let message =
        required_text(&req.message).ok_or_else(|| ApiError::bad_request("Message required"))?;
    let topic = required_text(&req.topic);

    let reply = state
        .coach
        .counter_argument(&message, topic.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Debate error: {}", e);
            ApiError::internal("Gemini debate failed")
        })?;

    Ok(Json(DebateResponse { reply }))
}

/// POST /feedback
///
/// Extraction failures surface their message to the caller; upstream
/// failures only reach the log.
pub(super) async fn feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let Json(req) = payload?;
    let replies =
        required_text(&req.replies).ok_or_else(|| ApiError::bad_request("Message required"))?;

    let feedback = state.coach.feedback(&replies).await.map_err(|e| {
        tracing::error!("Feedback error: {}", e);
        match e {
            CoachError::Extract(extract) => ApiError::internal(extract.to_string()),
            _ => ApiError::internal("Gemini feedback failed"),
        }
    })?;

    Ok(Json(FeedbackResponse { feedback }))
}

/// POST /start-message
pub(super) async fn start_message(
    State(state): State<AppState>,
    payload: Result<Json<StartMessageRequest>, JsonRejection>,
) -> Result<Json<StartMessageResponse>, ApiError> {
    let Json(req) = payload?;
    let title =
        required_text(&req.title).ok_or_else(|| ApiError::bad_request("Title is required"))?;

    let start_message = state.coach.opening_statement(&title).await.map_err(|e| {
        tracing::error!("Error generating start message: {}", e);
        ApiError::internal("Failed to generate start message")
    })?;

    Ok(Json(StartMessageResponse { start_message }))
}

/// POST /end-session
pub(super) async fn end_session(
    State(state): State<AppState>,
    payload: Result<Json<EndSessionRequest>, JsonRejection>,
) -> Result<Json<EndSessionResponse>, ApiError> {
    let Json(req) = payload?;
    let session = req
        .into_new_session()
        .ok_or_else(|| ApiError::bad_request("User data missing."))?;

    let saved = state.coach.end_session(session).await.map_err(|e| {
        tracing::error!("Error saving session: {}", e);
        ApiError::internal("Failed to store session")
    })?;

    Ok(Json(EndSessionResponse {
        success: true,
        saved,
    }))
}
