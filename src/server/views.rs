//! GET routes backing the dashboard, stats, compare and profile views.

use super::AppState;
use super::error::ApiError;
use super::payload::EmailQuery;
use crate::db::SessionRecord;
use crate::stats::{self, Comparison, DashboardSummary, ProfileSummary, Topic};
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;

#[derive(Serialize)]
pub(super) struct TopicsResponse {
    topics: &'static [Topic],
}

#[derive(Serialize)]
pub(super) struct SessionsResponse {
    sessions: Vec<SessionRecord>,
}

#[derive(Serialize)]
pub(super) struct SessionResponse {
    session: SessionRecord,
}

#[derive(Serialize)]
pub(super) struct CompareResponse {
    comparison: Option<Comparison>,
}

#[derive(Serialize)]
pub(super) struct DashboardResponse {
    summary: DashboardSummary,
}

#[derive(Serialize)]
pub(super) struct ProfileResponse {
    profile: ProfileSummary,
}

fn require_email(query: EmailQuery) -> Result<String, ApiError> {
    query
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("Email required"))
}

async fn sessions_for(state: &AppState, email: &str) -> Result<Vec<SessionRecord>, ApiError> {
    state
        .coach
        .sessions()
        .query_by_email(email)
        .await
        .map_err(|e| {
            tracing::error!("Error fetching sessions for {}: {}", email, e);
            ApiError::internal("Failed to load sessions")
        })
}

async fn session_by_id(state: &AppState, id: &str) -> Result<SessionRecord, ApiError> {
    state
        .coach
        .sessions()
        .get(id)
        .await
        .map_err(|e| {
            tracing::error!("Error loading session {}: {}", id, e);
            ApiError::internal("Failed to load session")
        })?
        .ok_or_else(|| ApiError::not_found("Session not found"))
}

/// GET /topics
pub(super) async fn topics() -> Json<TopicsResponse> {
    Json(TopicsResponse {
        topics: stats::topics::catalog(),
    })
}

/// GET /sessions?email=
pub(super) async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<SessionsResponse>, ApiError> {
    let email = require_email(query)?;
    let mut sessions = sessions_for(&state, &email).await?;
    stats::sort_newest_first(&mut sessions);
    Ok(Json(SessionsResponse { sessions }))
}

/// GET /sessions/{id}
pub(super) async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = session_by_id(&state, &id).await?;
    Ok(Json(SessionResponse { session }))
}

/// GET /sessions/{id}/compare
pub(super) async fn compare_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompareResponse>, ApiError> {
    let selected = session_by_id(&state, &id).await?;
    let sessions = sessions_for(&state, &selected.user.email).await?;
    Ok(Json(CompareResponse {
        comparison: Comparison::resolve(&selected.id, sessions),
    }))
}

/// GET /dashboard?email=
pub(super) async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let email = require_email(query)?;
    let sessions = sessions_for(&state, &email).await?;
    Ok(Json(DashboardResponse {
        summary: DashboardSummary::from_sessions(sessions, chrono::Utc::now()),
    }))
}

/// GET /profile?email=
pub(super) async fn profile(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let email = require_email(query)?;
    let sessions = sessions_for(&state, &email).await?;
    Ok(Json(ProfileResponse {
        profile: ProfileSummary::from_sessions(sessions, chrono::Utc::now()),
    }))
}
