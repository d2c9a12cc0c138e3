//! Axum route handlers for the Sessions API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feed::FeedQuery;
use crate::models::JobType;
use crate::pipeline::criteria::FilterCriteria;
use crate::sessions::{ListingView, SessionView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    /// Replaces the session's feed query when present.
    #[serde(default)]
    pub query: Option<FeedQuery>,
}

#[derive(Debug, Serialize)]
pub struct SavedToggleResponse {
    pub job_id: String,
    pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct TypeToggleResponse {
    pub job_type: JobType,
    pub selected: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Opens a session and kicks off the feed fetch. The returned view is `loading`;
/// poll the session until it turns `ready`, `empty` or `error`.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(query): Json<FeedQuery>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    query.validate().map_err(AppError::Validation)?;
    let view = state.sessions.create(query).await;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.view(id).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/refresh
///
/// Re-fetches the feed. The only way out of the `error` state.
pub async fn handle_refresh(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<SessionView>, AppError> {
    if let Some(query) = &request.query {
        query.validate().map_err(AppError::Validation)?;
    }
    Ok(Json(state.sessions.refresh(id, request.query).await?))
}

/// GET /api/v1/sessions/:id/criteria
pub async fn handle_get_criteria(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FilterCriteria>, AppError> {
    Ok(Json(state.sessions.criteria(id).await?))
}

/// PUT /api/v1/sessions/:id/criteria
///
/// Replaces the criteria and returns the re-derived list.
pub async fn handle_put_criteria(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(criteria): Json<FilterCriteria>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.replace_criteria(id, criteria).await?))
}

/// POST /api/v1/sessions/:id/saved/:job_id
///
/// Toggles a bookmark.
pub async fn handle_toggle_saved(
    State(state): State<AppState>,
    Path((id, job_id)): Path<(Uuid, String)>,
) -> Result<Json<SavedToggleResponse>, AppError> {
    let saved = state.sessions.toggle_saved(id, &job_id).await?;
    Ok(Json(SavedToggleResponse { job_id, saved }))
}

/// POST /api/v1/sessions/:id/types/:job_type
///
/// Toggles one employment type in the type filter, e.g. `/types/Part-time`.
pub async fn handle_toggle_type(
    State(state): State<AppState>,
    Path((id, job_type)): Path<(Uuid, JobType)>,
) -> Result<Json<TypeToggleResponse>, AppError> {
    let selected = state.sessions.toggle_type(id, job_type).await?;
    Ok(Json(TypeToggleResponse { job_type, selected }))
}

/// GET /api/v1/sessions/:id/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path((id, job_id)): Path<(Uuid, String)>,
) -> Result<Json<ListingView>, AppError> {
    Ok(Json(state.sessions.listing(id, &job_id).await?))
}
