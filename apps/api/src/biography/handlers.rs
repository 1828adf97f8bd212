use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::biography::progress::{compute_progress_report, ProgressReport};
use crate::biography::timeline::{build_timeline, TimelineEvent};
use crate::errors::{AppError, AppJson};
use crate::models::biography::{BiographyRecord, Section};
use crate::state::AppState;
use crate::store::biography_not_found;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub user_id: Uuid,
    pub section: String,
    pub field: String,
    pub value: String,
}

/// Loads a record owned by `user_id` or fails with 404.
pub async fn load_biography(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
) -> Result<BiographyRecord, AppError> {
    state
        .store
        .get_biography(user_id, id)
        .await?
        .ok_or_else(|| biography_not_found(id))
}

/// GET /api/v1/biographies
pub async fn handle_list_biographies(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<BiographyRecord>>, AppError> {
    Ok(Json(state.store.list_biographies(params.user_id).await?))
}

/// POST /api/v1/biographies
///
/// Full-document upsert: creates the record when `id` is absent, otherwise
/// replaces it wholesale.
pub async fn handle_save_biography(
    State(state): State<AppState>,
    AppJson(record): AppJson<BiographyRecord>,
) -> Result<Json<BiographyRecord>, AppError> {
    if record.owner_id.is_nil() {
        return Err(AppError::Validation("owner_id is required".to_string()));
    }
    Ok(Json(state.store.upsert_biography(record).await?))
}

/// GET /api/v1/biographies/:id
pub async fn handle_get_biography(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<BiographyRecord>, AppError> {
    Ok(Json(load_biography(&state, params.user_id, id).await?))
}

/// PATCH /api/v1/biographies/:id/fields
///
/// Replaces one field within one section, then saves the whole document.
/// The save is conditional on the version just loaded, so a concurrent edit
/// to the same record surfaces as 409 rather than being overwritten.
pub async fn handle_update_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<FieldUpdate>,
) -> Result<Json<BiographyRecord>, AppError> {
    let section = req.section.parse::<Section>()?;
    let record = load_biography(&state, req.user_id, id)
        .await?
        .with_field(section, &req.field, req.value)?;
    Ok(Json(state.store.upsert_biography(record).await?))
}

/// GET /api/v1/biographies/:id/progress
pub async fn handle_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProgressReport>, AppError> {
    let record = load_biography(&state, params.user_id, id).await?;
    Ok(Json(compute_progress_report(&record)))
}

/// GET /api/v1/biographies/:id/timeline
pub async fn handle_timeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<TimelineEvent>>, AppError> {
    let record = load_biography(&state, params.user_id, id).await?;
    Ok(Json(build_timeline(&record)))
}
