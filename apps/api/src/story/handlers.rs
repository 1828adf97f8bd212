use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::biography::handlers::{load_biography, UserIdQuery};
use crate::errors::{AppError, AppJson};
use crate::export::{render, ExportDocument, ExportFormat};
use crate::models::story::{GeneratedStory, NewStory};
use crate::narrative::style::Style;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveStoryRequest {
    pub user_id: Uuid,
    pub biography_id: Uuid,
    pub style: Style,
    #[serde(default)]
    pub title: String,
    pub content: String,
}

/// Dashboard listing entry: the story without its full body.
#[derive(Debug, Serialize)]
pub struct StorySummary {
    pub id: Uuid,
    pub biography_id: Uuid,
    pub style: Style,
    pub title: String,
    pub excerpt: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<GeneratedStory> for StorySummary {
    fn from(story: GeneratedStory) -> Self {
        StorySummary {
            excerpt: story.excerpt(),
            id: story.id,
            biography_id: story.biography_id,
            style: story.style,
            title: story.title,
            created_at: story.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub user_id: Uuid,
    pub format: ExportFormat,
}

async fn load_story(state: &AppState, user_id: Uuid, id: Uuid) -> Result<GeneratedStory, AppError> {
    state
        .store
        .get_story(user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Story {id} not found")))
}

/// POST /api/v1/stories
///
/// Saves a generated narrative. The source biography must belong to the caller.
pub async fn handle_save_story(
    State(state): State<AppState>,
    AppJson(req): AppJson<SaveStoryRequest>,
) -> Result<(StatusCode, Json<GeneratedStory>), AppError> {
    load_biography(&state, req.user_id, req.biography_id).await?;

    let story = NewStory {
        owner_id: req.user_id,
        biography_id: req.biography_id,
        style: req.style,
        title: req.title,
        content: req.content,
    }
    .validated()?;

    let saved = state.store.create_story(story).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/stories
pub async fn handle_list_stories(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<StorySummary>>, AppError> {
    let stories = state.store.list_stories(params.user_id).await?;
    Ok(Json(stories.into_iter().map(StorySummary::from).collect()))
}

/// GET /api/v1/stories/:id
pub async fn handle_get_story(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<GeneratedStory>, AppError> {
    Ok(Json(load_story(&state, params.user_id, id).await?))
}

/// GET /api/v1/stories/:id/export
pub async fn handle_export_story(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ExportQuery>,
) -> Result<ExportDocument, AppError> {
    let story = load_story(&state, params.user_id, id).await?;
    Ok(render(&story.title, &story.content, params.format))
}
