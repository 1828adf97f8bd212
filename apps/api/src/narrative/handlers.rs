//! Axum route handlers for narrative generation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::biography::handlers::load_biography;
use crate::errors::{AppError, AppJson};
use crate::models::biography::BiographyRecord;
use crate::narrative::orchestrator::generate;
use crate::narrative::style::Style;
use crate::state::AppState;

/// Either an inline `record`, or a stored one named by `biography_id` + `user_id`.
/// An inline record wins when both are given.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub record: Option<BiographyRecord>,
    pub biography_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub content: String,
    pub suggested_title: String,
    pub style: String,
}

#[derive(Debug, Serialize)]
pub struct StyleOption {
    pub style: Style,
    pub description: &'static str,
}

/// POST /api/v1/generate
///
/// One generation attempt. The result is returned, not saved; saving is
/// POST /api/v1/stories.
pub async fn handle_generate(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let record = match (request.record, request.biography_id, request.user_id) {
        (Some(record), _, _) => Some(record),
        (None, Some(id), Some(user_id)) => Some(load_biography(&state, user_id, id).await?),
        (None, Some(_), None) => {
            return Err(AppError::Validation(
                "user_id is required with biography_id".to_string(),
            ))
        }
        (None, None, _) => None,
    };

    let content = generate(
        state.narrator.as_ref(),
        record.as_ref(),
        request.style.as_deref(),
    )
    .await?;

    Ok(Json(GenerateResponse {
        content,
        suggested_title: record
            .as_ref()
            .map(BiographyRecord::default_story_title)
            .unwrap_or_default(),
        style: request.style.unwrap_or_default(),
    }))
}

/// GET /api/v1/styles
pub async fn handle_list_styles() -> Json<Vec<StyleOption>> {
    Json(
        Style::ALL
            .into_iter()
            .map(|style| StyleOption {
                style,
                description: style.tagline(),
            })
            .collect(),
    )
}
