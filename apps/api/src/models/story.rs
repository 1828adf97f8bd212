use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::narrative::style::Style;

/// Number of characters shown in story previews.
const EXCERPT_CHARS: usize = 150;

const UNTITLED_STORY: &str = "Untitled Story";

/// A narrative saved by explicit user action after a successful generation.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedStory {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub biography_id: Uuid,
    pub style: Style,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedStory {
    pub fn excerpt(&self) -> String {
        let preview: String = self.content.chars().take(EXCERPT_CHARS).collect();
        format!("{preview}...")
    }
}

/// A story that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewStory {
    pub owner_id: Uuid,
    pub biography_id: Uuid,
    pub style: Style,
    pub title: String,
    pub content: String,
}

impl NewStory {
    /// Rejects empty bodies and fills in the default title.
    pub fn validated(mut self) -> Result<Self, AppError> {
        if self.content.trim().is_empty() {
            return Err(AppError::Validation(
                "content cannot be empty".to_string(),
            ));
        }
        if self.title.trim().is_empty() {
            self.title = UNTITLED_STORY.to_string();
        }
        Ok(self)
    }

    pub fn into_story(self, id: Uuid, created_at: DateTime<Utc>) -> GeneratedStory {
        GeneratedStory {
            id,
            owner_id: self.owner_id,
            biography_id: self.biography_id,
            style: self.style,
            title: self.title,
            content: self.content,
            created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct StoryRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub biography_id: Uuid,
    pub style: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<StoryRow> for GeneratedStory {
    type Error = AppError;

    fn try_from(row: StoryRow) -> Result<Self, Self::Error> {
        let style = row.style.parse::<Style>().map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Story {} has a corrupt style: {e}", row.id))
        })?;
        Ok(GeneratedStory {
            id: row.id,
            owner_id: row.owner_id,
            biography_id: row.biography_id,
            style,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
        })
    }
}
