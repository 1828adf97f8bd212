use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::biography::{BiographyRecord, BiographyRow};
use crate::models::story::{GeneratedStory, NewStory, StoryRow};
use crate::store::{biography_conflict, biography_not_found, RecordStore};

/// PostgreSQL-backed store. Each biography is one JSONB document.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_biography(row: BiographyRow) -> Result<BiographyRecord, AppError> {
    let id = row.id;
    BiographyRecord::try_from(row)
        .with_context(|| format!("Biography {id} has an unreadable document"))
        .map_err(AppError::Internal)
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn get_biography(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<BiographyRecord>, AppError> {
        let row = sqlx::query_as::<_, BiographyRow>(
            "SELECT id, owner_id, data, created_at, updated_at \
             FROM biographies WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_biography).transpose()
    }

    async fn upsert_biography(&self, record: BiographyRecord) -> Result<BiographyRecord, AppError> {
        let id = record.id.unwrap_or_else(Uuid::new_v4);
        let data = serde_json::to_value(&record)
            .context("Failed to serialize biography")
            .map_err(AppError::Internal)?;

        // The conditional DO UPDATE leaves the row untouched when it belongs to
        // someone else or has moved past the caller's `updated_at`; nothing is
        // returned in either case.
        let row = sqlx::query_as::<_, BiographyRow>(
            r#"
            INSERT INTO biographies (id, owner_id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (id) DO UPDATE
                SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
                WHERE biographies.owner_id = EXCLUDED.owner_id
                  AND ($5::timestamptz IS NULL OR biographies.updated_at = $5)
            RETURNING id, owner_id, data, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(record.owner_id)
        .bind(&data)
        .bind(Utc::now())
        .bind(record.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            let owned: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM biographies WHERE id = $1 AND owner_id = $2")
                    .bind(id)
                    .bind(record.owner_id)
                    .fetch_optional(&self.pool)
                    .await?;
            return Err(match owned {
                Some(_) => biography_conflict(id),
                None => biography_not_found(id),
            });
        };

        info!("Saved biography {id} for user {}", record.owner_id);
        decode_biography(row)
    }

    async fn list_biographies(&self, owner_id: Uuid) -> Result<Vec<BiographyRecord>, AppError> {
        sqlx::query_as::<_, BiographyRow>(
            "SELECT id, owner_id, data, created_at, updated_at \
             FROM biographies WHERE owner_id = $1 ORDER BY updated_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(decode_biography)
        .collect()
    }

    async fn create_story(&self, story: NewStory) -> Result<GeneratedStory, AppError> {
        let row = sqlx::query_as::<_, StoryRow>(
            r#"
            INSERT INTO stories (id, owner_id, biography_id, style, title, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_id, biography_id, style, title, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(story.owner_id)
        .bind(story.biography_id)
        .bind(story.style.as_str())
        .bind(&story.title)
        .bind(&story.content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Saved story {} for user {}", row.id, row.owner_id);
        GeneratedStory::try_from(row)
    }

    async fn get_story(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<GeneratedStory>, AppError> {
        sqlx::query_as::<_, StoryRow>(
            "SELECT id, owner_id, biography_id, style, title, content, created_at \
             FROM stories WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .map(GeneratedStory::try_from)
        .transpose()
    }

    async fn list_stories(&self, owner_id: Uuid) -> Result<Vec<GeneratedStory>, AppError> {
        sqlx::query_as::<_, StoryRow>(
            "SELECT id, owner_id, biography_id, style, title, content, created_at \
             FROM stories WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(GeneratedStory::try_from)
        .collect()
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
