use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::biography::BiographyRecord;
use crate::models::story::{GeneratedStory, NewStory};
use crate::store::{biography_conflict, biography_not_found, RecordStore};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryRecordStore {
    biographies: RwLock<HashMap<Uuid, BiographyRecord>>,
    stories: RwLock<HashMap<Uuid, GeneratedStory>>,
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_biography(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<BiographyRecord>, AppError> {
        Ok(self
            .biographies
            .read()
            .await
            .get(&id)
            .filter(|r| r.owner_id == owner_id)
            .cloned())
    }

    async fn upsert_biography(
        &self,
        mut record: BiographyRecord,
    ) -> Result<BiographyRecord, AppError> {
        let id = record.id.unwrap_or_else(Uuid::new_v4);
        let now = Utc::now();
        let mut biographies = self.biographies.write().await;

        let created_at = match biographies.get(&id) {
            Some(existing) if existing.owner_id != record.owner_id => {
                return Err(biography_not_found(id));
            }
            Some(existing)
                if record.updated_at.is_some() && record.updated_at != existing.updated_at =>
            {
                return Err(biography_conflict(id));
            }
            Some(existing) => existing.created_at.unwrap_or(now),
            None => now,
        };

        record.id = Some(id);
        record.created_at = Some(created_at);
        record.updated_at = Some(now);
        biographies.insert(id, record.clone());
        Ok(record)
    }

    async fn list_biographies(&self, owner_id: Uuid) -> Result<Vec<BiographyRecord>, AppError> {
        let mut records: Vec<_> = self
            .biographies
            .read()
            .await
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    async fn create_story(&self, story: NewStory) -> Result<GeneratedStory, AppError> {
        let story = story.into_story(Uuid::new_v4(), Utc::now());
        self.stories.write().await.insert(story.id, story.clone());
        Ok(story)
    }

    async fn get_story(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<GeneratedStory>, AppError> {
        Ok(self
            .stories
            .read()
            .await
            .get(&id)
            .filter(|s| s.owner_id == owner_id)
            .cloned())
    }

    async fn list_stories(&self, owner_id: Uuid) -> Result<Vec<GeneratedStory>, AppError> {
        let mut stories: Vec<_> = self
            .stories
            .read()
            .await
            .values()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stories)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
