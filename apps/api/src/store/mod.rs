//! Record store: persistence for biography records and generated stories.
//!
//! Pluggable, trait-based. `AppState` holds an `Arc<dyn RecordStore>`, chosen
//! at startup: `PgRecordStore` when `DATABASE_URL` is set, otherwise
//! `MemoryRecordStore`.
//!
//! Every lookup is scoped by owner. A record or story that exists under a
//! different owner is indistinguishable from one that does not exist.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::biography::BiographyRecord;
use crate::models::story::{GeneratedStory, NewStory};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_biography(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<BiographyRecord>, AppError>;

    /// Full-document upsert. Assigns `id` and `created_at` on first persist and
    /// always refreshes `updated_at`. Returns the stored record.
    ///
    /// When the incoming record carries `updated_at`, it must match the stored
    /// value or the write fails with `Conflict`.
    async fn upsert_biography(&self, record: BiographyRecord) -> Result<BiographyRecord, AppError>;

    /// Most recently updated first.
    async fn list_biographies(&self, owner_id: Uuid) -> Result<Vec<BiographyRecord>, AppError>;

    async fn create_story(&self, story: NewStory) -> Result<GeneratedStory, AppError>;

    async fn get_story(&self, owner_id: Uuid, id: Uuid)
        -> Result<Option<GeneratedStory>, AppError>;

    /// Most recently created first.
    async fn list_stories(&self, owner_id: Uuid) -> Result<Vec<GeneratedStory>, AppError>;

    /// Backend name, reported by the health endpoint.
    fn backend(&self) -> &'static str;
}

pub(crate) fn biography_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Biography {id} not found"))
}

pub(crate) fn biography_conflict(id: Uuid) -> AppError {
    AppError::Conflict(format!(
        "Biography {id} was modified since it was read; reload and retry"
    ))
}
