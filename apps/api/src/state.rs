use std::sync::Arc;

use crate::llm_client::NarrativeGenerator;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable record store. Postgres when DATABASE_URL is set, otherwise in-memory.
    pub store: Arc<dyn RecordStore>,
    /// Narrative generator. In production an `LlmClient`, possibly disabled.
    pub narrator: Arc<dyn NarrativeGenerator>,
}
