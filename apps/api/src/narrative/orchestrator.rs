//! Narrative generation: the single entry point per user generation request.
//!
//! Compiles the prompt from a validated record and style, then makes one generator call.
//!
//! Fail-fast: the first typed error is returned as-is. There is no retry and no
//! placeholder narrative, and nothing is persisted here. Saving the result as a
//! story is a separate, explicit step taken by the caller.

use tracing::{info, warn};

use crate::llm_client::{GenerationError, NarrativeGenerator};
use crate::models::biography::BiographyRecord;
use crate::narrative::compiler::compile_prompt_str;

/// Validates the raw request inputs, then generates.
///
/// A missing record, a missing style, or a style outside the fixed set is
/// `InvalidRequest`, and the generator is never called.
pub async fn generate(
    generator: &dyn NarrativeGenerator,
    record: Option<&BiographyRecord>,
    style: Option<&str>,
) -> Result<String, GenerationError> {
    let record = record.ok_or_else(|| {
        GenerationError::InvalidRequest("a biography record is required".to_string())
    })?;
    let style = style
        .ok_or_else(|| GenerationError::InvalidRequest("a writing style is required".to_string()))?;
    let prompt = compile_prompt_str(record, style)?;

    request_narrative(generator, record, &prompt).await
}

/// The single generator call. Errors are logged and returned unchanged.
async fn request_narrative(
    generator: &dyn NarrativeGenerator,
    record: &BiographyRecord,
    prompt: &str,
) -> Result<String, GenerationError> {
    info!(
        "Requesting narrative for biography {:?} ({} prompt chars)",
        record.id,
        prompt.len()
    );

    match generator.complete(prompt).await {
        Ok(text) => {
            info!("Narrative generated: {} chars", text.len());
            Ok(text)
        }
        Err(err) => {
            warn!("Narrative generation failed: {err}");
            Err(err)
        }
    }
}
