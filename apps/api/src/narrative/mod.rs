// Narrative generation: style clauses, prompt compilation, and the
// single-attempt orchestrator that hands the prompt to llm_client.

use thiserror::Error;

use crate::llm_client::GenerationError;

pub mod compiler;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod style;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Invalid style '{0}': expected one of emotional, professional, simple, poetic")]
    InvalidStyle(String),
}

impl From<PromptError> for GenerationError {
    fn from(err: PromptError) -> Self {
        GenerationError::InvalidRequest(err.to_string())
    }
}
