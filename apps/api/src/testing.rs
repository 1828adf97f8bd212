//! Test doubles shared by unit tests across modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{GenerationError, NarrativeGenerator};

/// A generator that returns a canned reply and counts how often it was called.
pub struct StubGenerator {
    reply: Result<String, GenerationError>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    pub fn failing(err: GenerationError) -> Self {
        Self::with_reply(Err(err))
    }

    fn with_reply(reply: Result<String, GenerationError>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl NarrativeGenerator for StubGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.reply.clone()
    }
}
