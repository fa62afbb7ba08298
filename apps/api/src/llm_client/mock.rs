//! In-memory `ModelClient` for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmError, ModelClient};

/// Returns a canned reply and records every prompt it receives.
pub struct MockModelClient {
    reply: Mutex<Option<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
    systems: Mutex<Vec<String>>,
}

impl MockModelClient {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with(Ok(reply.into()))
    }

    pub fn failing(error: LlmError) -> Self {
        Self::with(Err(error))
    }

    fn with(reply: Result<String, LlmError>) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            prompts: Mutex::new(Vec::new()),
            systems: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn systems(&self) -> Vec<String> {
        self.systems.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.systems.lock().unwrap().push(system.to_string());
        // Successful replies repeat; an error is returned once, then the mock reports empty content.
        let mut slot = self.reply.lock().unwrap();
        match slot.take() {
            Some(Ok(text)) => {
                *slot = Some(Ok(text.clone()));
                Ok(text)
            }
            Some(Err(e)) => Err(e),
            None => Err(LlmError::EmptyContent),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
