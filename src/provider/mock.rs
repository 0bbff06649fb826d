//! Mock provider for testing
//!
//! Returns configurable responses without making real API calls.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::Provider;
use crate::error::{DigestError, Result};

/// Mock provider that returns predefined responses
#[derive(Debug)]
pub struct MockProvider {
    /// Queue of responses to return (FIFO)
    responses: Mutex<Vec<String>>,
    /// Returned when the queue is empty
    default_response: String,
    /// Every prompt received, for assertions
    prompts: Mutex<Vec<String>>,
    /// When set, every call fails with this message
    failure: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            default_response: "Mock response".to_string(),
            prompts: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Create with a queue of responses
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            ..Self::new()
        }
    }

    /// Set the response used once the queue is empty
    pub fn with_default(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Make every call fail with a provider API error
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new()
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        if let Some(reason) = &self.failure {
            return Err(DigestError::ProviderApiError {
                provider: "mock".to_string(),
                status: 400,
                body: reason.clone(),
            });
        }

        let mut queue = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if queue.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(queue.remove(0))
        }
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
