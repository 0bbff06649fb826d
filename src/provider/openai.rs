//! OpenAI-compatible chat completions provider
//!
//! Works against any endpoint exposing `POST {api_base}/chat/completions`
//! (DeepSeek, OpenAI, local gateways).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::Provider;
use crate::config::LlmConfig;
use crate::error::{DigestError, Result};
use crate::resilience::RetryPolicy;
use crate::util::constants::{COMPLETION_MAX_TOKENS, COMPLETION_TEMPERATURE};
use crate::util::{CONNECT_TIMEOUT, INFER_TIMEOUT, USER_AGENT};

const PROVIDER_NAME: &str = "openai";

pub struct OpenAiCompatProvider {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
    retry: RetryPolicy,
}

impl OpenAiCompatProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_base: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(INFER_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DigestError::ConfigError {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            client,
            retry: RetryPolicy::with_defaults(),
        })
    }

    /// Build from the `[llm]` config section; the API key is required
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| DigestError::MissingSetting {
                name: "llm.api_key".to_string(),
                env: "OPENAI_API_KEY".to_string(),
            })?;
        Self::new(api_key, config.model.clone(), &config.api_base)
    }

    /// Replace the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    { "role": "user", "content": prompt }
                ],
                "temperature": COMPLETION_TEMPERATURE,
                "max_tokens": COMPLETION_MAX_TOKENS,
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DigestError::Timeout {
                        operation: format!("{} completion", PROVIDER_NAME),
                        duration_ms: INFER_TIMEOUT.as_millis() as u64,
                    }
                } else {
                    DigestError::ProviderRequest {
                        provider: PROVIDER_NAME.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DigestError::ProviderApiError {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| DigestError::ProviderResponse {
                provider: PROVIDER_NAME.to_string(),
                reason: e.to_string(),
            })?;

        extract_content(&json)
    }
}

/// Pull `choices[0].message.content` out of a completion response
fn extract_content(json: &Value) -> Result<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| DigestError::ProviderResponse {
            provider: PROVIDER_NAME.to_string(),
            reason: "missing choices[0].message.content".to_string(),
        })
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Requesting completion");
        self.retry.execute(|| self.request(prompt)).await
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}
