//! LLM provider abstraction
//!
//! The digest only needs single-prompt completions, so the trait is small:
//!
//! | Provider | Backend |
//! |----------|---------|
//! | [`OpenAiCompatProvider`] | Any OpenAI-compatible `/chat/completions` endpoint (DeepSeek by default) |
//! | [`MockProvider`] | In-memory responses for tests and `--dry-run` |
//!
//! Prompt templates live in [`prompts`].

pub mod mock;
pub mod openai;
pub mod prompts;

pub use mock::MockProvider;
pub use openai::OpenAiCompatProvider;
pub use prompts::{render_prompt, CONTRIBUTION_PROMPT, TRANSLATION_PROMPT};

use async_trait::async_trait;

use crate::error::Result;

/// LLM provider for single-turn completions
///
/// # Example
/// ```rust,ignore
/// let provider = OpenAiCompatProvider::from_config(&config.llm)?;
/// let text = provider.complete("Translate: ...").await?;
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send one user prompt and return the trimmed reply
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Provider name (e.g., "openai", "mock")
    fn name(&self) -> &str;

    /// Model identifier sent with each request
    fn model(&self) -> &str;
}
