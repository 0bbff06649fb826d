//! Resilience patterns for remote calls
//!
//! - [`retry`]: Retry with exponential backoff, used for arXiv and LLM requests

pub mod retry;

pub use retry::{RetryConfig, RetryPolicy};
