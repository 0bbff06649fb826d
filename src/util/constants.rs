//! Centralized constants for digest runtime configuration
//!
//! All timeout, endpoint and default values in one place for easy tuning.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════
// Timeouts
// ═══════════════════════════════════════════════════════════════

/// Timeout for arXiv API queries
pub const ARXIV_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for LLM completion calls (translation and contribution)
pub const INFER_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for establishing HTTP connections
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a single SMTP command
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(60);

// ═══════════════════════════════════════════════════════════════
// HTTP Client
// ═══════════════════════════════════════════════════════════════

/// Maximum number of HTTP redirects to follow
pub const REDIRECT_LIMIT: usize = 5;

/// User agent sent to arXiv and the LLM endpoint
pub const USER_AGENT: &str = concat!("arxiv-digest/", env!("CARGO_PKG_VERSION"));

// ═══════════════════════════════════════════════════════════════
// Defaults
// ═══════════════════════════════════════════════════════════════

/// arXiv Atom query endpoint
pub const DEFAULT_ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// Category filter appended to every query
pub const DEFAULT_CATEGORY: &str = "cs.*";

/// Results requested per search term
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Search terms used when SEARCH_TERMS is unset
pub const DEFAULT_SEARCH_TERMS: &str = "\"transformer\",\"large language model\"";

pub const DEFAULT_SENDER_NAME: &str = "ArXiv论文助手";
pub const DEFAULT_SMTP_SERVER: &str = "smtp.qq.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;

pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";

/// Sampling temperature for completions
pub const COMPLETION_TEMPERATURE: f64 = 1.3;

/// Token cap for completions
pub const COMPLETION_MAX_TOKENS: u32 = 8192;

/// Daily trigger, 23:10 UTC (5-field cron)
pub const DEFAULT_CRON: &str = "10 23 * * *";

/// Artifact name for preserved run logs
pub const ARTIFACT_NAME: &str = "execution-logs";

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════
