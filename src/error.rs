// The #[error] attribute from thiserror uses struct fields via string interpolation,
// but Rust's unused_assignments lint doesn't recognize this.
#![allow(unused_assignments)]

//! Digest Error Types with Error Codes
//!
//! Error code ranges:
//! - DIGEST-000-009: Configuration errors
//! - DIGEST-010-019: arXiv search / feed errors
//! - DIGEST-020-029: LLM provider errors
//! - DIGEST-030-039: Mail errors
//! - DIGEST-040-049: Schedule errors
//! - DIGEST-090-099: IO / serialization / resilience errors

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DigestError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
///
/// Implements both `thiserror::Error` for std error compatibility
/// and `miette::Diagnostic` for the error code; fix hints come from
/// [`FixSuggestion`].
#[derive(Error, Debug, Diagnostic)]
pub enum DigestError {
    // ═══════════════════════════════════════════
    // CONFIG ERRORS (000-009)
    // ═══════════════════════════════════════════
    #[error("[DIGEST-001] Config error: {reason}")]
    #[diagnostic(code(digest::config_error))]
    ConfigError { reason: String },

    #[error("[DIGEST-002] Missing setting '{name}' (set {env})")]
    #[diagnostic(code(digest::missing_setting))]
    MissingSetting { name: String, env: String },

    #[error("[DIGEST-003] Invalid value '{value}' for '{name}': {reason}")]
    #[diagnostic(code(digest::invalid_setting))]
    InvalidSetting {
        name: String,
        value: String,
        reason: String,
    },

    // ═══════════════════════════════════════════
    // ARXIV ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[DIGEST-010] arXiv request for '{term}' failed: {reason}")]
    #[diagnostic(code(digest::arxiv_request))]
    ArxivRequest { term: String, reason: String },

    #[error("[DIGEST-011] arXiv returned HTTP {status} for '{term}'")]
    #[diagnostic(code(digest::arxiv_status))]
    ArxivStatus { term: String, status: u16 },

    #[error("[DIGEST-012] Failed to parse arXiv feed: {reason}")]
    #[diagnostic(code(digest::feed_parse))]
    FeedParse { reason: String },

    #[error("[DIGEST-013] All {terms} arXiv searches failed")]
    #[diagnostic(code(digest::all_searches_failed))]
    AllSearchesFailed { terms: usize },

    // ═══════════════════════════════════════════
    // PROVIDER ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error("[DIGEST-020] Provider '{provider}' request failed: {reason}")]
    #[diagnostic(code(digest::provider_request))]
    ProviderRequest { provider: String, reason: String },

    #[error("[DIGEST-021] Provider '{provider}' API error {status}: {body}")]
    #[diagnostic(code(digest::provider_api))]
    ProviderApiError {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("[DIGEST-022] Provider '{provider}' returned an invalid response: {reason}")]
    #[diagnostic(code(digest::provider_response))]
    ProviderResponse { provider: String, reason: String },

    // ═══════════════════════════════════════════
    // MAIL ERRORS (030-039)
    // ═══════════════════════════════════════════
    #[error("[DIGEST-030] Invalid email address '{address}': {reason}")]
    #[diagnostic(code(digest::invalid_address))]
    InvalidAddress { address: String, reason: String },

    #[error("[DIGEST-031] Failed to build email: {reason}")]
    #[diagnostic(code(digest::mail_build))]
    MailBuild { reason: String },

    #[error("[DIGEST-032] Failed to send email via '{server}': {reason}")]
    #[diagnostic(code(digest::mail_send))]
    MailSend { server: String, reason: String },

    // ═══════════════════════════════════════════
    // SCHEDULE ERRORS (040-049)
    // ═══════════════════════════════════════════
    #[error("[DIGEST-040] Invalid cron expression '{expr}': {reason}")]
    #[diagnostic(code(digest::invalid_cron))]
    InvalidCron { expr: String, reason: String },

    #[error("[DIGEST-041] Cron expression '{expr}' has no upcoming run")]
    #[diagnostic(code(digest::no_upcoming_run))]
    NoUpcomingRun { expr: String },

    // ═══════════════════════════════════════════
    // IO / RESILIENCE ERRORS (090-099)
    // ═══════════════════════════════════════════
    #[error("[DIGEST-090] IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("[DIGEST-091] JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("[DIGEST-092] Operation '{operation}' timed out after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    #[error("[DIGEST-093] Gave up after {attempts} attempts: {last_error}")]
    RetryExhausted { attempts: u32, last_error: String },
}

/// 429 and 5xx are worth another attempt; other statuses are not.
fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

impl DigestError {
    /// Get the error code (e.g., "DIGEST-001")
    pub fn code(&self) -> &'static str {
        match self {
            // Config errors
            Self::ConfigError { .. } => "DIGEST-001",
            Self::MissingSetting { .. } => "DIGEST-002",
            Self::InvalidSetting { .. } => "DIGEST-003",
            // arXiv errors
            Self::ArxivRequest { .. } => "DIGEST-010",
            Self::ArxivStatus { .. } => "DIGEST-011",
            Self::FeedParse { .. } => "DIGEST-012",
            Self::AllSearchesFailed { .. } => "DIGEST-013",
            // Provider errors
            Self::ProviderRequest { .. } => "DIGEST-020",
            Self::ProviderApiError { .. } => "DIGEST-021",
            Self::ProviderResponse { .. } => "DIGEST-022",
            // Mail errors
            Self::InvalidAddress { .. } => "DIGEST-030",
            Self::MailBuild { .. } => "DIGEST-031",
            Self::MailSend { .. } => "DIGEST-032",
            // Schedule errors
            Self::InvalidCron { .. } => "DIGEST-040",
            Self::NoUpcomingRun { .. } => "DIGEST-041",
            // IO / resilience errors
            Self::IoError(_) => "DIGEST-090",
            Self::JsonError(_) => "DIGEST-091",
            Self::Timeout { .. } => "DIGEST-092",
            Self::RetryExhausted { .. } => "DIGEST-093",
        }
    }

    /// Check if error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ArxivRequest { .. } | Self::ProviderRequest { .. } | Self::Timeout { .. } => {
                true
            }
            Self::ArxivStatus { status, .. } | Self::ProviderApiError { status, .. } => {
                is_transient_status(*status)
            }
            _ => false,
        }
    }
}

impl FixSuggestion for DigestError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            DigestError::ConfigError { .. } => {
                Some("Check ~/.config/arxiv-digest/config.toml for syntax errors")
            }
            DigestError::MissingSetting { .. } => {
                Some("Export the variable or add it to .env / config.toml")
            }
            DigestError::InvalidSetting { .. } => Some("Fix the value and run again"),
            DigestError::ArxivRequest { .. } => Some("Check network access to export.arxiv.org"),
            DigestError::ArxivStatus { .. } => {
                Some("arXiv may be rate limiting; wait a few seconds and retry")
            }
            DigestError::FeedParse { .. } => Some("Check ARXIV_API_URL points at the Atom API"),
            DigestError::AllSearchesFailed { .. } => {
                Some("Check the run log for per-term errors")
            }
            DigestError::ProviderRequest { .. } => Some("Check OPENAI_API_BASE is reachable"),
            DigestError::ProviderApiError { .. } => {
                Some("Check OPENAI_API_KEY, OPENAI_MODEL and OPENAI_API_BASE")
            }
            DigestError::ProviderResponse { .. } => {
                Some("Check the endpoint speaks the OpenAI chat completions API")
            }
            DigestError::InvalidAddress { .. } => {
                Some("Use plain addresses like name@example.com, comma-separated")
            }
            DigestError::MailBuild { .. } => Some("Check sender and receiver addresses"),
            DigestError::MailSend { .. } => {
                Some("Check SMTP_SERVER, SMTP_PORT, SENDER_EMAIL and SENDER_PASSWORD")
            }
            DigestError::InvalidCron { .. } => {
                Some("Use a 5-field cron expression, e.g. '10 23 * * *'")
            }
            DigestError::NoUpcomingRun { .. } => Some("Use a cron expression that repeats"),
            DigestError::IoError(_) => Some("Check file path and permissions"),
            DigestError::JsonError(_) => None,
            DigestError::Timeout { .. } => Some("Retry later or check network latency"),
            DigestError::RetryExhausted { .. } => Some("Retry later; the remote kept failing"),
        }
    }
}
