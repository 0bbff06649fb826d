//! Digest Configuration Module
//!
//! Manages mail, LLM, search and schedule settings.
//! Config is stored in `~/.config/arxiv-digest/config.toml`.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variables (`SENDER_EMAIL`, `OPENAI_API_KEY`, `SEARCH_TERMS`, ...)
//! 2. Config file (`~/.config/arxiv-digest/config.toml` or `--config`)
//! 3. Defaults
//!
//! Empty environment values never override a configured value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DigestError, Result};
use crate::util::constants::{
    DEFAULT_API_BASE, DEFAULT_ARXIV_API_URL, DEFAULT_CATEGORY, DEFAULT_CRON, DEFAULT_MAX_RESULTS,
    DEFAULT_MODEL, DEFAULT_SEARCH_TERMS, DEFAULT_SENDER_NAME, DEFAULT_SMTP_PORT,
    DEFAULT_SMTP_SERVER,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DigestConfig {
    /// Outgoing mail identity and relay
    #[serde(default)]
    pub mail: MailConfig,

    /// OpenAI-compatible LLM backend
    #[serde(default)]
    pub llm: LlmConfig,

    /// arXiv query settings
    #[serde(default)]
    pub search: SearchConfig,

    /// In-process schedule (`arxiv-digest schedule`)
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// TLS from the first byte (SMTPS, usually port 465)
    #[default]
    Implicit,
    /// Plain connection upgraded with STARTTLS (usually port 587)
    Starttls,
}

impl std::str::FromStr for SmtpSecurity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("implicit") || s.eq_ignore_ascii_case("ssl") {
            Ok(Self::Implicit)
        } else if s.eq_ignore_ascii_case("starttls") {
            Ok(Self::Starttls)
        } else {
            Err("expected 'implicit' or 'starttls'".to_string())
        }
    }
}

/// Mail configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MailConfig {
    /// Sender address, also the SMTP login
    pub sender_email: Option<String>,
    /// Display name in the From header
    pub sender_name: String,
    /// SMTP password or app-specific password
    pub sender_password: Option<String>,
    /// Recipient addresses
    pub receivers: Vec<String>,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub security: SmtpSecurity,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender_email: None,
            sender_name: DEFAULT_SENDER_NAME.to_string(),
            sender_password: None,
            receivers: Vec::new(),
            smtp_server: DEFAULT_SMTP_SERVER.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            security: SmtpSecurity::default(),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL, `/chat/completions` is appended
    pub api_base: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Query terms, searched in order
    pub terms: Vec<String>,
    /// Results requested per term
    pub max_results: u32,
    /// arXiv category filter (e.g. `cs.*`)
    pub category: String,
    /// arXiv query endpoint
    pub api_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            terms: parse_search_terms(DEFAULT_SEARCH_TERMS),
            max_results: DEFAULT_MAX_RESULTS,
            category: DEFAULT_CATEGORY.to_string(),
            api_url: DEFAULT_ARXIV_API_URL.to_string(),
        }
    }
}

/// Schedule configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// 5-field cron expression, evaluated in UTC
    pub cron: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: DEFAULT_CRON.to_string(),
        }
    }
}

impl DigestConfig {
    /// Get the config directory path
    ///
    /// Returns `~/.config/arxiv-digest/` on Unix, `%APPDATA%/arxiv-digest/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("arxiv-digest")
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from `path`, or from the default path when `None`
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error if the file exists but is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| DigestError::ConfigError {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DigestError::ConfigError {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Merge with process environment variables
    pub fn with_env(self) -> Result<Self> {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Merge with variables from `lookup`
    ///
    /// Non-empty values take precedence over config file values.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // Mail
        if let Some(v) = get("SENDER_EMAIL") {
            self.mail.sender_email = Some(v.trim().to_string());
        }
        if let Some(v) = get("SENDER_NAME") {
            self.mail.sender_name = v;
        }
        if let Some(v) = get("SENDER_PASSWORD") {
            self.mail.sender_password = Some(v);
        }
        if let Some(v) = get("RECEIVER_EMAILS") {
            self.mail.receivers = parse_receivers(&v);
        }
        if let Some(v) = get("SMTP_SERVER") {
            self.mail.smtp_server = v.trim().to_string();
        }
        if let Some(v) = get("SMTP_PORT") {
            self.mail.smtp_port = parse_number("SMTP_PORT", &v)?;
        }
        if let Some(v) = get("SMTP_SECURITY") {
            self.mail.security = v.trim().parse().map_err(|reason| DigestError::InvalidSetting {
                name: "SMTP_SECURITY".to_string(),
                value: v.clone(),
                reason,
            })?;
        }

        // LLM
        if let Some(v) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(v.trim().to_string());
        }
        if let Some(v) = get("OPENAI_MODEL") {
            self.llm.model = v.trim().to_string();
        }
        if let Some(v) = get("OPENAI_API_BASE") {
            self.llm.api_base = v.trim().to_string();
        }

        // Search
        if let Some(v) = get("SEARCH_TERMS") {
            self.search.terms = parse_search_terms(&v);
        }
        if let Some(v) = get("MAX_RESULTS") {
            self.search.max_results = parse_number("MAX_RESULTS", &v)?;
        }
        if let Some(v) = get("ARXIV_CATEGORY") {
            self.search.category = v.trim().to_string();
        }
        if let Some(v) = get("ARXIV_API_URL") {
            self.search.api_url = v.trim().to_string();
        }

        Ok(self)
    }

    /// Check everything a full `run` needs, before any network call
    pub fn validate(&self) -> Result<()> {
        self.validate_for_search()?;

        require(&self.mail.sender_email, "mail.sender_email", "SENDER_EMAIL")?;
        require(
            &self.mail.sender_password,
            "mail.sender_password",
            "SENDER_PASSWORD",
        )?;
        if self.mail.receivers.is_empty() {
            return Err(DigestError::MissingSetting {
                name: "mail.receivers".to_string(),
                env: "RECEIVER_EMAILS".to_string(),
            });
        }
        if self.mail.smtp_server.trim().is_empty() {
            return Err(DigestError::MissingSetting {
                name: "mail.smtp_server".to_string(),
                env: "SMTP_SERVER".to_string(),
            });
        }
        require(&self.llm.api_key, "llm.api_key", "OPENAI_API_KEY")?;

        Ok(())
    }

    /// Check only the search section (enough for `arxiv-digest search`)
    pub fn validate_for_search(&self) -> Result<()> {
        if self.search.terms.is_empty() {
            return Err(DigestError::MissingSetting {
                name: "search.terms".to_string(),
                env: "SEARCH_TERMS".to_string(),
            });
        }
        if self.search.max_results == 0 {
            return Err(DigestError::InvalidSetting {
                name: "MAX_RESULTS".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        url::Url::parse(&self.search.api_url).map_err(|e| DigestError::InvalidSetting {
            name: "ARXIV_API_URL".to_string(),
            value: self.search.api_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Render the effective configuration with secrets masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.mail.sender_password = copy
            .mail
            .sender_password
            .as_deref()
            .map(|p| mask_secret(p, 0));
        copy.llm.api_key = copy.llm.api_key.as_deref().map(|k| mask_secret(k, 6));
        copy
    }
}

fn require(value: &Option<String>, name: &str, env: &str) -> Result<()> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(DigestError::MissingSetting {
            name: name.to_string(),
            env: env.to_string(),
        }),
    }
}

fn parse_number<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| DigestError::InvalidSetting {
            name: name.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Parse `SEARCH_TERMS`
///
/// Surrounding single quotes are stripped, then the value is split on `,`
/// and each term trimmed. Double quotes are kept: arXiv reads them as a
/// phrase search.
pub fn parse_search_terms(raw: &str) -> Vec<String> {
    raw.trim()
        .trim_matches('\'')
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `RECEIVER_EMAILS` (comma-separated)
pub fn parse_receivers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Mask a secret for display
///
/// Shows first N chars + asterisks, e.g. "sk-abc***"
pub fn mask_secret(secret: &str, visible_chars: usize) -> String {
    if secret.is_empty() {
        return String::new();
    }

    let visible: String = secret.chars().take(visible_chars).collect();
    format!("{}***", visible)
}
