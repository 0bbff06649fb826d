//! Configuration from the process environment and config files
//!
//! Tests that touch process env vars are `#[serial]`.

use std::fs;

use arxiv_digest::config::{DigestConfig, SmtpSecurity};
use pretty_assertions::assert_eq;
use serial_test::serial;
use tempfile::TempDir;

const VARS: &[&str] = &[
    "SENDER_EMAIL",
    "SENDER_NAME",
    "SENDER_PASSWORD",
    "RECEIVER_EMAILS",
    "SMTP_SERVER",
    "SMTP_PORT",
    "SMTP_SECURITY",
    "OPENAI_API_KEY",
    "OPENAI_MODEL",
    "OPENAI_API_BASE",
    "SEARCH_TERMS",
    "MAX_RESULTS",
    "ARXIV_CATEGORY",
    "ARXIV_API_URL",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_workflow_secrets_map_onto_config() {
    clear_env();
    std::env::set_var("SENDER_EMAIL", "bot@qq.com");
    std::env::set_var("SENDER_PASSWORD", "auth-code");
    std::env::set_var("RECEIVER_EMAILS", "a@example.com, b@example.com");
    std::env::set_var("SMTP_PORT", "");
    std::env::set_var("OPENAI_API_KEY", "sk-live");
    std::env::set_var("SEARCH_TERMS", "'\"diffusion\",\"rlhf\"'");
    std::env::set_var("MAX_RESULTS", "");

    let config = DigestConfig::default().with_env().unwrap();
    clear_env();

    assert_eq!(config.mail.sender_email.as_deref(), Some("bot@qq.com"));
    assert_eq!(config.mail.receivers, vec!["a@example.com", "b@example.com"]);
    assert_eq!(config.mail.smtp_port, 465);
    assert_eq!(config.mail.smtp_server, "smtp.qq.com");
    assert_eq!(config.llm.api_key.as_deref(), Some("sk-live"));
    assert_eq!(config.llm.model, "deepseek-chat");
    assert_eq!(config.search.terms, vec!["\"diffusion\"", "\"rlhf\""]);
    assert_eq!(config.search.max_results, 10);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_invalid_port_is_rejected() {
    clear_env();
    std::env::set_var("SMTP_PORT", "smtp");

    let result = DigestConfig::default().with_env();
    clear_env();

    assert_eq!(result.unwrap_err().code(), "DIGEST-003");
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[mail]
sender_email = "file@example.com"
smtp_server = "smtp.example.com"
smtp_port = 587
security = "starttls"

[search]
terms = ["from-file"]
max_results = 3
"#,
    )
    .unwrap();

    std::env::set_var("SMTP_SERVER", "smtp.override.com");
    std::env::set_var("MAX_RESULTS", "25");

    let config = DigestConfig::load(Some(&path)).unwrap().with_env().unwrap();
    clear_env();

    assert_eq!(config.mail.sender_email.as_deref(), Some("file@example.com"));
    assert_eq!(config.mail.smtp_server, "smtp.override.com");
    assert_eq!(config.mail.smtp_port, 587);
    assert_eq!(config.mail.security, SmtpSecurity::Starttls);
    assert_eq!(config.search.terms, vec!["from-file"]);
    assert_eq!(config.search.max_results, 25);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = DigestConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config, DigestConfig::default());
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[mail\nsender_email = ").unwrap();

    let err = DigestConfig::load(Some(&path)).unwrap_err();
    assert_eq!(err.code(), "DIGEST-001");
}
