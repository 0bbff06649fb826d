//! arxiv-digest - daily arXiv paper digest with LLM translation, delivered by email
//!
//! ## Module Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        DOMAIN MODEL                          │
//! │  arxiv/     Atom feed → Paper, SearchQuery → URL             │
//! │  collect    Dedupe papers across search terms                │
//! │  digest/    Plain-text email layouts and subjects            │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      APPLICATION LAYER                       │
//! │  runtime/   DigestPipeline (one run), cron scheduler         │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    INFRASTRUCTURE LAYER                      │
//! │  provider/  OpenAI-compatible chat completions               │
//! │  mail/      SMTP delivery (lettre)                           │
//! │  resilience/ Retry with exponential backoff                  │
//! │  artifacts  Failure-log preservation                         │
//! │  logging    tracing subscriber (stderr + run log file)       │
//! │  util/      Timeouts, endpoints, defaults                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Responsibilities
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`arxiv`] | Query construction, quick-xml Atom parsing, `ArxivClient` |
//! | [`collect`] | `PaperCollection`: unique papers + per-term id lists |
//! | [`digest`] | Paper sections, full digest, empty notice, subjects |
//! | [`runtime`] | `DigestPipeline`, `RunReport`, `run_scheduler` |
//! | [`provider`] | `Provider` trait, `OpenAiCompatProvider`, prompts |
//! | [`mail`] | `Mailer` trait, `SmtpMailer`, `CaptureMailer` |
//! | [`resilience`] | `RetryPolicy` for transient HTTP failures |
//! | [`artifacts`] | `collect_run_log` into `execution-logs/<run-id>/` |
//! | [`config`] | TOML file + environment variables |
//! | [`error`] | Error types with fix suggestions |

// ═══════════════════════════════════════════════════════════════
// DOMAIN MODEL - papers and rendering
// ═══════════════════════════════════════════════════════════════
pub mod arxiv;
pub mod collect;
pub mod digest;

// ═══════════════════════════════════════════════════════════════
// APPLICATION LAYER - run orchestration
// ═══════════════════════════════════════════════════════════════
pub mod runtime;

// ═══════════════════════════════════════════════════════════════
// INFRASTRUCTURE LAYER - remote services, files, logging
// ═══════════════════════════════════════════════════════════════
pub mod artifacts;
pub mod logging;
pub mod mail;
pub mod provider;
pub mod resilience;
pub mod util;

// ═══════════════════════════════════════════════════════════════
// CROSS-CUTTING - Error handling, configuration
// ═══════════════════════════════════════════════════════════════
pub mod config;
pub mod error;

// ═══════════════════════════════════════════════════════════════
// PUBLIC API RE-EXPORTS
// ═══════════════════════════════════════════════════════════════

// Error types
pub use error::{DigestError, FixSuggestion, Result};

// Config types
pub use config::{mask_secret, DigestConfig};

// Domain types
pub use arxiv::{ArxivClient, Paper, SearchQuery};
pub use collect::PaperCollection;

// Runtime types
pub use runtime::{DigestPipeline, RunReport, Trigger};
