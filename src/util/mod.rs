//! Utilities Module - shared infrastructure
//!
//! - `constants`: Centralized timeouts, endpoints and defaults

pub mod constants;

// Re-export public types
pub use constants::{
    ARXIV_TIMEOUT, CONNECT_TIMEOUT, INFER_TIMEOUT, REDIRECT_LIMIT, SMTP_TIMEOUT, USER_AGENT,
};
