//! Plain-text digest rendering
//!
//! - [`render`]: paper sections, the full digest and the empty-result notice
//! - subjects and per-paper [`Enrichment`] live here

pub mod render;

pub use render::{format_paper, render_digest, render_empty_notice, RULE, SEPARATOR};

use chrono::NaiveDate;

use crate::error::Result;

/// Prefix used when an LLM call fails, followed by the error text
pub const FAILURE_PREFIX: &str = "处理失败: ";

/// LLM output attached to one paper
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub translation: Option<String>,
    pub contribution: Option<String>,
}

impl Enrichment {
    /// Combine the two completion results; failures become visible text
    pub fn from_results(translation: Result<String>, contribution: Result<String>) -> Self {
        Self {
            translation: Some(outcome_text(translation)),
            contribution: Some(outcome_text(contribution)),
        }
    }
}

fn outcome_text(result: Result<String>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => format!("{}{}", FAILURE_PREFIX, e),
    }
}

/// Subject for a digest listing `count` distinct papers
pub fn subject_for(date: NaiveDate, count: usize) -> String {
    format!("ArXiv论文日报 - {} - {}篇论文", date, count)
}

/// Subject for the "no papers found" notice
pub fn empty_subject(date: NaiveDate) -> String {
    format!("ArXiv论文日报 - {} - 未找到相关论文", date)
}
