//! Test fixtures and helpers

#![allow(dead_code)]

use std::time::Duration;

use arxiv_digest::config::DigestConfig;
use arxiv_digest::resilience::{RetryConfig, RetryPolicy};

/// One `<entry>` of an arXiv Atom feed
pub struct EntryFixture {
    pub id: &'static str,
    pub title: &'static str,
    pub published: &'static str,
    pub summary: &'static str,
    pub authors: &'static [&'static str],
    pub categories: &'static [&'static str],
    pub comment: Option<&'static str>,
}

impl EntryFixture {
    pub fn new(id: &'static str, title: &'static str, published: &'static str) -> Self {
        Self {
            id,
            title,
            published,
            summary: "We study things.",
            authors: &["Alice Smith", "Bob Jones"],
            categories: &["cs.CL", "cs.LG"],
            comment: None,
        }
    }

    fn to_xml(&self) -> String {
        let authors: String = self
            .authors
            .iter()
            .map(|a| format!("<author><name>{}</name></author>", a))
            .collect();
        let categories: String = self
            .categories
            .iter()
            .map(|c| format!(r#"<category term="{}" scheme="http://arxiv.org/schemas/atom"/>"#, c))
            .collect();
        let comment = self
            .comment
            .map(|c| format!("<arxiv:comment>{}</arxiv:comment>", c))
            .unwrap_or_default();

        format!(
            r#"<entry>
    <id>http://arxiv.org/abs/{id}</id>
    <updated>{published}</updated>
    <published>{published}</published>
    <title>{title}</title>
    <summary>  {summary}
    </summary>
    {authors}
    {comment}
    <link href="http://arxiv.org/abs/{id}" rel="alternate" type="text/html"/>
    {categories}
  </entry>"#,
            id = self.id,
            published = self.published,
            title = self.title,
            summary = self.summary,
        )
    }
}

/// Wrap entries in an arXiv API feed document
pub fn feed_xml(entries: &[EntryFixture]) -> String {
    let body: Vec<String> = entries.iter().map(EntryFixture::to_xml).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title type="html">ArXiv Query</title>
  <id>http://arxiv.org/api/test</id>
  <opensearch:totalResults>{count}</opensearch:totalResults>
  {entries}
</feed>"#,
        count = entries.len(),
        entries = body.join("\n  "),
    )
}

/// Retry policy with millisecond delays so retry tests stay fast
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(
        RetryConfig::default()
            .with_max_retries(2)
            .with_initial_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(5))
            .with_jitter(0.0),
    )
}

/// Complete config pointing arXiv at `arxiv_url`
pub fn test_config(arxiv_url: &str, terms: &[&str]) -> DigestConfig {
    let mut config = DigestConfig::default();
    config.mail.sender_email = Some("bot@example.com".to_string());
    config.mail.sender_password = Some("app-password".to_string());
    config.mail.receivers = vec!["reader@example.com".to_string()];
    config.llm.api_key = Some("sk-test".to_string());
    config.search.terms = terms.iter().map(|t| t.to_string()).collect();
    config.search.api_url = arxiv_url.to_string();
    config
}
