//! arXiv HTTP client
//!
//! One shared `reqwest::Client` (connection pooling), transient failures
//! retried through [`RetryPolicy`].

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use super::feed::parse_feed;
use super::paper::Paper;
use super::query::SearchQuery;
use crate::error::{DigestError, Result};
use crate::resilience::RetryPolicy;
use crate::util::{ARXIV_TIMEOUT, CONNECT_TIMEOUT, REDIRECT_LIMIT, USER_AGENT};

#[derive(Debug, Clone)]
pub struct ArxivClient {
    http: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl ArxivClient {
    /// Create a client for the query endpoint at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| DigestError::InvalidSetting {
            name: "ARXIV_API_URL".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let http = Client::builder()
            .timeout(ARXIV_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(REDIRECT_LIMIT))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DigestError::ConfigError {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base_url,
            retry: RetryPolicy::with_defaults(),
        })
    }

    /// Replace the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Run a query and return every entry in the feed
    #[instrument(skip(self), fields(term = %query.term))]
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Paper>> {
        let url = query.to_url(&self.base_url);
        debug!(url = %url, "Querying arXiv");

        let body = self.retry.execute(|| self.fetch(&url, &query.term)).await?;
        parse_feed(&body)
    }

    /// Run a query and keep only papers published on `date` (UTC)
    pub async fn search_on(&self, query: &SearchQuery, date: NaiveDate) -> Result<Vec<Paper>> {
        let papers = self.search(query).await?;
        let fetched = papers.len();

        let matching: Vec<Paper> = papers.into_iter().filter(|p| p.published == date).collect();

        info!(
            term = %query.term,
            %date,
            fetched,
            matching = matching.len(),
            "arXiv search finished"
        );
        Ok(matching)
    }

    async fn fetch(&self, url: &Url, term: &str) -> Result<String> {
        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                DigestError::Timeout {
                    operation: format!("arXiv search '{}'", term),
                    duration_ms: ARXIV_TIMEOUT.as_millis() as u64,
                }
            } else {
                DigestError::ArxivRequest {
                    term: term.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::ArxivStatus {
                term: term.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| DigestError::ArxivRequest {
            term: term.to_string(),
            reason: format!("Failed to read response: {}", e),
        })
    }
}
