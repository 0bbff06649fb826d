//! One digest run: search → collect → enrich → render → deliver

use std::sync::Arc;

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::arxiv::{ArxivClient, SearchQuery};
use crate::collect::PaperCollection;
use crate::config::DigestConfig;
use crate::digest::{
    empty_subject, render_digest, render_empty_notice, subject_for, Enrichment,
};
use crate::error::{DigestError, Result};
use crate::mail::{Email, Mailer};
use crate::provider::{render_prompt, Provider, CONTRIBUTION_PROMPT, TRANSLATION_PROMPT};

/// Rendered subject and body, before addressing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

/// Summary of one run, printed by the CLI and logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub date: NaiveDate,
    /// `(term, matches)` in configured order
    pub per_term: Vec<(String, usize)>,
    /// Terms whose search failed and were treated as empty
    pub failed_terms: Vec<String>,
    /// Distinct papers in the digest
    pub total: usize,
    pub subject: String,
    pub sent: bool,
}

pub struct DigestPipeline {
    arxiv: ArxivClient,
    provider: Arc<dyn Provider>,
    mailer: Arc<dyn Mailer>,
    config: DigestConfig,
}

impl DigestPipeline {
    /// Build a pipeline; the arXiv client targets `config.search.api_url`
    pub fn new(
        config: DigestConfig,
        provider: Arc<dyn Provider>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self> {
        let arxiv = ArxivClient::new(&config.search.api_url)?;
        Ok(Self {
            arxiv,
            provider,
            mailer,
            config,
        })
    }

    /// Replace the arXiv client (custom retry policy, test server)
    pub fn with_arxiv(mut self, arxiv: ArxivClient) -> Self {
        self.arxiv = arxiv;
        self
    }

    /// Search every configured term for papers published on `date`
    ///
    /// A failing term is logged and recorded as empty. Returns the collection
    /// and the failed terms; fails only when every term failed.
    pub async fn search_all(&self, date: NaiveDate) -> Result<(PaperCollection, Vec<String>)> {
        let search = &self.config.search;
        let mut collection = PaperCollection::new();
        let mut failed = Vec::new();

        for term in &search.terms {
            info!(term = %term, %date, "Searching arXiv");
            let query = SearchQuery::new(term.clone(), search.category.clone(), search.max_results);

            match self.arxiv.search_on(&query, date).await {
                Ok(papers) if papers.is_empty() => {
                    info!(term = %term, "No papers found");
                    collection.record_empty(term);
                }
                Ok(papers) => {
                    info!(term = %term, count = papers.len(), "Papers found");
                    collection.record(term, papers);
                }
                Err(e) => {
                    warn!(term = %term, error = %e, "Search failed, treating as empty");
                    collection.record_empty(term);
                    failed.push(term.clone());
                }
            }
        }

        if !search.terms.is_empty() && failed.len() == search.terms.len() {
            return Err(DigestError::AllSearchesFailed {
                terms: failed.len(),
            });
        }

        info!(total = collection.len(), "Distinct papers collected");
        Ok((collection, failed))
    }

    /// Translate and summarize each distinct paper once
    ///
    /// LLM failures never abort the run; they show up as text in the digest.
    pub async fn enrich(&self, collection: &PaperCollection) -> FxHashMap<String, Enrichment> {
        let total = collection.len();
        let mut enrichments = FxHashMap::default();

        for (i, paper) in collection.papers().iter().enumerate() {
            info!(
                index = i + 1,
                total,
                arxiv_id = %paper.arxiv_id,
                title = %paper.title,
                "Enriching paper"
            );

            let translation = self
                .provider
                .complete(&render_prompt(TRANSLATION_PROMPT, &paper.summary))
                .await;
            if let Err(e) = &translation {
                warn!(arxiv_id = %paper.arxiv_id, error = %e, "Translation failed");
            }

            let contribution = self
                .provider
                .complete(&render_prompt(CONTRIBUTION_PROMPT, &paper.summary))
                .await;
            if let Err(e) = &contribution {
                warn!(arxiv_id = %paper.arxiv_id, error = %e, "Contribution summary failed");
            }

            enrichments.insert(
                paper.arxiv_id.clone(),
                Enrichment::from_results(translation, contribution),
            );
        }

        enrichments
    }

    /// Search, enrich and render without sending
    pub async fn compose(&self, date: NaiveDate) -> Result<(Digest, RunReport)> {
        let terms = &self.config.search.terms;
        let (collection, failed_terms) = self.search_all(date).await?;

        let digest = if collection.is_empty() {
            info!(%date, "No papers for any term, composing empty notice");
            Digest {
                subject: empty_subject(date),
                body: render_empty_notice(date, terms),
            }
        } else {
            let enrichments = self.enrich(&collection).await;
            Digest {
                subject: subject_for(date, collection.len()),
                body: render_digest(date, terms, &collection, &enrichments),
            }
        };

        let report = RunReport {
            date,
            per_term: collection.term_counts(),
            failed_terms,
            total: collection.len(),
            subject: digest.subject.clone(),
            sent: false,
        };
        Ok((digest, report))
    }

    /// Full run for `date`: compose then deliver
    #[instrument(skip(self), fields(provider = self.provider.name(), model = self.provider.model()))]
    pub async fn run(&self, date: NaiveDate) -> Result<RunReport> {
        let (digest, mut report) = self.compose(date).await?;

        let email = Email::from_config(&self.config.mail, digest.subject, digest.body)?;
        self.mailer.send(&email).await?;
        report.sent = true;

        info!(subject = %report.subject, total = report.total, "Digest delivered");
        Ok(report)
    }
}
