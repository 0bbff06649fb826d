//! arXiv API query construction

use chrono::{DateTime, Days, Local, NaiveDate};
use url::Url;

/// One keyword search against the arXiv API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub category: String,
    pub max_results: u32,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, category: impl Into<String>, max_results: u32) -> Self {
        Self {
            term: term.into(),
            category: category.into(),
            max_results,
        }
    }

    /// `search_query` parameter: the term across all fields, within the category
    pub fn search_expression(&self) -> String {
        format!("all:{} AND cat:{}", self.term, self.category)
    }

    /// Full request URL, newest submissions first
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair("search_query", &self.search_expression())
            .append_pair("start", "0")
            .append_pair("max_results", &self.max_results.to_string())
            .append_pair("sortBy", "submittedDate")
            .append_pair("sortOrder", "descending");
        url
    }
}

/// The day a run reports on: yesterday, in local time
pub fn target_date(now: DateTime<Local>) -> NaiveDate {
    let today = now.date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}
