//! Paper record extracted from one Atom `<entry>`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    /// Entry `<id>`, e.g. `http://arxiv.org/abs/2401.01234v1`
    pub url: String,
    /// Last path segment of `url`, version suffix included
    pub arxiv_id: String,
    /// Publication date (UTC)
    pub published: NaiveDate,
    pub summary: String,
    pub categories: Vec<String>,
    /// Author comment (`<arxiv:comment>`), e.g. page count or venue
    pub comment: Option<String>,
}

impl Paper {
    pub fn abs_url(&self) -> String {
        format!("https://arxiv.org/abs/{}", self.arxiv_id)
    }

    pub fn pdf_url(&self) -> String {
        format!("https://arxiv.org/pdf/{}.pdf", self.arxiv_id)
    }
}

/// Derive the arXiv id from an entry id URL
pub fn arxiv_id_from_url(url: &str) -> &str {
    url.trim_end_matches('/').rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str) -> Paper {
        Paper {
            title: "Attention Is All You Need".to_string(),
            authors: vec!["Ashish Vaswani".to_string()],
            url: format!("http://arxiv.org/abs/{}", id),
            arxiv_id: id.to_string(),
            published: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            summary: "We propose the Transformer.".to_string(),
            categories: vec!["cs.CL".to_string()],
            comment: None,
        }
    }

    #[test]
    fn test_links_use_arxiv_id() {
        let p = paper("2401.01234v2");
        assert_eq!(p.abs_url(), "https://arxiv.org/abs/2401.01234v2");
        assert_eq!(p.pdf_url(), "https://arxiv.org/pdf/2401.01234v2.pdf");
    }

    #[test]
    fn test_arxiv_id_from_url() {
        assert_eq!(
            arxiv_id_from_url("http://arxiv.org/abs/2401.01234v1"),
            "2401.01234v1"
        );
        assert_eq!(
            arxiv_id_from_url("http://arxiv.org/abs/cs/0112017v1"),
            "0112017v1"
        );
        assert_eq!(arxiv_id_from_url("2401.01234v1"), "2401.01234v1");
    }
}
