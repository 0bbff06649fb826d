//! Paper collection across search terms
//!
//! Papers are unique by arXiv id, kept in first-seen order. Each term keeps
//! its own ordered id list, so a paper matched by two terms appears under
//! both in the digest but is stored (and enriched) once.

use rustc_hash::FxHashMap;

use crate::arxiv::Paper;

#[derive(Debug, Clone, Default)]
pub struct PaperCollection {
    papers: Vec<Paper>,
    index: FxHashMap<String, usize>,
    terms: Vec<(String, Vec<String>)>,
}

impl PaperCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the papers one term matched
    pub fn record(&mut self, term: &str, papers: Vec<Paper>) {
        let mut ids = Vec::with_capacity(papers.len());
        for paper in papers {
            if !ids.contains(&paper.arxiv_id) {
                ids.push(paper.arxiv_id.clone());
            }
            if !self.index.contains_key(&paper.arxiv_id) {
                self.index.insert(paper.arxiv_id.clone(), self.papers.len());
                self.papers.push(paper);
            }
        }
        self.set_term(term, ids);
    }

    /// Record that a term matched nothing (or its search failed)
    pub fn record_empty(&mut self, term: &str) {
        self.set_term(term, Vec::new());
    }

    fn set_term(&mut self, term: &str, ids: Vec<String>) {
        match self.terms.iter_mut().find(|(t, _)| t == term) {
            Some((_, existing)) => *existing = ids,
            None => self.terms.push((term.to_string(), ids)),
        }
    }

    /// Number of distinct papers
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn get(&self, arxiv_id: &str) -> Option<&Paper> {
        self.index.get(arxiv_id).map(|&i| &self.papers[i])
    }

    /// Ids matched by `term`, in that term's result order
    pub fn term_ids(&self, term: &str) -> &[String] {
        self.terms
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, ids)| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Terms in recording order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(t, _)| t.as_str())
    }

    /// `(term, match count)` in recording order
    pub fn term_counts(&self) -> Vec<(String, usize)> {
        self.terms
            .iter()
            .map(|(t, ids)| (t.clone(), ids.len()))
            .collect()
    }

    /// Distinct papers in first-seen order
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }
}
