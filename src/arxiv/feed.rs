//! Atom feed parsing (quick-xml)
//!
//! Elements are matched by namespace, not by prefix: Atom fields live in
//! `http://www.w3.org/2005/Atom`, the comment in `http://arxiv.org/schemas/atom`.

use chrono::{DateTime, NaiveDate, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::debug;

use super::paper::{arxiv_id_from_url, Paper};
use crate::error::{DigestError, Result};

pub const ATOM_NS: &[u8] = b"http://www.w3.org/2005/Atom";
pub const ARXIV_NS: &[u8] = b"http://arxiv.org/schemas/atom";

/// Marker in the `<id>` of the entry arXiv returns for a rejected query
const API_ERROR_MARKER: &str = "/api/errors";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Summary,
    Id,
    Published,
    AuthorName,
    Comment,
}

#[derive(Debug, Default)]
struct EntryBuilder {
    title: String,
    summary: String,
    id: String,
    published: String,
    authors: Vec<String>,
    author_name: String,
    in_author: bool,
    categories: Vec<String>,
    comment: String,
    has_comment: bool,
}

impl EntryBuilder {
    fn buffer(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Summary => &mut self.summary,
            Field::Id => &mut self.id,
            Field::Published => &mut self.published,
            Field::AuthorName => &mut self.author_name,
            Field::Comment => &mut self.comment,
        }
    }

    fn build(self) -> Result<Paper> {
        let url = self.id.trim().to_string();
        if url.is_empty() {
            return Err(feed_error("entry without <id>"));
        }
        if url.contains(API_ERROR_MARKER) {
            return Err(feed_error(format!(
                "arXiv rejected the query: {}",
                self.summary.trim()
            )));
        }

        let title = collapse_whitespace(&self.title);
        if title.is_empty() {
            return Err(feed_error(format!("entry {} without <title>", url)));
        }

        let published = parse_published(self.published.trim())
            .ok_or_else(|| feed_error(format!("entry {} has invalid <published>", url)))?;

        let comment = Some(self.comment.trim().to_string())
            .filter(|c| self.has_comment && !c.is_empty());

        Ok(Paper {
            arxiv_id: arxiv_id_from_url(&url).to_string(),
            title,
            authors: self.authors,
            url,
            published,
            summary: self.summary.trim().to_string(),
            categories: self.categories,
            comment,
        })
    }
}

fn feed_error(reason: impl Into<String>) -> DigestError {
    DigestError::FeedParse {
        reason: reason.into(),
    }
}

/// `2024-01-02T18:59:59Z` → 2024-01-02 (UTC)
fn parse_published(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Titles and author names wrap across lines in the feed
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn in_ns(ns: &ResolveResult, expected: &[u8]) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(bound)) if *bound == expected)
}

fn category_term(e: &BytesStart) -> Result<Option<String>> {
    let attr = e
        .try_get_attribute("term")
        .map_err(|err| feed_error(err.to_string()))?;
    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|err| feed_error(err.to_string()))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Parse an arXiv Atom feed into papers, in feed order
pub fn parse_feed(xml: &str) -> Result<Vec<Paper>> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut papers = Vec::new();
    let mut entry: Option<EntryBuilder> = None;
    let mut field: Option<Field> = None;
    let mut saw_feed = false;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| feed_error(e.to_string()))?;

        match event {
            Event::Start(e) => {
                let local = e.local_name();
                let is_atom = in_ns(&ns, ATOM_NS);
                match (entry.as_mut(), local.as_ref()) {
                    (None, b"feed") if is_atom => saw_feed = true,
                    (None, b"entry") if is_atom => entry = Some(EntryBuilder::default()),
                    (Some(b), name) => {
                        if is_atom {
                            field = match name {
                                b"title" => Some(Field::Title),
                                b"summary" => Some(Field::Summary),
                                b"id" => Some(Field::Id),
                                b"published" => Some(Field::Published),
                                b"name" if b.in_author => Some(Field::AuthorName),
                                b"author" => {
                                    b.in_author = true;
                                    b.author_name.clear();
                                    None
                                }
                                b"category" => {
                                    if let Some(term) = category_term(&e)? {
                                        b.categories.push(term);
                                    }
                                    None
                                }
                                _ => None,
                            };
                        } else if in_ns(&ns, ARXIV_NS) && name == b"comment" {
                            b.has_comment = true;
                            field = Some(Field::Comment);
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if let Some(b) = entry.as_mut() {
                    if in_ns(&ns, ATOM_NS) && e.local_name().as_ref() == b"category" {
                        if let Some(term) = category_term(&e)? {
                            b.categories.push(term);
                        }
                    }
                }
            }
            Event::Text(t) => {
                if let (Some(b), Some(f)) = (entry.as_mut(), field) {
                    let text = t.unescape().map_err(|e| feed_error(e.to_string()))?;
                    b.buffer(f).push_str(&text);
                }
            }
            Event::CData(c) => {
                if let (Some(b), Some(f)) = (entry.as_mut(), field) {
                    b.buffer(f).push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"entry" if in_ns(&ns, ATOM_NS) => {
                        if let Some(b) = entry.take() {
                            papers.push(b.build()?);
                        }
                        field = None;
                    }
                    b"author" if in_ns(&ns, ATOM_NS) => {
                        if let Some(b) = entry.as_mut() {
                            let name = collapse_whitespace(&b.author_name);
                            if !name.is_empty() {
                                b.authors.push(name);
                            }
                            b.author_name.clear();
                            b.in_author = false;
                        }
                        field = None;
                    }
                    _ => field = None,
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_feed {
        return Err(feed_error("document is not an Atom <feed>"));
    }
    if entry.is_some() {
        return Err(feed_error("unterminated <entry>"));
    }

    debug!(entries = papers.len(), "Parsed arXiv feed");
    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <link href="http://arxiv.org/api/query" rel="self" type="application/atom+xml"/>
  <title type="html">ArXiv Query: search_query=all:transformer</title>
  <id>http://arxiv.org/api/abc</id>
  <updated>2024-01-03T00:00:00-05:00</updated>
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">2</opensearch:totalResults>
  <entry>
    <id>http://arxiv.org/abs/2401.00001v1</id>
    <updated>2024-01-02T18:00:00Z</updated>
    <published>2024-01-02T18:00:00Z</published>
    <title>Sparse Attention
      for Long Contexts</title>
    <summary>  We study sparse attention &amp; show it scales.
    </summary>
    <author>
      <name>Ada Lovelace</name>
      <arxiv:affiliation xmlns:arxiv="http://arxiv.org/schemas/atom">Analytical Engines</arxiv:affiliation>
    </author>
    <author>
      <name>Alan Turing</name>
    </author>
    <arxiv:comment xmlns:arxiv="http://arxiv.org/schemas/atom">12 pages, 3 figures</arxiv:comment>
    <link href="http://arxiv.org/abs/2401.00001v1" rel="alternate" type="text/html"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2401.00002v2</id>
    <published>2024-01-01T23:59:59Z</published>
    <title>Second Paper</title>
    <summary>Another abstract.</summary>
    <author><name>Grace Hopper</name></author>
    <category term="cs.AI"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed_extracts_all_fields() {
        let papers = parse_feed(FEED).unwrap();
        assert_eq!(papers.len(), 2);

        let first = &papers[0];
        assert_eq!(first.arxiv_id, "2401.00001v1");
        assert_eq!(first.url, "http://arxiv.org/abs/2401.00001v1");
        assert_eq!(first.title, "Sparse Attention for Long Contexts");
        assert_eq!(first.summary, "We study sparse attention & show it scales.");
        assert_eq!(first.authors, vec!["Ada Lovelace", "Alan Turing"]);
        assert_eq!(first.categories, vec!["cs.CL", "cs.LG"]);
        assert_eq!(first.comment.as_deref(), Some("12 pages, 3 figures"));
        assert_eq!(
            first.published,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_parse_feed_optional_comment_absent() {
        let papers = parse_feed(FEED).unwrap();
        let second = &papers[1];
        assert_eq!(second.comment, None);
        assert_eq!(second.categories, vec!["cs.AI"]);
        assert_eq!(second.authors, vec!["Grace Hopper"]);
    }

    #[test]
    fn test_feed_title_is_not_an_entry_title() {
        let papers = parse_feed(FEED).unwrap();
        assert!(papers.iter().all(|p| !p.title.contains("ArXiv Query")));
    }

    #[test]
    fn test_empty_feed_yields_no_papers() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>empty</title></feed>"#;
        assert!(parse_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn test_api_error_entry_is_reported() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
    <title>Error</title>
    <summary>incorrect id format for 1234</summary>
  </entry>
</feed>"#;
        let err = parse_feed(xml).unwrap_err();
        assert_eq!(err.code(), "DIGEST-012");
        assert!(err.to_string().contains("incorrect id format"));
    }

    #[test]
    fn test_entry_without_published_is_rejected() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry><id>http://arxiv.org/abs/1</id><title>T</title></entry>
</feed>"#;
        assert!(parse_feed(xml).is_err());
    }

    #[test]
    fn test_non_atom_document_is_rejected() {
        assert!(parse_feed("<html><body>Service Unavailable</body></html>").is_err());
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><id>x</entry></feed>"#;
        assert!(parse_feed(xml).is_err());
    }

    #[test]
    fn test_parse_published_normalizes_to_utc() {
        assert_eq!(
            parse_published("2024-01-02T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2024, 1, 3)
        );
        assert_eq!(parse_published("yesterday"), None);
    }
}
