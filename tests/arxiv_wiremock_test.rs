//! arXiv client tests against a wiremock server

mod common;

use arxiv_digest::arxiv::{ArxivClient, SearchQuery};
use chrono::NaiveDate;
use common::{fast_retry, feed_xml, EntryFixture};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

async fn client_for(server: &MockServer) -> ArxivClient {
    ArxivClient::new(&format!("{}/api/query", server.uri()))
        .unwrap()
        .with_retry(fast_retry())
}

// =============================================================================
// QUERY CONSTRUCTION
// =============================================================================

#[tokio::test]
async fn test_search_sends_expected_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "all:\"large language model\" AND cat:cs.*"))
        .and(query_param("start", "0"))
        .and(query_param("max_results", "7"))
        .and(query_param("sortBy", "submittedDate"))
        .and(query_param("sortOrder", "descending"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let query = SearchQuery::new("\"large language model\"", "cs.*", 7);
    let papers = client.search(&query).await.unwrap();

    assert!(papers.is_empty());
}

// =============================================================================
// DATE FILTERING
// =============================================================================

#[tokio::test]
async fn test_search_on_keeps_only_target_date() {
    let server = MockServer::start().await;
    let feed = feed_xml(&[
        EntryFixture::new("2405.00003v1", "Newest", "2024-05-02T17:00:00Z"),
        EntryFixture::new("2405.00002v1", "Target A", "2024-05-01T23:59:59Z"),
        EntryFixture::new("2405.00001v2", "Target B", "2024-05-01T00:00:00Z"),
        EntryFixture::new("2404.09999v1", "Older", "2024-04-30T12:00:00Z"),
    ]);
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let query = SearchQuery::new("transformer", "cs.*", 10);
    let papers = client.search_on(&query, day(1)).await.unwrap();

    let ids: Vec<&str> = papers.iter().map(|p| p.arxiv_id.as_str()).collect();
    assert_eq!(ids, vec!["2405.00002v1", "2405.00001v2"]);
    assert_eq!(papers[0].title, "Target A");
    assert_eq!(papers[0].authors, vec!["Alice Smith", "Bob Jones"]);
    assert_eq!(papers[0].categories, vec!["cs.CL", "cs.LG"]);
    assert_eq!(papers[0].summary, "We study things.");
}

#[tokio::test]
async fn test_search_on_no_match_is_empty() {
    let server = MockServer::start().await;
    let feed = feed_xml(&[EntryFixture::new(
        "2405.00003v1",
        "Newest",
        "2024-05-02T17:00:00Z",
    )]);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let query = SearchQuery::new("transformer", "cs.*", 10);
    assert!(client.search_on(&query, day(1)).await.unwrap().is_empty());
}

// =============================================================================
// ERRORS AND RETRY
// =============================================================================

#[tokio::test]
async fn test_retries_transient_503_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(&[
            EntryFixture::new("2405.00002v1", "Target", "2024-05-01T10:00:00Z"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let query = SearchQuery::new("transformer", "cs.*", 10);
    let papers = client.search_on(&query, day(1)).await.unwrap();

    assert_eq!(papers.len(), 1);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let query = SearchQuery::new("transformer", "cs.*", 10);
    let err = client.search(&query).await.unwrap_err();

    assert_eq!(err.code(), "DIGEST-011");
    assert!(err.to_string().contains("HTTP 400"));
}

#[tokio::test]
async fn test_persistent_5xx_gives_up_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let query = SearchQuery::new("transformer", "cs.*", 10);
    let err = client.search(&query).await.unwrap_err();

    assert_eq!(err.code(), "DIGEST-011");
}

#[tokio::test]
async fn test_api_error_entry_is_reported() {
    let server = MockServer::start().await;
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
    <title>Error</title>
    <summary>incorrect id format for 1234</summary>
  </entry>
</feed>"#;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let query = SearchQuery::new("transformer", "cs.*", 10);
    let err = client.search(&query).await.unwrap_err();

    assert_eq!(err.code(), "DIGEST-012");
    assert!(err.to_string().contains("incorrect id format"));
}

#[tokio::test]
async fn test_non_xml_body_is_feed_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>oops</body></html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let query = SearchQuery::new("transformer", "cs.*", 10);
    let err = client.search(&query).await.unwrap_err();

    assert_eq!(err.code(), "DIGEST-012");
}
