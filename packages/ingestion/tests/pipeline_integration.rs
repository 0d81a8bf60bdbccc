//! Integration tests for the full ingestion flow.
//!
//! These exercise the pipeline end to end through the mock collaborators:
//! 1. Discover links on a domain
//! 2. Select candidates into a session
//! 3. Run the batch over the selection
//! 4. Check outcome accounting and what was persisted

use ingestion::{
    discover_links, ingest_batch, scrape_one, ItemStore,
    testing::{page_of_len, MockAnalyzer, MockAnalyzerCall, MockFetcher},
    BatchRequest, BatchStatus, DiscoveryConfig, DiscoveredLink, DiscoverySession,
    DiscoverySource, ItemKind, MemoryStore, Progress, ScrapeConfig, ScrapeError, ScrapeRequest,
};

/// A homepage with `count` distinct in-domain content anchors.
fn homepage(count: usize) -> String {
    let anchors: String = (0..count)
        .map(|i| format!(r#"<a href="/articles/post-{i}">Post {i}</a>"#))
        .collect();
    format!("<html><body><main>{anchors}</main></body></html>")
}

#[tokio::test]
async fn test_crawlable_homepage_discovers_without_prediction() {
    // Scenario: ≥20 distinct in-domain anchors and a working fetcher.
    let analyzer = MockAnalyzer::new().with_discovered("example.com", Vec::new());
    let fetcher = MockFetcher::new().with_body("https://example.com/", homepage(20));

    let report = discover_links(
        "example.com",
        &DiscoveryConfig::default(),
        &analyzer,
        &fetcher,
    )
    .await
    .unwrap();

    assert!(!report.links.is_empty());
    assert_eq!(report.source, DiscoverySource::Crawl);
    assert!(!analyzer
        .calls()
        .iter()
        .any(|c| matches!(c, MockAnalyzerCall::PredictCommonLinks { .. })));
}

#[tokio::test]
async fn test_blocked_domain_fails_scrape_with_fetch_blocked() {
    // Scenario: every relay returns junk, so the fetcher yields nothing.
    let store = MemoryStore::new();
    let analyzer = MockAnalyzer::new();
    let fetcher = MockFetcher::new();

    let request = ScrapeRequest::new("https://walled.example/page", "user-1");
    let err = scrape_one(&request, &ScrapeConfig::default(), &store, &analyzer, &fetcher)
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::FetchBlocked { .. }));
    assert_eq!(store.count(), 0);
}

#[tokio::test]
async fn test_discover_select_ingest_cycle() {
    let links: Vec<DiscoveredLink> = (0..5)
        .map(|i| DiscoveredLink::new(format!("https://example.com/p{i}"), format!("Post {i}")))
        .collect();
    let analyzer = MockAnalyzer::new().with_discovered("example.com", links);

    // Only 3 of the 5 selected pages fetch successfully.
    let fetcher = MockFetcher::new()
        .with_body("https://example.com/p0", page_of_len(300))
        .with_body("https://example.com/p2", page_of_len(300))
        .with_body("https://example.com/p4", page_of_len(300));

    let report = discover_links(
        "example.com",
        &DiscoveryConfig::default(),
        &analyzer,
        &fetcher,
    )
    .await
    .unwrap();
    assert_eq!(report.source, DiscoverySource::Search);

    let mut session = DiscoverySession::new(report.links);
    session.select_all();

    let store = MemoryStore::new();
    let request = BatchRequest::from_session(&session, "user-1").with_instruction("summarize");

    let mut events: Vec<Progress> = Vec::new();
    let summary = ingest_batch(
        &request,
        &ScrapeConfig::default(),
        &store,
        &analyzer,
        &fetcher,
        |p| events.push(p),
    )
    .await;

    // Scenario: 5 selected, 2 fail -> partial success, not AllFailed or
    // Completed.
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.status(), BatchStatus::CompletedWithFailures { failed: 2 });
    assert_eq!(summary.succeeded + summary.failed, summary.total);

    // Progress is monotonic and ends complete.
    assert_eq!(events.len(), 5);
    assert!(events.windows(2).all(|w| w[0].completed < w[1].completed));
    assert_eq!(events.last().unwrap().completed, 5);

    // Only successes persisted, all as web scrapes.
    let items = store.get_all("user-1").await.unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.kind == ItemKind::WebScrape && i.is_external));

    // Session cleared when the cycle ends.
    session.reset();
    assert!(session.links.is_empty());
}

#[tokio::test]
async fn test_content_threshold_boundary_end_to_end() {
    let store = MemoryStore::new();
    let analyzer = MockAnalyzer::new();
    let fetcher = MockFetcher::new()
        .with_body("https://example.com/thin", page_of_len(99))
        .with_body("https://example.com/full", page_of_len(100));

    let request = BatchRequest::new(
        vec![
            "https://example.com/thin".to_string(),
            "https://example.com/full".to_string(),
        ],
        "user-1",
    );
    let summary = ingest_batch(
        &request,
        &ScrapeConfig::default(),
        &store,
        &analyzer,
        &fetcher,
        |_| {},
    )
    .await;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(!summary.outcomes[0].ok);
    assert_eq!(
        summary.outcomes[0].error,
        Some(ingestion::FailureKind::EmptyContent)
    );
    assert!(summary.outcomes[1].ok);
}

#[tokio::test]
async fn test_selector_scoped_batch() {
    let store = MemoryStore::new();
    let analyzer = MockAnalyzer::new();
    let html = format!(
        r#"<html><body><main>Navigation junk</main><div class="post">{}</div></body></html>"#,
        "y".repeat(150)
    );
    let fetcher = MockFetcher::new().with_body("https://example.com/post", html);

    let request = BatchRequest::new(vec!["https://example.com/post".to_string()], "user-1")
        .with_selector(".post");
    let summary = ingest_batch(
        &request,
        &ScrapeConfig::default(),
        &store,
        &analyzer,
        &fetcher,
        |_| {},
    )
    .await;

    assert_eq!(summary.status(), BatchStatus::Completed);
    let items = store.get_all("user-1").await.unwrap();
    assert_eq!(items[0].size, 150);
}
