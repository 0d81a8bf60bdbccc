//! Batch ingestion - the sequential multi-URL driver.

use tracing::{info, warn};

use crate::pipeline::scrape::{scrape_one, ScrapeRequest};
use crate::traits::{Analyzer, ItemStore, PageFetcher};
use crate::types::{BatchSummary, DiscoverySession, IngestOutcome, Progress, ScrapeConfig};

/// A user-selected set of URLs to ingest, in selection order.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// URLs to process, in order.
    pub urls: Vec<String>,

    /// Analysis instruction applied to every URL.
    pub instruction: String,

    /// Optional CSS selector applied to every URL.
    pub selector: Option<String>,

    /// Owner of the resulting items.
    pub user_id: String,
}

impl BatchRequest {
    /// Create a batch over explicit URLs.
    pub fn new(urls: Vec<String>, user_id: impl Into<String>) -> Self {
        Self {
            urls,
            instruction: String::new(),
            selector: None,
            user_id: user_id.into(),
        }
    }

    /// Build a batch from a discovery session's selection.
    pub fn from_session(session: &DiscoverySession, user_id: impl Into<String>) -> Self {
        Self::new(session.selected_urls(), user_id)
    }

    /// Set the analysis instruction.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Set the extraction selector.
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }
}

/// Ingest every URL in the batch, strictly sequentially.
///
/// Sequential on purpose: the free relays and the model backend both
/// rate-limit, and one in-flight scrape at a time is the contract, not a
/// missing optimization. Each URL's outcome is independent - a failure
/// is absorbed into the counters (with an operator-level warning) and
/// the batch continues. `on_progress` fires after every item with a
/// monotonically increasing `completed`. The summary always satisfies
/// `succeeded + failed == total`.
pub async fn ingest_batch<S, A, F>(
    request: &BatchRequest,
    config: &ScrapeConfig,
    store: &S,
    analyzer: &A,
    fetcher: &F,
    mut on_progress: impl FnMut(Progress),
) -> BatchSummary
where
    S: ItemStore,
    A: Analyzer,
    F: PageFetcher,
{
    let total = request.urls.len();
    let mut summary = BatchSummary::new(total);

    info!(total = total, "batch ingest starting");

    for url in &request.urls {
        let mut scrape_request =
            ScrapeRequest::new(url.clone(), request.user_id.clone())
                .with_instruction(request.instruction.clone());
        if let Some(selector) = &request.selector {
            scrape_request = scrape_request.with_selector(selector.clone());
        }

        match scrape_one(&scrape_request, config, store, analyzer, fetcher).await {
            Ok(_) => summary.record(IngestOutcome::success(url.clone())),
            Err(e) => {
                warn!(url = %url, error = %e, "batch item failed");
                summary.record(IngestOutcome::failure(url.clone(), e.kind()));
            }
        }

        on_progress(Progress {
            completed: summary.completed(),
            total,
        });
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        total = summary.total,
        status = %summary.status(),
        "batch ingest finished"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use crate::testing::{page_of_len, MockAnalyzer, MockFetcher};
    use crate::types::BatchStatus;

    fn urls(paths: &[&str]) -> Vec<String> {
        paths
            .iter()
            .map(|p| format!("https://example.com{p}"))
            .collect()
    }

    #[tokio::test]
    async fn test_partial_failure_accounting() {
        let store = MemoryStore::new();
        let analyzer = MockAnalyzer::new();
        // 3 of 5 pages fetchable, 2 blocked.
        let fetcher = MockFetcher::new()
            .with_body("https://example.com/a", page_of_len(300))
            .with_body("https://example.com/b", page_of_len(300))
            .with_body("https://example.com/c", page_of_len(300));

        let request = BatchRequest::new(urls(&["/a", "/b", "/x", "/c", "/y"]), "user-1");
        let summary = ingest_batch(
            &request,
            &ScrapeConfig::default(),
            &store,
            &analyzer,
            &fetcher,
            |_| {},
        )
        .await;

        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.succeeded + summary.failed, summary.total);
        assert_eq!(summary.status(), BatchStatus::CompletedWithFailures { failed: 2 });
        assert_eq!(store.count(), 3);
    }

    #[tokio::test]
    async fn test_all_blocked_is_hard_failure() {
        let store = MemoryStore::new();
        let analyzer = MockAnalyzer::new();
        let fetcher = MockFetcher::new();

        let request = BatchRequest::new(urls(&["/a", "/b"]), "user-1");
        let summary = ingest_batch(
            &request,
            &ScrapeConfig::default(),
            &store,
            &analyzer,
            &fetcher,
            |_| {},
        )
        .await;

        assert_eq!(summary.status(), BatchStatus::AllFailed);
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_full_success() {
        let store = MemoryStore::new();
        let analyzer = MockAnalyzer::new();
        let fetcher = MockFetcher::new()
            .with_body("https://example.com/a", page_of_len(200))
            .with_body("https://example.com/b", page_of_len(200));

        let request = BatchRequest::new(urls(&["/a", "/b"]), "user-1");
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
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn test_progress_monotonic_and_complete() {
        let store = MemoryStore::new();
        let analyzer = MockAnalyzer::new();
        let fetcher = MockFetcher::new()
            .with_body("https://example.com/a", page_of_len(200));

        let request = BatchRequest::new(urls(&["/a", "/b", "/c"]), "user-1");
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

        assert_eq!(events.len(), 3);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.completed, i + 1);
            assert_eq!(event.total, 3);
        }
        assert_eq!(events.last().unwrap().completed, summary.total);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let store = MemoryStore::new();
        let analyzer = MockAnalyzer::new();
        let fetcher = MockFetcher::new();

        let request = BatchRequest::new(Vec::new(), "user-1");
        let mut fired = 0;
        let summary = ingest_batch(
            &request,
            &ScrapeConfig::default(),
            &store,
            &analyzer,
            &fetcher,
            |_| fired += 1,
        )
        .await;

        assert_eq!(summary.status(), BatchStatus::Completed);
        assert_eq!(fired, 0);
    }

    #[tokio::test]
    async fn test_from_session_preserves_selection_order() {
        let mut session = DiscoverySession::new(vec![
            crate::types::DiscoveredLink::new("https://example.com/a", "A"),
            crate::types::DiscoveredLink::new("https://example.com/b", "B"),
        ]);
        session.select("https://example.com/b");
        session.select("https://example.com/a");

        let request = BatchRequest::from_session(&session, "user-1");
        assert_eq!(
            request.urls,
            vec!["https://example.com/b", "https://example.com/a"]
        );
    }
}
