//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the ingestion
//! library without making real AI or network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{AnalysisError, AnalysisResult};
use crate::traits::{Analyzer, PageFetcher};
use crate::types::{DiscoveredLink, WebAnalysis};
use crate::urls::normalize_url;

/// An HTML page whose extracted text is exactly `len` characters.
///
/// Handy for exercising the usable-content threshold precisely.
pub fn page_of_len(len: usize) -> String {
    format!(
        "<html><body><main>{}</main></body></html>",
        "x".repeat(len)
    )
}

/// Record of a call made to the mock analyzer.
#[derive(Debug, Clone)]
pub enum MockAnalyzerCall {
    AnalyzeWebContent { url: String, text_len: usize },
    AnalyzeExternalUrl { url: String },
    DiscoverSiteLinks { domain: String },
    PredictCommonLinks { domain: String },
    FilterAndTitleLinks { domain: String, url_count: usize },
}

/// A mock analyzer with canned responses and failure injection.
///
/// Returns deterministic, configurable responses for every collaborator
/// call and records each call for assertions.
#[derive(Default)]
pub struct MockAnalyzer {
    analyses: Arc<RwLock<HashMap<String, WebAnalysis>>>,
    discovered: Arc<RwLock<HashMap<String, Vec<DiscoveredLink>>>>,
    predicted: Arc<RwLock<HashMap<String, Vec<DiscoveredLink>>>>,
    curated: Arc<RwLock<HashMap<String, Vec<DiscoveredLink>>>>,
    fail_analysis: Arc<RwLock<bool>>,
    fail_discovery: Arc<RwLock<bool>>,
    fail_curation: Arc<RwLock<bool>>,
    delay: Arc<RwLock<Option<Duration>>>,
    calls: Arc<RwLock<Vec<MockAnalyzerCall>>>,
}

impl MockAnalyzer {
    /// Create a mock with default behavior (everything succeeds with
    /// generated values).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a canned analysis for a URL.
    pub fn with_analysis(self, url: impl Into<String>, analysis: WebAnalysis) -> Self {
        self.analyses.write().unwrap().insert(url.into(), analysis);
        self
    }

    /// Set canned search-grounded discovery results for a domain.
    pub fn with_discovered(self, domain: impl Into<String>, links: Vec<DiscoveredLink>) -> Self {
        self.discovered.write().unwrap().insert(domain.into(), links);
        self
    }

    /// Set canned predicted links for a domain.
    pub fn with_predicted(self, domain: impl Into<String>, links: Vec<DiscoveredLink>) -> Self {
        self.predicted.write().unwrap().insert(domain.into(), links);
        self
    }

    /// Set canned curation output for a context URL.
    pub fn with_curated(self, context: impl Into<String>, links: Vec<DiscoveredLink>) -> Self {
        self.curated.write().unwrap().insert(context.into(), links);
        self
    }

    /// Make every analysis call fail.
    pub fn fail_analysis(self) -> Self {
        *self.fail_analysis.write().unwrap() = true;
        self
    }

    /// Make every discovery call fail.
    pub fn fail_discovery(self) -> Self {
        *self.fail_discovery.write().unwrap() = true;
        self
    }

    /// Make every curation call fail.
    pub fn fail_curation(self) -> Self {
        *self.fail_curation.write().unwrap() = true;
        self
    }

    /// Delay every analysis call (for timeout tests).
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write().unwrap() = Some(delay);
        self
    }

    /// All calls made to this mock.
    pub fn calls(&self) -> Vec<MockAnalyzerCall> {
        self.calls.read().unwrap().clone()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn record(&self, call: MockAnalyzerCall) {
        self.calls.write().unwrap().push(call);
    }

    async fn maybe_delay(&self) {
        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn default_analysis(url: &str) -> WebAnalysis {
        WebAnalysis {
            title: None,
            transcription: format!("Transcription of content at {url}"),
            summary: format!("Summary of {url}"),
            keywords: vec!["mock".to_string()],
            scraped_data: None,
        }
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze_web_content(
        &self,
        text: &str,
        _instruction: &str,
        url: &str,
    ) -> AnalysisResult<WebAnalysis> {
        self.record(MockAnalyzerCall::AnalyzeWebContent {
            url: url.to_string(),
            text_len: text.chars().count(),
        });
        self.maybe_delay().await;

        if *self.fail_analysis.read().unwrap() {
            return Err(AnalysisError::Malformed("mock analysis failure".into()));
        }

        Ok(self
            .analyses
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Self::default_analysis(url)))
    }

    async fn analyze_external_url(
        &self,
        url: &str,
        _instruction: &str,
    ) -> AnalysisResult<WebAnalysis> {
        self.record(MockAnalyzerCall::AnalyzeExternalUrl {
            url: url.to_string(),
        });
        self.maybe_delay().await;

        if *self.fail_analysis.read().unwrap() {
            return Err(AnalysisError::Malformed("mock analysis failure".into()));
        }

        Ok(self
            .analyses
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Self::default_analysis(url)))
    }

    async fn discover_site_links(&self, domain: &str) -> AnalysisResult<Vec<DiscoveredLink>> {
        self.record(MockAnalyzerCall::DiscoverSiteLinks {
            domain: domain.to_string(),
        });

        if *self.fail_discovery.read().unwrap() {
            return Err(AnalysisError::Request("mock discovery failure".into()));
        }

        Ok(self
            .discovered
            .read()
            .unwrap()
            .get(domain)
            .cloned()
            .unwrap_or_default())
    }

    async fn predict_common_links(&self, domain: &str) -> AnalysisResult<Vec<DiscoveredLink>> {
        self.record(MockAnalyzerCall::PredictCommonLinks {
            domain: domain.to_string(),
        });

        if *self.fail_discovery.read().unwrap() {
            return Err(AnalysisError::Request("mock prediction failure".into()));
        }

        Ok(self
            .predicted
            .read()
            .unwrap()
            .get(domain)
            .cloned()
            .unwrap_or_default())
    }

    async fn filter_and_title_links(
        &self,
        urls: &[String],
        domain: &str,
    ) -> AnalysisResult<Vec<DiscoveredLink>> {
        self.record(MockAnalyzerCall::FilterAndTitleLinks {
            domain: domain.to_string(),
            url_count: urls.len(),
        });

        if *self.fail_curation.read().unwrap() {
            return Err(AnalysisError::Request("mock curation failure".into()));
        }

        // Canned output when configured, otherwise pass candidates through
        // with generated titles.
        Ok(self
            .curated
            .read()
            .unwrap()
            .get(domain)
            .cloned()
            .unwrap_or_else(|| {
                urls.iter()
                    .map(|url| {
                        DiscoveredLink::new(url.clone(), crate::urls::title_from_url(url))
                    })
                    .collect()
            }))
    }
}

/// A mock page fetcher with canned bodies.
///
/// URLs without a configured body (or explicitly marked blocked) return
/// `None`, matching the fetcher's "blocked" contract. Keys are normalized
/// so tests can configure `example.com/a` and fetch `https://example.com/a`.
#[derive(Default)]
pub struct MockFetcher {
    bodies: Arc<RwLock<HashMap<String, String>>>,
    blocked: Arc<RwLock<Vec<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a mock with no fetchable pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body returned for a URL.
    pub fn with_body(self, url: impl AsRef<str>, body: impl Into<String>) -> Self {
        self.bodies
            .write()
            .unwrap()
            .insert(normalize_url(url.as_ref()), body.into());
        self
    }

    /// Explicitly block a URL even if a body was configured.
    pub fn block(self, url: impl AsRef<str>) -> Self {
        self.blocked
            .write()
            .unwrap()
            .push(normalize_url(url.as_ref()));
        self
    }

    /// URLs fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Option<String> {
        let key = normalize_url(url);
        self.calls.write().unwrap().push(key.clone());

        if self.blocked.read().unwrap().contains(&key) {
            return None;
        }
        self.bodies.read().unwrap().get(&key).cloned()
    }
}

/// Builder for common test scenarios.
pub struct TestScenario {
    analyzer: MockAnalyzer,
    fetcher: MockFetcher,
}

impl Default for TestScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl TestScenario {
    /// Create an empty scenario.
    pub fn new() -> Self {
        Self {
            analyzer: MockAnalyzer::new(),
            fetcher: MockFetcher::new(),
        }
    }

    /// Add a site with fetchable pages, keyed by path.
    pub fn with_site(mut self, site_url: &str, pages: Vec<(&str, &str)>) -> Self {
        for (path, body) in pages {
            let url = format!("{}{}", site_url.trim_end_matches('/'), path);
            self.fetcher = self.fetcher.with_body(url, body);
        }
        self
    }

    /// Get both mocks.
    pub fn build(self) -> (MockAnalyzer, MockFetcher) {
        (self.analyzer, self.fetcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fetcher_normalizes_keys() {
        let fetcher = MockFetcher::new().with_body("example.com/a", "body");
        assert_eq!(
            fetcher.fetch_text("https://example.com/a").await.as_deref(),
            Some("body")
        );
        assert!(fetcher.fetch_text("https://example.com/b").await.is_none());
    }

    #[tokio::test]
    async fn test_mock_fetcher_block_overrides_body() {
        let fetcher = MockFetcher::new()
            .with_body("https://example.com/a", "body")
            .block("https://example.com/a");
        assert!(fetcher.fetch_text("https://example.com/a").await.is_none());
    }

    #[tokio::test]
    async fn test_mock_analyzer_records_calls() {
        let analyzer = MockAnalyzer::new();
        analyzer
            .analyze_web_content("some text", "", "https://example.com")
            .await
            .unwrap();

        let calls = analyzer.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            MockAnalyzerCall::AnalyzeWebContent { text_len: 9, .. }
        ));
    }

    #[tokio::test]
    async fn test_mock_analyzer_curation_passthrough() {
        let analyzer = MockAnalyzer::new();
        let urls = vec!["https://example.com/blog/rust-tips".to_string()];
        let links = analyzer
            .filter_and_title_links(&urls, "example.com")
            .await
            .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "rust tips");
    }

    #[test]
    fn test_page_of_len_extracts_exact_length() {
        let text = crate::extract::extract_text(&page_of_len(99), None);
        assert_eq!(text.chars().count(), 99);
    }

    #[tokio::test]
    async fn test_scenario_builder() {
        let (analyzer, fetcher) = TestScenario::new()
            .with_site(
                "https://example.com",
                vec![("/a", "<body>Alpha page</body>"), ("/b", "<body>Beta page</body>")],
            )
            .build();

        assert!(fetcher.fetch_text("https://example.com/a").await.is_some());
        let analysis = analyzer
            .analyze_web_content("text", "", "https://example.com/a")
            .await
            .unwrap();
        assert!(!analysis.summary.is_empty());
    }
}
