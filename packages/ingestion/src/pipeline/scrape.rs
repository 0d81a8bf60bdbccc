//! Single-URL ingestion - scrape and external-URL paths.

use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{AnalysisError, ScrapeError, ScrapeResult};
use crate::extract::extract_text;
use crate::traits::{Analyzer, ItemStore, PageFetcher};
use crate::types::{ItemKind, KnowledgeItem, ScrapeConfig, WebAnalysis};
use crate::urls::{display_handle, normalize_url, title_from_url};

/// One URL to ingest, with the user's analysis guidance.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// Target URL, raw as the user supplied it.
    pub url: String,

    /// Free-form analysis instruction passed to the model.
    pub instruction: String,

    /// Optional CSS selector scoping the extraction.
    pub selector: Option<String>,

    /// Owner of the resulting item.
    pub user_id: String,
}

impl ScrapeRequest {
    /// Create a request with no selector.
    pub fn new(url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            instruction: String::new(),
            selector: None,
            user_id: user_id.into(),
        }
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

/// Scrape one URL into the knowledge library.
///
/// Normalize -> fetch -> extract -> analyze (with deadline) -> persist.
/// Nothing is persisted unless every step succeeds.
pub async fn scrape_one<S, A, F>(
    request: &ScrapeRequest,
    config: &ScrapeConfig,
    store: &S,
    analyzer: &A,
    fetcher: &F,
) -> ScrapeResult<KnowledgeItem>
where
    S: ItemStore,
    A: Analyzer,
    F: PageFetcher,
{
    let url = normalize_url(&request.url);
    debug!(url = %url, "scrape starting");

    let html = fetcher
        .fetch_text(&url)
        .await
        .ok_or_else(|| ScrapeError::FetchBlocked { url: url.clone() })?;

    let text = extract_text(&html, request.selector.as_deref());
    let text_len = text.chars().count();
    if text_len < config.min_content_len {
        return Err(ScrapeError::EmptyContent {
            url,
            got: text_len,
            min: config.min_content_len,
        });
    }

    let analysis = timeout(
        config.analysis_timeout,
        analyzer.analyze_web_content(&text, &request.instruction, &url),
    )
    .await
    .map_err(|_| AnalysisError::Timeout(config.analysis_timeout))??;

    let item = build_item(&request.user_id, &url, text_len, &text, analysis, ItemKind::WebScrape);
    store.save(&item).await?;

    info!(url = %url, id = %item.id, chars = text_len, "scrape persisted");
    Ok(item)
}

/// Ingest an external URL without scraping it.
///
/// The model analyzes the URL directly (social media and other pages the
/// pipeline does not fetch); the result persists as `external/url`.
pub async fn ingest_external_url<S, A>(
    request: &ScrapeRequest,
    config: &ScrapeConfig,
    store: &S,
    analyzer: &A,
) -> ScrapeResult<KnowledgeItem>
where
    S: ItemStore,
    A: Analyzer,
{
    let url = normalize_url(&request.url);
    debug!(url = %url, "external-url ingest starting");

    let analysis = timeout(
        config.analysis_timeout,
        analyzer.analyze_external_url(&url, &request.instruction),
    )
    .await
    .map_err(|_| AnalysisError::Timeout(config.analysis_timeout))??;

    let size = analysis.transcription.chars().count();
    let item = build_item(&request.user_id, &url, size, "", analysis, ItemKind::ExternalUrl);
    store.save(&item).await?;

    info!(url = %url, id = %item.id, "external url persisted");
    Ok(item)
}

/// Assemble a KnowledgeItem from analysis output.
///
/// Title falls back to a URL-derived one; the scraped payload prefers the
/// model's structured data over the raw extracted text.
fn build_item(
    user_id: &str,
    url: &str,
    size: usize,
    extracted_text: &str,
    analysis: WebAnalysis,
    kind: ItemKind,
) -> KnowledgeItem {
    let title = analysis
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| title_from_url(url));

    let scraped_content = match analysis.scraped_data {
        Some(data) => Some(data.to_string()),
        None if !extracted_text.is_empty() => Some(extracted_text.to_string()),
        None => None,
    };

    let mut item = KnowledgeItem::new(user_id, title, kind)
        .with_file_name(display_handle(url))
        .with_size(size)
        .with_external_url(url)
        .with_transcription(analysis.transcription)
        .with_summary(analysis.summary)
        .with_keywords(analysis.keywords);

    if let Some(content) = scraped_content {
        item = item.with_scraped_content(content);
    }

    item
}
