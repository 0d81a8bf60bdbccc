//! Analyzer trait for the AI call boundary.
//!
//! The pipeline treats analysis as an opaque collaborator: it asks for
//! metadata, discovery hints, or link curation and gets back well-formed
//! values or an error. No retries or validation of the model's internal
//! correctness happen here.

use async_trait::async_trait;

use crate::error::AnalysisResult;
use crate::types::{DiscoveredLink, WebAnalysis};

/// AI collaborator the pipeline depends on.
///
/// Implementations wrap specific model providers and handle prompting and
/// response parsing. Every method must be treated as potentially slow and
/// potentially failing; callers apply their own deadlines.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Produce metadata for extracted page text.
    ///
    /// `instruction` is the user's free-form guidance for the analysis
    /// (e.g. "focus on pricing"); `url` gives the model source context.
    async fn analyze_web_content(
        &self,
        text: &str,
        instruction: &str,
        url: &str,
    ) -> AnalysisResult<WebAnalysis>;

    /// Search-grounded discovery of deep content URLs under a domain.
    ///
    /// Expected to run domain-scoped search queries (`site:domain` plus
    /// "articles"/"docs"/"index" variants) and return `{url, title}` pairs.
    /// Results may include off-domain URLs; the caller filters by host.
    async fn discover_site_links(&self, domain: &str) -> AnalysisResult<Vec<DiscoveredLink>>;

    /// Predict likely content paths from domain-name conventions alone.
    ///
    /// No network access to the target site; this is the last-resort
    /// discovery phase and explicitly the weakest.
    async fn predict_common_links(&self, domain: &str) -> AnalysisResult<Vec<DiscoveredLink>>;

    /// Filter raw candidate URLs down to a titled content subset.
    ///
    /// The model is instructed to discard non-content URLs (external
    /// domains, social widgets, login/signup/legal pages, fragment
    /// anchors) and title what remains.
    async fn filter_and_title_links(
        &self,
        urls: &[String],
        domain: &str,
    ) -> AnalysisResult<Vec<DiscoveredLink>>;

    /// Analyze an external URL directly, without scraped text.
    ///
    /// Used for the external-URL ingestion path (social media and other
    /// pages the pipeline does not scrape).
    async fn analyze_external_url(
        &self,
        url: &str,
        instruction: &str,
    ) -> AnalysisResult<WebAnalysis> {
        // Default: treat the URL itself as the content under analysis.
        self.analyze_web_content("", instruction, url).await
    }
}
