//! Fetcher trait - the seam between the pipeline and the network.

use async_trait::async_trait;

/// Retrieves the raw content of a remote URL.
///
/// `None` means "blocked": every fetch strategy was exhausted without
/// acceptable content. That is a normal, expected outcome - the trait
/// never errors - so discovery and scraping can be driven by a mock that
/// simply withholds bodies.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw text content of `url`, or `None` when blocked.
    async fn fetch_text(&self, url: &str) -> Option<String>;
}
