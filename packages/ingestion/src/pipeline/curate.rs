//! Link curation - semantic filtering and titling of raw candidates.

use tracing::{debug, warn};

use crate::traits::Analyzer;
use crate::types::DiscoveredLink;
use crate::urls::dedup_links;

/// Filter and title a raw URL list down to a bounded candidate set.
///
/// De-duplicates the input, delegates the semantic filtering to the
/// analyzer, then de-duplicates and truncates whatever came back - the
/// model is not trusted to respect the bound. Curation is best-effort
/// enrichment: any analyzer failure yields an empty list, never an error.
pub async fn curate_links<A: Analyzer>(
    raw_urls: Vec<String>,
    context_url: &str,
    limit: usize,
    analyzer: &A,
) -> Vec<DiscoveredLink> {
    if raw_urls.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<String> = dedup_links(
        raw_urls
            .into_iter()
            .map(DiscoveredLink::untitled)
            .collect(),
    )
    .into_iter()
    .map(|l| l.url)
    .collect();

    debug!(
        context = %context_url,
        candidates = candidates.len(),
        limit = limit,
        "curating raw links"
    );

    match analyzer.filter_and_title_links(&candidates, context_url).await {
        Ok(curated) => {
            let mut curated = dedup_links(curated);
            curated.truncate(limit);
            curated
        }
        Err(e) => {
            warn!(context = %context_url, error = %e, "link curation failed, continuing without");
            Vec::new()
        }
    }
}
