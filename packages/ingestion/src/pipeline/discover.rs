//! Link discovery - a three-phase fallback cascade.
//!
//! Real sites vary wildly in crawlability, so discovery trades precision
//! for availability: search-grounded discovery first, a DOM-anchor crawl
//! of the homepage when search comes up short, and model-predicted common
//! paths as the last resort. Each phase is strictly more speculative than
//! the one before it.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::pipeline::curate::curate_links;
use crate::traits::{Analyzer, PageFetcher};
use crate::types::{DiscoveredLink, DiscoveryConfig};
use crate::urls::{dedup_links, normalize_url, same_host};

/// The deepest cascade phase that contributed links to a discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverySource {
    /// Search-grounded AI discovery.
    Search,

    /// DOM-anchor crawl of the homepage.
    Crawl,

    /// Model-predicted common paths, no network access.
    Prediction,
}

/// Result of a successful discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// De-duplicated candidate links.
    pub links: Vec<DiscoveredLink>,

    /// Deepest phase that contributed.
    pub source: DiscoverySource,
}

/// Run the discovery cascade for a domain.
///
/// Phase errors are absorbed and the cascade continues; they only surface
/// when the whole run ends with zero links, in which case the outcome
/// distinguishes "every phase ran cleanly and found nothing"
/// ([`DiscoveryError::NoLinks`]) from "at least one phase errored"
/// ([`DiscoveryError::Failed`]).
pub async fn discover_links<A, F>(
    domain_url: &str,
    config: &DiscoveryConfig,
    analyzer: &A,
    fetcher: &F,
) -> DiscoveryResult<DiscoveryReport>
where
    A: Analyzer,
    F: PageFetcher,
{
    let base = normalize_url(domain_url);
    let Some(host) = Url::parse(&base).ok().and_then(|u| u.host_str().map(String::from)) else {
        // Host filtering is load-bearing in phases 1-2; without a parseable
        // host the cascade cannot produce a meaningful result.
        return Err(DiscoveryError::Failed {
            domain: domain_url.to_string(),
            reason: "domain URL has no parseable host".to_string(),
        });
    };

    info!(domain = %host, "starting link discovery cascade");

    let mut links: Vec<DiscoveredLink> = Vec::new();
    let mut deepest: Option<DiscoverySource> = None;
    let mut phase_errors: Vec<String> = Vec::new();

    // Phase 1: search-grounded discovery.
    match analyzer.discover_site_links(&host).await {
        Ok(found) => {
            let on_domain: Vec<DiscoveredLink> = found
                .into_iter()
                .filter(|l| link_on_host(&l.url, &host))
                .collect();
            debug!(domain = %host, found = on_domain.len(), "search-grounded phase finished");
            if !on_domain.is_empty() {
                links.extend(on_domain);
                deepest = Some(DiscoverySource::Search);
            }
        }
        Err(e) => {
            warn!(domain = %host, error = %e, "search-grounded discovery failed");
            phase_errors.push(format!("search: {e}"));
        }
    }
    links = dedup_links(links);

    // Phase 2: DOM-anchor crawl of the homepage.
    if links.len() < config.min_links {
        match fetcher.fetch_text(&base).await {
            Some(html) => {
                let mut raw = extract_anchor_urls(&html, &base, &host);
                raw.truncate(config.max_raw_links);
                debug!(domain = %host, anchors = raw.len(), "homepage anchors collected");

                let curated =
                    curate_links(raw, &base, config.curated_limit, analyzer).await;
                if !curated.is_empty() {
                    links.extend(curated);
                    links = dedup_links(links);
                    deepest = Some(DiscoverySource::Crawl);
                }
            }
            None => {
                warn!(domain = %host, "homepage fetch blocked, skipping crawl phase");
                phase_errors.push("crawl: homepage fetch blocked".to_string());
            }
        }
    }

    // Phase 3: prediction, only when everything else surfaced nothing.
    if links.is_empty() {
        match analyzer.predict_common_links(&host).await {
            Ok(predicted) => {
                debug!(domain = %host, predicted = predicted.len(), "prediction phase finished");
                if !predicted.is_empty() {
                    links.extend(predicted);
                    links = dedup_links(links);
                    deepest = Some(DiscoverySource::Prediction);
                }
            }
            Err(e) => {
                warn!(domain = %host, error = %e, "prediction fallback failed");
                phase_errors.push(format!("prediction: {e}"));
            }
        }
    }

    match deepest {
        Some(source) if !links.is_empty() => {
            info!(domain = %host, links = links.len(), source = ?source, "discovery finished");
            Ok(DiscoveryReport { links, source })
        }
        _ if !phase_errors.is_empty() => Err(DiscoveryError::Failed {
            domain: host,
            reason: phase_errors.join("; "),
        }),
        _ => Err(DiscoveryError::NoLinks { domain: host }),
    }
}

/// Pull candidate content URLs out of homepage anchors.
///
/// Resolves each `href` against the base, keeps same-host URLs only
/// (`www.`-insensitive), and drops fragment-only hrefs plus anything no
/// longer than the base URL - those are the homepage itself or chrome
/// links, not deep content.
fn extract_anchor_urls(html: &str, base: &str, host: &str) -> Vec<String> {
    let Ok(base_url) = Url::parse(base) else {
        return Vec::new();
    };
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut urls = Vec::new();

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.starts_with('#') {
            continue;
        }
        let Ok(resolved) = base_url.join(href) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        let Some(resolved_host) = resolved.host_str() else {
            continue;
        };
        if !same_host(resolved_host, host) {
            continue;
        }
        let resolved = resolved.to_string();
        if resolved.len() <= base.len() {
            continue;
        }
        urls.push(resolved);
    }

    urls
}

fn link_on_host(url: &str, host: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| same_host(h, host)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockAnalyzer, MockAnalyzerCall, MockFetcher};

    fn homepage_with_anchors(count: usize) -> String {
        let anchors: String = (0..count)
            .map(|i| format!(r#"<a href="/articles/post-{i}">Post {i}</a>"#))
            .collect();
        format!("<html><body>{anchors}</body></html>")
    }

    #[tokio::test]
    async fn test_search_phase_sufficient_skips_rest() {
        let found: Vec<DiscoveredLink> = (0..6)
            .map(|i| DiscoveredLink::new(format!("https://example.com/a{i}"), format!("A{i}")))
            .collect();
        let analyzer = MockAnalyzer::new().with_discovered("example.com", found);
        let fetcher = MockFetcher::new();

        let report = discover_links(
            "example.com",
            &DiscoveryConfig::default(),
            &analyzer,
            &fetcher,
        )
        .await
        .unwrap();

        assert_eq!(report.source, DiscoverySource::Search);
        assert_eq!(report.links.len(), 6);
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_results_filtered_to_domain() {
        let found = vec![
            DiscoveredLink::new("https://example.com/keep", "Keep"),
            DiscoveredLink::new("https://other.com/drop", "Drop"),
            DiscoveredLink::new("https://www.example.com/keep-www", "Keep www"),
        ];
        let analyzer = MockAnalyzer::new()
            .with_discovered("example.com", found)
            .with_curated("https://example.com/", Vec::new());
        let fetcher = MockFetcher::new();

        // Two on-domain links is below min_links, so the crawl phase runs
        // (and finds a blocked homepage); the search links still win out.
        let report = discover_links(
            "example.com",
            &DiscoveryConfig::default(),
            &analyzer,
            &fetcher,
        )
        .await
        .unwrap();

        assert_eq!(report.links.len(), 2);
        assert!(report.links.iter().all(|l| !l.url.contains("other.com")));
    }

    #[tokio::test]
    async fn test_crawl_fallback_without_prediction() {
        // Scenario: search finds nothing, homepage has 20 in-domain anchors.
        let curated: Vec<DiscoveredLink> = (0..8)
            .map(|i| {
                DiscoveredLink::new(format!("https://example.com/articles/post-{i}"), format!("Post {i}"))
            })
            .collect();
        let analyzer = MockAnalyzer::new()
            .with_discovered("example.com", Vec::new())
            .with_curated("https://example.com/", curated);
        let fetcher =
            MockFetcher::new().with_body("https://example.com/", homepage_with_anchors(20));

        let report = discover_links(
            "https://example.com",
            &DiscoveryConfig::default(),
            &analyzer,
            &fetcher,
        )
        .await
        .unwrap();

        assert_eq!(report.source, DiscoverySource::Crawl);
        assert!(!report.links.is_empty());
        assert!(!analyzer
            .calls()
            .iter()
            .any(|c| matches!(c, MockAnalyzerCall::PredictCommonLinks { .. })));
    }

    #[tokio::test]
    async fn test_prediction_last_resort() {
        let analyzer = MockAnalyzer::new()
            .with_discovered("example.com", Vec::new())
            .with_predicted(
                "example.com",
                vec![DiscoveredLink::new("https://example.com/blog", "Blog")],
            );
        let fetcher = MockFetcher::new(); // homepage blocked

        let report = discover_links(
            "example.com",
            &DiscoveryConfig::default(),
            &analyzer,
            &fetcher,
        )
        .await
        .unwrap();

        assert_eq!(report.source, DiscoverySource::Prediction);
        assert_eq!(report.links.len(), 1);
    }

    #[tokio::test]
    async fn test_clean_empty_run_is_no_links() {
        let analyzer = MockAnalyzer::new()
            .with_discovered("example.com", Vec::new())
            .with_predicted("example.com", Vec::new())
            .with_curated("https://example.com/", Vec::new());
        let fetcher =
            MockFetcher::new().with_body("https://example.com/", homepage_with_anchors(3));

        let err = discover_links(
            "example.com",
            &DiscoveryConfig::default(),
            &analyzer,
            &fetcher,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DiscoveryError::NoLinks { .. }));
    }

    #[tokio::test]
    async fn test_errored_empty_run_is_failed() {
        let analyzer = MockAnalyzer::new()
            .fail_discovery()
            .with_predicted("example.com", Vec::new());
        let fetcher = MockFetcher::new(); // homepage blocked too

        let err = discover_links(
            "example.com",
            &DiscoveryConfig::default(),
            &analyzer,
            &fetcher,
        )
        .await
        .unwrap_err();

        match err {
            DiscoveryError::Failed { reason, .. } => {
                assert!(reason.contains("search"));
                assert!(reason.contains("homepage fetch blocked"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_domain_fails_up_front() {
        let analyzer = MockAnalyzer::new();
        let fetcher = MockFetcher::new();

        let err = discover_links("ht tp://???", &DiscoveryConfig::default(), &analyzer, &fetcher)
            .await
            .unwrap_err();

        assert!(matches!(err, DiscoveryError::Failed { .. }));
        assert!(analyzer.calls().is_empty());
    }

    #[test]
    fn test_anchor_extraction_filters() {
        let html = r##"
            <a href="/articles/deep-post">Deep</a>
            <a href="https://www.example.com/docs/guide">Guide</a>
            <a href="https://other.com/external">External</a>
            <a href="#section">Fragment</a>
            <a href="mailto:hi@example.com">Mail</a>
            <a href="/">Root</a>
        "##;

        let urls = extract_anchor_urls(html, "https://example.com/", "example.com");
        assert_eq!(
            urls,
            vec![
                "https://example.com/articles/deep-post",
                "https://www.example.com/docs/guide",
            ]
        );
    }
}
