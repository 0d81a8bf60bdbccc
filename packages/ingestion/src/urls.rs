//! URL normalization and deduplication helpers.
//!
//! Every component that compares URLs goes through this module so the
//! whole pipeline agrees on what "the same page" means: normalization
//! defaults the scheme, dedup strips query strings and fragments, and
//! host comparison ignores a `www.` prefix.

use url::Url;

use crate::types::DiscoveredLink;

/// Normalize a user-supplied URL.
///
/// Trims whitespace and defaults to `https://` when no scheme is present.
/// If the result still fails to parse, the trimmed raw string is returned
/// as-is; the fetch layer will reject it later. Idempotent:
/// `normalize_url(normalize_url(u)) == normalize_url(u)`.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match Url::parse(&candidate) {
        Ok(url) => url.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// The key used for deduplication: the URL with query string and fragment
/// stripped. Unparseable URLs key on their trimmed raw form.
pub fn dedup_key(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.trim().to_string(),
    }
}

/// De-duplicate links by [`dedup_key`], keeping the first-seen title for
/// each retained URL. Order of first appearance is preserved.
pub fn dedup_links(links: Vec<DiscoveredLink>) -> Vec<DiscoveredLink> {
    let mut seen = std::collections::HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(dedup_key(&link.url)))
        .collect()
}

/// Compare two hostnames ignoring a leading `www.` prefix.
pub fn same_host(a: &str, b: &str) -> bool {
    strip_www(a) == strip_www(b)
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Whether `url` is hosted on `domain_host` (`www.`-insensitive).
pub fn is_on_host(url: &str, domain_host: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| same_host(h, domain_host)))
        .unwrap_or(false)
}

/// Derive a readable fallback title from a URL's last path segment.
///
/// `https://example.com/blog/rust-tips` becomes "rust tips"; a bare root
/// URL falls back to the host name.
pub fn title_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.trim().to_string();
    };

    let segment = parsed
        .path_segments()
        .and_then(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .last()
                .map(|s| s.to_string())
        })
        .unwrap_or_default();

    if segment.is_empty() {
        return parsed.host_str().unwrap_or("").to_string();
    }

    // Drop a file extension and turn separators into spaces.
    let stem = segment.split('.').next().unwrap_or(&segment);
    stem.replace(['-', '_'], " ").trim().to_string()
}

/// Display handle for a web item: host plus path, no scheme.
pub fn display_handle(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("");
            let path = parsed.path().trim_end_matches('/');
            format!("{host}{path}")
        }
        Err(_) => url.trim().to_string(),
    }
}
