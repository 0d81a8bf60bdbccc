//! Discovered link type - candidate content URLs surfaced by discovery.

use serde::{Deserialize, Serialize};

/// A content link surfaced by discovery or curation.
///
/// The `url` is the unique key within a discovery session; uniqueness is
/// judged case-sensitively on the query/fragment-stripped form (see
/// [`crate::urls::dedup_links`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredLink {
    /// Absolute URL of the page.
    pub url: String,

    /// Human-readable title for the page.
    #[serde(default)]
    pub title: String,
}

impl DiscoveredLink {
    /// Create a new link.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    /// Create a link with no title yet (e.g. a raw crawl candidate).
    pub fn untitled(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
