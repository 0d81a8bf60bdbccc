//! Configuration for discovery and scraping.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning knobs for the link discovery cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// A later cascade phase runs only while fewer than this many links
    /// have accumulated.
    pub min_links: usize,

    /// Cap on raw anchor candidates handed to curation.
    pub max_raw_links: usize,

    /// Upper bound on the curated candidate set.
    pub curated_limit: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            min_links: 5,
            max_raw_links: 200,
            curated_limit: 25,
        }
    }
}

impl DiscoveryConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the phase-advance threshold.
    pub fn with_min_links(mut self, min_links: usize) -> Self {
        self.min_links = min_links;
        self
    }

    /// Set the raw anchor cap.
    pub fn with_max_raw_links(mut self, max_raw_links: usize) -> Self {
        self.max_raw_links = max_raw_links;
        self
    }

    /// Set the curated bound (sensible range 15-40).
    pub fn with_curated_limit(mut self, curated_limit: usize) -> Self {
        self.curated_limit = curated_limit;
        self
    }
}

/// Tuning knobs for single-URL scraping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Extracted text shorter than this is not a usable scrape.
    pub min_content_len: usize,

    /// Deadline for one analysis collaborator call.
    #[serde(with = "duration_secs")]
    pub analysis_timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            min_content_len: 100,
            analysis_timeout: Duration::from_secs(60),
        }
    }
}

impl ScrapeConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum usable content length.
    pub fn with_min_content_len(mut self, min: usize) -> Self {
        self.min_content_len = min;
        self
    }

    /// Set the analysis deadline.
    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
