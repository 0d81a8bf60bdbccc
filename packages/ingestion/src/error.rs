//! Typed errors for the ingestion library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Every error here is
//! recoverable at its call site: scrape failures become counters in a
//! batch summary and discovery failures become a user-facing message.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while scraping a single URL into the library.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Every relay was exhausted without yielding acceptable content.
    #[error("fetch blocked: no relay returned usable content for {url}")]
    FetchBlocked { url: String },

    /// Extracted text was too short to analyze.
    #[error("empty content: extracted {got} characters from {url} (minimum {min})")]
    EmptyContent { url: String, got: usize, min: usize },

    /// The analysis collaborator failed, timed out, or returned malformed data.
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Persisting the finished item failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ScrapeError {
    /// Coarse classification recorded in per-URL batch outcomes.
    pub fn kind(&self) -> FailureKind {
        match self {
            ScrapeError::FetchBlocked { .. } => FailureKind::FetchBlocked,
            ScrapeError::EmptyContent { .. } => FailureKind::EmptyContent,
            ScrapeError::Analysis(_) => FailureKind::Analysis,
            ScrapeError::Storage(_) => FailureKind::Storage,
        }
    }
}

/// Coarse failure classification for per-URL outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No relay yielded acceptable content.
    FetchBlocked,

    /// Extracted text too short to be useful.
    EmptyContent,

    /// The AI call errored, timed out, or returned malformed data.
    Analysis,

    /// The store rejected the write.
    Storage,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::FetchBlocked => "fetch blocked",
            FailureKind::EmptyContent => "empty content",
            FailureKind::Analysis => "analysis failed",
            FailureKind::Storage => "storage failed",
        };
        f.write_str(s)
    }
}

/// Errors from the analysis collaborator.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Transport-level failure reaching the model service.
    #[error("analysis request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The model responded with something that does not parse into the
    /// declared shape.
    #[error("malformed analysis response: {0}")]
    Malformed(String),

    /// The analysis call exceeded its deadline.
    #[error("analysis timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The collaborator was never configured (missing key, bad endpoint).
    #[error("analysis not configured: {0}")]
    Config(String),
}

/// Outcome of the discovery cascade when it surfaces no links.
///
/// "No links found" and "discovery errored" stay distinguishable so callers
/// can message them differently.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Every phase ran cleanly and surfaced nothing.
    #[error("no links discovered for {domain}")]
    NoLinks { domain: String },

    /// Zero links and at least one phase errored along the way.
    #[error("discovery failed for {domain}: {reason}")]
    Failed { domain: String, reason: String },
}

/// Errors from the item store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected the operation.
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// No item with the given id.
    #[error("item not found: {id}")]
    NotFound { id: String },
}

/// Result type alias for scrape operations.
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for analysis collaborator calls.
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

/// Result type alias for discovery operations.
pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
