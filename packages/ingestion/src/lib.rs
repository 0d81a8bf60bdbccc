//! Web Ingestion Pipeline
//!
//! A library for ingesting web content into a personal searchable
//! knowledge library: discover content links on a domain, scrape selected
//! pages through rotating public CORS relays, extract readable text, have
//! an AI model produce transcription/summary/keyword metadata, and persist
//! the result.
//!
//! # Design
//!
//! - Collaborators behind traits: [`Analyzer`] (the AI boundary),
//!   [`PageFetcher`] (the network), [`ItemStore`] (persistence); the
//!   pipeline functions are generic over all three.
//! - Failure is data, not control flow: a blocked fetch is `None`, a
//!   failed scrape is a counter in a [`BatchSummary`], and "no links
//!   found" stays distinguishable from "discovery errored".
//! - Strictly sequential batches: free relays and model backends both
//!   rate-limit, so one in-flight scrape at a time is the contract.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ingestion::{discover_links, ingest_batch, BatchRequest, DiscoveryConfig,
//!                 MemoryStore, ProxyFetcher, ScrapeConfig};
//! use ingestion::ai::GeminiAnalyzer;
//!
//! let analyzer = GeminiAnalyzer::from_env()?;
//! let fetcher = ProxyFetcher::new();
//! let store = MemoryStore::new();
//!
//! let report = discover_links("example.com", &DiscoveryConfig::default(), &analyzer, &fetcher).await?;
//! let request = BatchRequest::new(report.links.iter().map(|l| l.url.clone()).collect(), "user-1");
//! let summary = ingest_batch(&request, &ScrapeConfig::default(), &store, &analyzer, &fetcher, |p| {
//!     println!("{}/{}", p.completed, p.total);
//! }).await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - collaborator abstractions (Analyzer, PageFetcher, ItemStore)
//! - [`types`] - data types (links, items, sessions, outcomes, config)
//! - [`pipeline`] - discovery cascade, curation, scrape, and batch driver
//! - [`fetch`] - the proxy-rotating fetcher
//! - [`extract`] - HTML-to-text extraction
//! - [`ai`] - reference Gemini analyzer
//! - [`stores`] - reference storage (MemoryStore)
//! - [`testing`] - mock collaborators for applications and tests

pub mod ai;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod urls;

// Re-export core types at crate root
pub use error::{
    AnalysisError, AnalysisResult, DiscoveryError, DiscoveryResult, FailureKind, ScrapeError,
    ScrapeResult, StoreError, StoreResult,
};
pub use extract::extract_text;
pub use fetch::{ProxyEndpoint, ProxyFetcher};
pub use traits::{Analyzer, ItemStore, PageFetcher};
pub use types::{
    BatchStatus, BatchSummary, DiscoveredLink, DiscoveryConfig, DiscoverySession, IngestOutcome,
    ItemKind, KnowledgeItem, Progress, ScrapeConfig, WebAnalysis,
};

// Re-export pipeline entry points
pub use pipeline::{
    curate_links, discover_links, ingest_batch, ingest_external_url, scrape_one, BatchRequest,
    DiscoveryReport, DiscoverySource, ScrapeRequest,
};

// Re-export stores
pub use stores::MemoryStore;

// Re-export testing utilities
pub use testing::{MockAnalyzer, MockFetcher, TestScenario};
