//! The ingestion pipeline.
//!
//! - discovery: the three-phase link discovery cascade
//! - curation: best-effort filtering/titling of raw URL candidates
//! - scrape: the single-URL fetch -> extract -> analyze -> persist flow
//! - batch: the sequential multi-URL driver with outcome accounting

pub mod batch;
pub mod curate;
pub mod discover;
pub mod scrape;

pub use batch::{ingest_batch, BatchRequest};
pub use curate::curate_links;
pub use discover::{discover_links, DiscoveryReport, DiscoverySource};
pub use scrape::{ingest_external_url, scrape_one, ScrapeRequest};
