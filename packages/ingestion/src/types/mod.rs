//! Data types for the ingestion pipeline.

pub mod analysis;
pub mod config;
pub mod item;
pub mod link;
pub mod outcome;
pub mod session;

pub use analysis::WebAnalysis;
pub use config::{DiscoveryConfig, ScrapeConfig};
pub use item::{ItemKind, KnowledgeItem};
pub use link::DiscoveredLink;
pub use outcome::{BatchStatus, BatchSummary, IngestOutcome, Progress};
pub use session::DiscoverySession;
