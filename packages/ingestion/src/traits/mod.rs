//! Collaborator trait abstractions.
//!
//! The pipeline depends on three seams, each implemented by applications
//! (or by the reference implementations this crate ships):
//! - `Analyzer` - the AI call boundary
//! - `PageFetcher` - raw page retrieval
//! - `ItemStore` - knowledge item persistence

pub mod analyzer;
pub mod fetcher;
pub mod store;

pub use analyzer::Analyzer;
pub use fetcher::PageFetcher;
pub use store::ItemStore;
