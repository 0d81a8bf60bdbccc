//! Storage implementations.
//!
//! `MemoryStore` is always available and suits tests and development;
//! durable backends live with the applications that need them (the CLI
//! ships a JSON-file store).

pub mod memory;

pub use memory::MemoryStore;
