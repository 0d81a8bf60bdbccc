//! Storage trait for knowledge items.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::KnowledgeItem;

/// Persistence collaborator for the knowledge library.
///
/// Keyed by `item.id`; writes are independent (no schema migration
/// required before a save). The pipeline hands a fully-formed item to
/// `save` and relinquishes ownership after a successful write.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist an item.
    async fn save(&self, item: &KnowledgeItem) -> StoreResult<()>;

    /// Get an item by id.
    async fn get(&self, id: &str) -> StoreResult<Option<KnowledgeItem>>;

    /// All items belonging to a user.
    async fn get_all(&self, user_id: &str) -> StoreResult<Vec<KnowledgeItem>>;

    /// Delete an item by id.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}
