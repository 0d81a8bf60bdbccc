//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::ItemStore;
use crate::types::KnowledgeItem;

/// In-memory knowledge item store.
///
/// Useful for testing and development. Not suitable for production as
/// data is lost on restart.
pub struct MemoryStore {
    items: RwLock<HashMap<String, KnowledgeItem>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Clear all stored items.
    pub fn clear(&self) {
        self.items.write().unwrap().clear();
    }

    /// Number of stored items.
    pub fn count(&self) -> usize {
        self.items.read().unwrap().len()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn save(&self, item: &KnowledgeItem) -> StoreResult<()> {
        self.items
            .write()
            .unwrap()
            .insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<KnowledgeItem>> {
        Ok(self.items.read().unwrap().get(id).cloned())
    }

    async fn get_all(&self, user_id: &str) -> StoreResult<Vec<KnowledgeItem>> {
        let mut items: Vec<KnowledgeItem> = self
            .items
            .read()
            .unwrap()
            .values()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect();
        // Newest first, matching how a library view lists entries.
        items.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(items)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.items
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}
