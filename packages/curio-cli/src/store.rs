//! JSON-file knowledge item store.
//!
//! One JSON document on disk, rewritten on every mutation. Fine for a
//! personal library of hundreds of items; not a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use ingestion::{ItemStore, KnowledgeItem, StoreError, StoreResult};

/// File-backed item store keyed by item id.
pub struct JsonFileStore {
    path: PathBuf,
    items: RwLock<HashMap<String, KnowledgeItem>>,
}

impl JsonFileStore {
    /// Open a store, loading any existing library file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let items = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| StoreError::Backend(Box::new(e)))?;
            let list: Vec<KnowledgeItem> =
                serde_json::from_str(&raw).map_err(|e| StoreError::Backend(Box::new(e)))?;
            list.into_iter().map(|item| (item.id.clone(), item)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    /// Number of stored items.
    pub fn count(&self) -> usize {
        self.items.read().unwrap().len()
    }

    fn flush(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(Box::new(e)))?;
        }
        let list: Vec<KnowledgeItem> = self.items.read().unwrap().values().cloned().collect();
        let raw = serde_json::to_string_pretty(&list)
            .map_err(|e| StoreError::Backend(Box::new(e)))?;
        // Write-then-rename so an interrupted write can't corrupt the library.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw).map_err(|e| StoreError::Backend(Box::new(e)))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Backend(Box::new(e)))
    }
}

#[async_trait]
impl ItemStore for JsonFileStore {
    async fn save(&self, item: &KnowledgeItem) -> StoreResult<()> {
        self.items
            .write()
            .unwrap()
            .insert(item.id.clone(), item.clone());
        self.flush()
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
        items.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(items)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let removed = self.items.write().unwrap().remove(id);
        if removed.is_none() {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingestion::ItemKind;

    #[tokio::test]
    async fn test_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");

        let item = KnowledgeItem::new("user-1", "Saved page", ItemKind::WebScrape)
            .with_external_url("https://example.com/p");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.save(&item).await.unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.count(), 1);
        let loaded = reopened.get(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Saved page");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("library.json")).unwrap();

        let err = store.delete("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_flush_replaces_file_without_leftover_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");

        let store = JsonFileStore::open(&path).unwrap();
        let first = KnowledgeItem::new("user-1", "First", ItemKind::WebScrape);
        let second = KnowledgeItem::new("user-1", "Second", ItemKind::WebScrape);
        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();

        // Each save lands as a complete document; the intermediate temp
        // file is gone once flush returns.
        assert!(!path.with_extension("json.tmp").exists());
        let raw = std::fs::read_to_string(&path).unwrap();
        let list: Vec<KnowledgeItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("new.json")).unwrap();
        assert_eq!(store.count(), 0);
    }
}
