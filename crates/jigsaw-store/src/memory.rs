//! In-memory session storage for development and testing.
//!
//! A poisoned lock only means another thread panicked mid-write of a whole
//! document, so the inner map is still usable and is recovered.

use async_trait::async_trait;
use jigsaw_core::Result;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ports::SessionStore;

/// In-memory implementation of SessionStore
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    documents: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.documents.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.documents.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, id: &str, document: &str) -> Result<()> {
        self.write().insert(id.to_string(), document.to_string());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<String>> {
        Ok(self.read().get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.write().remove(id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_delete() {
        let store = MemorySessionStore::new();
        assert!(store.is_empty());

        store.save("b", "{}").await.unwrap();
        store.save("a", "[]").await.unwrap();
        store.save("a", "{\"v\":2}").await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.load("a").await.unwrap().as_deref(), Some("{\"v\":2}"));
        assert_eq!(store.list().await.unwrap(), vec!["a", "b"]);

        store.delete("a").await.unwrap();
        store.delete("missing").await.unwrap();
        assert_eq!(store.load("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_documents() {
        let store = MemorySessionStore::new();
        let other = store.clone();
        store.save("shared", "{}").await.unwrap();
        assert!(other.load("shared").await.unwrap().is_some());
    }
}
