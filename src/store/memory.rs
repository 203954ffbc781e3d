//! In-process entry log, used by handler tests

use async_trait::async_trait;
use hyper::body::Bytes;
use tokio::sync::RwLock;

use super::{trailing_slice, EntryStore, Record, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<Option<Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn append(&self, record: Record) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .get_or_insert_with(Vec::new)
            .push(record);
        Ok(())
    }

    async fn read_recent(&self, limit: i64) -> Result<Vec<Record>, StoreError> {
        let entries = self.entries.read().await;
        let entries = entries.as_deref().unwrap_or_default();
        Ok(trailing_slice(entries, limit).to_vec())
    }

    async fn read_raw(&self) -> Result<Option<Bytes>, StoreError> {
        match self.entries.read().await.as_ref() {
            Some(entries) => Ok(Some(Bytes::from(serde_json::to_vec_pretty(entries)?))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_append_and_read() {
        let store = MemoryStore::new();
        assert!(store.read_raw().await.unwrap().is_none());

        store.append(json!("a")).await.unwrap();
        store.append(json!("b")).await.unwrap();

        assert_eq!(store.read_recent(1).await.unwrap(), vec![json!("b")]);
        let raw = store.read_raw().await.unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(parsed, json!(["a", "b"]));
    }
}
