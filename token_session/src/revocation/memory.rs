use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::errors::StorageError;
use super::types::{InMemoryRevocationStore, MemoryEntry, RevocationStore};

impl InMemoryRevocationStore {
    pub fn new(entry_ttl: Duration) -> Self {
        tracing::info!("Creating new in-memory revocation store");
        Self {
            entries: RwLock::new(HashMap::new()),
            entry_ttl,
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn insert(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at: now + self.entry_ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        }
        Ok(())
    }
}
