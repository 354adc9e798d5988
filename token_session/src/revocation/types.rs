use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::errors::StorageError;

/// Key-value store that lets the server shorten the life of a rotated-out token.
///
/// It is an assist layer, not the source of truth: tokens are self-contained
/// and verify without it. Implementations do their own locking and may be
/// called concurrently for the same key; `insert` is last-writer-wins.
#[async_trait]
pub trait RevocationStore: Send + Sync + 'static {
    /// Initialize the store. This is called when the store is created.
    async fn init(&self) -> Result<(), StorageError>;

    /// Store `value` under `key` with the store's entry TTL.
    async fn insert(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set or shorten the TTL of an existing entry. Absent keys are a no-op.
    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub(super) struct MemoryEntry {
    pub(super) value: String,
    pub(super) expires_at: Instant,
}

#[derive(Debug)]
pub struct InMemoryRevocationStore {
    pub(super) entries: RwLock<HashMap<String, MemoryEntry>>,
    pub(super) entry_ttl: Duration,
}

pub struct RedisRevocationStore {
    pub(super) client: redis::Client,
    pub(super) entry_ttl: Duration,
}
