use async_trait::async_trait;
use redis::{self, AsyncCommands};
use std::time::Duration;

use super::errors::StorageError;
use super::types::{RedisRevocationStore, RevocationStore};

const REVOCATION_PREFIX: &str = "revocation";

impl RedisRevocationStore {
    pub fn new(client: redis::Client, entry_ttl: Duration) -> Self {
        Self { client, entry_ttl }
    }

    fn make_key(key: &str) -> String {
        format!("{REVOCATION_PREFIX}:{key}")
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn init(&self) -> Result<(), StorageError> {
        // Verify the connection works
        let _conn = self.client.get_multiplexed_async_connection().await?;
        Ok(())
    }

    async fn insert(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let _: () = conn.set_ex(&key, value, self.entry_ttl.as_secs()).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let value: Option<String> = conn.get(&key).await?;
        Ok(value)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let ttl = i64::try_from(ttl_seconds)
            .map_err(|_| StorageError::Storage(format!("TTL out of range: {ttl_seconds}")))?;
        // EXPIRE returns 0 for a missing key, which is fine here
        let _: bool = conn.expire(&key, ttl).await?;
        Ok(())
    }
}
