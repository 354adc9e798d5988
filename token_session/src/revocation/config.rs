use std::env;
use std::sync::Arc;
use std::time::Duration;

use super::errors::StorageError;
use super::types::{InMemoryRevocationStore, RedisRevocationStore, RevocationStore};

const DEFAULT_STORE_TYPE: &str = "memory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevocationStoreType {
    Memory,
    Redis { url: String },
}

impl RevocationStoreType {
    pub fn from_env() -> Result<Self, StorageError> {
        let store_type =
            env::var("REVOCATION_STORE_TYPE").unwrap_or_else(|_| DEFAULT_STORE_TYPE.to_string());

        match store_type.as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => {
                let url = env::var("REVOCATION_STORE_URL").map_err(|_| {
                    StorageError::Storage(
                        "REVOCATION_STORE_URL must be set for the redis store".to_string(),
                    )
                })?;
                Ok(Self::Redis { url })
            }
            t => Err(StorageError::Storage(format!(
                "Unsupported revocation store type: {t}. Supported types are 'memory' and 'redis'"
            ))),
        }
    }

    pub async fn create_store(
        &self,
        entry_ttl: Duration,
    ) -> Result<Arc<dyn RevocationStore>, StorageError> {
        let store: Arc<dyn RevocationStore> = match self {
            Self::Memory => Arc::new(InMemoryRevocationStore::new(entry_ttl)),
            Self::Redis { url } => {
                let client = redis::Client::open(url.as_str())?;
                Arc::new(RedisRevocationStore::new(client, entry_ttl))
            }
        };

        store.init().await?;
        tracing::info!("Initialized revocation store: {:?}", self);
        Ok(store)
    }
}

/// Builds the store selected by `REVOCATION_STORE_TYPE` / `REVOCATION_STORE_URL`.
pub async fn revocation_store_from_env(
    entry_ttl: Duration,
) -> Result<Arc<dyn RevocationStore>, StorageError> {
    RevocationStoreType::from_env()?.create_store(entry_ttl).await
}
