use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum StorageError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage call timed out after {0} ms")]
    Timeout(u128),
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        Self::Storage(err.to_string())
    }
}
