mod config;
mod errors;
mod memory;
mod redis;
mod types;

pub use config::{RevocationStoreType, revocation_store_from_env};
pub use errors::StorageError;
pub use types::{InMemoryRevocationStore, RedisRevocationStore, RevocationStore};
