//! Shared fixtures for tests across the crate.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::HeaderMap;
use http::header::COOKIE;
use serde::{Deserialize, Serialize};

use crate::codec::KeyMaterial;
use crate::config::SessionConfig;
use crate::identity::SessionIdentity;
use crate::revocation::{InMemoryRevocationStore, RevocationStore, StorageError};
use crate::session::{RequestCredentials, SessionOrchestrator, TokenPair};

pub(crate) const TEST_TOKEN_KEY: &[u8] = b"test-token-signing-key";

/// Stand-in for an application payload: an account plus linked platform credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TestPayload {
    pub(crate) account: String,
    pub(crate) email: String,
    pub(crate) platform_token: String,
}

impl TestPayload {
    pub(crate) fn new(account: &str) -> Self {
        Self {
            account: account.to_string(),
            email: format!("{account}@example.com"),
            platform_token: format!("pt-{account}"),
        }
    }
}

impl SessionIdentity for TestPayload {
    fn account(&self) -> &str {
        &self.account
    }
}

pub(crate) fn test_config() -> SessionConfig {
    let mut config = SessionConfig::new(
        TEST_TOKEN_KEY,
        KeyMaterial::new([0x11; 32]),
        KeyMaterial::new([0x22; 32]),
    );
    config.token_lifetime = 3600;
    config.store_timeout = Duration::from_millis(200);
    config
}

pub(crate) fn test_orchestrator() -> (SessionOrchestrator, Arc<InMemoryRevocationStore>) {
    let config = test_config();
    let store = Arc::new(InMemoryRevocationStore::new(config.store_entry_ttl()));
    let orchestrator = SessionOrchestrator::new(config, store.clone())
        .expect("test config is valid");
    (orchestrator, store)
}

/// Credentials as the transport would hand them over after the client
/// stored the pair and echoed the CSRF value in the header.
pub(crate) fn credentials_for(pair: &TokenPair) -> RequestCredentials {
    RequestCredentials {
        access_token: Some(pair.access_token.clone()),
        csrf_token: Some(pair.csrf_token.clone()),
    }
}

pub(crate) fn headers_with_forwarded_for(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", value.parse().expect("valid header value"));
    headers
}

pub(crate) fn headers_with_cookie(cookie: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, cookie.parse().expect("valid header value"));
    headers
}

/// Store whose calls always fail, or hang past any reasonable timeout.
pub(crate) struct FailingStore {
    pub(crate) hang: bool,
}

#[async_trait]
impl RevocationStore for FailingStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn insert(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        if self.hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Err(StorageError::Storage("insert refused".to_string()))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Storage("get refused".to_string()))
    }

    async fn expire(&self, _key: &str, _ttl_seconds: u64) -> Result<(), StorageError> {
        Err(StorageError::Storage("expire refused".to_string()))
    }
}

/// Helper function to set environment variables for the duration of the test
/// and restore the original values afterward.
pub(crate) fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], test: F) -> R
where
    F: FnOnce() -> R,
{
    let originals: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var(k).ok())).collect();

    for (key, value) in vars {
        match value {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }
    }

    let result = test();

    for (key, original) in originals {
        match original {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }
    }

    result
}
