use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderMap;
use http::header::{COOKIE, SET_COOKIE};
use serde::{Deserialize, Serialize};
use token_session::{
    DEFAULT_CSRF_COOKIE_NAME, InMemoryRevocationStore, KeyMaterial, RequestCredentials,
    SessionConfig, SessionIdentity, SessionOrchestrator,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestUser {
    pub account: String,
    pub email: String,
}

impl TestUser {
    pub fn new(account: &str) -> Self {
        Self {
            account: account.to_string(),
            email: format!("{account}@example.com"),
        }
    }
}

impl SessionIdentity for TestUser {
    fn account(&self) -> &str {
        &self.account
    }
}

pub fn session_orchestrator() -> (Arc<SessionOrchestrator>, Arc<InMemoryRevocationStore>) {
    let config = SessionConfig::new(
        b"integration-token-key".to_vec(),
        KeyMaterial::new([0x41; 32]),
        KeyMaterial::new([0x42; 32]),
    );
    let store = Arc::new(InMemoryRevocationStore::new(Duration::from_secs(3600)));
    let orchestrator = SessionOrchestrator::new(config, store.clone()).unwrap();
    (Arc::new(orchestrator), store)
}

/// Keeps cookies like a browser would and echoes the CSRF cookie into the
/// CSRF header the way client script is expected to.
#[derive(Debug, Default)]
pub struct MockBrowser {
    cookies: HashMap<String, String>,
    echo_csrf: bool,
}

impl MockBrowser {
    pub fn new(echo_csrf: bool) -> Self {
        Self {
            cookies: HashMap::new(),
            echo_csrf,
        }
    }

    pub fn store_cookies(&mut self, response_headers: &HeaderMap) {
        for value in response_headers.get_all(SET_COOKIE) {
            let value = value.to_str().unwrap();
            let pair = value.split(';').next().unwrap();
            let (name, cookie) = pair.split_once('=').unwrap();
            self.cookies.insert(name.to_string(), cookie.to_string());
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn request_headers(&self, forwarded_for: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", forwarded_for.parse().unwrap());

        if !self.cookies.is_empty() {
            let cookie_header = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            headers.insert(COOKIE, cookie_header.parse().unwrap());
        }

        if self.echo_csrf {
            if let Some(csrf) = self.cookie(DEFAULT_CSRF_COOKIE_NAME) {
                headers.insert("csrf-token", csrf.parse().unwrap());
            }
        }
        headers
    }

    pub fn credentials(&self, orchestrator: &SessionOrchestrator) -> RequestCredentials {
        RequestCredentials::from_headers(&self.request_headers("192.0.2.10"), orchestrator.config())
    }
}
