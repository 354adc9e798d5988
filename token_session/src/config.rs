//! Session configuration, passed explicitly to the orchestrator.

use std::env;
use std::time::Duration;

use crate::codec::KeyMaterial;
use crate::errors::SessionError;

pub const DEFAULT_TOKEN_COOKIE_NAME: &str = "PRIVATE-TOKEN";
pub const DEFAULT_CSRF_COOKIE_NAME: &str = "CSRF-Token";
pub const DEFAULT_CSRF_HEADER_NAME: &str = "CSRF-Token";

const DEFAULT_TOKEN_LIFETIME: u64 = 86400;
const DEFAULT_ROTATION_GRACE: u64 = 3;
const DEFAULT_STORE_TTL_MARGIN: u64 = 10;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 1000;

/// Upper bound for lifetimes and TTLs, in seconds.
const MAX_TOKEN_LIFETIME: u64 = i32::MAX as u64;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HS256 signing key for the token plaintext.
    pub token_key: Vec<u8>,
    pub access_key: KeyMaterial,
    pub csrf_key: KeyMaterial,
    /// Seconds a freshly minted token stays valid.
    pub token_lifetime: u64,
    /// Seconds the previous identity's store entry survives a rotation.
    pub rotation_grace: u64,
    /// Store entries live `token_lifetime - store_ttl_margin` seconds.
    pub store_ttl_margin: u64,
    pub store_timeout: Duration,
    pub token_cookie_name: String,
    pub csrf_cookie_name: String,
    pub csrf_header_name: String,
}

impl SessionConfig {
    pub fn new(
        token_key: impl Into<Vec<u8>>,
        access_key: KeyMaterial,
        csrf_key: KeyMaterial,
    ) -> Self {
        Self {
            token_key: token_key.into(),
            access_key,
            csrf_key,
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            rotation_grace: DEFAULT_ROTATION_GRACE,
            store_ttl_margin: DEFAULT_STORE_TTL_MARGIN,
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            token_cookie_name: DEFAULT_TOKEN_COOKIE_NAME.to_string(),
            csrf_cookie_name: DEFAULT_CSRF_COOKIE_NAME.to_string(),
            csrf_header_name: DEFAULT_CSRF_HEADER_NAME.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, SessionError> {
        let token_key = required_var("SESSION_TOKEN_KEY")?;
        let access_key = parse_key("SESSION_ENCRYPTION_KEY")?;
        let csrf_key = parse_key("SESSION_ENCRYPTION_KEY_CSRF")?;

        let config = Self {
            token_key: token_key.into_bytes(),
            access_key,
            csrf_key,
            token_lifetime: parse_or("SESSION_TOKEN_EXPIRY", DEFAULT_TOKEN_LIFETIME),
            rotation_grace: parse_or("SESSION_ROTATION_GRACE", DEFAULT_ROTATION_GRACE),
            store_ttl_margin: parse_or("SESSION_STORE_TTL_MARGIN", DEFAULT_STORE_TTL_MARGIN),
            store_timeout: Duration::from_millis(parse_or(
                "SESSION_STORE_TIMEOUT_MS",
                DEFAULT_STORE_TIMEOUT_MS,
            )),
            token_cookie_name: env::var("SESSION_TOKEN_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_TOKEN_COOKIE_NAME.to_string()),
            csrf_cookie_name: env::var("SESSION_CSRF_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_CSRF_COOKIE_NAME.to_string()),
            csrf_header_name: env::var("SESSION_CSRF_HEADER_NAME")
                .unwrap_or_else(|_| DEFAULT_CSRF_HEADER_NAME.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.token_key.is_empty() {
            return Err(SessionError::Config("token key must not be empty".to_string()));
        }
        if self.access_key == self.csrf_key {
            return Err(SessionError::Config(
                "access and CSRF encryption keys must differ".to_string(),
            ));
        }
        if self.token_lifetime > MAX_TOKEN_LIFETIME {
            return Err(SessionError::Config(format!(
                "token lifetime ({}s) must not exceed {MAX_TOKEN_LIFETIME}s",
                self.token_lifetime
            )));
        }
        if self.rotation_grace > self.token_lifetime {
            return Err(SessionError::Config(format!(
                "rotation grace ({}s) must not exceed the token lifetime ({}s)",
                self.rotation_grace, self.token_lifetime
            )));
        }
        if self.token_lifetime <= self.store_ttl_margin {
            return Err(SessionError::Config(format!(
                "token lifetime ({}s) must exceed the store TTL margin ({}s)",
                self.token_lifetime, self.store_ttl_margin
            )));
        }
        if self.token_cookie_name == self.csrf_cookie_name {
            return Err(SessionError::Config(
                "token and CSRF cookies need distinct names".to_string(),
            ));
        }
        Ok(())
    }

    /// TTL given to revocation store entries.
    pub fn store_entry_ttl(&self) -> Duration {
        Duration::from_secs(self.token_lifetime.saturating_sub(self.store_ttl_margin))
    }
}

fn required_var(name: &str) -> Result<String, SessionError> {
    env::var(name).map_err(|_| SessionError::Config(format!("{name} must be set")))
}

fn parse_key(name: &str) -> Result<KeyMaterial, SessionError> {
    KeyMaterial::parse(&required_var(name)?)
        .map_err(|e| SessionError::Config(format!("{name}: {e}")))
}

fn parse_or(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
