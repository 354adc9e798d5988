//! token-session - Dual-token rotating session authentication
//!
//! An encrypted, self-contained access token is paired with an independently
//! encrypted CSRF token bound to it. Rotation mints a fresh pair and records
//! it in a [`RevocationStore`] before the client sees it, leaving the previous
//! generation's entry a short grace period.

mod access;
mod codec;
mod config;
mod csrf;
mod errors;
mod identity;
mod revocation;
mod session;

#[cfg(test)]
mod test_utils;

pub use access::{AccessController, AccessError, AllowedRoles, ROLE_INDIVIDUALS};
pub use codec::{AesGcmCipher, CodecError, KeyDomain, KeyMaterial, TokenCipher, TokenCodec};
pub use config::{
    DEFAULT_CSRF_COOKIE_NAME, DEFAULT_CSRF_HEADER_NAME, DEFAULT_TOKEN_COOKIE_NAME, SessionConfig,
};
pub use csrf::CsrfBinder;
pub use errors::SessionError;
pub use identity::{IdentityEncoder, SessionIdentity};
pub use revocation::{
    InMemoryRevocationStore, RedisRevocationStore, RevocationStore, RevocationStoreType,
    StorageError, revocation_store_from_env,
};
pub use session::{
    RequestCredentials, SessionOrchestrator, TokenPair, VerifiedSession, VerifyPolicy,
    remote_addr_from_headers,
};
