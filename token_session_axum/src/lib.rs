//! token-session-axum - Axum integration for token-session
//!
//! Provides an extractor that pulls session credentials off a request and
//! the rejection type that renders [`token_session::SessionError`] as JSON.

mod cookies;
mod error;
mod extractor;

pub use cookies::session_cookie_headers;
pub use error::{ErrorBody, SessionRejection};
pub use extractor::SessionCredentials;

pub use token_session::{
    AccessController, AllowedRoles, ROLE_INDIVIDUALS, RequestCredentials, SessionConfig,
    SessionError, SessionIdentity, SessionOrchestrator, TokenPair, VerifiedSession, VerifyPolicy,
};
