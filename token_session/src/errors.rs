use http::StatusCode;
use thiserror::Error;

use crate::access::AccessError;
use crate::codec::CodecError;

const INVALID_TOKEN_MESSAGE: &str = "invalid token";

/// Outcome taxonomy seen by the transport layer.
///
/// Internal detail is kept in the `System` / `BadRequest` payloads for
/// logging; what reaches the client comes from [`SessionError::public_message`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Encryption, decryption or serialization failed: tampering, corruption
    /// or misconfiguration.
    #[error("System error: {0}")]
    System(String),

    /// Expired token, disallowed role, CSRF mismatch or missing credentials.
    #[error("invalid token")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SessionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::System(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "invalid_token",
            Self::BadRequest(_) => "bad_request_header",
            Self::System(_) | Self::Config(_) => "system_error",
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => INVALID_TOKEN_MESSAGE,
            Self::BadRequest(_) => "can not fetch client ip",
            Self::System(_) | Self::Config(_) => "system error",
        }
    }
}

impl From<CodecError> for SessionError {
    fn from(err: CodecError) -> Self {
        Self::System(err.to_string())
    }
}

impl From<AccessError> for SessionError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::ExpiredOrUnauthorized => Self::Unauthorized,
            other => Self::System(other.to_string()),
        }
    }
}
