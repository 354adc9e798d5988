use chrono::{DateTime, Utc};
use http::HeaderMap;

use super::cookie::{get_cookie_value, get_header_value, header_set_cookie};
use crate::access::{AccessController, AllowedRoles};
use crate::config::SessionConfig;
use crate::errors::SessionError;

/// Raw credential material pulled off a request.
///
/// The CSRF value comes from the custom header only. The CSRF cookie exists
/// for client script to read and echo back; on its own it proves nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCredentials {
    pub access_token: Option<String>,
    pub csrf_token: Option<String>,
}

impl RequestCredentials {
    pub fn from_headers(headers: &HeaderMap, config: &SessionConfig) -> Self {
        Self {
            access_token: get_cookie_value(headers, &config.token_cookie_name),
            csrf_token: get_header_value(headers, &config.csrf_header_name),
        }
    }
}

/// Freshly minted access and CSRF tokens, both hex-encoded ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub csrf_token: String,
    /// Unix timestamp shared by the token and both cookies.
    pub expiry: i64,
}

impl TokenPair {
    /// `Set-Cookie` headers for both tokens. Only the CSRF cookie is readable from script.
    pub fn to_headers(&self, config: &SessionConfig) -> Result<HeaderMap, SessionError> {
        let expires_at = DateTime::from_timestamp(self.expiry, 0)
            .ok_or_else(|| SessionError::System("token expiry out of range".to_string()))?;
        let max_age = (expires_at - Utc::now()).num_seconds().max(0);

        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            &config.token_cookie_name,
            &self.access_token,
            expires_at,
            max_age,
            true,
        )?;
        header_set_cookie(
            &mut headers,
            &config.csrf_cookie_name,
            &self.csrf_token,
            expires_at,
            max_age,
            false,
        )?;
        Ok(headers)
    }
}

/// What an endpoint demands of the caller.
#[derive(Debug, Clone)]
pub struct VerifyPolicy {
    pub allowed_roles: AllowedRoles,
    pub allow_visitor: bool,
    /// Rotate both tokens after a successful verification.
    pub refresh: bool,
}

impl VerifyPolicy {
    pub fn new(allowed_roles: AllowedRoles) -> Self {
        Self {
            allowed_roles,
            allow_visitor: false,
            refresh: false,
        }
    }

    pub fn allow_visitor(mut self) -> Self {
        self.allow_visitor = true;
        self
    }

    pub fn with_refresh(mut self) -> Self {
        self.refresh = true;
        self
    }
}

#[derive(Debug, Clone)]
pub enum VerifiedSession<P> {
    Authenticated {
        controller: AccessController<P>,
        /// New tokens to hand to the client; `None` when no rotation was
        /// requested or rotation failed.
        rotated: Option<TokenPair>,
    },
    /// Anonymous caller on a visitor-accessible endpoint. `hint` is a
    /// best-effort guess for logging and never an authorization input.
    Visitor { hint: Option<P> },
}

impl<P> VerifiedSession<P> {
    pub fn is_visitor(&self) -> bool {
        matches!(self, Self::Visitor { .. })
    }

    pub fn payload(&self) -> Option<&P> {
        match self {
            Self::Authenticated { controller, .. } => Some(&controller.payload),
            Self::Visitor { .. } => None,
        }
    }

    pub fn rotated(&self) -> Option<&TokenPair> {
        match self {
            Self::Authenticated { rotated, .. } => rotated.as_ref(),
            Self::Visitor { .. } => None,
        }
    }
}
