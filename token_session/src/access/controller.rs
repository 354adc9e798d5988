use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AccessError;
use super::roles::AllowedRoles;
use crate::codec::{KeyDomain, TokenCodec};
use crate::csrf::CsrfBinder;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    data: String,
}

/// Claims carried inside an access token.
///
/// The serialized controller travels as the `data` claim of an HS256 JWT
/// signed with the token key; the JWT string is what gets encrypted. Those
/// JWT bytes are the "decrypted token" the CSRF seed is derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessController<P> {
    pub remote_addr: String,
    /// Unix timestamp in seconds. The token is valid while `now < expiry`.
    pub expiry: i64,
    pub role: String,
    pub payload: P,
    nonce: String,
    /// Set on tokens minted by [`AccessController::refresh`].
    #[serde(default)]
    rotated: bool,
    #[serde(skip)]
    token_bytes: Vec<u8>,
}

impl<P> AccessController<P> {
    pub fn new(payload: P, role: impl Into<String>, remote_addr: impl Into<String>, expiry: i64) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            expiry,
            role: role.into(),
            payload,
            nonce: String::new(),
            rotated: false,
            token_bytes: Vec::new(),
        }
    }

    /// Per-mint identifier; empty until the controller has been minted or parsed.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Whether this token came out of a rotation rather than a login.
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    pub(crate) fn token_bytes(&self) -> &[u8] {
        &self.token_bytes
    }

    pub fn verify(&self, allowed_roles: &AllowedRoles) -> Result<(), AccessError> {
        self.verify_at(allowed_roles, Utc::now().timestamp())
    }

    pub fn verify_at(&self, allowed_roles: &AllowedRoles, now: i64) -> Result<(), AccessError> {
        let expired = self.expiry <= now;
        let role_allowed = allowed_roles.contains(&self.role);

        if expired || !role_allowed {
            return Err(AccessError::ExpiredOrUnauthorized);
        }

        Ok(())
    }

    pub fn gen_csrf_seed(&self, binder: &CsrfBinder) -> Result<Vec<u8>, AccessError> {
        if self.token_bytes.is_empty() {
            return Err(AccessError::Encoding(
                "controller has not been minted".to_string(),
            ));
        }
        Ok(binder.derive(&self.token_bytes))
    }
}

impl<P: Serialize> AccessController<P> {
    /// Signs and encrypts the controller, returning the hex access token.
    ///
    /// Every call draws a new nonce, so minting the same fields twice yields
    /// two unrelated tokens.
    pub fn new_token(&mut self, codec: &TokenCodec, key: &[u8]) -> Result<String, AccessError> {
        self.nonce = Uuid::new_v4().to_string();

        let data =
            serde_json::to_string(&*self).map_err(|e| AccessError::Encoding(e.to_string()))?;

        let jwt = encode(
            &Header::new(Algorithm::HS256),
            &TokenClaims { data },
            &EncodingKey::from_secret(key),
        )
        .map_err(|e| AccessError::Encoding(e.to_string()))?;

        self.token_bytes = jwt.into_bytes();

        Ok(codec.encrypt_hex(KeyDomain::Access, &self.token_bytes)?)
    }

    /// Mints a replacement token with a new expiry and returns it with its CSRF seed.
    pub fn refresh(
        &mut self,
        expiry: i64,
        codec: &TokenCodec,
        key: &[u8],
        binder: &CsrfBinder,
    ) -> Result<(String, Vec<u8>), AccessError> {
        self.expiry = expiry;
        self.rotated = true;
        let token = self.new_token(codec, key)?;
        let csrf_seed = self.gen_csrf_seed(binder)?;
        Ok((token, csrf_seed))
    }
}

impl<P: DeserializeOwned> AccessController<P> {
    pub fn init_from_token(decrypted: &[u8], key: &[u8]) -> Result<Self, AccessError> {
        let jwt = std::str::from_utf8(decrypted).map_err(|e| AccessError::Parse(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is enforced by verify(), not at parse time
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<TokenClaims>(jwt, &DecodingKey::from_secret(key), &validation)
            .map_err(|e| AccessError::Parse(e.to_string()))?
            .claims;

        let mut controller: Self =
            serde_json::from_str(&claims.data).map_err(|e| AccessError::Parse(e.to_string()))?;
        controller.token_bytes = decrypted.to_vec();

        Ok(controller)
    }
}
