use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use http::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use subtle::ConstantTimeEq;

use super::remote_addr::remote_addr_from_headers;
use super::types::{RequestCredentials, TokenPair, VerifiedSession, VerifyPolicy};
use crate::access::{AccessController, AllowedRoles};
use crate::codec::{KeyDomain, TokenCodec};
use crate::config::SessionConfig;
use crate::csrf::CsrfBinder;
use crate::errors::SessionError;
use crate::identity::{IdentityEncoder, SessionIdentity};
use crate::revocation::{RevocationStore, StorageError};

/// Issues, verifies and rotates dual-token sessions.
///
/// Verification is a pure function of the presented credentials; the only
/// shared state is the revocation store, touched during rotation.
pub struct SessionOrchestrator {
    config: SessionConfig,
    codec: TokenCodec,
    binder: CsrfBinder,
    identity: IdentityEncoder,
    store: Arc<dyn RevocationStore>,
}

impl SessionOrchestrator {
    pub fn new(config: SessionConfig, store: Arc<dyn RevocationStore>) -> Result<Self, SessionError> {
        config.validate()?;
        let codec = TokenCodec::new(&config.access_key, &config.csrf_key)
            .map_err(|e| SessionError::Config(e.to_string()))?;

        Ok(Self {
            binder: CsrfBinder::new(&config.csrf_key),
            identity: IdentityEncoder::new(&config.access_key),
            codec,
            config,
            store,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn next_expiry(&self) -> Result<i64, SessionError> {
        i64::try_from(self.config.token_lifetime)
            .ok()
            .and_then(|lifetime| Utc::now().timestamp().checked_add(lifetime))
            .ok_or_else(|| SessionError::Config("token lifetime out of range".to_string()))
    }

    /// Revocation store key for the account and generation of `controller`.
    pub fn identity_key<P: SessionIdentity>(&self, controller: &AccessController<P>) -> String {
        self.identity
            .encode(controller.payload.account(), controller.nonce())
    }

    /// Mints a session after a successful login.
    ///
    /// Nothing is written to the revocation store here; the first entry for
    /// an account appears on its first rotation.
    #[tracing::instrument(skip_all, fields(role = role))]
    pub fn issue<P: Serialize>(
        &self,
        headers: &HeaderMap,
        role: &str,
        payload: P,
    ) -> Result<TokenPair, SessionError> {
        let remote_addr = remote_addr_from_headers(headers)?;
        tracing::debug!(remote_addr = %remote_addr, "Issuing session");
        let mut controller = AccessController::new(payload, role, remote_addr, self.next_expiry()?);
        self.mint(&mut controller)
    }

    pub(crate) fn mint<P: Serialize>(
        &self,
        controller: &mut AccessController<P>,
    ) -> Result<TokenPair, SessionError> {
        let access_token = controller
            .new_token(&self.codec, &self.config.token_key)
            .map_err(|e| {
                tracing::error!("Failed to mint access token: {e}");
                SessionError::from(e)
            })?;

        let csrf_seed = controller.gen_csrf_seed(&self.binder)?;
        let csrf_token = self
            .codec
            .encrypt_hex(KeyDomain::Csrf, &csrf_seed)
            .map_err(|e| {
                tracing::error!("Failed to encrypt CSRF token: {e}");
                SessionError::from(e)
            })?;

        Ok(TokenPair {
            access_token,
            csrf_token,
            expiry: controller.expiry,
        })
    }

    /// Verifies the presented credentials against `policy`, rotating on request.
    ///
    /// Expiry, role, CSRF and revocation failures all surface as the same
    /// [`SessionError::Unauthorized`]. Decryption or parse failures are
    /// [`SessionError::System`]: they mean tampering or corruption.
    #[tracing::instrument(skip_all, fields(refresh = policy.refresh, allow_visitor = policy.allow_visitor))]
    pub async fn verify<P>(
        &self,
        credentials: &RequestCredentials,
        policy: &VerifyPolicy,
    ) -> Result<VerifiedSession<P>, SessionError>
    where
        P: Serialize + DeserializeOwned + SessionIdentity + Clone,
    {
        let (access_token, csrf_token) = match (
            credentials.access_token.as_deref(),
            credentials.csrf_token.as_deref(),
        ) {
            (Some(access_token), Some(csrf_token)) => (access_token, csrf_token),
            (access_token, _) => return self.visitor_or_reject(access_token, policy),
        };

        let controller = self.check_token::<P>(access_token, &policy.allowed_roles)?;
        self.check_csrf_token(controller.token_bytes(), csrf_token)?;
        self.check_revocation(&controller, access_token).await?;

        let rotated = if policy.refresh {
            self.rotate(&controller).await
        } else {
            None
        };

        Ok(VerifiedSession::Authenticated {
            controller,
            rotated,
        })
    }

    /// Decrypts and parses an access token without verifying expiry or role.
    pub(crate) fn open_token<P: DeserializeOwned>(
        &self,
        access_token: &str,
    ) -> Result<AccessController<P>, SessionError> {
        let token_bytes = self
            .codec
            .decrypt_hex(KeyDomain::Access, access_token)
            .map_err(|e| {
                tracing::error!("Failed to decrypt access token: {e}");
                SessionError::from(e)
            })?;

        AccessController::init_from_token(&token_bytes, &self.config.token_key).map_err(|e| {
            tracing::error!("Failed to parse access token: {e}");
            SessionError::from(e)
        })
    }

    fn check_token<P: DeserializeOwned>(
        &self,
        access_token: &str,
        allowed_roles: &AllowedRoles,
    ) -> Result<AccessController<P>, SessionError> {
        let controller = self.open_token::<P>(access_token)?;

        controller.verify(allowed_roles).map_err(|e| {
            tracing::debug!("Rejected access token: {e}");
            SessionError::from(e)
        })?;

        Ok(controller)
    }

    fn check_csrf_token(&self, token_bytes: &[u8], csrf_token: &str) -> Result<(), SessionError> {
        let csrf_bytes = self
            .codec
            .decrypt_hex(KeyDomain::Csrf, csrf_token)
            .map_err(|e| {
                tracing::error!("Failed to decrypt CSRF token: {e}");
                SessionError::from(e)
            })?;

        if !self.binder.verify(token_bytes, &csrf_bytes) {
            tracing::debug!("CSRF token does not belong to the access token");
            return Err(SessionError::Unauthorized);
        }

        Ok(())
    }

    /// Rejects a rotated token whose store entry is gone.
    ///
    /// Login tokens have no entry and are not checked. An unreachable store
    /// leaves the decision to the token itself.
    async fn check_revocation<P: SessionIdentity>(
        &self,
        controller: &AccessController<P>,
        access_token: &str,
    ) -> Result<(), SessionError> {
        if !controller.is_rotated() {
            return Ok(());
        }

        let key = self.identity_key(controller);
        match self.with_timeout(self.store.get(&key)).await {
            Ok(Some(recorded))
                if bool::from(recorded.as_bytes().ct_eq(access_token.as_bytes())) =>
            {
                Ok(())
            }
            Ok(Some(_)) => {
                tracing::debug!("Recorded token differs from the presented one");
                Err(SessionError::Unauthorized)
            }
            Ok(None) => {
                tracing::debug!(
                    account = controller.payload.account(),
                    "Rejected superseded access token"
                );
                Err(SessionError::Unauthorized)
            }
            Err(e) => {
                tracing::warn!("Revocation store unavailable, accepting token as is: {e}");
                Ok(())
            }
        }
    }

    fn visitor_or_reject<P>(
        &self,
        access_token: Option<&str>,
        policy: &VerifyPolicy,
    ) -> Result<VerifiedSession<P>, SessionError>
    where
        P: DeserializeOwned + SessionIdentity,
    {
        let hint = access_token.and_then(|t| self.best_effort_identity_hint::<P>(t));
        let account = hint.as_ref().map(|p| p.account());

        if policy.allow_visitor {
            tracing::debug!(account, "Proceeding as visitor");
            return Ok(VerifiedSession::Visitor { hint });
        }

        tracing::debug!(account, "Missing access token or CSRF header");
        Err(SessionError::Unauthorized)
    }

    /// Guesses who an incomplete or invalid credential belongs to.
    ///
    /// Expiry and role are not checked. The result is for logging only and
    /// must never feed an authorization decision.
    pub fn best_effort_identity_hint<P: DeserializeOwned>(&self, access_token: &str) -> Option<P> {
        let token_bytes = self
            .codec
            .decrypt_hex(KeyDomain::Access, access_token)
            .ok()?;
        AccessController::<P>::init_from_token(&token_bytes, &self.config.token_key)
            .ok()
            .map(|controller| controller.payload)
    }

    /// Mints the replacement pair and records it before handing it out.
    ///
    /// Returns `None` if anything before the store write fails; the caller
    /// then keeps the session it already verified.
    async fn rotate<P>(&self, current: &AccessController<P>) -> Option<TokenPair>
    where
        P: Serialize + SessionIdentity + Clone,
    {
        let expiry = match self.next_expiry() {
            Ok(expiry) => expiry,
            Err(e) => {
                tracing::error!("Failed to compute refreshed expiry: {e}");
                return None;
            }
        };

        let mut next = current.clone();
        let (access_token, csrf_seed) = match next.refresh(
            expiry,
            &self.codec,
            &self.config.token_key,
            &self.binder,
        ) {
            Ok(refreshed) => refreshed,
            Err(e) => {
                tracing::error!("Failed to refresh access token: {e}");
                return None;
            }
        };

        let csrf_token = match self.codec.encrypt_hex(KeyDomain::Csrf, &csrf_seed) {
            Ok(csrf_token) => csrf_token,
            Err(e) => {
                tracing::error!("Failed to encrypt refreshed CSRF token: {e}");
                return None;
            }
        };

        // store first: if the response is lost the new entry is just orphaned
        let new_key = self.identity_key(&next);
        if let Err(e) = self
            .with_timeout(self.store.insert(&new_key, &access_token))
            .await
        {
            tracing::warn!("Skipping rotation, failed to record new token: {e}");
            return None;
        }

        let previous_key = self.identity_key(current);
        if let Err(e) = self
            .with_timeout(self.store.expire(&previous_key, self.config.rotation_grace))
            .await
        {
            tracing::warn!("Failed to shorten previous token entry: {e}");
        }

        tracing::debug!(account = next.payload.account(), "Rotated session tokens");

        Some(TokenPair {
            access_token,
            csrf_token,
            expiry: next.expiry,
        })
    }

    /// Token currently recorded for the account and generation of `controller`.
    pub async fn recorded_token<P: SessionIdentity>(
        &self,
        controller: &AccessController<P>,
    ) -> Result<Option<String>, SessionError> {
        let key = self.identity_key(controller);
        self.with_timeout(self.store.get(&key))
            .await
            .map_err(|e| SessionError::System(e.to_string()))
    }

    async fn with_timeout<T>(
        &self,
        call: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        let timeout = self.config.store_timeout;
        tokio::time::timeout(timeout, call)
            .await
            .unwrap_or(Err(StorageError::Timeout(timeout.as_millis())))
    }
}
