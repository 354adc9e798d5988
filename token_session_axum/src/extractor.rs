use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use http::request::Parts;
use token_session::{RequestCredentials, SessionOrchestrator};

/// Access token cookie and CSRF header of the current request.
///
/// Extraction never fails; whether the credentials are good enough is up to
/// [`SessionOrchestrator::verify`] and the handler's policy.
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::extract::State;
/// use token_session_axum::{
///     AllowedRoles, SessionCredentials, SessionOrchestrator, SessionRejection, VerifyPolicy,
/// };
///
/// # #[derive(serde::Serialize, serde::Deserialize, Clone)]
/// # struct Payload { account: String }
/// # impl token_session_axum::SessionIdentity for Payload {
/// #     fn account(&self) -> &str { &self.account }
/// # }
/// async fn me(
///     State(sessions): State<Arc<SessionOrchestrator>>,
///     SessionCredentials(credentials): SessionCredentials,
/// ) -> Result<String, SessionRejection> {
///     let policy = VerifyPolicy::new(AllowedRoles::individuals());
///     let session = sessions.verify::<Payload>(&credentials, &policy).await?;
///     Ok(session.payload().map(|p| p.account.clone()).unwrap_or_default())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionCredentials(pub RequestCredentials);

impl<S> FromRequestParts<S> for SessionCredentials
where
    S: Send + Sync,
    Arc<SessionOrchestrator>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = Arc::<SessionOrchestrator>::from_ref(state);
        Ok(Self(RequestCredentials::from_headers(
            &parts.headers,
            sessions.config(),
        )))
    }
}
