use std::sync::Arc;

use axum::{Json, extract::State};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use token_session::{
    AllowedRoles, ROLE_INDIVIDUALS, SessionIdentity, SessionOrchestrator, VerifiedSession,
    VerifyPolicy,
};
use token_session_axum::{SessionCredentials, SessionRejection, session_cookie_headers};

/// What the demo keeps in its tokens: the account plus the platform
/// credentials a real login would have fetched upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UserTokenPayload {
    account: String,
    email: String,
    token: String,
    nid: String,
}

impl SessionIdentity for UserTokenPayload {
    fn account(&self) -> &str {
        &self.account
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    account: String,
    email: String,
}

/// Pretends the upstream login succeeded and hands out a fresh session.
pub(crate) async fn login(
    State(sessions): State<Arc<SessionOrchestrator>>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<Value>), SessionRejection> {
    let payload = UserTokenPayload {
        nid: format!("nid-{}", request.account),
        token: format!("platform-{}", request.account),
        account: request.account,
        email: request.email,
    };

    let pair = sessions.issue(&headers, ROLE_INDIVIDUALS, payload)?;
    let cookies = session_cookie_headers(Some(&pair), sessions.config())?;
    Ok((cookies, Json(json!({ "code": "ok", "expiry": pair.expiry }))))
}

/// Reports who is calling. Anonymous callers are answered as visitors.
pub(crate) async fn me(
    State(sessions): State<Arc<SessionOrchestrator>>,
    SessionCredentials(credentials): SessionCredentials,
) -> Result<Json<Value>, SessionRejection> {
    let policy = VerifyPolicy::new(AllowedRoles::individuals()).allow_visitor();

    match sessions
        .verify::<UserTokenPayload>(&credentials, &policy)
        .await?
    {
        VerifiedSession::Authenticated { controller, .. } => Ok(Json(json!({
            "code": "ok",
            "account": controller.payload.account,
            "email": controller.payload.email,
            "expiry": controller.expiry,
        }))),
        VerifiedSession::Visitor { .. } => Ok(Json(json!({ "code": "visitor" }))),
    }
}

/// A state-changing call: requires a full session and rotates both tokens.
pub(crate) async fn update(
    State(sessions): State<Arc<SessionOrchestrator>>,
    SessionCredentials(credentials): SessionCredentials,
) -> Result<(HeaderMap, Json<Value>), SessionRejection> {
    let policy = VerifyPolicy::new(AllowedRoles::individuals()).with_refresh();
    let session = sessions
        .verify::<UserTokenPayload>(&credentials, &policy)
        .await?;

    let cookies = session_cookie_headers(session.rotated(), sessions.config())?;
    let account = session.payload().map(|p| p.account.clone());
    Ok((
        cookies,
        Json(json!({ "code": "ok", "account": account, "rotated": session.rotated().is_some() })),
    ))
}
