use token_session::{
    AllowedRoles, DEFAULT_TOKEN_COOKIE_NAME, ROLE_INDIVIDUALS, SessionError, VerifiedSession,
    VerifyPolicy,
};

use crate::common::{MockBrowser, TestUser, session_orchestrator};

/// Flow: login → cookies stored → authenticated request with CSRF header
#[tokio::test]
async fn test_login_then_authenticated_request() {
    let (sessions, _) = session_orchestrator();
    let mut browser = MockBrowser::new(true);

    let pair = sessions
        .issue(
            &browser.request_headers("203.0.113.7"),
            ROLE_INDIVIDUALS,
            TestUser::new("alice"),
        )
        .unwrap();
    browser.store_cookies(&pair.to_headers(sessions.config()).unwrap());
    assert_eq!(
        browser.cookie(DEFAULT_TOKEN_COOKIE_NAME),
        Some(pair.access_token.as_str())
    );

    let session = sessions
        .verify::<TestUser>(
            &browser.credentials(&sessions),
            &VerifyPolicy::new(AllowedRoles::individuals()),
        )
        .await
        .unwrap();

    match session {
        VerifiedSession::Authenticated { controller, .. } => {
            assert_eq!(controller.payload, TestUser::new("alice"));
            assert_eq!(controller.remote_addr, "203.0.113.7");
        }
        other => panic!("Expected authenticated session, got {other:?}"),
    }
}

/// Flow: login → script never echoes the CSRF cookie → request rejected
#[tokio::test]
async fn test_cookies_alone_do_not_authenticate() {
    let (sessions, _) = session_orchestrator();
    let mut browser = MockBrowser::new(false);

    let pair = sessions
        .issue(
            &browser.request_headers("203.0.113.7"),
            ROLE_INDIVIDUALS,
            TestUser::new("alice"),
        )
        .unwrap();
    browser.store_cookies(&pair.to_headers(sessions.config()).unwrap());

    let credentials = browser.credentials(&sessions);
    let result = sessions
        .verify::<TestUser>(&credentials, &VerifyPolicy::new(AllowedRoles::individuals()))
        .await;
    assert_eq!(result.unwrap_err(), SessionError::Unauthorized);

    let visitor = sessions
        .verify::<TestUser>(
            &credentials,
            &VerifyPolicy::new(AllowedRoles::individuals()).allow_visitor(),
        )
        .await
        .unwrap();
    assert!(visitor.is_visitor());
}

/// Flow: anonymous browser on a visitor endpoint and on a protected one
#[tokio::test]
async fn test_anonymous_browser() {
    let (sessions, _) = session_orchestrator();
    let browser = MockBrowser::new(true);
    let credentials = browser.credentials(&sessions);

    let visitor = sessions
        .verify::<TestUser>(
            &credentials,
            &VerifyPolicy::new(AllowedRoles::individuals()).allow_visitor(),
        )
        .await
        .unwrap();
    assert!(matches!(visitor, VerifiedSession::Visitor { hint: None }));

    let result = sessions
        .verify::<TestUser>(&credentials, &VerifyPolicy::new(AllowedRoles::individuals()))
        .await;
    assert_eq!(result.unwrap_err().status_code(), http::StatusCode::UNAUTHORIZED);
}

/// Login without a usable client address fails before anything is minted
#[tokio::test]
async fn test_login_without_client_address() {
    let (sessions, _) = session_orchestrator();

    let result = sessions.issue(
        &http::HeaderMap::new(),
        ROLE_INDIVIDUALS,
        TestUser::new("alice"),
    );
    let err = result.unwrap_err();
    assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    assert_eq!(err.code(), "bad_request_header");
}
