use token_session::{AllowedRoles, ROLE_INDIVIDUALS, RevocationStore, VerifiedSession, VerifyPolicy};

use crate::common::{MockBrowser, TestUser, session_orchestrator};

/// Flow: login → state-changing request rotates → browser keeps going with
/// the new pair
#[tokio::test]
async fn test_rotation_replaces_browser_cookies() {
    let (sessions, store) = session_orchestrator();
    let mut browser = MockBrowser::new(true);

    let pair = sessions
        .issue(
            &browser.request_headers("198.51.100.20"),
            ROLE_INDIVIDUALS,
            TestUser::new("bob"),
        )
        .unwrap();
    browser.store_cookies(&pair.to_headers(sessions.config()).unwrap());

    let refresh = VerifyPolicy::new(AllowedRoles::individuals()).with_refresh();
    let mut previous = pair.access_token.clone();
    for _ in 0..3 {
        let session = sessions
            .verify::<TestUser>(&browser.credentials(&sessions), &refresh)
            .await
            .unwrap();
        let rotated = session.rotated().cloned().expect("rotation should succeed");
        assert_ne!(rotated.access_token, previous);

        browser.store_cookies(&rotated.to_headers(sessions.config()).unwrap());
        previous = rotated.access_token;
    }

    // every rotation recorded its own generation
    let session = sessions
        .verify::<TestUser>(
            &browser.credentials(&sessions),
            &VerifyPolicy::new(AllowedRoles::individuals()),
        )
        .await
        .unwrap();
    let VerifiedSession::Authenticated { controller, .. } = session else {
        panic!("Expected authenticated session");
    };
    assert_eq!(
        sessions.recorded_token(&controller).await.unwrap(),
        Some(previous.clone())
    );
    assert_eq!(
        store.get(&sessions.identity_key(&controller)).await.unwrap(),
        Some(previous)
    );
}
