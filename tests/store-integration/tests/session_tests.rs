use oldgold_common::backend::{friendly_auth_message, AuthBackend, ProfileUpdate};
use oldgold_common::guard::{evaluate, return_destination, GuardOutcome};
use oldgold_common::memory::MailKind;
use oldgold_common::session::SessionState;
use oldgold_common::subscription::Subscription;

use oldgold_store_integration::harness::Market;
use oldgold_store_integration::*;

/// Skip pushes until the session reaches a signed-in or signed-out state.
async fn settled(watch: &mut Subscription<SessionState>) -> SessionState {
    loop {
        match next_within(watch, TIMEOUT).await {
            Some(SessionState::Resolving) => continue,
            Some(state) => return state,
            None => panic!("session never settled"),
        }
    }
}

#[tokio::test]
async fn session_starts_resolving_then_follows_auth() {
    tracing_subscriber::fmt::try_init().ok();
    let market = Market::new();
    let mut watch = market.session.watch();
    assert_eq!(next_within(&mut watch, TIMEOUT).await, Some(SessionState::Resolving));
    assert_eq!(evaluate(&market.session.current(), "/create"), GuardOutcome::Loading);

    let _follow = market.follow_auth();
    assert_eq!(settled(&mut watch).await, SessionState::SignedOut);

    let created = market.auth.create_account("meera@example.com", "hunter22").await.unwrap();
    assert_eq!(settled(&mut watch).await, SessionState::SignedIn(created.clone()));

    let renamed = market
        .auth
        .update_profile(ProfileUpdate::from_inputs("Meera", ""))
        .await
        .unwrap();
    assert_eq!(renamed.shown_name(), "Meera");
    assert_eq!(settled(&mut watch).await, SessionState::SignedIn(renamed));

    market.auth.sign_out().await.unwrap();
    assert_eq!(settled(&mut watch).await, SessionState::SignedOut);
}

#[tokio::test]
async fn guard_redirects_and_returns_after_login() {
    tracing_subscriber::fmt::try_init().ok();
    let market = Market::new();
    market.auth.create_account("ravi@example.com", "secret99").await.unwrap();
    market.auth.sign_out().await.unwrap();

    let mut watch = market.session.watch();
    let _follow = market.follow_auth();
    let state = settled(&mut watch).await;

    let outcome = evaluate(&state, "/edit/abc123");
    let GuardOutcome::Redirect(to) = outcome else {
        panic!("expected a redirect, got {outcome:?}");
    };
    assert_eq!(to, "/login?from=%2Fedit%2Fabc123");
    assert_eq!(evaluate(&state, "/listing/abc123"), GuardOutcome::Render);

    let from = to.split_once("from=").map(|(_, from)| from);
    market
        .auth
        .sign_in_with_email_password("ravi@example.com", "secret99")
        .await
        .unwrap();
    let state = settled(&mut watch).await;
    assert_eq!(evaluate(&state, "/edit/abc123"), GuardOutcome::Render);
    assert_eq!(return_destination(from), "/edit/abc123");
}

#[tokio::test]
async fn auth_failures_have_friendly_messages() {
    let market = Market::new();

    let err = market.auth.create_account("new@example.com", "123").await.unwrap_err();
    assert_eq!(friendly_auth_message(&err), "Password should be at least 6 characters.");

    market.auth.create_account("new@example.com", "123456").await.unwrap();
    let err = market.auth.create_account("new@example.com", "abcdef").await.unwrap_err();
    assert_eq!(friendly_auth_message(&err), "This email is already in use. Try logging in.");

    let err = market
        .auth
        .sign_in_with_email_password("new@example.com", "wrong-one")
        .await
        .unwrap_err();
    assert_eq!(friendly_auth_message(&err), "Incorrect email or password.");
}

#[tokio::test]
async fn profile_mail_actions_reach_the_outbox() {
    let market = Market::new();
    let demo = market.auth.sign_in_with_provider().await.unwrap();
    assert!(demo.email_verified);

    market.auth.send_email_verification().await.unwrap();
    market.auth.send_password_reset(demo.email.as_deref().unwrap()).await.unwrap();

    let outbox = market.auth.outbox();
    assert_eq!(outbox.len(), 2);
    assert_eq!(outbox[0].kind, MailKind::Verification);
    assert_eq!(outbox[1].kind, MailKind::PasswordReset);
    assert!(outbox.iter().all(|m| m.to == "demo@oldgold.app"));
}
