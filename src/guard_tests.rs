use super::*;
use crate::identity::{CredentialProvider, LocalCredentialProvider};

fn store_with_demo() -> (Arc<LocalCredentialProvider>, Arc<SessionStore>) {
    let provider = Arc::new(LocalCredentialProvider::with_account("ada@example.com", "pw"));
    let dyn_provider: Arc<dyn CredentialProvider> = provider.clone();
    (provider, Arc::new(SessionStore::new(dyn_provider)))
}

#[test]
fn decide_is_pure_over_session() {
    let who = UserIdentity::new("u1", "ada@example.com");
    assert_eq!(decide(&Session::authenticated(who.clone(), "t")), GuardDecision::Allow(who));
    assert_eq!(decide(&Session::anonymous()), GuardDecision::Redirect(Route::Login));
}

#[test]
fn unknown_state_renders_nothing() {
    let (_, store) = store_with_demo();
    let guard = RouteGuard::new(store);
    assert_eq!(guard.state(), GuardState::Unknown);
    assert!(guard.render(|_| "protected").is_none());
    assert!(guard.context().is_none());
}

#[tokio::test]
async fn mount_without_session_redirects_to_login() {
    let (_, store) = store_with_demo();
    let guard = RouteGuard::new(store);
    assert_eq!(guard.mount().await, Some(GuardDecision::Redirect(Route::Login)));
    assert_eq!(guard.state(), GuardState::Unauthenticated);
    assert!(guard.render(|_| ()).is_none());
}

#[tokio::test]
async fn mount_after_sign_in_allows_and_shares_identity() {
    let (_, store) = store_with_demo();
    store.sign_in("ada@example.com", "pw").await.unwrap();
    let guard = RouteGuard::new(store);
    let decision = guard.mount().await.unwrap();
    let GuardDecision::Allow(identity) = decision else { panic!("expected allow") };
    assert_eq!(identity.email, "ada@example.com");
    assert_eq!(guard.render(|ctx| ctx.identity.email.clone()).as_deref(), Some("ada@example.com"));
    // Remounting while mounted returns the settled decision.
    assert_eq!(guard.mount().await, Some(GuardDecision::Allow(identity)));
}

#[tokio::test]
async fn sign_out_withdraws_and_redirects_to_public() {
    let (_, store) = store_with_demo();
    store.sign_in("ada@example.com", "pw").await.unwrap();
    let guard = RouteGuard::new(store.clone());
    guard.mount().await.unwrap();
    assert_eq!(guard.sign_out().await, GuardDecision::Redirect(Route::Public));
    assert_eq!(guard.state(), GuardState::Unauthenticated);
    assert!(guard.context().is_none());
    assert!(guard.observe().is_none());
}

#[tokio::test]
async fn observe_picks_up_sign_out_from_another_component() {
    let (_, store) = store_with_demo();
    store.sign_in("ada@example.com", "pw").await.unwrap();
    let guard = RouteGuard::new(store.clone());
    guard.mount().await.unwrap();
    assert!(guard.observe().is_none());

    store.sign_out().await;
    assert_eq!(guard.observe(), Some(GuardDecision::Redirect(Route::Public)));
    assert_eq!(guard.state(), GuardState::Unauthenticated);
}

#[tokio::test]
async fn unmount_resets_to_unknown() {
    let (_, store) = store_with_demo();
    store.sign_in("ada@example.com", "pw").await.unwrap();
    let guard = RouteGuard::new(store);
    guard.mount().await.unwrap();
    guard.unmount();
    assert!(!guard.is_mounted());
    assert_eq!(guard.state(), GuardState::Unknown);
    assert!(guard.render(|_| ()).is_none());
}

#[tokio::test]
async fn switching_user_between_checks_remounts_for_the_new_identity() {
    let (provider, store) = store_with_demo();
    provider.add_account("bob@example.com", "pw2");
    store.sign_in("ada@example.com", "pw").await.unwrap();
    let guard = RouteGuard::new(store.clone());
    guard.mount().await.unwrap();

    // Sign-out and sign-in land between two checks; only the latest value is seen.
    store.sign_out().await;
    store.sign_in("bob@example.com", "pw2").await.unwrap();

    assert!(guard.observe().is_none());
    assert_eq!(guard.state(), GuardState::Unknown);
    assert!(guard.render(|_| ()).is_none());
    let Some(GuardDecision::Allow(identity)) = guard.mount().await else { panic!("expected allow") };
    assert_eq!(identity.email, "bob@example.com");
    assert_eq!(guard.render(|ctx| ctx.identity.email.clone()).as_deref(), Some("bob@example.com"));
}

#[tokio::test]
async fn settled_mount_does_not_hand_out_a_replaced_identity() {
    let (provider, store) = store_with_demo();
    provider.add_account("bob@example.com", "pw2");
    store.sign_in("ada@example.com", "pw").await.unwrap();
    let guard = RouteGuard::new(store.clone());
    guard.mount().await.unwrap();

    store.sign_in("bob@example.com", "pw2").await.unwrap();
    let Some(GuardDecision::Allow(identity)) = guard.mount().await else { panic!("expected allow") };
    assert_eq!(identity.email, "bob@example.com");
}
