//! Process-local session cell.
//!
//! Holds the current session (or the knowledge that there is none) and
//! refreshes it from the credential provider on first use. Writes are
//! serialized with a generation counter: sign-in and sign-out bump it, and a
//! lookup or sign-in response that started under an older generation is
//! dropped when it arrives.

use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::sync::watch;

use super::principal::UserIdentity;
use super::provider::{AuthError, CredentialProvider, LoginRequest};
use super::session::Session;

/// Returned to a sign-in whose response arrived after a later sign-out.
pub const SIGN_IN_SUPERSEDED: &str = "Sign-in was cancelled by a later sign-out";

type Lookup = Shared<BoxFuture<'static, Session>>;

#[derive(Default)]
struct StoreState {
    /// `None` until the first lookup resolves. `Some(anonymous)` means "known signed out".
    cached: Option<Session>,
    generation: u64,
    inflight: Option<(u64, Lookup)>,
}

pub struct SessionStore {
    provider: Arc<dyn CredentialProvider>,
    state: Mutex<StoreState>,
    changes: watch::Sender<Option<UserIdentity>>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        let (changes, _) = watch::channel(None);
        Self { provider, state: Mutex::new(StoreState::default()), changes }
    }

    pub fn provider(&self) -> &Arc<dyn CredentialProvider> {
        &self.provider
    }

    /// Identity after every store write. Receivers start with the current value marked seen.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserIdentity>> {
        self.changes.subscribe()
    }

    /// Cached session without triggering a lookup. `None` when not yet resolved.
    pub fn peek(&self) -> Option<Session> {
        self.state.lock().cached.clone()
    }

    /// Current session, resolving it from the provider on first use.
    /// Callers arriving while a lookup is in flight share that lookup.
    pub async fn current_session(&self) -> Session {
        let (generation, lookup) = {
            let mut st = self.state.lock();
            if let Some(s) = &st.cached {
                return s.clone();
            }
            let generation = st.generation;
            let lookup = match &st.inflight {
                Some((g, f)) if *g == generation => f.clone(),
                _ => {
                    tracing::debug!(target: "notebuddy::session", "session lookup started gen={}", generation);
                    let f = resolve(self.provider.clone()).boxed().shared();
                    st.inflight = Some((generation, f.clone()));
                    f
                }
            };
            (generation, lookup)
        };

        let session = lookup.await;

        let mut st = self.state.lock();
        if st.generation != generation {
            tracing::debug!(target: "notebuddy::session", "discarding stale lookup gen={} now={}", generation, st.generation);
            return st.cached.clone().unwrap_or_default();
        }
        if st.cached.is_none() {
            st.cached = Some(session);
            st.inflight = None;
            self.publish(&st);
        }
        st.cached.clone().unwrap_or_default()
    }

    /// Sign in through the provider. A failure leaves the cached session as it was.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let generation = self.state.lock().generation;
        let req = LoginRequest::new(email, password);
        let session = self.provider.sign_in_with_password(&req).await?;

        let mut st = self.state.lock();
        if st.generation != generation {
            tracing::warn!(target: "notebuddy::session", "sign-in response arrived after sign-out, ignoring it");
            return Err(AuthError::new(SIGN_IN_SUPERSEDED));
        }
        st.generation += 1;
        st.cached = Some(session.clone());
        st.inflight = None;
        self.publish(&st);
        tracing::info!(target: "notebuddy::session", "signed in user={}", session.identity().map(|i| i.id.as_str()).unwrap_or(""));
        Ok(session)
    }

    /// Invalidate the remote session, then clear the local one. The local
    /// clear happens even when the provider call fails.
    pub async fn sign_out(&self) {
        let token = {
            let mut st = self.state.lock();
            st.generation += 1;
            st.inflight = None;
            st.cached.as_ref().and_then(|s| s.token().map(str::to_string))
        };

        if let Err(e) = self.provider.sign_out(token.as_deref()).await {
            tracing::warn!(target: "notebuddy::session", "remote sign-out failed: {}", e);
        }

        let mut st = self.state.lock();
        st.generation += 1;
        st.cached = Some(Session::anonymous());
        st.inflight = None;
        self.publish(&st);
        tracing::info!(target: "notebuddy::session", "signed out");
    }

    /// Ask the provider to send a reset link. Does not touch the session.
    pub async fn request_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        self.provider.reset_password_for_email(email, redirect_to).await
    }

    fn publish(&self, st: &StoreState) {
        let identity = st.cached.as_ref().and_then(|s| s.identity().cloned());
        self.changes.send_replace(identity);
    }
}

async fn resolve(provider: Arc<dyn CredentialProvider>) -> Session {
    match provider.current_session().await {
        Ok(Some(session)) => session,
        Ok(None) => Session::anonymous(),
        Err(e) => {
            tracing::warn!(target: "notebuddy::session", "session lookup failed, treating as signed out: {}", e);
            Session::anonymous()
        }
    }
}
