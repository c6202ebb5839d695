//! Route guard for the protected console area.
//!
//! State machine `Unknown -> Authenticated(identity) | Unauthenticated`.
//! A mount performs at most one session lookup (shared with any other
//! pending lookup through the store), nothing protected renders while the
//! state is `Unknown`, and a lookup that resolves after `unmount` is ignored.
//! Re-authentication happens outside the guard; the protected area is
//! re-entered through a fresh mount.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::identity::{Session, SessionStore, UserIdentity};
use crate::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Unknown,
    Authenticated(UserIdentity),
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow(UserIdentity),
    Redirect(Route),
}

/// Redirect decision as a pure function of session state.
pub fn decide(session: &Session) -> GuardDecision {
    match session.identity() {
        Some(identity) => GuardDecision::Allow(identity.clone()),
        None => GuardDecision::Redirect(Route::Login),
    }
}

/// Shared context handed down to every view nested under the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleContext {
    pub identity: UserIdentity,
}

struct Mount {
    state: GuardState,
    mounted: bool,
    epoch: u64,
}

pub struct RouteGuard {
    store: Arc<SessionStore>,
    mount: Mutex<Mount>,
    changes: Mutex<watch::Receiver<Option<UserIdentity>>>,
}

impl RouteGuard {
    pub fn new(store: Arc<SessionStore>) -> Self {
        let changes = store.subscribe();
        Self {
            store,
            mount: Mutex::new(Mount { state: GuardState::Unknown, mounted: false, epoch: 0 }),
            changes: Mutex::new(changes),
        }
    }

    pub fn state(&self) -> GuardState {
        self.mount.lock().state.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.lock().mounted
    }

    /// Enter the protected area. Returns `None` when the guard was unmounted
    /// before the lookup finished, and the public-page redirect when a
    /// sign-out made elsewhere is still pending in [`observe`](Self::observe).
    pub async fn mount(&self) -> Option<GuardDecision> {
        if let Some(redirect) = self.observe() {
            return Some(redirect);
        }
        let epoch = {
            let mut m = self.mount.lock();
            if !m.mounted {
                m.mounted = true;
                m.epoch += 1;
                m.state = GuardState::Unknown;
            } else {
                match &m.state {
                    GuardState::Authenticated(identity) => return Some(GuardDecision::Allow(identity.clone())),
                    GuardState::Unauthenticated => return Some(GuardDecision::Redirect(Route::Login)),
                    GuardState::Unknown => {}
                }
            }
            m.epoch
        };

        let session = self.store.current_session().await;

        let mut m = self.mount.lock();
        if !m.mounted || m.epoch != epoch {
            tracing::debug!(target: "notebuddy::guard", "lookup resolved after unmount, ignoring");
            return None;
        }
        if m.state != GuardState::Unknown {
            // A concurrent mount call on this guard already applied the shared result.
            return match &m.state {
                GuardState::Authenticated(identity) => Some(GuardDecision::Allow(identity.clone())),
                _ => Some(GuardDecision::Redirect(Route::Login)),
            };
        }
        let decision = decide(&session);
        m.state = match &decision {
            GuardDecision::Allow(identity) => GuardState::Authenticated(identity.clone()),
            GuardDecision::Redirect(_) => GuardState::Unauthenticated,
        };
        tracing::debug!(target: "notebuddy::guard", "guard resolved: {:?}", decision);
        Some(decision)
    }

    /// Leave the protected area. The next mount starts again at `Unknown`.
    pub fn unmount(&self) {
        reset(&mut self.mount.lock());
    }

    /// Context for nested views; `None` unless authenticated.
    pub fn context(&self) -> Option<ConsoleContext> {
        match &self.mount.lock().state {
            GuardState::Authenticated(identity) => Some(ConsoleContext { identity: identity.clone() }),
            _ => None,
        }
    }

    /// Run `view` with the console context only when authorized.
    pub fn render<T>(&self, view: impl FnOnce(&ConsoleContext) -> T) -> Option<T> {
        self.context().map(|ctx| view(&ctx))
    }

    /// Apply session changes published by the store since the last check.
    /// Returns the redirect when a completed sign-out withdrew authorization.
    /// A different user in the store sends the guard back to `Unknown`, so
    /// the next mount resolves that user afresh.
    pub fn observe(&self) -> Option<GuardDecision> {
        let latest = {
            let mut rx = self.changes.lock();
            match rx.has_changed() {
                Ok(true) => rx.borrow_and_update().clone(),
                _ => return None,
            }
        };
        let mut m = self.mount.lock();
        let current = match &m.state {
            GuardState::Authenticated(identity) => Some(identity.clone()),
            GuardState::Unauthenticated => None,
            GuardState::Unknown => return None,
        };
        match (current, latest) {
            (Some(_), None) => {
                m.state = GuardState::Unauthenticated;
                tracing::info!(target: "notebuddy::guard", "session ended, withdrawing console access");
                Some(GuardDecision::Redirect(Route::Public))
            }
            (Some(current), Some(next)) if current != next => {
                tracing::info!(target: "notebuddy::guard", "session switched from {} to {}, remounting", current.id, next.id);
                reset(&mut m);
                None
            }
            (None, Some(_)) => {
                reset(&mut m);
                None
            }
            _ => None,
        }
    }

    /// Sign out through the store and withdraw authorization immediately.
    pub async fn sign_out(&self) -> GuardDecision {
        self.store.sign_out().await;
        // Consume the change notification so `observe` does not report it twice.
        self.changes.lock().borrow_and_update();
        let mut m = self.mount.lock();
        if m.mounted {
            m.state = GuardState::Unauthenticated;
        }
        GuardDecision::Redirect(Route::Public)
    }
}

fn reset(m: &mut Mount) {
    m.mounted = false;
    m.epoch += 1;
    m.state = GuardState::Unknown;
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod guard_tests;
