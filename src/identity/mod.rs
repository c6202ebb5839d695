//! Identity and session lifecycle for the console.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod session;
mod provider;
mod store;
mod local;
mod gotrue;

pub use principal::{UserIdentity, is_plausible_email};
pub use session::{Session, SessionToken};
pub use provider::{AuthError, CredentialProvider, LoginRequest};
pub use store::{SessionStore, SIGN_IN_SUPERSEDED};
pub use local::{LocalCredentialProvider, INVALID_CREDENTIALS, INVALID_EMAIL};
pub use gotrue::GoTrueProvider;

use std::sync::Arc;

use crate::config::ConsoleConfig;

/// Provider selected by configuration: the hosted service when an auth URL
/// is set, otherwise the in-process demo provider seeded with one account.
pub fn provider_from_config(cfg: &ConsoleConfig) -> Arc<dyn CredentialProvider> {
    match &cfg.auth_url {
        Some(url) => {
            tracing::info!(target: "notebuddy::auth", "using hosted auth service at {}", url);
            Arc::new(GoTrueProvider::new(url.clone(), cfg.auth_api_key.clone()))
        }
        None => {
            tracing::info!(target: "notebuddy::auth", "no auth service configured, using local demo account {}", cfg.demo_email);
            Arc::new(LocalCredentialProvider::with_account(&cfg.demo_email, &cfg.demo_password))
        }
    }
}
