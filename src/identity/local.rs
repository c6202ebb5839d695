//! In-process credential provider for front-end-only deployments.
//! Accounts live in memory and tokens are random base64url strings.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine;
use parking_lot::{Mutex, RwLock};

use super::principal::{is_plausible_email, UserIdentity};
use super::provider::{AuthError, CredentialProvider, LoginRequest};
use super::session::Session;

pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";
pub const INVALID_EMAIL: &str = "Unable to validate email address: invalid format";

#[derive(Debug, Clone)]
struct Account {
    identity: UserIdentity,
    password: String,
}

pub const TOKEN_UNAVAILABLE: &str = "Unable to create a session, please try again";

fn gen_token() -> Result<String, AuthError> {
    token_from(getrandom::getrandom)
}

fn token_from(fill: impl FnOnce(&mut [u8]) -> Result<(), getrandom::Error>) -> Result<String, AuthError> {
    let mut buf = [0u8; 32];
    if let Err(e) = fill(&mut buf) {
        tracing::error!(target: "notebuddy::auth", "os random source failed, refusing to mint token: {}", e);
        return Err(AuthError::new(TOKEN_UNAVAILABLE));
    }
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf))
}

#[derive(Default)]
pub struct LocalCredentialProvider {
    accounts: RwLock<HashMap<String, Account>>,
    active: RwLock<Option<Session>>,
    resets: Mutex<Vec<(String, String)>>,
}

impl LocalCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider seeded with a single account.
    pub fn with_account(email: &str, password: &str) -> Self {
        let p = Self::new();
        p.add_account(email, password);
        p
    }

    pub fn add_account(&self, email: &str, password: &str) -> UserIdentity {
        let identity = UserIdentity::new(uuid::Uuid::new_v4().to_string(), email.trim());
        self.accounts.write().insert(
            email.trim().to_lowercase(),
            Account { identity: identity.clone(), password: password.to_string() },
        );
        identity
    }

    /// Reset requests received so far as `(email, redirect_to)` pairs.
    pub fn reset_requests(&self) -> Vec<(String, String)> {
        self.resets.lock().clone()
    }
}

#[async_trait]
impl CredentialProvider for LocalCredentialProvider {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.active.read().clone())
    }

    async fn sign_in_with_password(&self, req: &LoginRequest) -> Result<Session, AuthError> {
        let account = self.accounts.read().get(&req.email.trim().to_lowercase()).cloned();
        let Some(account) = account else { return Err(AuthError::new(INVALID_CREDENTIALS)); };
        if account.password != req.password {
            return Err(AuthError::new(INVALID_CREDENTIALS));
        }
        let session = Session::authenticated(account.identity.clone(), gen_token()?);
        *self.active.write() = Some(session.clone());
        tracing::debug!(target: "notebuddy::auth", "local sign-in user={}", account.identity.id);
        Ok(session)
    }

    async fn sign_out(&self, token: Option<&str>) -> Result<(), AuthError> {
        let mut active = self.active.write();
        let held = active.as_ref().and_then(|s| s.token().map(str::to_string));
        if token.is_none() || held.as_deref() == token {
            *active = None;
        }
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        if !is_plausible_email(email) {
            return Err(AuthError::new(INVALID_EMAIL));
        }
        // Unknown addresses are accepted silently so the response does not reveal which accounts exist.
        self.resets.lock().push((email.trim().to_string(), redirect_to.to_string()));
        tracing::debug!(target: "notebuddy::auth", "local password reset requested redirect={}", redirect_to);
        Ok(())
    }
}
