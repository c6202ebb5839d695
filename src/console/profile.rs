//! Profile and security view: identity details and password-reset initiation.

use crate::identity::{SessionStore, UserIdentity};

pub const RESET_SENT: &str = "Password reset email sent! Please check your inbox.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetNotice {
    Sent(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileScreen {
    pub identity: UserIdentity,
    /// Outcome of the last reset request made from this screen.
    pub notice: Option<ResetNotice>,
}

impl ProfileScreen {
    pub fn new(identity: UserIdentity) -> Self {
        Self { identity, notice: None }
    }
}

/// Ask the provider to mail a reset link to the signed-in address. One
/// attempt per call; a failure can be retried by calling again.
pub async fn request_reset(store: &SessionStore, identity: &UserIdentity, redirect_to: &str) -> ResetNotice {
    match store.request_password_reset(&identity.email, redirect_to).await {
        Ok(()) => ResetNotice::Sent(RESET_SENT.to_string()),
        Err(e) => {
            tracing::info!(target: "notebuddy::auth", "password reset rejected: {}", e);
            ResetNotice::Failed(e.message().to_string())
        }
    }
}
