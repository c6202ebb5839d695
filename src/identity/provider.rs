use async_trait::async_trait;

use super::session::Session;

/// Error reported by a credential provider.
///
/// The message is the provider's own text and is shown to the user as-is;
/// nothing in the console parses or categorizes it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthError {
    message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

/// Remote identity service the session store delegates to.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Session the provider currently holds, if any.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;

    async fn sign_in_with_password(&self, req: &LoginRequest) -> Result<Session, AuthError>;

    /// Invalidate the remote session identified by `token`.
    async fn sign_out(&self, token: Option<&str>) -> Result<(), AuthError>;

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<(), AuthError>;
}
