use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Loose shape check matching what a browser `type=email` field accepts.
pub fn is_plausible_email(s: &str) -> bool {
    EMAIL_RE.is_match(s.trim())
}

/// The authenticated user as reported by the credential provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: id.into(), email: email.into() }
    }

    /// Local part of the email address, used as a display name in the console header.
    pub fn short_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}
