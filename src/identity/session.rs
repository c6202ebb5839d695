use std::fmt;

use super::principal::UserIdentity;

pub type SessionToken = String;

/// The client's view of who is signed in.
///
/// A token exists exactly when an identity exists; the pair is stored as one
/// optional value so the two can never drift apart.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<(UserIdentity, SessionToken)>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { auth: None }
    }

    pub fn authenticated(identity: UserIdentity, token: impl Into<SessionToken>) -> Self {
        Self { auth: Some((identity, token.into())) }
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.auth.as_ref().map(|(identity, _)| identity)
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|(_, token)| token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }
}

// Tokens never show up in logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.auth {
            Some((identity, _)) => f
                .debug_struct("Session")
                .field("identity", identity)
                .field("token", &"<redacted>")
                .finish(),
            None => f.write_str("Session(anonymous)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_neither_identity_nor_token() {
        let s = Session::anonymous();
        assert!(s.identity().is_none());
        assert!(s.token().is_none());
        assert!(!s.is_authenticated());
        assert_eq!(s, Session::default());
    }

    #[test]
    fn authenticated_carries_both() {
        let s = Session::authenticated(UserIdentity::new("u1", "a@b.c"), "tok");
        assert_eq!(s.identity().map(|i| i.email.as_str()), Some("a@b.c"));
        assert_eq!(s.token(), Some("tok"));
    }

    #[test]
    fn debug_redacts_token() {
        let s = Session::authenticated(UserIdentity::new("u1", "a@b.c"), "secret-token");
        let out = format!("{:?}", s);
        assert!(!out.contains("secret-token"));
        assert!(out.contains("a@b.c"));
    }
}
