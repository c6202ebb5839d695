//! Credential provider backed by a hosted GoTrue (Supabase auth) service.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use super::principal::UserIdentity;
use super::provider::{AuthError, CredentialProvider, LoginRequest};
use super::session::{Session, SessionToken};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserPayload,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserPayload> for UserIdentity {
    fn from(u: UserPayload) -> Self {
        UserIdentity::new(u.id, u.email.unwrap_or_default())
    }
}

/// Error body shapes the service is known to return.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Pick the human-readable message out of an error response.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

pub struct GoTrueProvider {
    base: Url,
    api_key: String,
    http: reqwest::Client,
    held: RwLock<Option<SessionToken>>,
}

impl GoTrueProvider {
    pub fn new(base: Url, api_key: impl Into<String>) -> Self {
        Self { base, api_key: api_key.into(), http: reqwest::Client::new(), held: RwLock::new(None) }
    }

    /// Resume a session whose access token was obtained elsewhere.
    /// The token is checked against the service on the next lookup.
    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        *self.held.write() = Some(token.into());
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        let raw = format!("{}/auth/v1/{}", self.base.as_str().trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| AuthError::new(format!("invalid auth endpoint {raw}: {e}")))
    }

    async fn fail(resp: reqwest::Response) -> AuthError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        AuthError::new(error_message(status, &body))
    }
}

#[async_trait]
impl CredentialProvider for GoTrueProvider {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(token) = self.held.read().clone() else { return Ok(None); };
        let resp = self
            .http
            .get(self.endpoint("user")?)
            .header("apikey", &self.api_key)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AuthError::new(format!("session lookup failed: {e}")))?;

        if matches!(resp.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            tracing::debug!(target: "notebuddy::auth", "held token rejected ({}), dropping it", resp.status());
            *self.held.write() = None;
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(Self::fail(resp).await);
        }
        let user: UserPayload = resp
            .json()
            .await
            .map_err(|e| AuthError::new(format!("failed to parse user response: {e}")))?;
        Ok(Some(Session::authenticated(user.into(), token)))
    }

    async fn sign_in_with_password(&self, req: &LoginRequest) -> Result<Session, AuthError> {
        let resp = self
            .http
            .post(self.endpoint("token")?)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({"email": req.email, "password": req.password}))
            .send()
            .await
            .map_err(|e| AuthError::new(format!("sign-in request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(Self::fail(resp).await);
        }
        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::new(format!("failed to parse sign-in response: {e}")))?;
        *self.held.write() = Some(body.access_token.clone());
        let session = Session::authenticated(body.user.into(), body.access_token);
        tracing::info!(target: "notebuddy::auth", "signed in user={}", session.identity().map(|i| i.id.as_str()).unwrap_or(""));
        Ok(session)
    }

    async fn sign_out(&self, token: Option<&str>) -> Result<(), AuthError> {
        // The held token goes away whatever the service answers.
        let held = self.held.write().take();
        let token = token.map(str::to_string).or(held);
        let Some(token) = token else { return Ok(()); };

        let resp = self
            .http
            .post(self.endpoint("logout")?)
            .header("apikey", &self.api_key)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AuthError::new(format!("sign-out request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(Self::fail(resp).await);
        }
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        let resp = self
            .http
            .post(self.endpoint("recover")?)
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({"email": email}))
            .send()
            .await
            .map_err(|e| AuthError::new(format!("password reset request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(Self::fail(resp).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_msg_then_fallbacks() {
        assert_eq!(error_message(StatusCode::BAD_REQUEST, r#"{"msg":"Invalid login credentials"}"#), "Invalid login credentials");
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#),
            "Email not confirmed"
        );
        assert_eq!(error_message(StatusCode::TOO_MANY_REQUESTS, r#"{"message":"rate limited"}"#), "rate limited");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "<html>"), "Request failed with status 502");
        assert_eq!(error_message(StatusCode::BAD_REQUEST, r#"{"msg":"  "}"#), "Request failed with status 400");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let p = GoTrueProvider::new(Url::parse("https://proj.example.co/prefix/").unwrap(), "k");
        assert_eq!(p.endpoint("token").unwrap().as_str(), "https://proj.example.co/prefix/auth/v1/token");
    }
}
