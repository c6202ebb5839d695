//! Environment-driven configuration for the console.
//! Values are read once per process through [`ConsoleConfig::global`]; tests
//! build their own with [`ConsoleConfig::from_lookup`].

use once_cell::sync::Lazy;
use reqwest::Url;

use crate::error::{AppError, AppResult};

pub const ENV_API_URL: &str = "NOTEBUDDY_API_URL";
pub const ENV_AUTH_URL: &str = "NOTEBUDDY_AUTH_URL";
pub const ENV_AUTH_KEY: &str = "NOTEBUDDY_AUTH_KEY";
pub const ENV_PUBLIC_ORIGIN: &str = "NOTEBUDDY_PUBLIC_ORIGIN";
pub const ENV_DEMO_EMAIL: &str = "NOTEBUDDY_DEMO_EMAIL";
pub const ENV_DEMO_PASSWORD: &str = "NOTEBUDDY_DEMO_PASSWORD";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_DEMO_EMAIL: &str = "demo@notebuddy.local";
pub const DEFAULT_DEMO_PASSWORD: &str = "notebuddy";

/// Path the password-reset email links back to, relative to the public origin.
pub const RESET_PASSWORD_PATH: &str = "/console/reset-password";

static GLOBAL: Lazy<ConsoleConfig> = Lazy::new(|| match ConsoleConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
        tracing::warn!(target: "notebuddy::config", "invalid configuration ({}), using defaults", e);
        ConsoleConfig::default()
    }
});

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the records API.
    pub api_base_url: Url,
    /// Hosted auth service. `None` selects the in-process demo provider.
    pub auth_url: Option<Url>,
    /// Public API key sent as `apikey` to the hosted auth service.
    pub auth_api_key: String,
    /// Origin the console is served from; used to build reset redirects.
    pub public_origin: Url,
    pub demo_email: String,
    pub demo_password: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default api url"),
            auth_url: None,
            auth_api_key: String::new(),
            public_origin: Url::parse(DEFAULT_PUBLIC_ORIGIN).expect("default origin"),
            demo_email: DEFAULT_DEMO_EMAIL.to_string(),
            demo_password: DEFAULT_DEMO_PASSWORD.to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Process-wide configuration, resolved from the environment on first use.
    pub fn global() -> &'static ConsoleConfig {
        &GLOBAL
    }

    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = parse_url(ENV_API_URL, get(ENV_API_URL).as_deref().unwrap_or(DEFAULT_API_URL))?;
        let auth_url = match get(ENV_AUTH_URL) {
            Some(raw) => Some(parse_url(ENV_AUTH_URL, &raw)?),
            None => None,
        };
        let public_origin = parse_url(
            ENV_PUBLIC_ORIGIN,
            get(ENV_PUBLIC_ORIGIN).as_deref().unwrap_or(DEFAULT_PUBLIC_ORIGIN),
        )?;

        Ok(Self {
            api_base_url,
            auth_url,
            auth_api_key: get(ENV_AUTH_KEY).unwrap_or_default(),
            public_origin,
            demo_email: get(ENV_DEMO_EMAIL).unwrap_or_else(|| DEFAULT_DEMO_EMAIL.to_string()),
            demo_password: get(ENV_DEMO_PASSWORD).unwrap_or_else(|| DEFAULT_DEMO_PASSWORD.to_string()),
        })
    }

    /// Redirect target handed to the auth service with a reset request.
    pub fn reset_redirect(&self) -> String {
        format!("{}{}", self.public_origin.as_str().trim_end_matches('/'), RESET_PASSWORD_PATH)
    }
}

fn parse_url(key: &str, raw: &str) -> AppResult<Url> {
    Url::parse(raw).map_err(|e| AppError::config("invalid_url".to_string(), format!("{key}={raw:?} is not a valid URL: {e}")))
}
