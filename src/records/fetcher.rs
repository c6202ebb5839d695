//! Authenticated retrieval of conversation records.
//!
//! Degraded-mode contract: the console must stay usable when the records API
//! is optional or absent. Every fetch-level failure (transport, non-2xx,
//! unexpected body shape) is logged and replaced with synthetic placeholder
//! records. Callers see the substitution only through
//! [`RecordCollection::provenance`]; [`RecordFetcher::fetch_records`] has no
//! error channel. Authentication failures are not handled here and stay
//! visible to the user.

use std::time::Duration;

use reqwest::Url;

use super::model::{Record, RecordCollection};
use crate::config::ConsoleConfig;
use crate::identity::Session;

pub const RECORDS_PATH: &str = "conversation-records";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("unexpected response format: {0}")]
    Shape(String),
}

/// Validate a response body into records, preserving order.
/// Accepted shapes: a bare array, or an object wrapping one under `records`.
pub fn parse_records(body: &[u8]) -> Result<Vec<Record>, FetchError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| FetchError::Shape(e.to_string()))?;
    let items = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut obj) => match obj.remove("records") {
            Some(records @ serde_json::Value::Array(_)) => records,
            _ => return Err(FetchError::Shape("object without a records array".into())),
        },
        other => return Err(FetchError::Shape(format!("expected array or object, got {}", kind_of(&other)))),
    };
    serde_json::from_value(items).map_err(|e| FetchError::Shape(e.to_string()))
}

fn kind_of(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[derive(Clone)]
pub struct RecordFetcher {
    base: Url,
    http: reqwest::Client,
}

impl RecordFetcher {
    pub fn new(base: Url) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { base, http }
    }

    pub fn from_config(cfg: &ConsoleConfig) -> Self {
        Self::new(cfg.api_base_url.clone())
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), RECORDS_PATH)
    }

    /// Records for the session's user, or synthetic placeholders if the API
    /// cannot deliver them. Never fails.
    pub async fn fetch_records(&self, session: &Session) -> RecordCollection {
        match self.try_fetch(session.token()).await {
            Ok(records) => {
                tracing::debug!(target: "notebuddy::fetch", "fetched {} records", records.len());
                RecordCollection::remote(records)
            }
            Err(e) => {
                tracing::warn!(target: "notebuddy::fetch", "records backend not available ({}), using synthetic data", e);
                RecordCollection::synthetic()
            }
        }
    }

    async fn try_fetch(&self, token: Option<&str>) -> Result<Vec<Record>, FetchError> {
        let mut req = self.http.get(self.endpoint());
        // Only reached behind the guard, so a missing token means no header rather than an error.
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.bytes().await?;
        parse_records(&body)
    }
}
