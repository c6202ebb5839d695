//! Unified application error model and mapping helpers.
//! Errors here are the ones the console is allowed to show. Record fetch
//! failures never reach this type; they are absorbed by the fetcher.
//! Session and internal errors only come out of the record-loading routine.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Generic message for the dashboard error panel. Every outer failure of the
/// record-loading routine maps to this one string.
pub const RECORDS_LOAD_FAILED: &str = "Failed to load records.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    Auth { code: String, message: String },
    Config { code: String, message: String },
    Session { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Auth { code, .. }
            | AppError::Config { code, .. }
            | AppError::Session { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Auth { message, .. }
            | AppError::Config { message, .. }
            | AppError::Session { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn config<S: Into<String>>(code: S, msg: S) -> Self { AppError::Config { code: code.into(), message: msg.into() } }
    pub fn session<S: Into<String>>(code: S, msg: S) -> Self { AppError::Session { code: code.into(), message: msg.into() } }

    /// Text shown to the user for this error.
    /// Auth and config errors carry their own message verbatim. Everything
    /// else collapses into the generic panel message.
    pub fn user_message(&self) -> &str {
        if self.is_user_visible() {
            self.message()
        } else {
            RECORDS_LOAD_FAILED
        }
    }

    /// Whether the error's own message may be shown to the user.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, AppError::Auth { .. } | AppError::Config { .. })
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal { code: "internal_error".into(), message: err.to_string() }
    }
}

impl From<crate::identity::AuthError> for AppError {
    fn from(err: crate::identity::AuthError) -> Self {
        AppError::Auth { code: "auth_error".into(), message: err.message().to_string() }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
