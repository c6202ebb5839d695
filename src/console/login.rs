//! Sign-in form.

use crate::error::AppError;
use crate::identity::{is_plausible_email, SessionStore};
use crate::routes::{ConsoleView, Route};

pub const MISSING_FIELDS: &str = "Please enter your email and password.";
pub const MALFORMED_EMAIL: &str = "Please enter a valid email address.";

/// Login screen as rendered: the inline error from the last attempt, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginScreen {
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Navigate(Route),
    Rejected(LoginScreen),
}

/// Submit the form. Provider errors come back verbatim as the inline message;
/// the form stays usable for another attempt.
pub async fn submit(store: &SessionStore, email: &str, password: &str) -> LoginOutcome {
    if email.trim().is_empty() || password.is_empty() {
        return rejected(MISSING_FIELDS);
    }
    if !is_plausible_email(email) {
        return rejected(MALFORMED_EMAIL);
    }
    match store.sign_in(email.trim(), password).await {
        Ok(_) => LoginOutcome::Navigate(Route::Console(ConsoleView::Dashboard)),
        Err(e) => {
            tracing::info!(target: "notebuddy::auth", "sign-in rejected: {}", e);
            rejected(AppError::from(e).user_message())
        }
    }
}

fn rejected(msg: &str) -> LoginOutcome {
    LoginOutcome::Rejected(LoginScreen { error: Some(msg.to_string()) })
}
