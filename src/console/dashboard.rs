//! Records listing.

use crate::error::{AppError, AppResult};
use crate::identity::SessionStore;
use crate::records::{RecordCollection, RecordFetcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    Ready(RecordCollection),
    /// Generic error panel. Only failures outside the fetch itself end up here.
    Failed(String),
}

/// Load the records for the signed-in user.
///
/// Fetch failures never reach this level; they come back as synthetic data.
/// What can fail is the session read that precedes the fetch, and that is
/// shown as the generic panel with the cause kept in the log.
pub async fn load(store: &SessionStore, fetcher: &RecordFetcher) -> DashboardState {
    match load_records(store, fetcher).await {
        Ok(records) => DashboardState::Ready(records),
        Err(e) => {
            tracing::error!(target: "notebuddy::fetch", "record loading failed: {}", e);
            DashboardState::Failed(e.user_message().to_string())
        }
    }
}

async fn load_records(store: &SessionStore, fetcher: &RecordFetcher) -> AppResult<RecordCollection> {
    let session = store.current_session().await;
    if !session.is_authenticated() {
        return Err(AppError::session("session_missing", "no active session while loading records"));
    }
    // A panic inside the fetch task becomes an internal error on the panel.
    let fetcher = fetcher.clone();
    let task = tokio::spawn(async move { fetcher.fetch_records(&session).await });
    let records = task
        .await
        .map_err(|e| anyhow::Error::new(e).context("record fetch task failed"))?;
    Ok(records)
}
