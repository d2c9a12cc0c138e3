use std::sync::Arc;
use std::time::Duration;

use crate::feed::FeedSource;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Open job-search sessions. Each one fetches through the store's feed source.
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(feed: Arc<dyn FeedSource>, session_idle_ttl: Duration) -> Self {
        Self {
            sessions: SessionStore::new(feed, session_idle_ttl),
        }
    }
}
