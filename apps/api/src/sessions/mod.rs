//! Job-search sessions: one per page load.
//!
//! A session owns the feed it fetched and the user's criteria, and re-runs the
//! pipeline (memoized) whenever either changes. Nothing is persisted: dropping
//! the session discards criteria and bookmarks. A client that walks away
//! without deleting its session loses it after the store's idle TTL.

pub mod handlers;
pub mod store;
pub mod view;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::feed::FeedQuery;
use crate::pipeline::criteria::FilterCriteria;
use crate::pipeline::memo::QueryCache;
use crate::pipeline::FeedSnapshot;

pub use store::SessionStore;
pub use view::{ListingView, SessionView};

/// Shown to the caller for any fetch failure; the detail goes to the log only.
pub const FEED_ERROR_MESSAGE: &str = "Could not load job listings. Please try again later.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    #[error("Job {0} not found in the current feed")]
    JobNotFound(String),

    #[error("Feed is not loaded for this session")]
    FeedNotReady,
}

#[derive(Debug, Clone)]
pub enum FeedState {
    Loading,
    /// Terminal until an explicit refresh; no partial feed is kept.
    Failed(String),
    Ready(FeedSnapshot),
}

pub struct JobSession {
    pub id: Uuid,
    pub query: FeedQuery,
    pub criteria: FilterCriteria,
    pub created_at: DateTime<Utc>,
    /// Last time a caller touched the session; drives idle eviction.
    last_seen: Instant,
    feed: FeedState,
    cache: QueryCache,
    /// Bumped on every fetch start; a finishing fetch only lands if its ticket is current.
    fetch_ticket: u64,
    fetch_task: Option<JoinHandle<()>>,
}

impl JobSession {
    fn new(id: Uuid, query: FeedQuery) -> Self {
        Self {
            id,
            query,
            criteria: FilterCriteria::default(),
            created_at: Utc::now(),
            last_seen: Instant::now(),
            feed: FeedState::Loading,
            cache: QueryCache::new(),
            fetch_ticket: 0,
            fetch_task: None,
        }
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    fn idle_for(&self) -> std::time::Duration {
        self.last_seen.elapsed()
    }

    fn ready_feed(&self) -> Result<&FeedSnapshot, SessionError> {
        match &self.feed {
            FeedState::Ready(snapshot) => Ok(snapshot),
            _ => Err(SessionError::FeedNotReady),
        }
    }

    /// Aborts any in-flight fetch and returns the ticket for the next one.
    fn begin_fetch(&mut self) -> u64 {
        self.abort_fetch();
        self.fetch_ticket += 1;
        self.feed = FeedState::Loading;
        self.cache.clear();
        self.fetch_ticket
    }

    fn abort_fetch(&mut self) {
        if let Some(task) = self.fetch_task.take() {
            if !task.is_finished() {
                tracing::debug!(session_id = %self.id, "Aborting in-flight feed fetch");
            }
            task.abort();
        }
    }
}

impl Drop for JobSession {
    fn drop(&mut self) {
        self.abort_fetch();
    }
}
