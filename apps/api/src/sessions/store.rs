use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::feed::normalize::normalize_batch;
use crate::feed::scoring::KeywordMatchScorer;
use crate::feed::{FeedQuery, FeedSource};
use crate::models::JobType;
use crate::pipeline::criteria::FilterCriteria;
use crate::pipeline::FeedSnapshot;

use super::{FeedState, JobSession, ListingView, SessionError, SessionView, FEED_ERROR_MESSAGE};

type Sessions = HashMap<Uuid, JobSession>;

/// In-memory session registry. Cloning shares the same sessions.
///
/// The lock is never held across a feed fetch: the fetch task takes it only to
/// install its result. Sessions idle for longer than `idle_ttl` are evicted on
/// the next `create` or sweep.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<Sessions>>,
    source: Arc<dyn FeedSource>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(source: Arc<dyn FeedSource>, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            source,
            idle_ttl,
        }
    }

    /// Opens a session and starts its feed fetch in the background.
    pub async fn create(&self, query: FeedQuery) -> SessionView {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.lock().await;
        self.evict_idle_locked(&mut sessions);

        let session = sessions
            .entry(id)
            .or_insert_with(|| JobSession::new(id, query));
        // The fetch task blocks on the lock we hold, so it cannot land before the insert.
        self.start_fetch(session);

        info!(session_id = %id, "Opened job search session");
        session.view(Utc::now())
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView, SessionError> {
        let mut sessions = self.sessions.lock().await;
        Ok(touch(&mut sessions, id)?.view(Utc::now()))
    }

    pub async fn criteria(&self, id: Uuid) -> Result<FilterCriteria, SessionError> {
        let mut sessions = self.sessions.lock().await;
        Ok(touch(&mut sessions, id)?.criteria.clone())
    }

    /// Replaces the whole criteria value and returns the re-derived list.
    pub async fn replace_criteria(
        &self,
        id: Uuid,
        criteria: FilterCriteria,
    ) -> Result<SessionView, SessionError> {
        let mut sessions = self.sessions.lock().await;
        let session = touch(&mut sessions, id)?;
        session.criteria = criteria;
        Ok(session.view(Utc::now()))
    }

    /// Bookmarks or un-bookmarks a listing of the loaded feed.
    /// Returns whether it is saved afterwards.
    pub async fn toggle_saved(&self, id: Uuid, job_id: &str) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.lock().await;
        let session = touch(&mut sessions, id)?;
        let feed = session.ready_feed()?;
        if feed.find(job_id).is_none() {
            return Err(SessionError::JobNotFound(job_id.to_string()));
        }
        Ok(session.criteria.toggle_saved(job_id))
    }

    /// Adds or removes a type from the type filter. Returns whether it is selected afterwards.
    pub async fn toggle_type(&self, id: Uuid, job_type: JobType) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.lock().await;
        Ok(touch(&mut sessions, id)?.criteria.toggle_type(job_type))
    }

    pub async fn listing(&self, id: Uuid, job_id: &str) -> Result<ListingView, SessionError> {
        let mut sessions = self.sessions.lock().await;
        let session = touch(&mut sessions, id)?;
        let listing = session
            .ready_feed()?
            .find(job_id)
            .ok_or_else(|| SessionError::JobNotFound(job_id.to_string()))?;
        Ok(ListingView::new(listing, &session.criteria, Utc::now()))
    }

    /// Re-fetches the feed, optionally with a new query. A fetch still in
    /// flight is aborted; criteria and bookmarks are kept.
    pub async fn refresh(
        &self,
        id: Uuid,
        query: Option<FeedQuery>,
    ) -> Result<SessionView, SessionError> {
        let mut sessions = self.sessions.lock().await;
        let session = touch(&mut sessions, id)?;
        if let Some(query) = query {
            session.query = query;
        }
        self.start_fetch(session);
        Ok(session.view(Utc::now()))
    }

    /// Drops the session; its in-flight fetch, if any, is aborted.
    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        let removed = self.sessions.lock().await.remove(&id);
        match removed {
            Some(_) => {
                info!(session_id = %id, "Closed job search session");
                Ok(())
            }
            None => Err(SessionError::SessionNotFound(id)),
        }
    }

    /// Drops every session idle for longer than the TTL. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        self.evict_idle_locked(&mut sessions)
    }

    /// Runs `evict_idle` every `every` until the returned task is aborted.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(every);
            timer.tick().await; // first tick fires immediately
            loop {
                timer.tick().await;
                store.evict_idle().await;
            }
        })
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn evict_idle_locked(&self, sessions: &mut Sessions) -> usize {
        let before = sessions.len();
        // Dropping a session aborts its fetch.
        sessions.retain(|_, session| session.idle_for() <= self.idle_ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(
                evicted,
                remaining = sessions.len(),
                "Evicted idle job search sessions"
            );
        }
        evicted
    }

    fn start_fetch(&self, session: &mut JobSession) {
        let ticket = session.begin_fetch();
        let store = self.clone();
        let id = session.id;
        let query = session.query.clone();
        session.fetch_task = Some(tokio::spawn(async move {
            store.load_feed(id, ticket, query).await;
        }));
    }

    async fn load_feed(&self, id: Uuid, ticket: u64, query: FeedQuery) {
        let state = match self.source.fetch(&query).await {
            Ok(raw) => {
                let scorer = KeywordMatchScorer::from_search(query.what.as_deref());
                let listings = normalize_batch(raw, &scorer);
                debug!(
                    session_id = %id,
                    listings = listings.len(),
                    keywords = ?scorer.keywords(),
                    "Feed loaded"
                );
                FeedState::Ready(FeedSnapshot::new(listings, Utc::now()))
            }
            Err(e) => {
                warn!(session_id = %id, "Feed fetch failed: {e}");
                FeedState::Failed(FEED_ERROR_MESSAGE.to_string())
            }
        };

        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(&id) {
            Some(session) if session.fetch_ticket == ticket => {
                session.feed = state;
                session.cache.clear();
                session.fetch_task = None;
            }
            Some(_) => debug!(session_id = %id, "Discarding superseded feed fetch"),
            None => debug!(session_id = %id, "Session closed before feed arrived"),
        }
    }
}

/// Looks a session up and marks it as seen.
fn touch(sessions: &mut Sessions, id: Uuid) -> Result<&mut JobSession, SessionError> {
    let session = sessions
        .get_mut(&id)
        .ok_or(SessionError::SessionNotFound(id))?;
    session.touch();
    Ok(session)
}
