use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::feed::FeedQuery;
use crate::models::JobListing;
use crate::pipeline::criteria::FilterCriteria;
use crate::pipeline::time_ago::format_time_ago;

use super::{FeedState, JobSession};

/// Page state as the UI renders it. `Empty` ("no jobs found") is distinct from
/// both `Loading` and `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    Loading,
    Error,
    Empty,
    Ready,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: JobListing,
    pub posted_ago: String,
    pub saved: bool,
}

impl ListingView {
    pub fn new(listing: &JobListing, criteria: &FilterCriteria, now: DateTime<Utc>) -> Self {
        Self {
            posted_ago: format_time_ago(listing.posted_at, now),
            saved: criteria.is_saved(&listing.id),
            listing: listing.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub status: FeedStatus,
    pub error: Option<String>,
    pub query: FeedQuery,
    pub criteria: FilterCriteria,
    pub created_at: DateTime<Utc>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Listings in the feed before filtering.
    pub feed_count: usize,
    pub count: usize,
    pub jobs: Vec<ListingView>,
}

impl JobSession {
    /// Renders the session, re-running the pipeline only if feed or criteria changed.
    /// `now` only drives the `posted_ago` labels.
    pub fn view(&mut self, now: DateTime<Utc>) -> SessionView {
        let mut view = SessionView {
            session_id: self.id,
            status: FeedStatus::Loading,
            error: None,
            query: self.query.clone(),
            criteria: self.criteria.clone(),
            created_at: self.created_at,
            fetched_at: None,
            feed_count: 0,
            count: 0,
            jobs: Vec::new(),
        };

        match &self.feed {
            FeedState::Loading => {}
            FeedState::Failed(message) => {
                view.status = FeedStatus::Error;
                view.error = Some(message.clone());
            }
            FeedState::Ready(snapshot) => {
                let results = self.cache.get_or_compute(snapshot, &self.criteria);
                view.status = if results.is_empty() {
                    FeedStatus::Empty
                } else {
                    FeedStatus::Ready
                };
                view.fetched_at = Some(snapshot.fetched_at);
                view.feed_count = snapshot.listings.len();
                view.count = results.len();
                view.jobs = results
                    .iter()
                    .map(|l| ListingView::new(l, &self.criteria, now))
                    .collect();
            }
        }

        view
    }
}
