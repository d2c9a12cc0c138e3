//! Job Listing Pipeline: feed + criteria in, ranked list out.
//!
//! Pure and synchronous: no I/O, no clock reads. Fetching the feed and owning
//! criteria mutation belong to `sessions`.

pub mod criteria;
pub mod filters;
pub mod memo;
pub mod sort;
pub mod time_ago;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::JobListing;
use criteria::FilterCriteria;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// One fetched feed page. `generation` is unique per snapshot and is what the
/// memo cache keys on; `fetched_at` is the reference instant for recency.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub listings: Arc<[JobListing]>,
}

impl FeedSnapshot {
    pub fn new(listings: Vec<JobListing>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            fetched_at,
            listings: listings.into(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&JobListing> {
        self.listings.iter().find(|l| l.id == id)
    }
}

/// `sort(filter(feed, criteria))`.
pub fn query(feed: &[JobListing], criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<JobListing> {
    let filtered = filters::apply_filters(feed, criteria, now);
    sort::sort_listings(&filtered, criteria.sort_key)
}
