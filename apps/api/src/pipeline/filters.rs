//! Filter stages. Each stage keeps a subset of its input in input order and
//! never touches the surviving listings.
//!
//! Fixed order: tab → search → type → location.

use chrono::{DateTime, Utc};

use crate::models::JobListing;
use crate::pipeline::criteria::{FilterCriteria, Tab};
use crate::pipeline::time_ago::{elapsed_secs, MONTH_SECS};

/// `recommended` keeps listings scoring at least this much.
pub const RECOMMENDED_MIN_SCORE: u8 = 90;

/// `recent` keeps listings younger than this: anything labelled in
/// seconds, minutes, hours or days, never months or years.
pub const RECENT_WINDOW_SECS: i64 = MONTH_SECS;

pub fn tab_stage<'a>(
    listings: Vec<&'a JobListing>,
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<&'a JobListing> {
    match criteria.active_tab {
        Tab::All => listings,
        Tab::Saved => keep(listings, |l| criteria.is_saved(&l.id)),
        Tab::Recommended => keep(listings, |l| l.match_score >= RECOMMENDED_MIN_SCORE),
        Tab::Recent => keep(listings, |l| elapsed_secs(l.posted_at, now) < RECENT_WINDOW_SECS),
    }
}

pub fn search_stage<'a>(listings: Vec<&'a JobListing>, search_text: &str) -> Vec<&'a JobListing> {
    let Some(needle) = normalized_needle(search_text) else {
        return listings;
    };
    keep(listings, |l| {
        contains_folded(&l.title, &needle) || contains_folded(&l.company, &needle)
    })
}

pub fn type_stage<'a>(
    listings: Vec<&'a JobListing>,
    criteria: &FilterCriteria,
) -> Vec<&'a JobListing> {
    if criteria.selected_types.is_empty() {
        return listings;
    }
    keep(listings, |l| criteria.selected_types.contains(&l.job_type))
}

pub fn location_stage<'a>(
    listings: Vec<&'a JobListing>,
    location_text: &str,
) -> Vec<&'a JobListing> {
    let Some(needle) = normalized_needle(location_text) else {
        return listings;
    };
    keep(listings, |l| contains_folded(&l.location, &needle))
}

/// Runs all four stages in order over `feed`.
pub fn apply_filters<'a>(
    feed: &'a [JobListing],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<&'a JobListing> {
    let listings: Vec<&JobListing> = feed.iter().collect();
    let listings = tab_stage(listings, criteria, now);
    let listings = search_stage(listings, &criteria.search_text);
    let listings = type_stage(listings, criteria);
    location_stage(listings, &criteria.location_text)
}

fn keep<'a>(
    mut listings: Vec<&'a JobListing>,
    predicate: impl Fn(&JobListing) -> bool,
) -> Vec<&'a JobListing> {
    listings.retain(|l| predicate(*l));
    listings
}

/// Blank text disables a free-text stage.
fn normalized_needle(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
