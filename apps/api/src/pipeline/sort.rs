use std::cmp::Reverse;

use crate::models::JobListing;
use crate::pipeline::criteria::SortKey;

/// Orders listings descending by the chosen key into a new vector.
///
/// `sort_by_key` is stable, so equal keys keep their input order. Salary has no
/// special case for 0: unspecified salaries land last purely by value.
pub fn sort_listings(listings: &[&JobListing], key: SortKey) -> Vec<JobListing> {
    let mut sorted: Vec<JobListing> = listings.iter().map(|l| (*l).clone()).collect();
    match key {
        SortKey::Match => sorted.sort_by_key(|l| Reverse(l.match_score)),
        SortKey::Date => sorted.sort_by_key(|l| Reverse(l.posted_at)),
        SortKey::Salary => sorted.sort_by_key(|l| Reverse(l.salary_min)),
    }
    sorted
}
