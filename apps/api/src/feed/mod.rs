//! External job feed: the paginated job-search API and the raw record shape it returns.
//!
//! All feed access goes through a `FeedSource`; `AppState` carries an
//! `Arc<dyn FeedSource>` so tests can swap in a static feed.

pub mod adzuna;
pub mod normalize;
pub mod scoring;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Never carries the request URL: it holds the feed credentials.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Feed API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Http(e.without_url())
    }
}

/// What to ask the feed for. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub what: Option<String>,
    #[serde(rename = "where", default)]
    pub location: Option<String>,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            what: None,
            location: None,
            page: first_page(),
        }
    }
}

impl FeedQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("page must be 1 or greater".to_string());
        }
        Ok(())
    }
}

/// `{ "display_name": ... }` wrapper used for company and location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayName {
    pub display_name: Option<String>,
}

/// One record exactly as the feed returns it. Every field may be absent;
/// `normalize` decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawJob {
    pub id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub company: Option<DisplayName>,
    pub location: Option<DisplayName>,
    pub contract_time: Option<String>,
    pub contract_type: Option<String>,
    pub salary_min: Option<f64>,
    pub created: Option<String>,
    pub description: Option<String>,
    pub redirect_url: Option<String>,
}

/// Anything that can produce one page of raw job records.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawJob>, FeedError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_query_defaults_to_first_page() {
        let q: FeedQuery = serde_json::from_str(r#"{"what": "rust", "where": "berlin"}"#).unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.what.as_deref(), Some("rust"));
        assert_eq!(q.location.as_deref(), Some("berlin"));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_feed_query_rejects_page_zero() {
        let q = FeedQuery {
            page: 0,
            ..Default::default()
        };
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_raw_job_deserializes_nested_display_names() {
        let json = r#"{
            "id": "4312",
            "title": "Rust Engineer",
            "company": {"display_name": "Acme"},
            "location": {"display_name": "London, UK", "area": ["UK", "London"]},
            "contract_time": "full_time",
            "salary_min": 55000.5,
            "created": "2024-05-30T10:00:00Z",
            "redirect_url": "https://example.com/4312",
            "__CLASS__": "Adzuna::API::Response::Job"
        }"#;
        let raw: RawJob = serde_json::from_str(json).unwrap();
        assert_eq!(raw.title.as_deref(), Some("Rust Engineer"));
        assert_eq!(
            raw.company.and_then(|c| c.display_name).as_deref(),
            Some("Acme")
        );
        assert_eq!(raw.salary_min, Some(55000.5));
        assert!(raw.description.is_none());
        assert!(raw.contract_type.is_none());
    }
}
