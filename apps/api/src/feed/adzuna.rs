//! Adzuna job-search client.
//!
//! One GET per page, no retry: a failed fetch is terminal for the caller.
//! Credentials travel as `app_id` / `app_key` query parameters and are never logged;
//! `FeedError::Http` drops the request URL for that reason.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::feed::{FeedError, FeedQuery, FeedSource, RawJob};

/// Longest slice of an error body kept in `FeedError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawJob>,
    #[serde(default)]
    count: Option<u64>,
}

#[derive(Clone)]
pub struct AdzunaFeed {
    client: Client,
    base_url: String,
    country: String,
    app_id: String,
    app_key: String,
    results_per_page: u32,
}

impl AdzunaFeed {
    pub fn new(config: &Config) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.feed_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.adzuna_base_url.trim_end_matches('/').to_string(),
            country: config.adzuna_country.clone(),
            app_id: config.adzuna_app_id.clone(),
            app_key: config.adzuna_app_key.clone(),
            results_per_page: config.feed_results_per_page,
        })
    }

    fn search_url(&self, page: u32) -> String {
        format!("{}/{}/search/{}", self.base_url, self.country, page)
    }

    fn query_params(&self, query: &FeedQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("app_id", self.app_id.clone()),
            ("app_key", self.app_key.clone()),
            ("results_per_page", self.results_per_page.to_string()),
            ("content-type", "application/json".to_string()),
        ];
        if let Some(what) = non_blank(query.what.as_deref()) {
            params.push(("what", what.to_string()));
        }
        if let Some(location) = non_blank(query.location.as_deref()) {
            params.push(("where", location.to_string()));
        }
        params
    }
}

#[async_trait]
impl FeedSource for AdzunaFeed {
    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawJob>, FeedError> {
        let url = self.search_url(query.page);
        debug!(page = query.page, what = ?query.what, "Fetching job feed page");

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(query))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Job feed returned {}", status);
            return Err(FeedError::Status {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        debug!(
            "Job feed page {} returned {} records (total available: {:?})",
            query.page,
            parsed.results.len(),
            parsed.count
        );
        Ok(parsed.results)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;

    fn test_config(base_url: String) -> Config {
        Config {
            adzuna_app_id: "test-id".to_string(),
            adzuna_app_key: "test-key".to_string(),
            adzuna_base_url: base_url,
            adzuna_country: "gb".to_string(),
            feed_results_per_page: 5,
            feed_timeout_secs: 5,
            session_idle_ttl_secs: 60,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn search(
        Path((country, page)): Path<(String, u32)>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, StatusCode> {
        if params.get("app_id").map(String::as_str) != Some("test-id")
            || params.get("app_key").map(String::as_str) != Some("test-key")
        {
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(Json(json!({
            "count": 1,
            "results": [{
                "id": format!("{country}-{page}"),
                "title": params.get("what").cloned().unwrap_or_default(),
                "company": {"display_name": "Acme"},
                "location": {"display_name": params.get("where").cloned().unwrap_or_default()},
                "created": "2024-05-30T10:00:00Z",
                "results_per_page": params.get("results_per_page")
            }]
        })))
    }

    #[test]
    fn test_query_params_skip_blank_filters() {
        let feed = AdzunaFeed::new(&test_config("http://localhost/".to_string())).unwrap();
        let query = FeedQuery {
            what: Some("  ".to_string()),
            location: Some("Leeds".to_string()),
            page: 2,
        };
        let params = feed.query_params(&query);
        assert!(params.iter().all(|(k, _)| *k != "what"));
        assert!(params.contains(&("where", "Leeds".to_string())));
        assert!(params.contains(&("results_per_page", "5".to_string())));
        assert_eq!(feed.search_url(2), "http://localhost/gb/search/2");
    }

    #[tokio::test]
    async fn test_fetch_passes_credentials_and_query() {
        let base = serve(Router::new().route("/:country/search/:page", get(search))).await;
        let feed = AdzunaFeed::new(&test_config(base)).unwrap();

        let query = FeedQuery {
            what: Some("rust".to_string()),
            location: Some("London".to_string()),
            page: 3,
        };
        let results = feed.fetch(&query).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, Some(json!("gb-3")));
        assert_eq!(results[0].title.as_deref(), Some("rust"));
        assert_eq!(
            results[0]
                .location
                .as_ref()
                .and_then(|l| l.display_name.as_deref()),
            Some("London")
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let base = serve(Router::new().route(
            "/:country/search/:page",
            get(|| async { (StatusCode::UNAUTHORIZED, "bad credentials") }),
        ))
        .await;
        let feed = AdzunaFeed::new(&test_config(base)).unwrap();

        let err = feed.fetch(&FeedQuery::default()).await.unwrap_err();
        match err {
            FeedError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "bad credentials");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_error_does_not_leak_credentials() {
        // Bind then drop to get a local port with nothing listening on it.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = test_config(format!("http://{addr}"));
        config.adzuna_app_key = "SUPERSECRETKEY".to_string();
        let feed = AdzunaFeed::new(&config).unwrap();

        let err = feed.fetch(&FeedQuery::default()).await.unwrap_err();
        assert!(matches!(err, FeedError::Http(_)));
        let logged = format!("Feed fetch failed: {err} / {err:?}");
        assert!(!logged.contains("SUPERSECRETKEY"), "{logged}");
        assert!(!logged.contains("test-id"), "{logged}");
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let base = serve(Router::new().route(
            "/:country/search/:page",
            get(|| async { "<html>not json</html>" }),
        ))
        .await;
        let feed = AdzunaFeed::new(&test_config(base)).unwrap();

        let err = feed.fetch(&FeedQuery::default()).await.unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }
}
