use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::JobListing;
use crate::pipeline::criteria::FilterCriteria;
use crate::pipeline::query;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub listings: Vec<JobListing>,
    #[serde(default)]
    pub criteria: FilterCriteria,
    /// Reference instant for the `recent` tab. Defaults to the time of the request.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub count: usize,
    pub jobs: Vec<JobListing>,
}

/// POST /api/v1/query
///
/// Runs the pipeline over caller-supplied listings. No session, no feed fetch.
/// Rejects the whole request if any listing is partial or out of range.
pub async fn handle_query(
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    for listing in &request.listings {
        listing.validate().map_err(AppError::Validation)?;
    }
    let now = request.now.unwrap_or_else(Utc::now);
    let jobs = query(&request.listings, &request.criteria, now);
    Ok(Json(QueryResponse {
        count: jobs.len(),
        jobs,
    }))
}
