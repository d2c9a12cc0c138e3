//! Normalization: raw feed record → `JobListing`.
//!
//! Total over a batch: every record becomes exactly one listing or is dropped
//! with a warning. Partial listings never reach the pipeline.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::warn;

use crate::feed::scoring::{MatchScorer, ScoreInput};
use crate::feed::{DisplayName, RawJob};
use crate::models::{JobListing, JobType};

const MAX_REQUIREMENTS: usize = 5;
const MIN_REQUIREMENT_CHARS: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum DropReason {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("unparseable created timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Normalizes a whole feed page, keeping feed order and dropping unusable records.
pub fn normalize_batch(raw: Vec<RawJob>, scorer: &dyn MatchScorer) -> Vec<JobListing> {
    let total = raw.len();
    let listings: Vec<JobListing> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let id = record.id.as_ref().and_then(id_string);
            match normalize(record, scorer) {
                Ok(listing) => Some(listing),
                Err(reason) => {
                    warn!(index, id = ?id, "Dropping feed record: {reason}");
                    None
                }
            }
        })
        .collect();

    if listings.len() < total {
        warn!("Dropped {} of {} feed records", total - listings.len(), total);
    }
    listings
}

pub fn normalize(raw: RawJob, scorer: &dyn MatchScorer) -> Result<JobListing, DropReason> {
    let id = raw
        .id
        .as_ref()
        .and_then(id_string)
        .ok_or(DropReason::MissingField("id"))?;
    let title = required_text(raw.title, "title")?;
    let company = required_text(raw.company.and_then(display_name), "company")?;
    let location = required_text(raw.location.and_then(display_name), "location")?;

    let created = raw.created.ok_or(DropReason::MissingField("created"))?;
    let posted_at =
        parse_timestamp(&created).ok_or_else(|| DropReason::InvalidTimestamp(created.clone()))?;

    let description = raw.description.unwrap_or_default().trim().to_string();
    let match_score = scorer
        .score(&ScoreInput {
            title: &title,
            company: &company,
            description: &description,
        })
        .min(100);

    Ok(JobListing {
        id,
        job_type: map_job_type(raw.contract_time.as_deref(), raw.contract_type.as_deref()),
        salary_min: salary_floor(raw.salary_min),
        requirements: extract_requirements(&description),
        apply_url: raw.redirect_url.unwrap_or_default(),
        title,
        company,
        location,
        posted_at,
        match_score,
        description,
    })
}

/// `contract_time` wins; `contract_type` is the fallback; anything else is full-time.
pub fn map_job_type(contract_time: Option<&str>, contract_type: Option<&str>) -> JobType {
    match contract_time.map(str::trim) {
        Some("full_time") => return JobType::FullTime,
        Some("part_time") => return JobType::PartTime,
        _ => {}
    }
    match contract_type.map(str::trim) {
        Some("contract") => JobType::Contract,
        Some("temporary") => JobType::Temporary,
        _ => JobType::FullTime,
    }
}

/// Splits a description into at most five short requirement fragments, in order.
pub fn extract_requirements(description: &str) -> Vec<String> {
    description
        .split(['.', '!', '?', '\n', '•'])
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() >= MIN_REQUIREMENT_CHARS)
        .take(MAX_REQUIREMENTS)
        .map(str::to_string)
        .collect()
}

fn salary_floor(salary_min: Option<f64>) -> u64 {
    salary_min
        .filter(|s| s.is_finite() && *s > 0.0)
        .map(|s| s.floor() as u64)
        .unwrap_or(0)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    // Some records omit the offset; treat them as UTC.
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn display_name(wrapper: DisplayName) -> Option<String> {
    wrapper.display_name
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, DropReason> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(DropReason::MissingField(field))
}
