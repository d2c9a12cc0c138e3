use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Employment type of a listing, as shown in the type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
    #[serde(rename = "Temporary")]
    Temporary,
}

impl JobType {
    pub fn label(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Temporary => "Temporary",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One job posting after normalization. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    /// 0 means unspecified / negotiable.
    pub salary_min: u64,
    pub posted_at: DateTime<Utc>,
    /// 0 – 100
    pub match_score: u8,
    pub description: String,
    pub requirements: Vec<String>,
    pub apply_url: String,
}

impl JobListing {
    /// Checks what normalization guarantees for feed listings, for listings
    /// that arrive from elsewhere: non-blank id, title, company and location,
    /// and a score within 0 – 100.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("id", &self.id),
            ("title", &self.title),
            ("company", &self.company),
            ("location", &self.location),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(format!("listing '{}': {field} must not be blank", self.id));
        }
        if self.match_score > 100 {
            return Err(format!(
                "listing '{}': match_score {} is outside 0-100",
                self.id, self.match_score
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_job_type_serde_uses_display_labels() {
        let json = serde_json::to_string(&JobType::FullTime).unwrap();
        assert_eq!(json, r#""Full-time""#);
        let parsed: JobType = serde_json::from_str(r#""Temporary""#).unwrap();
        assert_eq!(parsed, JobType::Temporary);
    }

    #[test]
    fn test_listing_serializes_type_field() {
        let listing = JobListing {
            id: "42".to_string(),
            title: "Software Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Berlin".to_string(),
            job_type: JobType::Contract,
            salary_min: 50_000,
            posted_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            match_score: 91,
            description: String::new(),
            requirements: vec![],
            apply_url: "https://example.com/apply".to_string(),
        };

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["type"], "Contract");
        assert_eq!(value["salary_min"], 50_000);
        assert_eq!(value["match_score"], 91);
        assert_eq!(value["apply_url"], "https://example.com/apply");
    }

    fn valid_listing() -> JobListing {
        JobListing {
            id: "7".to_string(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            job_type: JobType::FullTime,
            salary_min: 0,
            posted_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            match_score: 100,
            description: String::new(),
            requirements: vec![],
            apply_url: String::new(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_listing() {
        assert_eq!(valid_listing().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_blank_required_text() {
        let listing = JobListing {
            company: "  ".to_string(),
            ..valid_listing()
        };
        let err = listing.validate().unwrap_err();
        assert!(err.contains("company"), "{err}");
    }

    #[test]
    fn test_validate_rejects_score_above_100() {
        let listing = JobListing {
            match_score: 250,
            ..valid_listing()
        };
        let err = listing.validate().unwrap_err();
        assert!(err.contains("match_score"), "{err}");
    }
}
