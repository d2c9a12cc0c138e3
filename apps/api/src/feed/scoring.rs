//! Match scoring: how relevant a listing is to what the user searched for.
//!
//! Pluggable: normalization takes a `&dyn MatchScorer`, so a ranking service
//! can replace the keyword scorer without touching the pipeline.

/// Text fields a scorer may look at.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub title: &'a str,
    pub company: &'a str,
    pub description: &'a str,
}

pub trait MatchScorer: Send + Sync {
    /// Relevance in 0 – 100.
    fn score(&self, input: &ScoreInput<'_>) -> u8;
}

/// Score given when there is nothing to match against. Below the
/// recommended threshold, so an unqualified search recommends nothing.
pub const NEUTRAL_SCORE: u8 = 50;

const TITLE_STRENGTH: f32 = 1.0;
const TEXT_STRENGTH: f32 = 0.6;

/// Deterministic keyword scorer.
///
/// Per keyword: title hit → 1.0, company/description hit → 0.6, else 0.0.
/// Score = mean strength × 100, rounded.
#[derive(Debug, Clone, Default)]
pub struct KeywordMatchScorer {
    keywords: Vec<String>,
}

impl KeywordMatchScorer {
    /// Splits a free-text search (`"rust, backend engineer"`) into lowercase keywords.
    pub fn from_search(text: Option<&str>) -> Self {
        let keywords = text
            .unwrap_or_default()
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl MatchScorer for KeywordMatchScorer {
    fn score(&self, input: &ScoreInput<'_>) -> u8 {
        if self.keywords.is_empty() {
            return NEUTRAL_SCORE;
        }

        let title = input.title.to_lowercase();
        let company = input.company.to_lowercase();
        let description = input.description.to_lowercase();

        let total: f32 = self
            .keywords
            .iter()
            .map(|kw| {
                // Keywords are lowercased once in `from_search`.
                if title.contains(kw.as_str()) {
                    TITLE_STRENGTH
                } else if company.contains(kw.as_str()) || description.contains(kw.as_str()) {
                    TEXT_STRENGTH
                } else {
                    0.0
                }
            })
            .sum();

        let mean = total / self.keywords.len() as f32;
        (mean * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(title: &'a str, description: &'a str) -> ScoreInput<'a> {
        ScoreInput {
            title,
            company: "Acme",
            description,
        }
    }

    #[test]
    fn test_no_keywords_is_neutral() {
        let scorer = KeywordMatchScorer::from_search(None);
        assert_eq!(scorer.score(&input("Rust Engineer", "")), NEUTRAL_SCORE);
        let blank = KeywordMatchScorer::from_search(Some("  , "));
        assert!(blank.keywords().is_empty());
    }

    #[test]
    fn test_all_keywords_in_title_scores_100() {
        let scorer = KeywordMatchScorer::from_search(Some("Rust, engineer"));
        assert_eq!(scorer.keywords(), ["rust", "engineer"]);
        assert_eq!(scorer.score(&input("Senior Rust Engineer", "")), 100);
    }

    #[test]
    fn test_description_hit_is_partial() {
        let scorer = KeywordMatchScorer::from_search(Some("kubernetes"));
        let score = scorer.score(&input("Platform Engineer", "Runs Kubernetes clusters"));
        assert_eq!(score, 60);
    }

    #[test]
    fn test_mixed_hits_average() {
        let scorer = KeywordMatchScorer::from_search(Some("rust kafka java"));
        // rust: title 1.0, kafka: description 0.6, java: miss 0.0 → 1.6 / 3
        let score = scorer.score(&input("Rust Developer", "We stream with Kafka"));
        assert_eq!(score, 53);
    }

    #[test]
    fn test_keywords_match_case_insensitively() {
        let scorer = KeywordMatchScorer::from_search(Some("RUST Kafka"));
        assert_eq!(scorer.keywords(), ["rust", "kafka"]);
        assert_eq!(scorer.score(&input("rust engineer", "KAFKA streams")), 80);
    }

    #[test]
    fn test_company_counts_as_text_hit() {
        let scorer = KeywordMatchScorer::from_search(Some("acme"));
        assert_eq!(scorer.score(&input("Engineer", "")), 60);
    }
}
