use anyhow::{ensure, Context, Result};

const DEFAULT_ADZUNA_BASE_URL: &str = "https://api.adzuna.com/v1/api/jobs";

/// Application configuration loaded from environment variables.
/// Startup fails if the feed credentials are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub adzuna_app_id: String,
    pub adzuna_app_key: String,
    pub adzuna_base_url: String,
    pub adzuna_country: String,
    pub feed_results_per_page: u32,
    pub feed_timeout_secs: u64,
    /// Sessions untouched for this long are evicted.
    pub session_idle_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            adzuna_app_id: require_env("ADZUNA_APP_ID")?,
            adzuna_app_key: require_env("ADZUNA_APP_KEY")?,
            adzuna_base_url: env_or("ADZUNA_BASE_URL", DEFAULT_ADZUNA_BASE_URL),
            adzuna_country: env_or("ADZUNA_COUNTRY", "us"),
            feed_results_per_page: parse_positive::<u32>(
                "FEED_RESULTS_PER_PAGE",
                &env_or("FEED_RESULTS_PER_PAGE", "20"),
            )?,
            feed_timeout_secs: env_or("FEED_TIMEOUT_SECS", "30")
                .parse::<u64>()
                .context("FEED_TIMEOUT_SECS must be a whole number of seconds")?,
            session_idle_ttl_secs: parse_positive::<u64>(
                "SESSION_IDLE_TTL_SECS",
                &env_or("SESSION_IDLE_TTL_SECS", "1800"),
            )?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_positive<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = raw
        .trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a positive integer"))?;
    ensure!(value > T::default(), "{key} must be a positive integer, got 0");
    Ok(value)
}
