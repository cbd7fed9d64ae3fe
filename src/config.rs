use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Series data provider base URL
    pub provider_api_url: String,

    /// Series data provider API key
    pub provider_api_key: String,

    /// Delay in milliseconds between consecutive provider requests
    pub request_delay_ms: u64,

    /// Maximum number of recent series aggregated per team
    pub max_series: u32,

    /// TTL in seconds for cached team profiles
    pub profile_ttl_secs: u64,

    /// TTL in seconds for preparation job records
    pub job_ttl_secs: u64,

    /// Directory for the file cache tier
    pub cache_dir: String,

    /// Champion catalogue JSON path
    pub champions_file: String,

    /// Game title filter passed to the provider
    pub game_title: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            provider_api_url: env::var("PROVIDER_API_URL")
                .unwrap_or_else(|_| "https://api.grid.gg".to_string()),

            provider_api_key: env::var("PROVIDER_API_KEY")
                .context("PROVIDER_API_KEY must be set")?,

            request_delay_ms: env::var("REQUEST_DELAY_MS")
                .unwrap_or_else(|_| "1500".to_string())
                .parse()
                .context("REQUEST_DELAY_MS must be a valid number")?,

            max_series: env::var("MAX_SERIES")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("MAX_SERIES must be a valid number")?,

            profile_ttl_secs: env::var("PROFILE_TTL_SECS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse()
                .context("PROFILE_TTL_SECS must be a valid number")?,

            job_ttl_secs: env::var("JOB_TTL_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .context("JOB_TTL_SECS must be a valid number")?,

            cache_dir: env::var("CACHE_DIR").unwrap_or_else(|_| "data/cache".to_string()),

            champions_file: env::var("CHAMPIONS_FILE")
                .unwrap_or_else(|_| "data/champions.json".to_string()),

            game_title: env::var("GAME_TITLE").unwrap_or_else(|_| "lol".to_string()),
        })
    }
}
