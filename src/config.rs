use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://ws.audioscrobbler.com/2.0/";

/// Seconds between outbound API calls unless overridden.
const DEFAULT_MIN_INTERVAL_SECS: u64 = 4;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub min_interval: Duration,
    /// Documents persist under this directory when set; in-memory otherwise.
    pub store_dir: Option<PathBuf>,
}

impl Config {
    /// Reads configuration from the environment (and a `.env` file if one is
    /// present). Only the API key is required.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("LASTFM_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .map_err(|_| Error::Config("LASTFM_API_KEY is not set".to_string()))?;

        let base_url =
            env::var("LASTFM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let min_interval = env::var("LASTFM_MIN_INTERVAL_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_MIN_INTERVAL_SECS));

        let store_dir = env::var("FMCACHE_STORE_DIR").ok().map(PathBuf::from);

        Ok(Self {
            api_key,
            base_url,
            min_interval,
            store_dir,
        })
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            min_interval: Duration::from_secs(DEFAULT_MIN_INTERVAL_SECS),
            store_dir: None,
        }
    }
}
