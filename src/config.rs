// src/config.rs
//! Runtime configuration for the binaries: credentials and stream settings
//! from the environment, the listing query from a TOML or JSON file.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{Client, Credentials, ListingQuery, ENV_API_KEY};
use crate::stream::StreamConfig;

pub const ENV_BASE_URL: &str = "ZOOPLA_BASE_URL";
pub const ENV_INTERVAL_SECS: &str = "STREAM_INTERVAL_SECS";
pub const ENV_DISCARD_INITIAL: &str = "STREAM_DISCARD_INITIAL";
pub const ENV_MAX_RUNTIME_SECS: &str = "STREAM_MAX_RUNTIME_SECS";
pub const ENV_QUERY_PATH: &str = "LISTING_QUERY_PATH";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub base_url: Option<String>,
    pub stream: StreamConfig,
    pub max_runtime: Option<Duration>,
}

impl AppConfig {
    /// Read everything from the process environment. Call `dotenvy::dotenv()`
    /// first if a `.env` file should count.
    pub fn from_env() -> Result<Self> {
        let credentials = Credentials::from_env();
        if credentials.api_key.is_empty() {
            tracing::warn!("{ENV_API_KEY} is not set; requests will be rejected");
        }

        let base_url = std::env::var(ENV_BASE_URL)
            .ok()
            .filter(|s| !s.trim().is_empty());

        let mut stream = StreamConfig::default();
        if let Some(secs) = env_u64(ENV_INTERVAL_SECS)? {
            stream = stream.with_interval(Duration::from_secs(secs));
        }
        if env_flag(ENV_DISCARD_INITIAL) {
            stream = stream.discard_initial();
        }

        let max_runtime = env_u64(ENV_MAX_RUNTIME_SECS)?
            .filter(|s| *s > 0)
            .map(Duration::from_secs);

        Ok(Self {
            credentials,
            base_url,
            stream,
            max_runtime,
        })
    }

    /// Build the catalog client; a bad base URL fails here, not while polling.
    pub fn client(&self) -> Result<Client> {
        let client = Client::new(self.credentials.clone());
        match &self.base_url {
            Some(url) => client
                .with_base_url(url)
                .with_context(|| format!("{ENV_BASE_URL}={url}")),
            None => Ok(client),
        }
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} must be a whole number of seconds, got {v:?}")),
        _ => Ok(None),
    }
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Load a query from an explicit path. Supports TOML or JSON formats.
pub fn load_query_from(path: &Path) -> Result<ListingQuery> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading listing query from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_query(&content, ext.as_str())
}

/// Load the query using env var + fallbacks:
/// 1) $LISTING_QUERY_PATH
/// 2) config/listing_query.toml
/// 3) config/listing_query.json
/// 4) an empty query (catalog defaults)
pub fn load_query_default() -> Result<ListingQuery> {
    if let Ok(p) = std::env::var(ENV_QUERY_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_query_from(&pb);
        } else {
            return Err(anyhow!("{ENV_QUERY_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/listing_query.toml");
    if toml_p.exists() {
        return load_query_from(&toml_p);
    }
    let json_p = PathBuf::from("config/listing_query.json");
    if json_p.exists() {
        return load_query_from(&json_p);
    }
    Ok(ListingQuery::default())
}

fn parse_query(s: &str, hint_ext: &str) -> Result<ListingQuery> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("parsing listing query json");
    }
    match toml::from_str(s) {
        Ok(q) => Ok(q),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!("unsupported listing query format: {toml_err}")),
    }
}
