// src/client/mod.rs
pub mod query;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::error::{Error, Result};
use crate::listings::types::Listing;
use crate::listings::ListingService;
use crate::stream::{self, ListingStream, SnapshotProvider, StreamConfig};

pub use query::{ListingQuery, ListingStatus, OrderBy, Ordering};

pub const DEFAULT_BASE_URL: &str = "https://api.zoopla.co.uk/api/v1/";
pub const ENV_API_KEY: &str = "ZOOPLA_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Read `ZOOPLA_API_KEY`; a missing variable yields an empty key.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(ENV_API_KEY).unwrap_or_default(),
        }
    }
}

/// HTTP client for the listing catalog. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    timeout: Duration,
}

impl Client {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            credentials,
            timeout: Duration::from_secs(30),
        }
    }

    /// Point the client at another catalog root. A path without a trailing
    /// slash is treated as a directory.
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        let mut parsed = Url::parse(url).map_err(|e| Error::InvalidBaseUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl {
                url: url.to_string(),
                reason: "cannot be used as a base".to_string(),
            });
        }
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }
        self.base_url = parsed;
        Ok(self)
    }

    /// Per-request deadline. Each snapshot fetch is bounded by it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn listings(&self) -> ListingService<'_> {
        ListingService::new(self)
    }

    /// Start a stream of newly seen listings over a clone of this client.
    pub fn stream_listings(
        &self,
        query: ListingQuery,
        config: StreamConfig,
    ) -> ListingStream<Listing> {
        stream::start(self.clone(), query, config)
    }

    /// GET with the client-wide timeout applied.
    pub(crate) fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.http.get(url).timeout(self.timeout)
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| Error::InvalidBaseUrl {
            url: self.base_url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl SnapshotProvider for Client {
    type Item = Listing;

    async fn fetch(&self, query: &ListingQuery) -> Result<Vec<Listing>> {
        Ok(self.listings().get(query).await?.listings)
    }

    fn name(&self) -> &'static str {
        "zoopla"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_is_under_api_v1() {
        let c = Client::new(Credentials::new("k"));
        assert_eq!(
            c.endpoint("property_listings.xml").unwrap().as_str(),
            "https://api.zoopla.co.uk/api/v1/property_listings.xml"
        );
    }

    #[test]
    fn base_url_without_trailing_slash_is_a_directory() {
        let c = Client::new(Credentials::default())
            .with_base_url("http://localhost:8080/api/v2")
            .unwrap();
        assert_eq!(
            c.endpoint("property_listings.xml").unwrap().as_str(),
            "http://localhost:8080/api/v2/property_listings.xml"
        );
    }

    #[test]
    fn malformed_base_url_fails_at_construction() {
        let err = Client::new(Credentials::default())
            .with_base_url("not a url")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
        assert!(!err.is_transient());

        let err = Client::new(Credentials::default())
            .with_base_url("mailto:someone@example.com")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
    }
}
