// src/listings/mod.rs
pub mod types;
pub mod xml;

use std::time::Instant;

use metrics::{counter, histogram};

use crate::client::{Client, ListingQuery};
use crate::error::{Error, Result};
use crate::listings::types::ListingResponse;

pub use xml::parse_listings_xml;

const LISTINGS_PATH: &str = "property_listings.xml";

/// Point-in-time listing queries against the catalog.
pub struct ListingService<'a> {
    client: &'a Client,
}

impl<'a> ListingService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch one page of listings for `query`.
    pub async fn get(&self, query: &ListingQuery) -> Result<ListingResponse> {
        let t0 = Instant::now();
        let url = self.client.endpoint(LISTINGS_PATH)?;

        let resp = self
            .client
            .get(url)
            .query(&[("api_key", self.client.credentials().api_key.as_str())])
            .query(&query.to_pairs())
            .send()
            .await
            .inspect_err(|e| tracing::warn!(error = ?e, "listings http error"))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "listings returned non-200");
            return Err(Error::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let parsed = parse_listings_xml(&body)?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("listings_fetch_ms").record(ms);
        counter!("listings_received_total").increment(parsed.listings.len() as u64);
        tracing::debug!(
            listings = parsed.listings.len(),
            result_count = parsed.search.result_count,
            elapsed_ms = ms,
            "fetched listings"
        );

        Ok(parsed)
    }
}
