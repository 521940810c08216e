//! Fetch one snapshot for the configured query and save every listing as
//! `<out_dir>/<listing_id>.json` (out_dir from argv, default `listings/`).

use anyhow::{Context, Result};
use listing_watch::config::{load_query_default, AppConfig};
use listing_watch::export::save_listings_as_json;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("listings"));

    let cfg = AppConfig::from_env()?;
    let query = load_query_default()?;
    let client = cfg.client()?;

    let resp = client
        .listings()
        .get(&query)
        .await
        .context("fetching listings")?;

    let written = save_listings_as_json(&out_dir, &resp.listings)
        .with_context(|| format!("writing listings to {}", out_dir.display()))?;

    tracing::info!(
        written = written.len(),
        result_count = resp.search.result_count,
        dir = %out_dir.display(),
        "saved listings"
    );
    Ok(())
}
