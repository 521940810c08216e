// src/export.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::listings::types::Listing;

/// Write each listing to `<dir>/<listing_id>.json` (pretty-printed) and
/// return the paths written. Listings without an id are skipped.
pub fn save_listings_as_json(dir: &Path, listings: &[Listing]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(listings.len());
    for listing in listings {
        let Some(name) = file_stem(&listing.listing_id) else {
            tracing::warn!("skipping listing without usable id");
            continue;
        };
        let path = dir.join(format!("{name}.json"));
        fs::write(&path, serde_json::to_vec_pretty(listing)?)?;
        written.push(path);
    }
    Ok(written)
}

// Ids are numeric in practice; refuse anything that could escape `dir`.
fn file_stem(id: &str) -> Option<&str> {
    let id = id.trim();
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    ok.then_some(id)
}
