// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod listings;
pub mod stream;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::client::{Client, Credentials, ListingQuery};
pub use crate::error::{Error, Result};
pub use crate::listings::types::{Listing, ListingResponse};
pub use crate::stream::{ListingStream, StopHandle, StreamConfig};
