// src/error.rs
//! Error taxonomy for the listing client and the polling stream.
//!
//! Per-tick failures (transport, status, decode) are published on the
//! stream's error output and never end the stream. `InvalidBaseUrl` only
//! happens while building a [`crate::Client`].

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Network failure, timeout, or any other reqwest-level error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The catalog answered with something other than 200 OK.
    #[error("wrong status code: {0}")]
    Status(u16),

    /// The payload was not a well-formed listings document.
    #[error("decoding error: {0}")]
    Decode(#[from] quick_xml::DeError),

    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for failures that only affect a single poll.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Status(_) | Error::Decode(_)
        )
    }
}
