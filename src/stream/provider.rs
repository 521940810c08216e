// src/stream/provider.rs
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::ListingQuery;
use crate::error::{Error, Result};

/// A record with a stable identifier the stream can deduplicate on.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Answers "what does the catalog look like right now" for a query.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    type Item: Identified + Send + 'static;

    /// One ordered snapshot, newest first when the query asks for it.
    async fn fetch(&self, query: &ListingQuery) -> Result<Vec<Self::Item>>;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl<P: SnapshotProvider + ?Sized> SnapshotProvider for Arc<P> {
    type Item = P::Item;

    async fn fetch(&self, query: &ListingQuery) -> Result<Vec<Self::Item>> {
        (**self).fetch(query).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// --- Test helper ---

/// Replays a fixed script of snapshots, one per fetch. Once the script is
/// exhausted every fetch returns an empty snapshot.
pub struct ScriptedProvider<T> {
    script: Mutex<VecDeque<Result<Vec<T>>>>,
    pub queries: Mutex<Vec<ListingQuery>>,
}

impl<T> ScriptedProvider<T> {
    pub fn new(script: Vec<Result<Vec<T>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl<T> SnapshotProvider for ScriptedProvider<T>
where
    T: Identified + Send + 'static,
{
    type Item = T;

    async fn fetch(&self, query: &ListingQuery) -> Result<Vec<T>> {
        if let Ok(mut q) = self.queries.lock() {
            q.push(query.clone());
        }
        let next = match self.script.lock() {
            Ok(mut s) => s.pop_front(),
            Err(_) => Some(Err(Error::Status(500))),
        };
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
