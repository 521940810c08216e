// src/stream/seen.rs
use std::collections::HashSet;

/// Identifiers a stream has already taken. Grows for the life of one stream
/// and is never shared between streams.
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    ids: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }

    pub fn exists(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Not used by the poll loop.
    pub fn delete(&mut self, id: &str) {
        self.ids.remove(id);
    }
}
