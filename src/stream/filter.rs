// src/stream/filter.rs
use crate::stream::provider::Identified;
use crate::stream::seen::SeenSet;

/// Outcome of running one snapshot through the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    /// New records, in provider order, to hand to the consumer.
    pub publish: Vec<T>,
    /// New records absorbed as baseline (marked seen, never published).
    pub baseline: usize,
}

/// The filtering step of the poll loop.
///
/// Snapshots are expected newest first. Scanning stops at the first
/// identifier already seen: anything behind it is assumed old. A record
/// that was inserted behind an already seen one is therefore never
/// reported.
#[derive(Debug, Default)]
pub struct NewListingFilter {
    seen: SeenSet,
    discard_initial: bool,
}

impl NewListingFilter {
    pub fn new(discard_initial: bool) -> Self {
        Self {
            seen: SeenSet::new(),
            discard_initial,
        }
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// True until the first non-empty snapshot has been absorbed as baseline.
    pub fn discarding_initial(&self) -> bool {
        self.discard_initial
    }

    pub fn select<T: Identified>(&mut self, snapshot: Vec<T>) -> Selection<T> {
        let mut publish = Vec::new();
        let mut baseline = 0usize;

        for record in snapshot {
            if self.seen.exists(record.id()) {
                break;
            }
            self.seen.add(record.id());

            if self.discard_initial {
                baseline += 1;
            } else {
                publish.push(record);
            }
        }

        // The flag is spent only when something was actually absorbed.
        if baseline > 0 {
            self.discard_initial = false;
        }

        Selection { publish, baseline }
    }
}
