// src/stream/observer.rs
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::error::Error;

/// Lifecycle of one poll loop, reported to a [`StreamObserver`].
#[derive(Debug)]
pub enum StreamEvent<'a> {
    Started {
        provider: &'static str,
        interval: Duration,
        discard_initial: bool,
    },
    Polling {
        tick: u64,
    },
    FetchFailed {
        tick: u64,
        error: &'a Error,
        elapsed: Duration,
    },
    SnapshotFiltered {
        tick: u64,
        received: usize,
        published: usize,
        baseline: usize,
        seen: usize,
        elapsed: Duration,
    },
    Stopped {
        ticks: u64,
        seen: usize,
    },
}

/// Passive sink for poll loop events. Runs on the loop's task, so it must
/// not block.
pub trait StreamObserver: Send + Sync + 'static {
    fn on_event(&self, event: &StreamEvent<'_>);
}

/// One-time metrics registration (so series show up in the exposition).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("stream_ticks_total", "Snapshots requested by poll loops.");
        describe_counter!(
            "stream_fetch_errors_total",
            "Snapshot fetches that failed and were published as errors."
        );
        describe_counter!(
            "stream_items_published_total",
            "New listings handed to consumers."
        );
        describe_counter!(
            "stream_items_baseline_total",
            "Listings absorbed as baseline without being published."
        );
        describe_histogram!("stream_fetch_ms", "Snapshot fetch time in milliseconds.");
    });
}

/// Default observer: structured `tracing` events plus `metrics` counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StreamObserver for TracingObserver {
    fn on_event(&self, event: &StreamEvent<'_>) {
        ensure_metrics_described();

        match event {
            StreamEvent::Started {
                provider,
                interval,
                discard_initial,
            } => {
                tracing::info!(
                    target: "stream",
                    provider,
                    interval_secs = interval.as_secs_f64(),
                    discard_initial,
                    "listing stream started"
                );
            }
            StreamEvent::Polling { tick } => {
                counter!("stream_ticks_total").increment(1);
                tracing::info!(target: "stream", tick, "getting newest listings");
            }
            StreamEvent::FetchFailed {
                tick,
                error,
                elapsed,
            } => {
                counter!("stream_fetch_errors_total").increment(1);
                histogram!("stream_fetch_ms").record(elapsed.as_secs_f64() * 1_000.0);
                tracing::warn!(target: "stream", tick, error = %error, "snapshot fetch failed");
            }
            StreamEvent::SnapshotFiltered {
                tick,
                received,
                published,
                baseline,
                seen,
                elapsed,
            } => {
                counter!("stream_items_published_total").increment(*published as u64);
                counter!("stream_items_baseline_total").increment(*baseline as u64);
                histogram!("stream_fetch_ms").record(elapsed.as_secs_f64() * 1_000.0);
                if *published == 0 {
                    tracing::info!(target: "stream", tick, received, seen, "no new listings available");
                } else {
                    tracing::info!(
                        target: "stream",
                        tick,
                        received,
                        published,
                        baseline,
                        seen,
                        "new listings published"
                    );
                }
            }
            StreamEvent::Stopped { ticks, seen } => {
                tracing::info!(target: "stream", ticks, seen, "listing stream stopped");
            }
        }
    }
}
