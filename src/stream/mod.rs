// src/stream/mod.rs
//! Incremental polling stream.
//!
//! One spawned task polls a [`SnapshotProvider`] on a fixed interval, keeps
//! only identifiers it has not taken before, and hands new records and fetch
//! errors to two separate outputs. Stopping is cooperative and idempotent;
//! once stopped, both outputs end. Dropping the item receiver stops the loop
//! as well.
//!
//! ```ignore
//! let stream = listing_watch::stream::start(client, query, StreamConfig::default());
//! let (mut items, mut errors, stop) = stream.into_parts();
//! loop {
//!     tokio::select! {
//!         Some(listing) = items.recv() => println!("{}", listing.listing_id),
//!         Some(err) = errors.recv() => eprintln!("{err}"),
//!         else => break,
//!     }
//! }
//! stop.stop();
//! ```

pub mod config;
pub mod filter;
pub mod observer;
pub mod provider;
pub mod seen;

use std::ops::ControlFlow;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::client::ListingQuery;
use crate::error::Error;

pub use config::{StreamConfig, DEFAULT_STREAM_INTERVAL};
pub use filter::{NewListingFilter, Selection};
pub use observer::{StreamEvent, StreamObserver, TracingObserver};
pub use provider::{Identified, ScriptedProvider, SnapshotProvider};
pub use seen::SeenSet;

/// At most one value waits in each output while the loop moves on.
const OUTPUT_CAPACITY: usize = 1;

/// Stops a stream. Clone it freely; any clone, from any task or thread,
/// may call [`StopHandle::stop`] any number of times.
#[derive(Debug, Clone)]
pub struct StopHandle {
    token: CancellationToken,
}

impl StopHandle {
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the stream has been stopped, by the caller or by itself.
    pub async fn stopped(&self) {
        self.token.cancelled().await
    }
}

/// New records, in provider order. `None` means the stream has ended.
#[derive(Debug)]
pub struct Items<T> {
    rx: mpsc::Receiver<T>,
    stop: CancellationToken,
}

impl<T> Items<T> {
    pub async fn recv(&mut self) -> Option<T> {
        tokio::select! {
            biased;

            _ = self.stop.cancelled() => None,
            item = self.rx.recv() => item,
        }
    }
}

/// One error per failed fetch. `None` means the stream has ended.
#[derive(Debug)]
pub struct Errors {
    rx: mpsc::Receiver<Error>,
    stop: CancellationToken,
}

impl Errors {
    pub async fn recv(&mut self) -> Option<Error> {
        tokio::select! {
            biased;

            _ = self.stop.cancelled() => None,
            err = self.rx.recv() => err,
        }
    }
}

/// The caller's side of a running stream.
#[derive(Debug)]
pub struct ListingStream<T> {
    pub items: Items<T>,
    pub errors: Errors,
    pub stop: StopHandle,
}

impl<T> ListingStream<T> {
    pub fn into_parts(self) -> (Items<T>, Errors, StopHandle) {
        (self.items, self.errors, self.stop)
    }
}

/// Start polling `provider` with [`TracingObserver`]. Must be called from
/// inside a tokio runtime.
pub fn start<P>(provider: P, query: ListingQuery, config: StreamConfig) -> ListingStream<P::Item>
where
    P: SnapshotProvider + 'static,
{
    start_with_observer(provider, query, config, TracingObserver)
}

/// Like [`start`], reporting loop events to `observer`.
///
/// The query is always rewritten to newest first; the early exit in
/// [`NewListingFilter`] depends on that order.
pub fn start_with_observer<P, O>(
    provider: P,
    query: ListingQuery,
    config: StreamConfig,
    observer: O,
) -> ListingStream<P::Item>
where
    P: SnapshotProvider + 'static,
    O: StreamObserver,
{
    let token = CancellationToken::new();
    let (item_tx, item_rx) = mpsc::channel(OUTPUT_CAPACITY);
    let (err_tx, err_rx) = mpsc::channel(OUTPUT_CAPACITY);

    let poll = PollLoop {
        provider,
        query: query.newest_first(),
        config,
        filter: NewListingFilter::new(config.discard_initial),
        items: item_tx,
        errors: Some(err_tx),
        stop: token.clone(),
        observer,
        ticks: 0,
    };
    tokio::spawn(poll.run());

    ListingStream {
        items: Items {
            rx: item_rx,
            stop: token.clone(),
        },
        errors: Errors {
            rx: err_rx,
            stop: token.clone(),
        },
        stop: StopHandle { token },
    }
}

enum Handoff {
    Delivered,
    Stopped,
    Closed,
}

/// Wait for the consumer to take `value`, unless the stream is stopped first.
async fn hand_off<V>(tx: &mpsc::Sender<V>, value: V, stop: &CancellationToken) -> Handoff {
    tokio::select! {
        biased;

        _ = stop.cancelled() => Handoff::Stopped,
        res = tx.send(value) => match res {
            Ok(()) => Handoff::Delivered,
            Err(_) => Handoff::Closed,
        },
    }
}

struct PollLoop<P: SnapshotProvider, O> {
    provider: P,
    query: ListingQuery,
    config: StreamConfig,
    filter: NewListingFilter,
    items: mpsc::Sender<P::Item>,
    // None once the consumer dropped its error receiver.
    errors: Option<mpsc::Sender<Error>>,
    stop: CancellationToken,
    observer: O,
    ticks: u64,
}

impl<P, O> PollLoop<P, O>
where
    P: SnapshotProvider,
    O: StreamObserver,
{
    async fn run(mut self) {
        self.observer.on_event(&StreamEvent::Started {
            provider: self.provider.name(),
            interval: self.config.interval,
            discard_initial: self.config.discard_initial,
        });

        // First tick completes immediately.
        let mut ticker = time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // A pending stop wins over a ready tick.
            tokio::select! {
                biased;

                _ = self.stop.cancelled() => break,
                _ = self.items.closed() => {
                    tracing::debug!(target: "stream", "item receiver dropped, stopping");
                    break;
                }
                _ = ticker.tick() => {}
            }

            if self.poll_once().await.is_break() {
                break;
            }
        }

        // Ends both outputs, whoever got here first.
        self.stop.cancel();
        self.observer.on_event(&StreamEvent::Stopped {
            ticks: self.ticks,
            seen: self.filter.seen().len(),
        });
    }

    async fn poll_once(&mut self) -> ControlFlow<()> {
        self.ticks += 1;
        let tick = self.ticks;
        self.observer.on_event(&StreamEvent::Polling { tick });

        let t0 = Instant::now();
        let fetched = tokio::select! {
            biased;

            _ = self.stop.cancelled() => return ControlFlow::Break(()),
            _ = self.items.closed() => {
                tracing::debug!(target: "stream", "item receiver dropped mid-fetch, stopping");
                return ControlFlow::Break(());
            }
            res = self.provider.fetch(&self.query) => res,
        };
        // Fetch time only; handing items off below waits on the consumer.
        let elapsed = t0.elapsed();

        let snapshot = match fetched {
            Ok(snapshot) => snapshot,
            Err(error) => {
                self.observer.on_event(&StreamEvent::FetchFailed {
                    tick,
                    error: &error,
                    elapsed,
                });
                return self.publish_error(error).await;
            }
        };

        let received = snapshot.len();
        let Selection { publish, baseline } = self.filter.select(snapshot);
        let published = publish.len();

        for item in publish {
            match hand_off(&self.items, item, &self.stop).await {
                Handoff::Delivered => {}
                Handoff::Stopped => return ControlFlow::Break(()),
                Handoff::Closed => {
                    tracing::debug!(target: "stream", "item receiver dropped, stopping");
                    return ControlFlow::Break(());
                }
            }
        }

        self.observer.on_event(&StreamEvent::SnapshotFiltered {
            tick,
            received,
            published,
            baseline,
            seen: self.filter.seen().len(),
            elapsed,
        });
        ControlFlow::Continue(())
    }

    async fn publish_error(&mut self, error: Error) -> ControlFlow<()> {
        let Some(tx) = self.errors.as_ref() else {
            return ControlFlow::Continue(());
        };
        match hand_off(tx, error, &self.stop).await {
            Handoff::Delivered => ControlFlow::Continue(()),
            Handoff::Stopped => ControlFlow::Break(()),
            Handoff::Closed => {
                tracing::debug!(target: "stream", "error receiver dropped, discarding errors");
                self.errors = None;
                ControlFlow::Continue(())
            }
        }
    }
}
