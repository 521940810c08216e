// tests/stream_errors.rs
use std::sync::Arc;
use std::time::Duration;

use listing_watch::stream::{self, ScriptedProvider, StreamConfig};
use listing_watch::{Error, Listing, ListingQuery};
use tokio::time::timeout;

fn snapshot(ids: &[&str]) -> listing_watch::Result<Vec<Listing>> {
    Ok(ids.iter().map(|id| Listing::with_id(*id)).collect())
}

const WAIT: Duration = Duration::from_secs(600);

#[tokio::test(start_paused = true)]
async fn failed_tick_is_isolated() {
    let provider = ScriptedProvider::new(vec![
        snapshot(&["b", "a"]),
        Err(Error::Status(503)),
        snapshot(&["c", "b", "a"]),
    ]);
    let mut s = stream::start(provider, ListingQuery::default(), StreamConfig::default());

    let a = timeout(WAIT, s.items.recv()).await.unwrap().unwrap();
    let b = timeout(WAIT, s.items.recv()).await.unwrap().unwrap();
    assert_eq!((a.listing_id.as_str(), b.listing_id.as_str()), ("b", "a"));

    let err = timeout(WAIT, s.errors.recv()).await.unwrap().unwrap();
    assert!(matches!(err, Error::Status(503)));

    let c = timeout(WAIT, s.items.recv()).await.unwrap().unwrap();
    assert_eq!(c.listing_id, "c");

    // still running: nothing more to deliver, but not ended either
    assert!(timeout(WAIT, s.items.recv()).await.is_err());
    assert!(!s.stop.is_stopped());
    s.stop.stop();
}

#[tokio::test(start_paused = true)]
async fn always_failing_provider_errors_every_tick() {
    let script = (0..5).map(|_| Err(Error::Status(500))).collect();
    let provider = Arc::new(ScriptedProvider::<Listing>::new(script));
    let mut s = stream::start(
        Arc::clone(&provider),
        ListingQuery::default(),
        StreamConfig::default(),
    );

    for _ in 0..5 {
        let err = timeout(WAIT, s.errors.recv()).await.unwrap().unwrap();
        assert!(err.is_transient());
    }
    assert!(!s.stop.is_stopped());
    s.stop.stop();
}

#[tokio::test(start_paused = true)]
async fn dropped_error_receiver_does_not_stop_items() {
    let provider = ScriptedProvider::new(vec![
        Err(Error::Status(502)),
        snapshot(&["a"]),
        Err(Error::Status(502)),
        snapshot(&["b", "a"]),
    ]);
    let (mut items, errors, stop) =
        stream::start(provider, ListingQuery::default(), StreamConfig::default()).into_parts();
    drop(errors);

    let a = timeout(WAIT, items.recv()).await.unwrap().unwrap();
    let b = timeout(WAIT, items.recv()).await.unwrap().unwrap();
    assert_eq!(a.listing_id, "a");
    assert_eq!(b.listing_id, "b");
    assert!(!stop.is_stopped());
    stop.stop();
}
