// tests/stream_dedup.rs
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use listing_watch::client::{OrderBy, Ordering};
use listing_watch::stream::{self, Items, ScriptedProvider, StreamConfig};
use listing_watch::{Listing, ListingQuery};
use tokio::time::timeout;

fn snapshot(ids: &[&str]) -> listing_watch::Result<Vec<Listing>> {
    Ok(ids.iter().map(|id| Listing::with_id(*id)).collect())
}

/// Collect ids until nothing arrives for `wait` (virtual time).
async fn drain(items: &mut Items<Listing>, wait: Duration) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(Some(l)) = timeout(wait, items.recv()).await {
        out.push(l.listing_id);
    }
    out
}

#[tokio::test(start_paused = true)]
async fn overlapping_snapshots_never_repeat_an_id() {
    let provider = ScriptedProvider::new(vec![
        snapshot(&["c", "b", "a"]),
        snapshot(&["c", "b", "a"]),
        snapshot(&["e", "d", "c", "b", "a"]),
        snapshot(&[]),
        snapshot(&["f", "e", "d"]),
    ]);
    let mut s = stream::start(provider, ListingQuery::area("Oxford"), StreamConfig::default());

    let got = drain(&mut s.items, Duration::from_secs(600)).await;
    assert_eq!(got, vec!["c", "b", "a", "e", "d", "f"]);

    let unique: HashSet<_> = got.iter().collect();
    assert_eq!(unique.len(), got.len());
    s.stop.stop();
}

#[tokio::test(start_paused = true)]
async fn scan_stops_at_first_seen_id() {
    let provider = ScriptedProvider::new(vec![
        snapshot(&["d"]),
        // "e" sits behind the already seen "d": skipped on this tick
        snapshot(&["a", "b", "c", "d", "e"]),
        snapshot(&["e", "a"]),
    ]);
    let mut s = stream::start(provider, ListingQuery::default(), StreamConfig::default());

    let got = drain(&mut s.items, Duration::from_secs(600)).await;
    assert_eq!(got, vec!["d", "a", "b", "c", "e"]);
    s.stop.stop();
}

#[tokio::test(start_paused = true)]
async fn first_fetch_is_immediate_then_every_interval() {
    let provider = Arc::new(ScriptedProvider::new(vec![snapshot(&["a"])]));
    let cfg = StreamConfig::default().with_interval(Duration::from_secs(30));
    let mut s = stream::start(Arc::clone(&provider), ListingQuery::default(), cfg);

    // no time needs to pass for the first snapshot
    let first = timeout(Duration::from_millis(1), s.items.recv()).await;
    assert_eq!(first.unwrap().unwrap().listing_id, "a");
    assert_eq!(provider.fetch_count(), 1);

    tokio::time::sleep(Duration::from_secs(95)).await;
    assert_eq!(provider.fetch_count(), 4);
    s.stop.stop();
}

#[tokio::test(start_paused = true)]
async fn query_is_forced_newest_first() {
    let provider = Arc::new(ScriptedProvider::<Listing>::new(vec![]));
    let query = ListingQuery {
        order_by: Some(OrderBy::Price),
        ordering: Some(Ordering::Ascending),
        ..ListingQuery::area("Oxford")
    };
    let s = stream::start(Arc::clone(&provider), query, StreamConfig::default());
    tokio::time::sleep(Duration::from_secs(1)).await;
    s.stop.stop();

    let queries = provider.queries.lock().unwrap().clone();
    assert!(!queries.is_empty());
    assert_eq!(queries[0].order_by, Some(OrderBy::Age));
    assert_eq!(queries[0].ordering, Some(Ordering::Descending));
    assert_eq!(queries[0].area.as_deref(), Some("Oxford"));
}

#[tokio::test(start_paused = true)]
async fn two_streams_keep_separate_seen_sets() {
    let mk = || ScriptedProvider::new(vec![snapshot(&["b", "a"])]);
    let mut s1 = stream::start(mk(), ListingQuery::default(), StreamConfig::default());
    let mut s2 = stream::start(mk(), ListingQuery::default(), StreamConfig::default());

    assert_eq!(drain(&mut s1.items, Duration::from_secs(120)).await, vec!["b", "a"]);
    assert_eq!(drain(&mut s2.items, Duration::from_secs(120)).await, vec!["b", "a"]);
    s1.stop.stop();
    s2.stop.stop();
}
