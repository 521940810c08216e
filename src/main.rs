//! listing-watch — Binary Entrypoint
//! Streams newly published listings for the configured query until Ctrl-C
//! (or `STREAM_MAX_RUNTIME_SECS`), logging each one.

use std::future::Future;

use anyhow::Result;
use listing_watch::config::{load_query_default, AppConfig};
use listing_watch::stream::{Errors, Items};
use listing_watch::telemetry::Telemetry;
use listing_watch::Listing;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stream=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Log listings and errors until the stream ends (`None`) or `shutdown`
/// resolves with its reason.
async fn consume<F>(
    mut listings: Items<Listing>,
    mut errs: Errors,
    shutdown: F,
) -> Option<&'static str>
where
    F: Future<Output = &'static str>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            listing = listings.recv() => match listing {
                Some(l) => tracing::info!(
                    listing_id = %l.listing_id,
                    address = l.address.as_deref().unwrap_or("-"),
                    per_month = ?l.rental_prices.per_month,
                    "received listing"
                ),
                None => return None,
            },
            err = errs.recv() => match err {
                Some(e) => tracing::error!(error = %e, "stream error"),
                None => return None,
            },
            reason = &mut shutdown => return Some(reason),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let telemetry = match Telemetry::install() {
        Ok(t) => Some(t),
        Err(e) => {
            tracing::warn!(error = ?e, "metrics recorder not installed");
            None
        }
    };

    let cfg = AppConfig::from_env()?;
    let query = load_query_default()?;
    let client = cfg.client()?;

    let (listings, errs, stop) = client
        .stream_listings(query, cfg.stream)
        .into_parts();

    let max_runtime = cfg.max_runtime;
    // Built once so a signal that lands between loop turns is not lost.
    let shutdown = async move {
        let deadline = async {
            match max_runtime {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    tracing::warn!(error = ?e, "ctrl-c handler failed");
                }
                "interrupt"
            }
            _ = deadline => "configured max runtime",
        }
    };

    match consume(listings, errs, shutdown).await {
        Some(reason) => tracing::info!(reason, "stopping"),
        None => tracing::info!("stream ended"),
    }

    stop.stop();

    if let Some(t) = telemetry {
        tracing::debug!(metrics = %t.render(), "final metrics");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use listing_watch::stream::{self, ScriptedProvider, StreamConfig};
    use listing_watch::{Error, ListingQuery};
    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn shutdown_fired_while_busy_is_not_lost() {
        let provider = ScriptedProvider::new(vec![
            Ok(vec![Listing::with_id("b"), Listing::with_id("a")]),
            Err(Error::Status(500)),
        ]);
        let (listings, errs, stop) =
            stream::start(provider, ListingQuery::default(), StreamConfig::default())
                .into_parts();

        // fires before the loop gets around to polling it
        let (tx, rx) = oneshot::channel::<()>();
        tx.send(()).unwrap();
        let shutdown = async move {
            let _ = rx.await;
            "interrupt"
        };

        let reason = tokio::time::timeout(Duration::from_secs(600), consume(listings, errs, shutdown))
            .await
            .expect("consume returns");
        assert_eq!(reason, Some("interrupt"));
        stop.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stream_end_returns_none() {
        let provider = ScriptedProvider::<Listing>::new(vec![]);
        let (listings, errs, stop) =
            stream::start(provider, ListingQuery::default(), StreamConfig::default())
                .into_parts();
        stop.stop();

        let reason = consume(listings, errs, std::future::pending()).await;
        assert_eq!(reason, None);
    }
}
