//! Background flush task.
//!
//! The worker flushes the store once per interval and once more when the
//! shutdown signal arrives (or the signalling side is dropped), then exits.
//! Flush errors are logged and left for the next attempt.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::store::CacheStore;

/// Lower bound for the flush interval; tokio rejects a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub(crate) fn spawn(
    runtime: &Handle,
    store: Arc<CacheStore>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = interval.max(MIN_INTERVAL);

    runtime.spawn(async move {
        debug!(?period, "Autosave worker started");
        // First flush one full period after start, not immediately.
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => flush(&store, "interval").await,
                // Err means the sender is gone, which is also a shutdown.
                _ = shutdown.changed() => break,
            }
        }

        flush(&store, "shutdown").await;
        debug!("Autosave worker stopped");
    })
}

async fn flush(store: &Arc<CacheStore>, reason: &'static str) {
    let store = Arc::clone(store);
    match tokio::task::spawn_blocking(move || store.save_cache()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!(reason, error = %e, "Autosave flush failed"),
        Err(e) => debug!(reason, error = %e, "Autosave flush task aborted"),
    }
}
