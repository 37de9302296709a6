//! Expired Link Reaper
//!
//! Background task that periodically removes links whose TTL has elapsed,
//! whether or not anyone opens them. Click depletion only changes on access,
//! so it is left to the lazy checks in `open`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::links::{current_timestamp_ms, Eviction, LinkStore};

/// Handle to a running reaper.
///
/// Dropping the handle also stops the reaper once the current cycle ends;
/// [`ReaperHandle::shutdown`] additionally waits for it.
#[derive(Debug)]
pub struct ReaperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Stops scheduling new cycles and waits for the loop to exit.
    ///
    /// A cycle already in progress runs to completion first.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!("Reaper task ended abnormally: {}", e);
        }
    }
}

/// Removes every link that is expired at the time of the scan.
///
/// Candidates are collected from a snapshot first and removed afterwards.
/// Each removal re-checks the stored link, so a code that vanished or was
/// renewed in between is skipped. Returns the number of links this call
/// removed.
pub async fn reap_expired(store: &LinkStore) -> usize {
    let now = current_timestamp_ms();
    let expired: Vec<String> = store
        .all_links()
        .await
        .into_iter()
        .filter(|link| link.is_expired_at(now))
        .map(|link| link.code)
        .collect();

    remove_expired(store, expired, now).await
}

async fn remove_expired(store: &LinkStore, codes: Vec<String>, now: u64) -> usize {
    let mut removed = 0;
    for code in codes {
        let evicted = store
            .evict_if(&code, Eviction::Reaped, |link| link.is_expired_at(now))
            .await;
        if let Some(link) = evicted {
            info!("Link {} expired and was removed (owner: {})", code, link.owner_id);
            removed += 1;
        }
    }
    removed
}

/// Spawns the reaper, running one cycle every `interval`.
///
/// Each cycle runs in its own task, so a cycle that panics is logged and the
/// next one still fires on schedule.
///
/// # Example
/// ```ignore
/// let store = Arc::new(LinkStore::open("./data.json").await);
/// let reaper = spawn_reaper(store.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// reaper.shutdown().await;
/// ```
pub fn spawn_reaper(store: Arc<LinkStore>, interval: Duration) -> ReaperHandle {
    spawn_reaper_with(store, interval, |store| async move { reap_expired(&store).await })
}

fn spawn_reaper_with<F, Fut>(store: Arc<LinkStore>, interval: Duration, cycle: F) -> ReaperHandle
where
    F: Fn(Arc<LinkStore>) -> Fut + Send + 'static,
    Fut: Future<Output = usize> + Send + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Starting link reaper with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match tokio::spawn(cycle(store.clone())).await {
                        Ok(0) => debug!("Reaper: no expired links found"),
                        Ok(removed) => info!("Reaper: removed {} expired links", removed),
                        Err(e) => error!("Reaper cycle failed: {}", e),
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Link reaper stopped");
    });

    ReaperHandle { shutdown_tx, task }
}
