//! Reclamation Task
//!
//! Background task that periodically removes cache entries that have
//! reached the configured age.

use std::panic;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::Shared;
use crate::error::{CacheError, Result};

/// Owner side of a running reclamation task.
///
/// Dropping the handle closes the shutdown channel, which also stops the task.
#[derive(Debug)]
pub(crate) struct ReaperHandle {
    shutdown_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl ReaperHandle {
    /// Signals the task and waits for it to exit.
    ///
    /// The signal is only observed between sweeps.
    pub(crate) async fn stop(self) {
        // The task may already be gone; a closed channel is fine
        let _ = self.shutdown_tx.send(());

        if let Err(err) = self.join.await {
            warn!("Reclamation task ended abnormally: {}", err);
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Builds the sweep ticker on `runtime`, first firing one `interval` from now.
///
/// Fails instead of leaving a dead task behind when the first deadline cannot
/// be represented or the runtime has no timer driver.
fn build_ticker(runtime: &Handle, interval: Duration) -> Result<Interval> {
    let _guard = runtime.enter();

    let start = Instant::now()
        .checked_add(interval)
        .ok_or(CacheError::InvalidInterval(interval))?;

    // tokio panics on timer creation when the runtime lacks `enable_time`
    let mut ticker = panic::catch_unwind(|| time::interval_at(start, interval))
        .map_err(|_| CacheError::TimerUnavailable)?;
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Ok(ticker)
}

/// Spawns the task that sweeps `shared` every `interval`.
///
/// The ticker is created before spawning, so a cache is only handed out with
/// a task that can actually tick. The first sweep happens one full interval
/// after spawning. The loop sits in one of two states: waiting on the next
/// tick or the shutdown signal, or sweeping under the write lock. Shutdown is
/// only checked while waiting, so an in-flight sweep always completes.
pub(crate) fn spawn_reaper<V>(
    shared: Arc<Shared<V>>,
    interval: Duration,
    runtime: &Handle,
) -> Result<ReaperHandle>
where
    V: Send + Sync + 'static,
{
    let mut ticker = build_ticker(runtime, interval)?;
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let join = runtime.spawn(async move {
        info!(
            "Starting reclamation task with interval of {:?}",
            interval
        );

        loop {
            tokio::select! {
                biased;

                // Fires on an explicit stop or when the owner is dropped
                _ = &mut shutdown_rx => break,

                _ = ticker.tick() => {
                    let removed = shared.sweep().await;

                    if removed > 0 {
                        info!("Reclamation sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Reclamation sweep: no expired entries found");
                    }
                }
            }
        }

        info!("Reclamation task stopped");
    });

    Ok(ReaperHandle { shutdown_tx, join })
}
