//! TTL Sweeper Task
//!
//! Background task that periodically removes expired cache entries, even
//! ones that are never read again.

use std::sync::{Mutex, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::runtime::Builder;
use tokio::sync::oneshot;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::{lock_store, CacheStore};
use crate::error::Result;

// == Sweeper State ==
/// Lifecycle of a sweeper. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweeperState {
    Running,
    Stopped,
}

// == Sweeper ==
/// Handle to a sweep loop running on its own thread.
///
/// Dropping the handle also ends the loop, since the stop sender goes with it.
#[derive(Debug)]
pub struct Sweeper {
    /// Taken by the first stop; `None` afterwards
    stop_tx: Mutex<Option<oneshot::Sender<()>>>,
    thread: JoinHandle<()>,
}

impl Sweeper {
    /// Starts sweeping `store` every `period`.
    ///
    /// The loop always gets a dedicated thread driving a current-thread
    /// runtime with timers enabled, so it outlives any runtime the caller
    /// happens to be in.
    ///
    /// # Example
    /// ```ignore
    /// let store = Arc::new(Mutex::new(CacheStore::new(1024, ttl)));
    /// let sweeper = Sweeper::spawn(Arc::downgrade(&store), Duration::from_secs(300))?;
    /// // Later:
    /// sweeper.stop();
    /// ```
    pub fn spawn<V: Send + 'static>(
        store: Weak<Mutex<CacheStore<V>>>,
        period: Duration,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = oneshot::channel();
        let runtime = Builder::new_current_thread().enable_time().build()?;
        let thread = thread::Builder::new()
            .name("cache-sweeper".to_string())
            .spawn(move || runtime.block_on(sweep_loop(store, period, stop_rx)))?;

        Ok(Self {
            stop_tx: Mutex::new(Some(stop_tx)),
            thread,
        })
    }

    // == Stop ==
    /// Signals the loop to exit. Only the first call sends; later calls are
    /// no-ops. A sweep already in progress finishes first.
    pub fn stop(&self) {
        let sender = self
            .stop_tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match sender {
            // The loop may already be gone if the store was dropped
            Some(tx) => {
                let _ = tx.send(());
                info!("Sweeper stop requested");
            }
            None => debug!("Sweeper already stopped"),
        }
    }

    /// `Stopped` once a stop was requested or the loop thread has exited.
    pub fn state(&self) -> SweeperState {
        let stop_requested = self
            .stop_tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none();
        if stop_requested || self.thread.is_finished() {
            SweeperState::Stopped
        } else {
            SweeperState::Running
        }
    }

    /// Whether the loop thread has exited.
    #[allow(dead_code)]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

/// Sweeps once per `period` until stopped or until the store is dropped.
///
/// The first sweep happens one full period after start.
async fn sweep_loop<V>(
    store: Weak<Mutex<CacheStore<V>>>,
    period: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) {
    info!(
        "Starting TTL sweeper with interval of {} seconds",
        period.as_secs()
    );

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            // Resolves on an explicit stop or when the sender is dropped
            _ = &mut stop_rx => break,

            _ = ticker.tick() => {
                let Some(store) = store.upgrade() else {
                    warn!("Cache dropped, sweeper exiting");
                    break;
                };

                let removed = lock_store(&store).cleanup_expired();

                if removed > 0 {
                    info!("TTL sweep: removed {} expired entries", removed);
                } else {
                    debug!("TTL sweep: no expired entries found");
                }
            }
        }
    }

    info!("TTL sweeper stopped");
}
