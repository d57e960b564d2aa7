//! Background cache maintenance.
//!
//! The sweeper runs the eviction sweep on a fixed cadence so an idle
//! cache still reclaims expired entries without waiting for new traffic.
//! It is owned by the cache's lifecycle: started on construction, stopped
//! on shutdown or drop, and the only owner of its own schedule.
//!
//! A failing iteration is logged and swallowed - the loop must outlive
//! any single bad sweep.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::CacheCore;

/// Statistics tracked by the background sweeper.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweeperStats {
    /// Total number of sweeps performed.
    pub sweep_count: u64,
    /// Total entries removed because they had expired.
    pub expired_total: u64,
    /// Total entries evicted by score under capacity pressure.
    pub evicted_total: u64,
    /// Total time spent sweeping (microseconds).
    pub total_sweep_time_us: u64,
    /// Maximum sweep duration seen (microseconds).
    pub max_sweep_time_us: u64,
}

impl SweeperStats {
    /// Returns the average sweep duration in microseconds.
    #[must_use]
    pub fn avg_sweep_time_us(&self) -> u64 {
        if self.sweep_count == 0 {
            0
        } else {
            self.total_sweep_time_us / self.sweep_count
        }
    }
}

/// Periodic maintenance task owned by [`QueryCache`](super::QueryCache).
///
/// Spawns a background thread that sweeps the cache at a fixed interval.
/// Shutdown is graceful: the signal channel carries an ack sender back so
/// the caller receives the final [`SweeperStats`].
pub(crate) struct CacheSweeper {
    /// Channel to signal shutdown (sends ack channel back).
    shutdown_tx: Option<mpsc::Sender<mpsc::Sender<SweeperStats>>>,
    /// Background thread handle.
    handle: Option<JoinHandle<()>>,
}

impl CacheSweeper {
    /// Creates and starts a sweeper over the given cache state.
    pub fn new(cache: Arc<CacheCore>, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("akcelo-cache-sweeper".to_string())
            .spawn(move || {
                Self::sweeper_loop(&cache, interval, &shutdown_rx);
            })
            .expect("Failed to spawn cache sweeper thread");

        Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Gracefully shuts down the sweeper.
    ///
    /// Returns statistics about the sweeper's operation, or `None` if it
    /// was already shut down or the thread went away.
    pub fn shutdown(&mut self) -> Option<SweeperStats> {
        let stats = self.shutdown_tx.take().and_then(|tx| {
            let (ack_tx, ack_rx) = mpsc::channel();
            tx.send(ack_tx).ok()?;
            ack_rx.recv().ok()
        });

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("cache sweeper thread panicked during shutdown");
            }
        }

        stats
    }

    /// The maintenance loop running in the background thread.
    fn sweeper_loop(
        cache: &Arc<CacheCore>,
        interval: Duration,
        shutdown_rx: &mpsc::Receiver<mpsc::Sender<SweeperStats>>,
    ) {
        let mut stats = SweeperStats::default();

        loop {
            match shutdown_rx.recv_timeout(interval) {
                Ok(ack_tx) => {
                    // Graceful shutdown - acknowledge with final stats
                    let _ = ack_tx.send(stats);
                    return;
                }
                Err(RecvTimeoutError::Timeout) => {
                    let start = Instant::now();

                    // One bad sweep must not terminate the maintenance
                    // loop, so failures are contained right here.
                    match catch_unwind(AssertUnwindSafe(|| cache.sweep())) {
                        Ok(outcome) => {
                            let elapsed_us =
                                u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
                            stats.sweep_count += 1;
                            stats.expired_total += outcome.expired as u64;
                            stats.evicted_total += outcome.evicted as u64;
                            stats.total_sweep_time_us += elapsed_us;
                            stats.max_sweep_time_us = stats.max_sweep_time_us.max(elapsed_us);

                            if outcome.expired > 0 || outcome.evicted > 0 {
                                tracing::debug!(
                                    expired = outcome.expired,
                                    evicted = outcome.evicted,
                                    "background cache sweep reclaimed entries"
                                );
                            }
                        }
                        Err(_) => {
                            tracing::warn!(
                                "background cache sweep failed; maintenance loop continues"
                            );
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    // Owner dropped without shutdown signal - exit quietly
                    tracing::debug!("cache sweeper shutdown channel disconnected");
                    return;
                }
            }
        }
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        if self.shutdown_tx.is_some() {
            let _ = self.shutdown();
        }
    }
}
