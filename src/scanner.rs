//! Background scanner — periodic notification sweep over active sessions
//!
//! A single long-lived task alternates between scanning and sleeping. Each
//! cycle evicts stale sessions, then evaluates the rule engine for every
//! recently active user and hands results to the delivery sink. A failure
//! for one user never aborts the cycle or the loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use tokio::sync::watch;

use crate::notify::{NotificationEngine, NotificationSink};
use crate::store::SessionStore;

/// Periodic sweep configuration
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Sleep between cycles
    pub interval: Duration,
    /// Only sessions active within this window are scanned
    pub active_window: chrono::Duration,
    /// Sessions idle beyond this horizon are evicted each cycle
    pub evict_after: chrono::Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600),
            active_window: chrono::Duration::seconds(7200),
            evict_after: chrono::Duration::seconds(86400),
        }
    }
}

/// Sweeps the session store and delivers triggered notifications
pub struct BackgroundScanner {
    store: SessionStore,
    engine: NotificationEngine,
    sink: Arc<dyn NotificationSink>,
    config: ScannerConfig,
}

impl BackgroundScanner {
    #[must_use]
    pub fn new(
        store: SessionStore,
        engine: NotificationEngine,
        sink: Arc<dyn NotificationSink>,
        config: ScannerConfig,
    ) -> Self {
        Self {
            store,
            engine,
            sink,
            config,
        }
    }

    /// Run one scan cycle at `now`, returning the number of notifications
    /// handed to the sink. Public so tests can drive a cycle without timers.
    pub async fn run_cycle(&self, now: DateTime<Local>) -> usize {
        let now_utc = now.with_timezone(&Utc);

        let evicted = self.store.evict_stale(now_utc, self.config.evict_after);
        if evicted > 0 {
            tracing::info!(count = evicted, "evicted stale sessions");
        }

        let mut delivered = 0;
        for session in self.store.list_active(now_utc, self.config.active_window) {
            let notifications = self.engine.evaluate(&session, now).await;
            if notifications.is_empty() {
                continue;
            }

            match self.sink.deliver(&session.user_id, &notifications).await {
                Ok(()) => delivered += notifications.len(),
                Err(e) => {
                    // Isolate per-user faults; the rest of the cycle continues
                    tracing::warn!(
                        user_id = %session.user_id,
                        error = %e,
                        "notification delivery failed"
                    );
                }
            }
        }

        delivered
    }

    /// Spawn the scan loop as a background task.
    ///
    /// The loop runs until `shutdown` observes a change, sleeping
    /// `config.interval` between cycles.
    #[must_use]
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                interval_secs = self.config.interval.as_secs(),
                "background scanner started"
            );

            loop {
                let delivered = self.run_cycle(Local::now()).await;
                tracing::debug!(delivered, "scan cycle complete");

                tokio::select! {
                    _ = tokio::time::sleep(self.config.interval) => {}
                    _ = shutdown.changed() => {
                        tracing::info!("background scanner stopped");
                        break;
                    }
                }
            }
        })
    }
}
