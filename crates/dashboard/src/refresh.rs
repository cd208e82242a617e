//! Periodic reload in the background.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

use crate::pages::KeysPage;

/// Runs a reload every `period` until shut down.
///
/// Ticks are awaited one at a time, so the worker never overlaps itself; a
/// manual refresh racing a tick is not guarded and the later response wins.
pub struct RefreshWorker {
    period: Duration,
    shutdown: Arc<Notify>,
}

impl RefreshWorker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Handle for stopping the worker; `notify_one` on it ends the loop.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Spawn the loop. The first reload happens one period from now; the
    /// page already loaded once when it opened.
    pub fn start<F, Fut>(self, mut reload: F) -> JoinHandle<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown;
        let period = self.period;

        tokio::spawn(async move {
            tracing::info!(period_secs = period.as_secs(), "refresh worker started");

            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown.notified() => {
                        tracing::info!("refresh worker received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        tracing::debug!("periodic reload");
                        reload().await;
                    }
                }
            }

            tracing::info!("refresh worker stopped");
        })
    }
}

/// Keep the signed-out keys table fresh.
pub fn refresh_signed_out_keys(page: Arc<Mutex<KeysPage>>, worker: RefreshWorker) -> JoinHandle<()> {
    worker.start(move || {
        let page = page.clone();
        async move {
            page.lock().await.reload_signed_out().await;
        }
    })
}
