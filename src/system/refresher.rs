use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;

use super::engine::UtilizationEngine;
use super::sampler::RawSampler;
use super::snapshot::UtilizationSnapshot;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Background task that owns the engine and publishes a snapshot after every
/// completed update.
///
/// The engine is only ever touched by the task; readers get owned snapshots
/// over the channel, sent after the mutation finished. [`Refresher::shutdown`]
/// stops the loop and joins the task, handing the engine back.
pub struct Refresher<S> {
    stop: oneshot::Sender<()>,
    wake: Arc<Notify>,
    handle: JoinHandle<UtilizationEngine<S>>,
}

impl<S> Refresher<S>
where
    S: RawSampler + Send + 'static,
{
    pub fn spawn<E, F>(engine: UtilizationEngine<S>, tx: mpsc::UnboundedSender<E>, wrap: F) -> Self
    where
        E: Send + 'static,
        F: Fn(UtilizationSnapshot) -> E + Send + 'static,
    {
        Self::spawn_with_interval(engine, tx, wrap, REFRESH_INTERVAL)
    }

    pub(crate) fn spawn_with_interval<E, F>(
        mut engine: UtilizationEngine<S>,
        tx: mpsc::UnboundedSender<E>,
        wrap: F,
        period: Duration,
    ) -> Self
    where
        E: Send + 'static,
        F: Fn(UtilizationSnapshot) -> E + Send + 'static,
    {
        let (stop, mut stop_rx) = oneshot::channel::<()>();
        let wake = Arc::new(Notify::new());
        let task_wake = Arc::clone(&wake);

        let handle = tokio::spawn(async move {
            tracing::info!(period_ms = period.as_millis() as u64, "refresher started");
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; the seeding read already
            // covers "now", so skip it.
            interval.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = task_wake.notified() => {
                        interval.reset();
                    }
                    _ = interval.tick() => {}
                }

                engine.update();
                if tx.send(wrap(engine.snapshot())).is_err() {
                    tracing::debug!("snapshot receiver dropped");
                    break;
                }
            }

            tracing::info!(updates = engine.updates(), "refresher stopped");
            engine
        });

        Refresher { stop, wake, handle }
    }

    /// Run an update now instead of waiting for the next interval.
    pub fn refresh_now(&self) {
        self.wake.notify_one();
    }

    pub async fn shutdown(self) -> Result<UtilizationEngine<S>, JoinError> {
        // The task may already have exited on its own.
        let _ = self.stop.send(());
        self.handle.await
    }
}
