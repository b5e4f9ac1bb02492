//! Periodic liveness sweep over the registry.

use super::ServiceRegistry;
use crate::registry::ports::{LivenessProbe, ServiceStore};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Handle to a running heartbeat task.
#[derive(Debug)]
pub struct HeartbeatHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl HeartbeatHandle {
    /// Stops the heartbeat and waits for the task to exit.
    ///
    /// A sweep already in progress completes first.
    pub async fn shutdown(self) {
        if self.shutdown.send(true).is_err() {
            debug!("heartbeat task already stopped");
        }
        if let Err(err) = self.task.await {
            warn!(error = %err, "heartbeat task ended abnormally");
        }
    }
}

/// Starts sweeping `registry` every `period`.
///
/// The first sweep runs one full period after the call, since the registry
/// resolves liveness when it loads. A sweep that overruns the period delays
/// the next one instead of stacking up.
pub fn spawn_heartbeat<S, P, C>(
    registry: Arc<ServiceRegistry<S, P, C>>,
    period: Duration,
) -> HeartbeatHandle
where
    S: ServiceStore + 'static,
    P: LivenessProbe + 'static,
    C: Clock + Send + Sync + 'static,
{
    let (shutdown, mut stop) = watch::channel(false);
    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        info!(period_secs = period.as_secs(), "service heartbeat started");

        loop {
            tokio::select! {
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    debug!("service check heartbeat");
                    registry.heartbeat_sweep().await;
                }
            }
        }
        info!("service heartbeat stopped");
    });

    HeartbeatHandle { shutdown, task }
}
