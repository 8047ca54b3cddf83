// =====================================================================================
// DASHBOARD POLLER
// =====================================================================================

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::models::DashboardState;
use crate::services::alerts::AlertSource;

pub struct AlertPoller;

impl AlertPoller {
    /// Loads today's alerts, then refreshes them every `period` until the
    /// returned handle is shut down or dropped.
    pub fn spawn(source: Arc<dyn AlertSource>, period: Duration) -> PollerHandle {
        let (state_tx, state_rx) = watch::channel(DashboardState::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(poll_loop(source, period, state_tx, shutdown_rx));

        PollerHandle {
            state: state_rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

pub struct PollerHandle {
    state: watch::Receiver<DashboardState>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    pub fn current(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Alert poller ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }
    }
}

async fn poll_loop(
    source: Arc<dyn AlertSource>,
    period: Duration,
    state_tx: watch::Sender<DashboardState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!("Alert poller started, refreshing every {:?}", period);

    state_tx.send_modify(|state| {
        state.loading = true;
        state.alerts = None;
    });
    let initial = source.fetch_today().await;
    state_tx.send_modify(|state| {
        state.loading = false;
        match initial {
            Ok(alerts) => {
                state.alerts = Some(alerts);
                state.refreshed_at = Some(Local::now().naive_local());
            }
            Err(ref e) => warn!("Initial alert load failed: {}", e),
        }
    });

    // Ticks that fall due while a fetch is running are delayed, so polls
    // never overlap.
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match source.fetch_today().await {
                    Ok(alerts) => {
                        debug!("Refreshed {} alerts", alerts.len());
                        state_tx.send_modify(|state| {
                            state.alerts = Some(alerts);
                            state.refreshed_at = Some(Local::now().naive_local());
                        });
                    }
                    Err(e) => warn!("Alert refresh failed, keeping last data: {}", e),
                }
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Alert poller stopped");
}
