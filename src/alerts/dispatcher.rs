//! Emergency alert dispatch and acknowledgment tracking.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{info, warn};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, EmergencyRequest};

use super::catalog::EmergencyKind;
use super::types::EmergencyAlert;

/// Most recent alerts kept for display, newest first.
const HISTORY_CAP: usize = 20;

#[derive(Debug, Clone)]
pub struct AlertTiming {
    /// Countdown ticks before a confirmed alert is transmitted.
    pub confirm_ticks: u64,
    /// Length of one countdown tick.
    pub confirm_tick: Duration,
    /// Wait before asking the service to acknowledge a sent alert.
    pub ack_delay: Duration,
}

impl Default for AlertTiming {
    fn default() -> Self {
        Self {
            confirm_ticks: 5,
            confirm_tick: Duration::from_secs(1),
            ack_delay: Duration::from_secs(3),
        }
    }
}

/// Posts emergency events and tracks their acknowledgment state. Cheap to
/// clone; clones share one history.
#[derive(Clone)]
pub struct AlertDispatcher {
    api: Arc<ApiClient>,
    session_id: String,
    timing: AlertTiming,
    history: Arc<Mutex<Vec<EmergencyAlert>>>,
}

impl AlertDispatcher {
    pub fn new(api: Arc<ApiClient>, session_id: String) -> Self {
        Self::with_timing(api, session_id, AlertTiming::default())
    }

    pub fn with_timing(api: Arc<ApiClient>, session_id: String, timing: AlertTiming) -> Self {
        Self {
            api,
            session_id,
            timing,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Seed the visible history from the service, best-effort.
    pub async fn load_history(&self, limit: u32) -> anyhow::Result<usize> {
        let records = self
            .api
            .emergency_history(&self.session_id, limit)
            .await?;

        let mut history = self.history.lock().await;
        *history = records
            .into_iter()
            .map(EmergencyAlert::from_record)
            .take(HISTORY_CAP)
            .collect();
        Ok(history.len())
    }

    /// Post one alert now. Never fails: a remote failure degrades to a
    /// local-only record so the visible history is never empty.
    pub async fn trigger(&self, kind: EmergencyKind) -> EmergencyAlert {
        let request = EmergencyRequest {
            alert_type: kind.id().to_string(),
            alert_label: kind.label().to_string(),
            description: kind.description().to_string(),
            severity: kind.severity(),
            session_id: self.session_id.clone(),
        };

        let alert = match self.api.create_emergency(&request).await {
            Ok(record) => {
                let alert = EmergencyAlert::from_record(record);
                info!("emergency alert {} sent ({})", alert.id, alert.label);
                if let Some(remote_id) = alert.remote_id {
                    self.spawn_ack_wait(alert.id.clone(), remote_id);
                }
                alert
            }
            Err(err) => {
                warn!("emergency post failed, recording local-only alert: {err:#}");
                EmergencyAlert::local(kind, &self.session_id)
            }
        };

        self.push(alert.clone()).await;
        alert
    }

    /// Start the cancellable confirmation countdown for a panel alert.
    /// The alert is transmitted only if the countdown runs to zero.
    pub fn request_confirmation(&self, kind: EmergencyKind) -> PendingConfirmation {
        let cancel = CancellationToken::new();
        let (remaining_tx, remaining_rx) = watch::channel(self.timing.confirm_ticks);

        let dispatcher = self.clone();
        let token = cancel.clone();
        let tick = self.timing.confirm_tick;
        let mut remaining = self.timing.confirm_ticks;

        let handle = tokio::spawn(async move {
            while remaining > 0 {
                tokio::select! {
                    _ = sleep(tick) => {
                        remaining -= 1;
                        let _ = remaining_tx.send(remaining);
                    }
                    _ = token.cancelled() => {
                        info!("emergency confirmation cancelled");
                        return None;
                    }
                }
            }
            Some(dispatcher.trigger(kind).await)
        });

        PendingConfirmation {
            cancel,
            remaining: remaining_rx,
            handle,
        }
    }

    pub async fn history(&self) -> Vec<EmergencyAlert> {
        self.history.lock().await.clone()
    }

    async fn push(&self, alert: EmergencyAlert) {
        let mut history = self.history.lock().await;
        history.insert(0, alert);
        history.truncate(HISTORY_CAP);
    }

    /// Best-effort wait for ground acknowledgment of a sent alert.
    fn spawn_ack_wait(&self, alert_id: String, remote_id: i64) {
        let api = Arc::clone(&self.api);
        let history = Arc::clone(&self.history);
        let delay = self.timing.ack_delay;

        tokio::spawn(async move {
            sleep(delay).await;
            match api.acknowledge_emergency(remote_id).await {
                Ok(_) => {
                    let mut guard = history.lock().await;
                    if let Some(alert) = guard.iter_mut().find(|a| a.id == alert_id) {
                        if alert.acknowledge(Utc::now()) {
                            info!("emergency alert {alert_id} acknowledged by ground");
                        }
                    }
                }
                Err(err) => {
                    warn!("acknowledgment wait for alert {alert_id} failed: {err:#}");
                }
            }
        });
    }
}

/// Handle for an alert waiting on its confirmation countdown.
pub struct PendingConfirmation {
    cancel: CancellationToken,
    remaining: watch::Receiver<u64>,
    handle: JoinHandle<Option<EmergencyAlert>>,
}

impl PendingConfirmation {
    /// Abort the countdown; no alert will be produced.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn remaining_ticks(&self) -> u64 {
        *self.remaining.borrow()
    }

    pub fn remaining_watch(&self) -> watch::Receiver<u64> {
        self.remaining.clone()
    }

    /// Wait for the countdown to resolve. `None` means it was cancelled.
    pub async fn outcome(self) -> Option<EmergencyAlert> {
        self.handle.await.ok().flatten()
    }

    /// Skip the rest of the countdown and fire the one-click quick path
    /// immediately (mirrors the panel's "send now" shortcut).
    pub async fn send_now(self, dispatcher: &AlertDispatcher) -> EmergencyAlert {
        self.cancel.cancel();
        let _ = self.handle.await;
        dispatcher.trigger(EmergencyKind::General).await
    }
}
