use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use log::{info, warn};
use tokio::sync::Mutex;

use crate::api::{ApiClient, WellbeingSummary};
use crate::capture::{CaptureContext, CaptureController, MediaSource};
use crate::chat::ChatEngine;
use crate::emotion::EmotionStore;
use crate::session;
use crate::settings::SettingsStore;
use crate::telemetry::TelemetryCollector;

use super::state::{MonitorState, MonitorStatus};

/// Orchestrates one monitoring session: camera acquisition, session
/// registration, the capture loop, and teardown.
pub struct MonitorController {
    state: Arc<Mutex<MonitorState>>,
    capture: Arc<Mutex<CaptureController>>,
    api: Arc<ApiClient>,
    store: EmotionStore,
    chat: ChatEngine,
    telemetry: TelemetryCollector,
    settings: Arc<SettingsStore>,
}

impl MonitorController {
    pub fn new(settings: Arc<SettingsStore>) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&settings.api())?);

        Ok(Self {
            state: Arc::new(Mutex::new(MonitorState::idle())),
            capture: Arc::new(Mutex::new(CaptureController::new())),
            api,
            store: EmotionStore::new(),
            chat: ChatEngine::new(),
            telemetry: TelemetryCollector::new(),
            settings,
        })
    }

    pub async fn state(&self) -> MonitorState {
        self.state.lock().await.clone()
    }

    pub fn api(&self) -> Arc<ApiClient> {
        Arc::clone(&self.api)
    }

    pub fn store(&self) -> EmotionStore {
        self.store.clone()
    }

    pub fn chat(&self) -> ChatEngine {
        self.chat.clone()
    }

    pub fn telemetry(&self) -> TelemetryCollector {
        self.telemetry.clone()
    }

    /// Begin monitoring. Fails when already active or when the source
    /// cannot be acquired; a registration failure is not fatal, the
    /// session just stays local.
    pub async fn start_monitoring(&self, mut source: Box<dyn MediaSource>) -> Result<String> {
        let mut state = self.state.lock().await;
        if state.is_monitoring() {
            bail!("monitoring already active");
        }

        // Device access is the one hard precondition.
        source.acquire()?;

        let session_id = session::establish(&self.api, None).await;

        self.store.clear().await;
        self.telemetry.reset().await;

        let ctx = CaptureContext {
            session_id: session_id.clone(),
            api: Arc::clone(&self.api),
            store: self.store.clone(),
            chat: self.chat.clone(),
            telemetry: self.telemetry.clone(),
            settings: self.settings.capture(),
        };

        self.capture.lock().await.start_capture(ctx, source)?;

        state.status = MonitorStatus::Monitoring;
        state.session_id = Some(session_id.clone());
        state.started_at = Some(Utc::now());
        info!("monitoring started, session {session_id}");

        Ok(session_id)
    }

    /// Stop monitoring and close out the session. Returns the session
    /// summary when the service can provide one.
    pub async fn stop_monitoring(&self) -> Result<Option<WellbeingSummary>> {
        let mut state = self.state.lock().await;
        if !state.is_monitoring() {
            bail!("monitoring is not active");
        }
        let session_id = state.session_id.take().unwrap_or_default();

        self.capture.lock().await.stop_capture().await?;

        session::end(&self.api, &session_id).await;

        let summary = match self.api.wellbeing_summary(Some(&session_id), 24).await {
            Ok(summary) => Some(summary),
            Err(err) => {
                warn!("session summary unavailable: {err:#}");
                None
            }
        };

        let snapshot = self.telemetry.snapshot().await;
        info!(
            "monitoring stopped, session {session_id}: {} ticks, {} skipped, {} fallbacks, {} no-face",
            snapshot.tick_count, snapshot.skipped_busy, snapshot.fallback_count, snapshot.no_face_count
        );

        state.status = MonitorStatus::Idle;
        state.started_at = None;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{respond_json, TestServer};
    use crate::capture::SyntheticCamera;
    use crate::settings::CameraSettings;

    async fn controller_for(base_url: &str) -> MonitorController {
        let path = std::env::temp_dir().join(format!("maitri-test-{}.json", uuid::Uuid::new_v4()));
        let settings = Arc::new(SettingsStore::new(path).unwrap());
        settings.update_api_base_url(base_url).unwrap();
        MonitorController::new(settings).unwrap()
    }

    fn routes() -> Vec<crate::api::testing::Route> {
        vec![
            respond_json(
                "/session",
                200,
                r#"{"success":true,"session":{"id":1,"session_id":"srv-1","user_identifier":null,"start_time":"2025-03-14T09:26:53","end_time":null,"total_emotions":0,"avg_wellbeing":null}}"#,
            ),
            respond_json(
                "/logs/summary",
                200,
                r#"{"success":true,"summary":{"total_readings":2,"avg_wellbeing":75.0,"emotion_distribution":{"happy":2},"wellbeing_trend":[]}}"#,
            ),
            respond_json(
                "/analyze",
                200,
                r#"{"success":true,"result":{"emotion_label":"happy","wellbeing_score":75,"confidence":0.9,"timestamp":null,"processing_time":0.1},"session_id":"srv-1"}"#,
            ),
        ]
    }

    #[tokio::test]
    async fn start_and_stop_round_trip() {
        let server = TestServer::spawn(routes()).await;
        let controller = controller_for(&server.base_url()).await;

        let camera = Box::new(SyntheticCamera::new(CameraSettings::default()));
        let session_id = controller.start_monitoring(camera).await.unwrap();
        assert_eq!(session_id, "srv-1");
        assert!(controller.state().await.is_monitoring());

        let camera = Box::new(SyntheticCamera::new(CameraSettings::default()));
        assert!(controller.start_monitoring(camera).await.is_err());

        let summary = controller.stop_monitoring().await.unwrap();
        assert_eq!(summary.unwrap().total_readings, 2);
        assert!(!controller.state().await.is_monitoring());
    }

    #[tokio::test]
    async fn denied_camera_keeps_monitor_idle() {
        let server = TestServer::spawn(routes()).await;
        let controller = controller_for(&server.base_url()).await;

        let camera = Box::new(SyntheticCamera::new(CameraSettings {
            device: -1,
            width: 640,
            height: 480,
        }));
        assert!(controller.start_monitoring(camera).await.is_err());
        assert!(!controller.state().await.is_monitoring());
    }

    #[tokio::test]
    async fn stop_when_idle_is_an_error() {
        let server = TestServer::spawn(routes()).await;
        let controller = controller_for(&server.base_url()).await;
        assert!(controller.stop_monitoring().await.is_err());
    }
}
