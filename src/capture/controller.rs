use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::{capture_loop, CaptureContext};
use super::source::MediaSource;

/// Owns the capture loop task lifecycle.
pub struct CaptureController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl CaptureController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start_capture(&mut self, ctx: CaptureContext, source: Box<dyn MediaSource>) -> Result<()> {
        if self.handle.is_some() {
            bail!("capture already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(capture_loop(ctx, source, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop_capture(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("capture loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for CaptureController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::unreachable_base_url;
    use crate::api::ApiClient;
    use crate::capture::source::{MediaSource, SyntheticCamera};
    use crate::chat::ChatEngine;
    use crate::emotion::EmotionStore;
    use crate::settings::{ApiSettings, CameraSettings, CaptureSettings};
    use crate::telemetry::TelemetryCollector;
    use std::sync::Arc;

    async fn test_context() -> CaptureContext {
        CaptureContext {
            session_id: "s1".into(),
            api: Arc::new(
                ApiClient::new(&ApiSettings {
                    base_url: unreachable_base_url().await,
                    timeout_secs: 1,
                    connect_timeout_secs: 1,
                })
                .unwrap(),
            ),
            store: EmotionStore::new(),
            chat: ChatEngine::new(),
            telemetry: TelemetryCollector::new(),
            settings: CaptureSettings::default(),
        }
    }

    #[tokio::test]
    async fn double_start_is_rejected() {
        let mut controller = CaptureController::new();
        let ctx = test_context().await;

        let mut camera = SyntheticCamera::new(CameraSettings::default());
        camera.acquire().unwrap();
        controller.start_capture(ctx.clone(), Box::new(camera)).unwrap();
        assert!(controller.is_active());

        let mut second = SyntheticCamera::new(CameraSettings::default());
        second.acquire().unwrap();
        assert!(controller.start_capture(ctx, Box::new(second)).is_err());

        controller.stop_capture().await.unwrap();
        assert!(!controller.is_active());
    }

    #[tokio::test]
    async fn stop_without_start_is_a_no_op() {
        let mut controller = CaptureController::new();
        assert!(controller.stop_capture().await.is_ok());
    }
}
