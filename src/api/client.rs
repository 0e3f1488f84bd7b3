//! HTTP client for the remote analysis and alerting service.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::debug;
use reqwest::Client;

use super::types::{
    AlertRecord, AnalysisResult, AnalyzeRequest, AnalyzeResponse, CreateSessionRequest,
    EmergencyListResponse, EmergencyRequest, EmergencyResponse, EmotionLogEntry, HealthResponse,
    LogsResponse, SessionRecord, SessionResponse, SummaryResponse, WellbeingSummary,
};
use crate::settings::ApiSettings;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            // Redirects can silently turn a POST into a GET.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submit one frame (and optional audio summary) for classification.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult> {
        let response = self
            .http
            .post(self.url("/analyze"))
            .json(request)
            .send()
            .await
            .context("analyze request failed")?
            .error_for_status()
            .context("analyze request rejected")?;

        let body: AnalyzeResponse = response
            .json()
            .await
            .context("failed to parse analyze response")?;

        if !body.success {
            bail!("analysis service reported failure");
        }
        body.result
            .context("analyze response missing result payload")
    }

    pub async fn emotion_logs(
        &self,
        session_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<EmotionLogEntry>, u64)> {
        let mut request = self
            .http
            .get(self.url("/logs"))
            .query(&[("limit", limit), ("offset", offset)]);
        if let Some(id) = session_id {
            request = request.query(&[("session_id", id)]);
        }

        let body: LogsResponse = request
            .send()
            .await
            .context("logs request failed")?
            .error_for_status()?
            .json()
            .await
            .context("failed to parse logs response")?;

        if !body.success {
            bail!("logs request reported failure");
        }
        Ok((body.logs, body.total))
    }

    pub async fn wellbeing_summary(
        &self,
        session_id: Option<&str>,
        hours: u32,
    ) -> Result<WellbeingSummary> {
        let mut request = self
            .http
            .get(self.url("/logs/summary"))
            .query(&[("hours", hours)]);
        if let Some(id) = session_id {
            request = request.query(&[("session_id", id)]);
        }

        let body: SummaryResponse = request
            .send()
            .await
            .context("summary request failed")?
            .error_for_status()?
            .json()
            .await
            .context("failed to parse summary response")?;

        if !body.success {
            bail!("summary request reported failure");
        }
        body.summary.context("summary response missing payload")
    }

    pub async fn create_emergency(&self, request: &EmergencyRequest) -> Result<AlertRecord> {
        let body: EmergencyResponse = self
            .http
            .post(self.url("/emergency"))
            .json(request)
            .send()
            .await
            .context("emergency request failed")?
            .error_for_status()
            .context("emergency request rejected")?
            .json()
            .await
            .context("failed to parse emergency response")?;

        if !body.success {
            bail!("emergency endpoint reported failure");
        }
        if let Some(eta) = body.estimated_response_time {
            debug!("ground response estimated in {eta:.1}s");
        }
        body.alert.context("emergency response missing alert")
    }

    pub async fn acknowledge_emergency(&self, alert_id: i64) -> Result<AlertRecord> {
        let body: EmergencyResponse = self
            .http
            .post(self.url(&format!("/emergency/{alert_id}/acknowledge")))
            .send()
            .await
            .context("acknowledge request failed")?
            .error_for_status()?
            .json()
            .await
            .context("failed to parse acknowledge response")?;

        if !body.success {
            bail!("acknowledge endpoint reported failure");
        }
        body.alert.context("acknowledge response missing alert")
    }

    pub async fn emergency_history(
        &self,
        session_id: &str,
        limit: u32,
    ) -> Result<Vec<AlertRecord>> {
        let body: EmergencyListResponse = self
            .http
            .get(self.url("/emergency"))
            .query(&[("session_id", session_id)])
            .query(&[("limit", limit)])
            .send()
            .await
            .context("emergency history request failed")?
            .error_for_status()?
            .json()
            .await
            .context("failed to parse emergency history")?;

        if !body.success {
            bail!("emergency history reported failure");
        }
        Ok(body.alerts)
    }

    pub async fn create_session(&self, user_identifier: Option<&str>) -> Result<SessionRecord> {
        let request = CreateSessionRequest {
            user_identifier: user_identifier.map(str::to_string),
        };

        let body: SessionResponse = self
            .http
            .post(self.url("/session"))
            .json(&request)
            .send()
            .await
            .context("session create request failed")?
            .error_for_status()?
            .json()
            .await
            .context("failed to parse session response")?;

        if !body.success {
            bail!("session create reported failure");
        }
        body.session.context("session response missing payload")
    }

    pub async fn end_session(&self, session_id: &str) -> Result<()> {
        self.http
            .post(self.url(&format!("/session/{session_id}/end")))
            .send()
            .await
            .context("session end request failed")?
            .error_for_status()
            .context("session end rejected")?;
        Ok(())
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let body: HealthResponse = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .context("health request failed")?
            .json()
            .await
            .context("failed to parse health response")?;
        Ok(body)
    }
}
