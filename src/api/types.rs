//! Wire types for the remote wellbeing API.
//!
//! Field names follow the service's snake_case JSON. Every response carries a
//! `success` flag next to its payload; callers treat `success: false` the
//! same as a transport failure.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::Severity;
use crate::emotion::{EmotionLabel, EmotionReading, ReadingSource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub duration: f64,
    pub sample_rate: u32,
    pub features: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub session_id: String,
    /// Base64-encoded JPEG frame.
    pub video_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_data: Option<AudioFeatures>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    pub result: Option<AnalysisResult>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResult {
    pub emotion_label: String,
    pub wellbeing_score: i64,
    pub confidence: Option<f64>,
    pub timestamp: Option<String>,
    pub processing_time: Option<f64>,
}

impl AnalysisResult {
    /// Convert the wire result into a reading. Fails on an unknown label or
    /// an out-of-range score, which the capture loop treats like any other
    /// failed analysis.
    pub fn into_reading(self, session_id: &str) -> anyhow::Result<EmotionReading> {
        let label: EmotionLabel = self.emotion_label.parse()?;
        if !(0..=100).contains(&self.wellbeing_score) {
            anyhow::bail!("wellbeing score out of range: {}", self.wellbeing_score);
        }
        let score = self.wellbeing_score as u8;

        Ok(EmotionReading {
            label,
            score,
            timestamp: parse_server_timestamp(self.timestamp.as_deref()),
            confidence: self.confidence,
            session_id: session_id.to_string(),
            source: ReadingSource::Remote,
        })
    }
}

/// The service emits naive ISO-8601 timestamps without an offset; fall back
/// to the local clock when the value is missing or unparseable.
pub(crate) fn parse_server_timestamp(value: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = value else {
        return Utc::now();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc();
    }
    Utc::now()
}

#[derive(Debug, Clone, Serialize)]
pub struct EmergencyRequest {
    pub alert_type: String,
    pub alert_label: String,
    pub description: String,
    pub severity: Severity,
    pub session_id: String,
}

/// Server-side alert record (`/emergency` responses).
#[derive(Debug, Clone, Deserialize)]
pub struct AlertRecord {
    pub id: i64,
    pub alert_type: String,
    pub alert_label: String,
    #[serde(default)]
    pub description: Option<String>,
    pub severity: String,
    pub status: String,
    pub timestamp: Option<String>,
    #[serde(default)]
    pub response_time: Option<String>,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct EmergencyResponse {
    #[serde(default)]
    pub success: bool,
    pub alert: Option<AlertRecord>,
    #[serde(default)]
    pub estimated_response_time: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmergencyListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmotionLogEntry {
    pub id: i64,
    pub session_id: String,
    pub emotion_label: String,
    pub wellbeing_score: i64,
    pub confidence: Option<f64>,
    pub timestamp: Option<String>,
    #[serde(default)]
    pub additional_data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub logs: Vec<EmotionLogEntry>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendPoint {
    pub hour: String,
    pub avg_wellbeing: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WellbeingSummary {
    #[serde(default)]
    pub total_readings: u64,
    #[serde(default)]
    pub avg_wellbeing: f64,
    #[serde(default)]
    pub emotion_distribution: HashMap<String, u64>,
    #[serde(default)]
    pub wellbeing_trend: Vec<TrendPoint>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub success: bool,
    pub summary: Option<WellbeingSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_identifier: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub session_id: String,
    #[serde(default)]
    pub user_identifier: Option<String>,
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub total_emotions: u64,
    #[serde(default)]
    pub avg_wellbeing: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    #[serde(default)]
    pub success: bool,
    pub session: Option<SessionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub success: bool,
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_server_timestamps_parse() {
        let parsed = parse_server_timestamp(Some("2025-03-14T09:26:53.589793"));
        assert_eq!(parsed.timestamp(), 1_741_944_413);
    }

    #[test]
    fn rfc3339_timestamps_parse() {
        let parsed = parse_server_timestamp(Some("2025-03-14T09:26:53Z"));
        assert_eq!(parsed.timestamp(), 1_741_944_413);
    }

    #[test]
    fn analysis_result_maps_to_remote_reading() {
        let result = AnalysisResult {
            emotion_label: "stressed".into(),
            wellbeing_score: 42,
            confidence: Some(0.82),
            timestamp: None,
            processing_time: Some(0.2),
        };
        let reading = result.into_reading("sess").unwrap();
        assert_eq!(reading.label, EmotionLabel::Stressed);
        assert_eq!(reading.score, 42);
        assert_eq!(reading.source, ReadingSource::Remote);
        assert_eq!(reading.session_id, "sess");
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        for score in [-1, 142] {
            let result = AnalysisResult {
                emotion_label: "happy".into(),
                wellbeing_score: score,
                confidence: None,
                timestamp: None,
                processing_time: None,
            };
            assert!(result.into_reading("sess").is_err());
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let result = AnalysisResult {
            emotion_label: "ecstatic".into(),
            wellbeing_score: 50,
            confidence: None,
            timestamp: None,
            processing_time: None,
        };
        assert!(result.into_reading("sess").is_err());
    }
}
