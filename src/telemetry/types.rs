use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::emotion::ReadingSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRecord {
    pub timestamp: DateTime<Utc>,
    pub sample_ms: u64,
    pub analysis_ms: Option<u64>,
    pub source: ReadingSource,
    pub face_detected: bool,
    pub cpu_percent: f32,
    pub memory_mb: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemLoad {
    pub cpu_percent: f32,
    pub memory_mb: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub system: SystemLoad,
    pub recent_captures: Vec<CaptureRecord>,
    pub tick_count: u64,
    pub skipped_busy: u64,
    pub no_face_count: u64,
    pub fallback_count: u64,
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            system: SystemLoad {
                cpu_percent: 0.0,
                memory_mb: 0.0,
            },
            recent_captures: Vec::new(),
            tick_count: 0,
            skipped_busy: 0,
            no_face_count: 0,
            fallback_count: 0,
        }
    }
}
