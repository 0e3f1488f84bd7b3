use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonitorStatus {
    Idle,
    Monitoring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorState {
    pub status: MonitorStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl MonitorState {
    pub fn idle() -> Self {
        Self {
            status: MonitorStatus::Idle,
            session_id: None,
            started_at: None,
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.status == MonitorStatus::Monitoring
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::idle()
    }
}
