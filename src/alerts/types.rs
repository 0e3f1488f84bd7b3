//! Emergency alert data models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::types::{parse_server_timestamp, AlertRecord};

use super::catalog::EmergencyKind;

/// Ordered severity scale, lowest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    fn from_wire(value: &str) -> Self {
        match value {
            "low" => Severity::Low,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            // Server default.
            _ => Severity::Medium,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery state of one alert. Transitions are monotonic:
/// `Sent -> Acknowledged` is the only move; `SentLocal` and `Acknowledged`
/// are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Sent,
    SentLocal,
    Acknowledged,
}

impl AlertStatus {
    fn from_wire(value: &str) -> Self {
        match value {
            "acknowledged" => AlertStatus::Acknowledged,
            "sent_local" => AlertStatus::SentLocal,
            _ => AlertStatus::Sent,
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AlertStatus::Sent => "sent",
            AlertStatus::SentLocal => "sent_local",
            AlertStatus::Acknowledged => "acknowledged",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAlert {
    /// Local correlation id. Stringified server id when the POST succeeded,
    /// a generated UUID for degraded local-only alerts.
    pub id: String,
    /// Server-side id, present only for alerts the service accepted.
    pub remote_id: Option<i64>,
    pub alert_type: String,
    pub label: String,
    pub description: String,
    pub severity: Severity,
    pub status: AlertStatus,
    pub timestamp: DateTime<Utc>,
    pub response_time: Option<DateTime<Utc>>,
    pub session_id: String,
}

impl EmergencyAlert {
    /// Build the degraded local-only record used when the remote post fails.
    pub fn local(kind: EmergencyKind, session_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            remote_id: None,
            alert_type: kind.id().to_string(),
            label: kind.label().to_string(),
            description: kind.description().to_string(),
            severity: kind.severity(),
            status: AlertStatus::SentLocal,
            timestamp: Utc::now(),
            response_time: None,
            session_id: session_id.to_string(),
        }
    }

    pub fn from_record(record: AlertRecord) -> Self {
        Self {
            id: record.id.to_string(),
            remote_id: Some(record.id),
            alert_type: record.alert_type,
            label: record.alert_label,
            description: record.description.unwrap_or_default(),
            severity: Severity::from_wire(&record.severity),
            status: AlertStatus::from_wire(&record.status),
            timestamp: parse_server_timestamp(record.timestamp.as_deref()),
            response_time: record
                .response_time
                .as_deref()
                .map(|raw| parse_server_timestamp(Some(raw))),
            session_id: record.session_id,
        }
    }

    /// Apply the acknowledgment transition. Returns false (and changes
    /// nothing) unless the alert is currently `Sent`.
    pub fn acknowledge(&mut self, at: DateTime<Utc>) -> bool {
        if self.status != AlertStatus::Sent {
            return false;
        }
        self.status = AlertStatus::Acknowledged;
        self.response_time = Some(at);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledge_moves_sent_to_acknowledged() {
        let mut alert = EmergencyAlert::local(EmergencyKind::Medical, "s");
        alert.status = AlertStatus::Sent;

        assert!(alert.acknowledge(Utc::now()));
        assert_eq!(alert.status, AlertStatus::Acknowledged);
        assert!(alert.response_time.is_some());
    }

    #[test]
    fn acknowledged_never_regresses() {
        let mut alert = EmergencyAlert::local(EmergencyKind::Medical, "s");
        alert.status = AlertStatus::Sent;
        let first = Utc::now();
        assert!(alert.acknowledge(first));

        // A second acknowledgment is a no-op.
        assert!(!alert.acknowledge(Utc::now()));
        assert_eq!(alert.response_time, Some(first));
    }

    #[test]
    fn sent_local_is_terminal() {
        let mut alert = EmergencyAlert::local(EmergencyKind::General, "s");
        assert_eq!(alert.status, AlertStatus::SentLocal);
        assert!(!alert.acknowledge(Utc::now()));
        assert_eq!(alert.status, AlertStatus::SentLocal);
    }

    #[test]
    fn severity_ordering_is_ascending() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }
}
