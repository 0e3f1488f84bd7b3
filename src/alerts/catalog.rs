//! Fixed catalog of emergency kinds the panel can raise.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

use super::types::Severity;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyKind {
    Medical,
    Technical,
    Psychological,
    Environmental,
    /// The one-click quick path; not part of the four-button panel.
    General,
}

impl EmergencyKind {
    /// Kinds offered on the confirmation-gated panel.
    pub const PANEL: [EmergencyKind; 4] = [
        EmergencyKind::Medical,
        EmergencyKind::Technical,
        EmergencyKind::Psychological,
        EmergencyKind::Environmental,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            EmergencyKind::Medical => "medical",
            EmergencyKind::Technical => "technical",
            EmergencyKind::Psychological => "psychological",
            EmergencyKind::Environmental => "environmental",
            EmergencyKind::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmergencyKind::Medical => "Medical Emergency",
            EmergencyKind::Technical => "Technical Malfunction",
            EmergencyKind::Psychological => "Psychological Crisis",
            EmergencyKind::Environmental => "Environmental Hazard",
            EmergencyKind::General => "General Emergency",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EmergencyKind::Medical => "Health-related urgent situation",
            EmergencyKind::Technical => "Equipment or system failure",
            EmergencyKind::Psychological => "Mental health emergency",
            EmergencyKind::Environmental => "Dangerous environmental condition",
            EmergencyKind::General => "Immediate assistance required",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            EmergencyKind::Medical | EmergencyKind::General => Severity::Critical,
            EmergencyKind::Technical | EmergencyKind::Psychological => Severity::High,
            EmergencyKind::Environmental => Severity::Medium,
        }
    }
}

impl fmt::Display for EmergencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EmergencyKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "medical" => Ok(EmergencyKind::Medical),
            "technical" => Ok(EmergencyKind::Technical),
            "psychological" => Ok(EmergencyKind::Psychological),
            "environmental" => Ok(EmergencyKind::Environmental),
            "general" => Ok(EmergencyKind::General),
            other => Err(anyhow!("unknown emergency kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_excludes_the_quick_path() {
        assert!(!EmergencyKind::PANEL.contains(&EmergencyKind::General));
        assert_eq!(EmergencyKind::PANEL.len(), 4);
    }

    #[test]
    fn ids_parse_back() {
        for kind in EmergencyKind::PANEL {
            assert_eq!(kind.id().parse::<EmergencyKind>().unwrap(), kind);
        }
        assert_eq!(
            "general".parse::<EmergencyKind>().unwrap(),
            EmergencyKind::General
        );
    }
}
