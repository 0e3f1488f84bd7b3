//! Emotion reading data models.
//!
//! A reading is immutable once created; the store keeps a bounded trailing
//! window of them for trend display.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed label set the analysis service classifies into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Happy,
    Sad,
    Neutral,
    Stressed,
    Fatigued,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 5] = [
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Neutral,
        EmotionLabel::Stressed,
        EmotionLabel::Fatigued,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Stressed => "stressed",
            EmotionLabel::Fatigued => "fatigued",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "Positive and content",
            EmotionLabel::Sad => "Feeling down or melancholic",
            EmotionLabel::Neutral => "Calm and balanced",
            EmotionLabel::Stressed => "Experiencing tension or pressure",
            EmotionLabel::Fatigued => "Tired or low energy",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "happy" => Ok(EmotionLabel::Happy),
            "sad" => Ok(EmotionLabel::Sad),
            "neutral" => Ok(EmotionLabel::Neutral),
            "stressed" => Ok(EmotionLabel::Stressed),
            "fatigued" => Ok(EmotionLabel::Fatigued),
            other => Err(anyhow!("unknown emotion label: {other}")),
        }
    }
}

/// Where a reading came from. `LocalFallback` marks the randomized
/// substitute produced when the remote call fails; it is placeholder data,
/// not inference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadingSource {
    Remote,
    LocalFallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionReading {
    pub label: EmotionLabel,
    /// Wellbeing score, 0-100.
    pub score: u8,
    pub timestamp: DateTime<Utc>,
    pub confidence: Option<f64>,
    pub session_id: String,
    pub source: ReadingSource,
}

/// Coarse direction of the recent wellbeing scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WellbeingStatus {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl WellbeingStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => WellbeingStatus::Excellent,
            60..=79 => WellbeingStatus::Good,
            40..=59 => WellbeingStatus::Fair,
            _ => WellbeingStatus::NeedsAttention,
        }
    }
}

impl fmt::Display for WellbeingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WellbeingStatus::Excellent => "Excellent",
            WellbeingStatus::Good => "Good",
            WellbeingStatus::Fair => "Fair",
            WellbeingStatus::NeedsAttention => "Needs Attention",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_round_trips_through_str() {
        for label in EmotionLabel::ALL {
            assert_eq!(label.as_str().parse::<EmotionLabel>().unwrap(), label);
        }
        assert!("euphoric".parse::<EmotionLabel>().is_err());
    }

    #[test]
    fn status_bands_match_score_ranges() {
        assert_eq!(WellbeingStatus::from_score(100), WellbeingStatus::Excellent);
        assert_eq!(WellbeingStatus::from_score(80), WellbeingStatus::Excellent);
        assert_eq!(WellbeingStatus::from_score(79), WellbeingStatus::Good);
        assert_eq!(WellbeingStatus::from_score(60), WellbeingStatus::Good);
        assert_eq!(WellbeingStatus::from_score(40), WellbeingStatus::Fair);
        assert_eq!(WellbeingStatus::from_score(39), WellbeingStatus::NeedsAttention);
        assert_eq!(WellbeingStatus::from_score(0), WellbeingStatus::NeedsAttention);
    }
}
