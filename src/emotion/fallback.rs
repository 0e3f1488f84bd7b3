//! Locally synthesized readings.
//!
//! When the analysis endpoint is unreachable the capture loop substitutes a
//! random reading instead of surfacing an error. This is a deliberate
//! availability-over-correctness placeholder awaiting a real on-device model.

use chrono::Utc;
use rand::Rng;

use super::types::{EmotionLabel, EmotionReading, ReadingSource};

/// Produce exactly one substitute reading for a failed analysis call.
pub fn synthesize_reading(session_id: &str) -> EmotionReading {
    let mut rng = rand::thread_rng();
    let label = EmotionLabel::ALL[rng.gen_range(0..EmotionLabel::ALL.len())];

    EmotionReading {
        label,
        score: rng.gen_range(60..100),
        timestamp: Utc::now(),
        confidence: Some(rng.gen_range(0.7..1.0)),
        session_id: session_id.to_string(),
        source: ReadingSource::LocalFallback,
    }
}
