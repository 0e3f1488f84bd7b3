//! Rolling emotion state shared between the capture loop and readers.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use super::types::{EmotionReading, Trend, WellbeingStatus};

/// Most recent readings retained for trend display.
const HISTORY_CAP: usize = 10;
/// Readings averaged on each side of the trend comparison.
const TREND_WINDOW: usize = 3;
/// Score delta below which the trend is considered stable.
const TREND_BAND: f64 = 5.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionSnapshot {
    pub latest: Option<EmotionReading>,
    pub trend: Trend,
    pub status: Option<WellbeingStatus>,
    pub history: Vec<EmotionReading>,
}

/// Latest classification plus a capped trailing window. Cheap to clone and
/// share across tasks.
#[derive(Clone)]
pub struct EmotionStore {
    inner: Arc<Mutex<VecDeque<EmotionReading>>>,
}

impl EmotionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(HISTORY_CAP))),
        }
    }

    pub async fn push(&self, reading: EmotionReading) {
        let mut history = self.inner.lock().await;
        if history.len() == HISTORY_CAP {
            history.pop_front();
        }
        history.push_back(reading);
    }

    pub async fn latest(&self) -> Option<EmotionReading> {
        self.inner.lock().await.back().cloned()
    }

    pub async fn history(&self) -> Vec<EmotionReading> {
        self.inner.lock().await.iter().cloned().collect()
    }

    pub async fn trend(&self) -> Trend {
        let mut history = self.inner.lock().await;
        compute_trend(history.make_contiguous())
    }

    pub async fn snapshot(&self) -> EmotionSnapshot {
        let mut history = self.inner.lock().await;
        let readings: Vec<EmotionReading> = history.iter().cloned().collect();
        EmotionSnapshot {
            latest: readings.last().cloned(),
            trend: compute_trend(history.make_contiguous()),
            status: readings.last().map(|r| WellbeingStatus::from_score(r.score)),
            history: readings,
        }
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }
}

impl Default for EmotionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare the mean of the newest readings against the mean of the ones just
/// before them. Too little history reads as stable.
fn compute_trend(history: &[EmotionReading]) -> Trend {
    if history.len() <= TREND_WINDOW {
        return Trend::Stable;
    }

    let recent = &history[history.len() - TREND_WINDOW..];
    let older_start = history.len().saturating_sub(TREND_WINDOW * 2);
    let older = &history[older_start..history.len() - TREND_WINDOW];
    if older.is_empty() {
        return Trend::Stable;
    }

    let avg = |readings: &[EmotionReading]| {
        readings.iter().map(|r| f64::from(r.score)).sum::<f64>() / readings.len() as f64
    };

    let avg_recent = avg(recent);
    let avg_older = avg(older);

    if avg_recent > avg_older + TREND_BAND {
        Trend::Improving
    } else if avg_recent < avg_older - TREND_BAND {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::types::{EmotionLabel, ReadingSource};
    use chrono::Utc;

    fn reading(score: u8) -> EmotionReading {
        EmotionReading {
            label: EmotionLabel::Neutral,
            score,
            timestamp: Utc::now(),
            confidence: None,
            session_id: "s".into(),
            source: ReadingSource::Remote,
        }
    }

    #[tokio::test]
    async fn history_never_exceeds_cap() {
        let store = EmotionStore::new();
        for score in 0..30u8 {
            store.push(reading(score)).await;
        }
        let history = store.history().await;
        assert_eq!(history.len(), HISTORY_CAP);
        // Oldest entries were evicted first.
        assert_eq!(history[0].score, 20);
        assert_eq!(store.latest().await.unwrap().score, 29);
    }

    #[tokio::test]
    async fn trend_improving_when_recent_scores_rise() {
        let store = EmotionStore::new();
        for score in [50, 50, 50, 80, 80, 80] {
            store.push(reading(score)).await;
        }
        assert_eq!(store.trend().await, Trend::Improving);
    }

    #[tokio::test]
    async fn trend_declining_when_recent_scores_drop() {
        let store = EmotionStore::new();
        for score in [80, 80, 80, 50, 50, 50] {
            store.push(reading(score)).await;
        }
        assert_eq!(store.trend().await, Trend::Declining);
    }

    #[tokio::test]
    async fn trend_stable_inside_band_or_short_history() {
        let store = EmotionStore::new();
        assert_eq!(store.trend().await, Trend::Stable);

        for score in [70, 70, 70] {
            store.push(reading(score)).await;
        }
        assert_eq!(store.trend().await, Trend::Stable);

        for score in [72, 68, 71] {
            store.push(reading(score)).await;
        }
        assert_eq!(store.trend().await, Trend::Stable);
    }

    #[tokio::test]
    async fn snapshot_reports_latest_and_status() {
        let store = EmotionStore::new();
        assert!(store.snapshot().await.latest.is_none());

        store.push(reading(85)).await;
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.latest.unwrap().score, 85);
        assert_eq!(snapshot.status, Some(WellbeingStatus::Excellent));
    }
}
