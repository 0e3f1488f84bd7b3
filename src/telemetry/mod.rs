mod types;

pub use types::{CaptureRecord, SystemLoad, TelemetrySnapshot};

use std::sync::Arc;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::Mutex;

use crate::emotion::ReadingSource;

const MAX_RECENT_CAPTURES: usize = 20;

pub struct TelemetryCollector {
    inner: Arc<Mutex<TelemetryState>>,
}

struct TelemetryState {
    recent_captures: Vec<CaptureRecord>,
    tick_count: u64,
    skipped_busy: u64,
    no_face_count: u64,
    fallback_count: u64,
    system: System,
    pid: Pid,
}

impl TelemetryCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        let pid = Pid::from_u32(std::process::id());

        // Initial refresh to establish baseline for CPU calculation
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        Self {
            inner: Arc::new(Mutex::new(TelemetryState {
                recent_captures: Vec::with_capacity(MAX_RECENT_CAPTURES),
                tick_count: 0,
                skipped_busy: 0,
                no_face_count: 0,
                fallback_count: 0,
                system,
                pid,
            })),
        }
    }

    /// Sample current CPU and memory usage. CPU usage requires multiple
    /// refreshes over time to calculate a delta.
    pub async fn sample_system_load(&self) -> (f32, f64) {
        let mut state = self.inner.lock().await;
        let pid = state.pid;
        state.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        if let Some(process) = state.system.process(pid) {
            (
                process.cpu_usage(),
                process.memory() as f64 / 1024.0 / 1024.0,
            )
        } else {
            (0.0, 0.0)
        }
    }

    pub async fn record_tick(&self) {
        self.inner.lock().await.tick_count += 1;
    }

    /// A tick arrived while a previous analysis was still in flight.
    pub async fn record_skip(&self) {
        self.inner.lock().await.skipped_busy += 1;
    }

    pub async fn record_no_face(&self) {
        self.inner.lock().await.no_face_count += 1;
    }

    pub async fn record_capture(&self, record: CaptureRecord) {
        let mut state = self.inner.lock().await;

        if record.source == ReadingSource::LocalFallback {
            state.fallback_count += 1;
        }

        state.recent_captures.push(record);
        if state.recent_captures.len() > MAX_RECENT_CAPTURES {
            state.recent_captures.remove(0);
        }
    }

    pub async fn snapshot(&self) -> TelemetrySnapshot {
        let mut state = self.inner.lock().await;
        let pid = state.pid;
        state.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        let system = if let Some(process) = state.system.process(pid) {
            SystemLoad {
                cpu_percent: process.cpu_usage(),
                memory_mb: process.memory() as f64 / 1024.0 / 1024.0,
            }
        } else {
            SystemLoad {
                cpu_percent: 0.0,
                memory_mb: 0.0,
            }
        };

        TelemetrySnapshot {
            system,
            recent_captures: state.recent_captures.clone(),
            tick_count: state.tick_count,
            skipped_busy: state.skipped_busy,
            no_face_count: state.no_face_count,
            fallback_count: state.fallback_count,
        }
    }

    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        let pid = state.pid;
        state.recent_captures.clear();
        state.tick_count = 0;
        state.skipped_busy = 0;
        state.no_face_count = 0;
        state.fallback_count = 0;
        // Re-establish baseline for CPU after reset
        state.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));
    }
}

impl Clone for TelemetryCollector {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(source: ReadingSource) -> CaptureRecord {
        CaptureRecord {
            timestamp: Utc::now(),
            sample_ms: 3,
            analysis_ms: Some(120),
            source,
            face_detected: true,
            cpu_percent: 0.0,
            memory_mb: 0.0,
        }
    }

    #[tokio::test]
    async fn counters_track_loop_outcomes() {
        let telemetry = TelemetryCollector::new();
        telemetry.record_tick().await;
        telemetry.record_tick().await;
        telemetry.record_skip().await;
        telemetry.record_no_face().await;
        telemetry.record_capture(record(ReadingSource::LocalFallback)).await;

        let snapshot = telemetry.snapshot().await;
        assert_eq!(snapshot.tick_count, 2);
        assert_eq!(snapshot.skipped_busy, 1);
        assert_eq!(snapshot.no_face_count, 1);
        assert_eq!(snapshot.fallback_count, 1);
        assert_eq!(snapshot.recent_captures.len(), 1);
    }

    #[tokio::test]
    async fn recent_captures_are_bounded() {
        let telemetry = TelemetryCollector::new();
        for _ in 0..(MAX_RECENT_CAPTURES + 5) {
            telemetry.record_capture(record(ReadingSource::Remote)).await;
        }
        let snapshot = telemetry.snapshot().await;
        assert_eq!(snapshot.recent_captures.len(), MAX_RECENT_CAPTURES);
        assert_eq!(snapshot.fallback_count, 0);
    }
}
