use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::time::{timeout, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::{AnalyzeRequest, ApiClient};
use crate::chat::ChatEngine;
use crate::emotion::{fallback::synthesize_reading, EmotionStore, ReadingSource};
use crate::settings::CaptureSettings;
use crate::telemetry::{CaptureRecord, TelemetryCollector};

use super::source::MediaSource;

/// Everything the capture loop needs, bundled so the controller can hand it
/// to the spawned task in one move.
#[derive(Clone)]
pub struct CaptureContext {
    pub session_id: String,
    pub api: Arc<ApiClient>,
    pub store: EmotionStore,
    pub chat: ChatEngine,
    pub telemetry: TelemetryCollector,
    pub settings: CaptureSettings,
}

/// Periodic capture-and-classify loop.
///
/// One analysis may be in flight at a time; ticks that land while the busy
/// flag is held are skipped, not queued. Every attempted analysis produces
/// exactly one reading: the remote result on success, a synthesized local
/// one on any failure. Cancellation stops the ticker and releases the
/// source; an already-spawned analysis still lands its reading.
pub async fn capture_loop(
    ctx: CaptureContext,
    mut source: Box<dyn MediaSource>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(ctx.settings.interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let busy = Arc::new(AtomicBool::new(false));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                ctx.telemetry.record_tick().await;

                if busy.swap(true, Ordering::SeqCst) {
                    debug!("analysis still in flight, skipping tick");
                    ctx.telemetry.record_skip().await;
                    continue;
                }

                if !source.face_visible() {
                    debug!("no face in frame, skipping analysis");
                    ctx.telemetry.record_no_face().await;
                    busy.store(false, Ordering::SeqCst);
                    continue;
                }

                let sample_start = Instant::now();
                let sample = match source.sample() {
                    Ok(sample) => sample,
                    Err(err) => {
                        warn!("frame capture failed: {err:#}");
                        // A failed attempt still yields one reading.
                        let reading = synthesize_reading(&ctx.session_id);
                        ctx.store.push(reading.clone()).await;
                        ctx.chat.observe_reading(&reading).await;
                        ctx.telemetry.record_capture(CaptureRecord {
                            timestamp: chrono::Utc::now(),
                            sample_ms: sample_start.elapsed().as_millis() as u64,
                            analysis_ms: None,
                            source: ReadingSource::LocalFallback,
                            face_detected: true,
                            cpu_percent: 0.0,
                            memory_mb: 0.0,
                        }).await;
                        busy.store(false, Ordering::SeqCst);
                        continue;
                    }
                };
                let sample_ms = sample_start.elapsed().as_millis() as u64;

                let ctx = ctx.clone();
                let busy = Arc::clone(&busy);
                tokio::spawn(async move {
                    let request = AnalyzeRequest {
                        session_id: ctx.session_id.clone(),
                        video_data: sample.video_base64,
                        audio_data: sample.audio,
                    };

                    let analysis_start = Instant::now();
                    let deadline = Duration::from_secs(ctx.settings.tick_timeout_secs);
                    let reading = match timeout(deadline, ctx.api.analyze(&request)).await {
                        Ok(Ok(result)) => match result.into_reading(&ctx.session_id) {
                            Ok(reading) => reading,
                            Err(err) => {
                                warn!("analysis result unusable, substituting local reading: {err:#}");
                                synthesize_reading(&ctx.session_id)
                            }
                        },
                        Ok(Err(err)) => {
                            warn!("analysis failed, substituting local reading: {err:#}");
                            synthesize_reading(&ctx.session_id)
                        }
                        Err(_) => {
                            warn!("analysis timed out after {}s, substituting local reading", deadline.as_secs());
                            synthesize_reading(&ctx.session_id)
                        }
                    };
                    let analysis_ms = analysis_start.elapsed().as_millis() as u64;

                    let (cpu_percent, memory_mb) = ctx.telemetry.sample_system_load().await;
                    ctx.telemetry.record_capture(CaptureRecord {
                        timestamp: sample.captured_at,
                        sample_ms,
                        analysis_ms: Some(analysis_ms),
                        source: reading.source,
                        face_detected: true,
                        cpu_percent,
                        memory_mb,
                    }).await;

                    ctx.store.push(reading.clone()).await;
                    if let Some(message) = ctx.chat.observe_reading(&reading).await {
                        debug!("companion: {}", message.content);
                    }

                    busy.store(false, Ordering::SeqCst);
                });
            }
            _ = cancel_token.cancelled() => {
                info!("capture loop shutting down");
                break;
            }
        }
    }

    source.release();
}
