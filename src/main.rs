//! Console front-end for the monitoring engine.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use maitri_monitor::alerts::{AlertDispatcher, EmergencyKind, PendingConfirmation};
use maitri_monitor::capture::SyntheticCamera;
use maitri_monitor::monitor::MonitorController;
use maitri_monitor::session;
use maitri_monitor::settings::SettingsStore;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let settings_path = std::env::var("MAITRI_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("maitri-settings.json"));
    let settings = Arc::new(SettingsStore::new(settings_path)?);

    let monitor = MonitorController::new(Arc::clone(&settings))?;
    let api = monitor.api();

    match api.health().await {
        Ok(health) => info!(
            "service {} ({})",
            health.status,
            health.version.as_deref().unwrap_or("unknown version")
        ),
        Err(err) => warn!("service unreachable, monitoring will degrade locally: {err:#}"),
    }

    // The alert panel keeps its own correlation token so alerts can be
    // raised before or after a monitoring session.
    let dispatcher = AlertDispatcher::new(Arc::clone(&api), session::generate_session_id());
    if let Ok(count) = dispatcher.load_history(20).await {
        info!("loaded {count} past alerts");
    }

    println!("MAITRI monitor console. Type 'help' for commands.");

    let mut pending: Option<PendingConfirmation> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                let mut parts = line.split_whitespace();
                let Some(command) = parts.next() else { continue };
                let arg = parts.next();

                match command {
                    "help" => print_help(),
                    "start" => {
                        let camera = Box::new(SyntheticCamera::new(settings.camera()));
                        match monitor.start_monitoring(camera).await {
                            Ok(session_id) => println!("monitoring started ({session_id})"),
                            Err(err) => println!("cannot start: {err:#}"),
                        }
                    }
                    "stop" => match monitor.stop_monitoring().await {
                        Ok(Some(summary)) => println!(
                            "monitoring stopped. {} readings, average wellbeing {:.1}",
                            summary.total_readings, summary.avg_wellbeing
                        ),
                        Ok(None) => println!("monitoring stopped (no summary available)"),
                        Err(err) => println!("cannot stop: {err:#}"),
                    },
                    "status" => {
                        let state = monitor.state().await;
                        let snapshot = monitor.store().snapshot().await;
                        println!("state: {:?}", state.status);
                        match snapshot.latest {
                            Some(reading) => println!(
                                "latest: {} (score {}, {}), trend {}",
                                reading.label,
                                reading.score,
                                snapshot
                                    .status
                                    .map(|s| s.to_string())
                                    .unwrap_or_default(),
                                snapshot.trend
                            ),
                            None => println!("no readings yet"),
                        }
                    }
                    "history" => {
                        for reading in monitor.store().history().await {
                            println!(
                                "{}  {:<9} score {:>3}  [{:?}]",
                                reading.timestamp.format("%H:%M:%S"),
                                reading.label.to_string(),
                                reading.score,
                                reading.source
                            );
                        }
                    }
                    "trend" => println!("trend: {}", monitor.store().trend().await),
                    "logs" => {
                        let state = monitor.state().await;
                        match api.emotion_logs(state.session_id.as_deref(), 20, 0).await {
                            Ok((logs, total)) => {
                                println!("{total} readings on record, newest {}:", logs.len());
                                for entry in logs {
                                    println!(
                                        "  {}  {:<9} score {:>3}",
                                        entry.timestamp.as_deref().unwrap_or("-"),
                                        entry.emotion_label,
                                        entry.wellbeing_score
                                    );
                                }
                            }
                            Err(err) => println!("logs unavailable: {err:#}"),
                        }
                    }
                    "telemetry" => {
                        let snapshot = monitor.telemetry().snapshot().await;
                        println!(
                            "{} ticks, {} skipped busy, {} no-face, {} fallbacks, cpu {:.1}%, mem {:.1} MB",
                            snapshot.tick_count,
                            snapshot.skipped_busy,
                            snapshot.no_face_count,
                            snapshot.fallback_count,
                            snapshot.system.cpu_percent,
                            snapshot.system.memory_mb
                        );
                    }
                    "emergency" => {
                        let Some(kind) = arg.and_then(|a| a.parse::<EmergencyKind>().ok()) else {
                            println!("usage: emergency <medical|technical|psychological|environmental>");
                            continue;
                        };
                        // An expired countdown already resolved; drop it.
                        if matches!(&pending, Some(p) if p.remaining_ticks() == 0) {
                            pending = None;
                        }
                        if pending.is_some() {
                            println!("a confirmation is already pending; 'cancel' it first");
                            continue;
                        }
                        let confirmation = dispatcher.request_confirmation(kind);
                        println!(
                            "confirm window open: alert sends in {} seconds unless 'cancel'",
                            confirmation.remaining_ticks()
                        );
                        pending = Some(confirmation);
                    }
                    "quick" => {
                        let alert = match pending.take() {
                            Some(confirmation) => confirmation.send_now(&dispatcher).await,
                            None => dispatcher.trigger(EmergencyKind::General).await,
                        };
                        println!("alert {} ({}) status {}", alert.id, alert.label, alert.status);
                    }
                    "cancel" => match pending.take() {
                        Some(confirmation) if confirmation.remaining_ticks() == 0 => {
                            println!("too late: the countdown expired and the alert was sent");
                        }
                        Some(confirmation) => {
                            confirmation.cancel();
                            println!("confirmation cancelled, no alert sent");
                        }
                        None => println!("nothing to cancel"),
                    },
                    "alerts" => {
                        for alert in dispatcher.history().await {
                            println!(
                                "{}  {:<13} {:<9} {}",
                                alert.timestamp.format("%H:%M:%S"),
                                alert.label,
                                alert.severity.to_string(),
                                alert.status
                            );
                        }
                    }
                    "say" => {
                        let rest = line.splitn(2, ' ').nth(1).unwrap_or("").trim();
                        if rest.is_empty() {
                            println!("usage: say <message>");
                            continue;
                        }
                        let reply = monitor.chat().send_user(rest).await;
                        println!("MAITRI: {}", reply.content);
                    }
                    "breathe" => {
                        println!("MAITRI: {}", monitor.chat().breathing_exercise().await.content)
                    }
                    "tip" => println!("MAITRI: {}", monitor.chat().wellness_tip().await.content),
                    "motivate" => println!("MAITRI: {}", monitor.chat().motivation().await.content),
                    "interval" => {
                        let Some(secs) = arg.and_then(|a| a.parse::<u64>().ok()).filter(|s| *s > 0) else {
                            println!("usage: interval <seconds>");
                            continue;
                        };
                        let mut capture = settings.capture();
                        capture.interval_secs = secs;
                        match settings.update_capture(capture) {
                            Ok(()) => println!("capture interval set to {secs}s (applies on next start)"),
                            Err(err) => println!("failed to save settings: {err:#}"),
                        }
                    }
                    "quit" | "exit" => break,
                    other => println!("unknown command '{other}', try 'help'"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    if let Some(confirmation) = pending.take() {
        confirmation.cancel();
    }
    if monitor.state().await.is_monitoring() {
        if let Err(err) = monitor.stop_monitoring().await {
            warn!("shutdown stop failed: {err:#}");
        }
    }

    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  start | stop | status | history | trend | logs | telemetry");
    println!("  emergency <kind>   open a 5s confirmation window");
    println!("  quick              send the one-click general alert now");
    println!("  cancel             abort a pending confirmation");
    println!("  alerts             show recent alerts");
    println!("  say <msg> | breathe | tip | motivate");
    println!("  interval <secs>    change the capture period");
    println!("  quit");
}
