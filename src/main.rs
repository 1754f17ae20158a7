// src/main.rs
//
// Demo driver: runs a scripted camera session through the pipeline
// runtime with log-backed speech/haptic/overlay sinks. Stands in for
// the real capture callback and speech engine wiring.

use anyhow::Result;
use std::time::Duration;
use tracing::info;

use seeforme_core::geometry::NormalizedRect;
use seeforme_core::output::{LogHaptics, LogOverlay, LogSpeech};
use seeforme_core::pipeline::FrameInput;
use seeforme_core::runtime::PipelineRuntime;
use seeforme_core::types::{Config, DepthGrid, RawDetection};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_or_default("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("seeforme={level},seeforme_core={level}", level = config.logging.level))
        .init();

    info!("👁️  Scene narration pipeline starting");
    info!(
        "Display {}×{}, movement ratio {:.2}, cooldown {:.1}s",
        config.display.screen_width,
        config.display.screen_height,
        config.tracker.movement_ratio,
        config.tracker.announce_cooldown_secs
    );

    let runtime = PipelineRuntime::spawn(
        config,
        Box::new(LogSpeech),
        Box::new(LogHaptics),
        Box::new(LogOverlay),
    );
    let handle = runtime.handle();

    // Scripted session: a chair sighted twice in quick succession (the
    // second pass is cooldown-suppressed), then a person approaching
    // with active depth available.
    let chair = |x: f32| RawDetection {
        label: "chair".to_string(),
        confidence: 0.82,
        bbox: NormalizedRect::new(x, 0.3, 0.45, 0.45),
    };
    let person = RawDetection {
        label: "person".to_string(),
        confidence: 0.91,
        bbox: NormalizedRect::new(0.2, 0.1, 0.55, 0.8),
    };

    handle
        .submit_frame(FrameInput {
            detections: vec![chair(0.25)],
            depth: None,
        })
        .await;
    handle
        .submit_frame(FrameInput {
            detections: vec![chair(0.26)],
            depth: None,
        })
        .await;

    // Speech engine reports the first utterance done.
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.speech_finished().await;

    let depth = DepthGrid::new(vec![1.8; 64 * 48], 64, 48);
    handle
        .submit_frame(FrameInput {
            detections: vec![person, chair(0.26)],
            depth,
        })
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.speech_finished().await;

    let summary = runtime.join().await;
    info!("Session complete");
    info!("  Frames processed: {}", summary.frames_processed);
    info!("  Detections seen: {}", summary.detections_seen);
    info!("  Announcements: {}", summary.announcements_made);
    info!("  Suppressed: {}", summary.announcements_suppressed);
    info!("  Depth fallbacks: {}", summary.depth_fallbacks);

    Ok(())
}
