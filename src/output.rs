// src/output.rs
//
// Seams to the speech, haptic, and display collaborators. The pipeline
// decides; these traits carry the side effects out. Haptic and overlay
// failures are logged and swallowed — they must never disturb tracker
// or gate state.

use anyhow::Result;
use tracing::{info, warn};

use crate::types::{HapticPattern, OverlayItem};

/// Speech collaborator. Playback is asynchronous on the far side; the
/// completion/cancellation signal comes back through the runtime as a
/// `PipelineCommand`, never through this trait.
pub trait SpeechSink: Send {
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// Haptic collaborator. Fire-and-forget.
pub trait HapticSink: Send {
    fn play(&mut self, pattern: HapticPattern) -> Result<()>;
}

/// Display collaborator. Receives every tracked detection on the
/// frame, announced or not.
pub trait OverlaySink: Send {
    fn render(&mut self, overlays: &[OverlayItem]) -> Result<()>;
}

/// Default sinks that narrate side effects into the log. Useful for
/// the demo binary and for running the pipeline headless.
pub struct LogSpeech;

impl SpeechSink for LogSpeech {
    fn speak(&mut self, text: &str) -> Result<()> {
        info!(speech = %text, "🔊 speaking");
        Ok(())
    }
}

pub struct LogHaptics;

impl HapticSink for LogHaptics {
    fn play(&mut self, pattern: HapticPattern) -> Result<()> {
        match pattern {
            HapticPattern::SinglePulse => info!("📳 haptic: single pulse"),
            HapticPattern::DoublePulse => info!("📳 haptic: double pulse"),
        }
        Ok(())
    }
}

pub struct LogOverlay;

impl OverlaySink for LogOverlay {
    fn render(&mut self, overlays: &[OverlayItem]) -> Result<()> {
        for item in overlays {
            info!(
                label = %item.label,
                confidence = format!("{:.0}%", item.confidence * 100.0),
                distance = %item.distance_text,
                near = item.near_range,
                "overlay"
            );
        }
        Ok(())
    }
}

/// Dispatch one frame's side effects, swallowing sink failures.
pub fn emit_outcome(
    outcome: &crate::pipeline::FrameOutcome,
    speech: &mut dyn SpeechSink,
    haptics: &mut dyn HapticSink,
    overlay: &mut dyn OverlaySink,
) {
    if let Err(e) = overlay.render(&outcome.overlays) {
        warn!("overlay render failed: {e:#}");
    }

    if let Some(action) = &outcome.announcement {
        if let Err(e) = speech.speak(&action.text) {
            // The speech collaborator still owes us a completion or
            // cancellation signal even when playback failed, otherwise
            // the gate stays closed forever.
            warn!("speech playback failed: {e:#}");
        }
        if let Err(e) = haptics.play(action.haptic) {
            warn!("haptic playback failed: {e:#}");
        }
    }
}
