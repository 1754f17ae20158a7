// src/runtime.rs
//
// Single-owner execution model for the pipeline.
//
// The tracker map and the speaking state are one critical section: if
// two frames processed back-to-back could both observe the gate idle,
// both would speak. Instead of sharing the pipeline behind a mutex, a
// single tokio task owns it outright and consumes commands from an
// mpsc channel — frame deliveries from the capture callback and
// completion signals from the speech collaborator are serialized by
// construction. Depth grids travel inside the frame command, so
// sampling never races buffer reuse on the capture side.
//
// Frames that arrive faster than they are processed queue in the
// channel; a stale in-flight frame still applies its (slightly
// outdated) tracker update — last-writer-wins, tracking is advisory.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::output::{emit_outcome, HapticSink, OverlaySink, SpeechSink};
use crate::pipeline::{FrameDetectionPipeline, FrameInput, MetricsSummary, PipelineMetrics};
use crate::types::Config;

const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Commands accepted by the pipeline task. Everything that touches
/// pipeline state goes through here.
#[derive(Debug)]
pub enum PipelineCommand {
    Frame(FrameInput),
    SpeechFinished,
    SpeechCancelled,
    Shutdown,
}

/// Cloneable handle for producers: the capture callback sends frames,
/// the speech collaborator sends completion signals.
#[derive(Clone)]
pub struct PipelineHandle {
    tx: mpsc::Sender<PipelineCommand>,
}

impl PipelineHandle {
    /// Deliver one frame. Awaits channel capacity, keeping backpressure
    /// on the producer instead of growing an unbounded backlog.
    pub async fn submit_frame(&self, frame: FrameInput) -> bool {
        self.tx.send(PipelineCommand::Frame(frame)).await.is_ok()
    }

    pub async fn speech_finished(&self) -> bool {
        self.tx.send(PipelineCommand::SpeechFinished).await.is_ok()
    }

    pub async fn speech_cancelled(&self) -> bool {
        self.tx.send(PipelineCommand::SpeechCancelled).await.is_ok()
    }

    pub async fn shutdown(&self) {
        let _ = self.tx.send(PipelineCommand::Shutdown).await;
    }
}

pub struct PipelineRuntime {
    handle: PipelineHandle,
    metrics: PipelineMetrics,
    task: JoinHandle<MetricsSummary>,
}

impl PipelineRuntime {
    /// Spawn the owning task. The sinks move into the task with the
    /// pipeline; side effects are emitted from there, already
    /// serialized.
    pub fn spawn(
        config: Config,
        mut speech: Box<dyn SpeechSink>,
        mut haptics: Box<dyn HapticSink>,
        mut overlay: Box<dyn OverlaySink>,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let mut pipeline = FrameDetectionPipeline::new(config);
        let metrics = pipeline.metrics().clone();

        let task = tokio::spawn(async move {
            info!("pipeline task started");
            while let Some(command) = rx.recv().await {
                match command {
                    PipelineCommand::Frame(frame) => {
                        let outcome = pipeline.process_frame(frame, std::time::Instant::now());
                        emit_outcome(&outcome, &mut *speech, &mut *haptics, &mut *overlay);
                    }
                    PipelineCommand::SpeechFinished => pipeline.speech_finished(),
                    PipelineCommand::SpeechCancelled => pipeline.speech_cancelled(),
                    PipelineCommand::Shutdown => break,
                }
            }
            if pipeline.is_speaking() {
                warn!("shutting down while an announcement was still in flight");
            }
            let summary = pipeline.metrics().summary();
            debug!(?summary, "pipeline task exiting");
            summary
        });

        Self {
            handle: PipelineHandle { tx },
            metrics,
            task,
        }
    }

    pub fn handle(&self) -> PipelineHandle {
        self.handle.clone()
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Shut the task down and collect the final metrics summary.
    pub async fn join(self) -> MetricsSummary {
        self.handle.shutdown().await;
        self.task.await.unwrap_or_else(|e| {
            warn!("pipeline task panicked: {e}");
            PipelineMetrics::new().summary()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NormalizedRect;
    use crate::output::{LogHaptics, LogOverlay};
    use crate::types::{HapticPattern, RawDetection};
    use std::sync::{Arc, Mutex};

    /// Speech sink that records utterances for assertions.
    struct RecordingSpeech {
        spoken: Arc<Mutex<Vec<String>>>,
    }

    impl SpeechSink for RecordingSpeech {
        fn speak(&mut self, text: &str) -> anyhow::Result<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// Haptic sink that always fails, to prove failures are swallowed.
    struct BrokenHaptics;

    impl HapticSink for BrokenHaptics {
        fn play(&mut self, _pattern: HapticPattern) -> anyhow::Result<()> {
            anyhow::bail!("haptic engine not started")
        }
    }

    fn frame(label: &str, ratio: f32) -> FrameInput {
        let side = ratio.sqrt();
        FrameInput {
            detections: vec![RawDetection {
                label: label.to_string(),
                confidence: 0.9,
                bbox: NormalizedRect::new(0.1, 0.1, side, side),
            }],
            depth: None,
        }
    }

    #[tokio::test]
    async fn test_commands_serialize_frames_and_completions() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let runtime = PipelineRuntime::spawn(
            Config::default(),
            Box::new(RecordingSpeech {
                spoken: spoken.clone(),
            }),
            Box::new(LogHaptics),
            Box::new(LogOverlay),
        );
        let handle = runtime.handle();

        // Two back-to-back frames: only the first may speak, because the
        // completion signal arrives after both.
        assert!(handle.submit_frame(frame("chair", 0.2)).await);
        assert!(handle.submit_frame(frame("person", 0.3)).await);
        assert!(handle.speech_finished().await);
        assert!(handle.submit_frame(frame("person", 0.3)).await);

        let summary = runtime.join().await;

        let spoken = spoken.lock().unwrap();
        assert_eq!(spoken.len(), 2);
        assert!(spoken[0].starts_with("Detected chair"));
        assert!(spoken[1].starts_with("Detected person"));
        assert_eq!(summary.frames_processed, 3);
        assert_eq!(summary.announcements_made, 2);
        assert_eq!(summary.announcements_suppressed, 1);
    }

    #[tokio::test]
    async fn test_haptic_failure_does_not_stall_pipeline() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let runtime = PipelineRuntime::spawn(
            Config::default(),
            Box::new(RecordingSpeech {
                spoken: spoken.clone(),
            }),
            Box::new(BrokenHaptics),
            Box::new(LogOverlay),
        );
        let handle = runtime.handle();

        handle.submit_frame(frame("person", 0.2)).await;
        handle.speech_finished().await;
        handle.submit_frame(frame("dog", 0.2)).await;

        let summary = runtime.join().await;
        assert_eq!(
            summary.announcements_made, 2,
            "a broken haptic engine must not block announcements"
        );
        assert_eq!(spoken.lock().unwrap().len(), 2);
    }
}
