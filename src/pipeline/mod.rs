// src/pipeline/mod.rs
//
// Per-frame orchestration: raw detections in, overlay tuples and at
// most one gated announcement out.
//
// Strict order per frame:
//   1. Project normalized detector boxes into screen space (vertical
//      flip) and drop anything with unusable geometry, an empty label,
//      or a bad confidence.
//   2. Tracker update for every surviving detection — eligible ones
//      become candidates. Tracking state refreshes regardless.
//   3. Distance estimate for every surviving detection (the display
//      collaborator wants all of them, not just the winner).
//   4. Max-area selection over the eligible candidates.
//   5. Announcement gate. A frame with zero detections is a no-op.

pub mod metrics;

pub use metrics::{MetricsSummary, PipelineMetrics};

use std::time::Instant;
use tracing::debug;

use crate::announcer::{AnnouncementAction, AnnouncementGate};
use crate::distance::DistanceEstimator;
use crate::geometry::ScreenBounds;
use crate::selector::{select_best, Candidate};
use crate::tracker::ObjectTracker;
use crate::types::{Config, DepthGrid, OverlayItem, RawDetection};

/// Everything the collaborators delivered for one captured frame.
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub detections: Vec<RawDetection>,
    /// Depth is optional — older hardware simply never supplies it.
    pub depth: Option<DepthGrid>,
}

/// What one pipeline pass produced: overlay tuples for every tracked
/// detection, and at most one announcement side effect.
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    pub overlays: Vec<OverlayItem>,
    pub announcement: Option<AnnouncementAction>,
}

pub struct FrameDetectionPipeline {
    config: Config,
    screen: ScreenBounds,
    tracker: ObjectTracker,
    estimator: DistanceEstimator,
    gate: AnnouncementGate,
    metrics: PipelineMetrics,
}

impl FrameDetectionPipeline {
    pub fn new(config: Config) -> Self {
        let screen = ScreenBounds::new(config.display.screen_width, config.display.screen_height);
        let tracker = ObjectTracker::new(config.tracker.clone(), screen);
        let estimator = DistanceEstimator::new(config.distance.clone(), screen);
        Self {
            config,
            screen,
            tracker,
            estimator,
            gate: AnnouncementGate::new(),
            metrics: PipelineMetrics::new(),
        }
    }

    /// Run one frame through the pipeline. `now` is the observation
    /// timestamp for tracker and gate decisions.
    pub fn process_frame(&mut self, frame: FrameInput, now: Instant) -> FrameOutcome {
        self.metrics.inc(&self.metrics.frames_processed);
        self.metrics
            .add(&self.metrics.detections_seen, frame.detections.len() as u64);

        let mut outcome = FrameOutcome::default();
        let mut candidates: Vec<Candidate> = Vec::with_capacity(frame.detections.len());
        let depth = frame.depth.as_ref();

        for detection in &frame.detections {
            let bbox = detection
                .bbox
                .to_screen(self.screen.width, self.screen.height);

            if detection.label.is_empty()
                || !detection.confidence.is_finite()
                || detection.confidence < self.config.detection.confidence_threshold
                || !bbox.is_valid()
            {
                self.metrics.inc(&self.metrics.detections_dropped);
                debug!(label = %detection.label, "dropping unusable detection");
                continue;
            }

            let eligible = self.tracker.update(&detection.label, bbox, now);

            let distance = self.estimator.estimate(&bbox, depth);
            if depth.is_some() && !distance.from_depth {
                self.metrics.inc(&self.metrics.depth_fallbacks);
            }

            outcome.overlays.push(OverlayItem {
                label: detection.label.clone(),
                confidence: detection.confidence,
                distance_text: distance.text(),
                bbox,
                near_range: distance.is_near_range(self.config.distance.near_range_feet),
            });

            if eligible {
                candidates.push(Candidate {
                    label: detection.label.clone(),
                    confidence: detection.confidence,
                    bbox,
                    area: bbox.area(),
                    distance,
                });
            }
        }

        if let Some(best) = select_best(&candidates) {
            match self.gate.try_announce(best, now) {
                Some(action) => {
                    self.tracker.record_announcement(&action.label, now);
                    self.metrics.inc(&self.metrics.announcements_made);
                    outcome.announcement = Some(action);
                }
                None => {
                    self.metrics.inc(&self.metrics.announcements_suppressed);
                }
            }
        }

        outcome
    }

    /// Completion signal from the speech collaborator.
    pub fn speech_finished(&mut self) {
        self.gate.speech_finished();
    }

    /// Cancellation signal from the speech collaborator.
    pub fn speech_cancelled(&mut self) {
        self.gate.speech_cancelled();
    }

    pub fn is_speaking(&self) -> bool {
        self.gate.is_speaking()
    }

    pub fn tracker(&self) -> &ObjectTracker {
        &self.tracker
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }
}
