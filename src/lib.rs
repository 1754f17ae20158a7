// src/lib.rs
//
// Detection-to-announcement core for assistive scene narration: given
// raw object detections for one camera frame, track objects across
// frames, estimate physical distance (active depth or area heuristic),
// pick the single most salient candidate, and gate spoken/haptic
// announcements so they never overlap.

pub mod announcer;
pub mod config;
pub mod distance;
pub mod geometry;
pub mod output;
pub mod pipeline;
pub mod runtime;
pub mod selector;
pub mod tracker;
pub mod types;

pub use announcer::{AnnouncementAction, AnnouncementGate};
pub use distance::{Distance, DistanceEstimator};
pub use geometry::{NormalizedRect, Rect, ScreenBounds};
pub use pipeline::{FrameDetectionPipeline, FrameInput, FrameOutcome, PipelineMetrics};
pub use runtime::{PipelineCommand, PipelineHandle, PipelineRuntime};
pub use selector::{select_best, Candidate};
pub use tracker::{ObjectTracker, TrackedObject};
pub use types::{Config, DepthGrid, HapticPattern, OverlayItem, RawDetection};
