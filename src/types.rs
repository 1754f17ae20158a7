use serde::{Deserialize, Serialize};

use crate::geometry::{NormalizedRect, Rect};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub display: DisplayConfig,
    pub detection: DetectionConfig,
    pub tracker: TrackerConfig,
    pub distance: DistanceConfig,
    pub logging: LoggingConfig,
}

/// Display bounds the normalized detector boxes are projected into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            screen_width: 390.0,
            screen_height: 844.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Detections below this confidence are dropped at the pipeline edge.
    pub confidence_threshold: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Movement threshold as a fraction of the screen diagonal.
    pub movement_ratio: f32,
    /// Seconds an identifier must wait after an announcement before it
    /// may announce again without having moved.
    pub announce_cooldown_secs: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            movement_ratio: 0.05,
            announce_cooldown_secs: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceConfig {
    /// Assumed distance (feet) of an object filling the whole frame.
    pub full_frame_feet: f64,
    /// Clamp range for the area heuristic, in feet.
    pub min_feet: f64,
    pub max_feet: f64,
    /// Distances at or under this many feet are flagged near-range.
    pub near_range_feet: u32,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            full_frame_feet: 0.5,
            min_feet: 1.0,
            max_feet: 10.0,
            near_range_feet: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// One labeled region from the detector collaborator. Frame-scoped,
/// never persisted.
#[derive(Debug, Clone)]
pub struct RawDetection {
    pub label: String,
    pub confidence: f32,
    pub bbox: NormalizedRect,
}

/// Per-frame depth map from the active depth sensor, row-major meters.
/// Absence of depth is a normal condition, not an error.
#[derive(Debug, Clone)]
pub struct DepthGrid {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl DepthGrid {
    /// Returns `None` when the buffer size does not match the claimed
    /// dimensions.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// A depth sample is usable when it is finite and strictly positive.
    pub fn is_valid_sample(value: f32) -> bool {
        value.is_finite() && value > 0.0
    }
}

/// Overlay tuple handed to the display collaborator for every tracked
/// detection on the frame, announced or not.
#[derive(Debug, Clone)]
pub struct OverlayItem {
    pub label: String,
    pub confidence: f32,
    pub distance_text: String,
    pub bbox: Rect,
    pub near_range: bool,
}

/// Haptic pattern selector for the haptic collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    SinglePulse,
    DoublePulse,
}
