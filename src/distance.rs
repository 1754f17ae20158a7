// src/distance.rs
//
// Physical distance estimation for a detected region.
//
// Two paths, one output format:
//   1. Active depth: average a 3×3 neighborhood of valid depth samples
//      under the box center, convert meters → feet.
//   2. Heuristic: infer distance from apparent size — an object filling
//      the whole frame is assumed ~0.5 ft away, inversely proportional
//      to its area ratio, clamped to a usable [1, 10] ft range.
//
// Downstream consumers compare and display the formatted text, so both
// paths must produce textually identical "<N> feet away" strings.

use crate::geometry::{Rect, ScreenBounds};
use crate::types::{DepthGrid, DistanceConfig};

const METERS_TO_FEET: f64 = 3.28084;

/// Radius of the square depth neighborhood sampled around the box
/// center (1 → 3×3 = 9 samples).
const DEPTH_NEIGHBORHOOD_RADIUS: i64 = 1;

/// A resolved distance estimate. Carries the integer feet value so
/// near-range checks stay numeric instead of string matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distance {
    pub feet: u32,
    pub from_depth: bool,
}

impl Distance {
    pub fn text(&self) -> String {
        format!("{} feet away", self.feet)
    }

    pub fn is_near_range(&self, near_range_feet: u32) -> bool {
        self.feet <= near_range_feet
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} feet away", self.feet)
    }
}

pub struct DistanceEstimator {
    config: DistanceConfig,
    screen: ScreenBounds,
}

impl DistanceEstimator {
    pub fn new(config: DistanceConfig, screen: ScreenBounds) -> Self {
        Self { config, screen }
    }

    /// Estimate the physical distance to `bbox` (screen coordinates).
    /// Falls through to the area heuristic when no depth grid is
    /// supplied or the neighborhood holds zero valid samples.
    pub fn estimate(&self, bbox: &Rect, depth: Option<&DepthGrid>) -> Distance {
        if let Some(grid) = depth {
            if let Some(meters) = self.sample_depth(bbox, grid) {
                // Floor at the heuristic's minimum so the two paths
                // agree on the lowest distance they can report.
                let feet = (meters * METERS_TO_FEET)
                    .round()
                    .max(self.config.min_feet) as u32;
                return Distance {
                    feet,
                    from_depth: true,
                };
            }
        }
        self.heuristic(bbox)
    }

    /// Average the valid samples in a fixed 3×3 neighborhood around the
    /// box center, mapped into depth-pixel coordinates and clamped to
    /// the grid. Returns `None` when every sample is invalid.
    fn sample_depth(&self, bbox: &Rect, grid: &DepthGrid) -> Option<f64> {
        let (cx, cy) = bbox.center();
        let px = (cx / self.screen.width * grid.width() as f32) as i64;
        let py = (cy / self.screen.height * grid.height() as f32) as i64;

        let mut sum = 0.0f64;
        let mut count = 0u32;
        for dy in -DEPTH_NEIGHBORHOOD_RADIUS..=DEPTH_NEIGHBORHOOD_RADIUS {
            for dx in -DEPTH_NEIGHBORHOOD_RADIUS..=DEPTH_NEIGHBORHOOD_RADIUS {
                let x = (px + dx).clamp(0, grid.width() as i64 - 1) as usize;
                let y = (py + dy).clamp(0, grid.height() as i64 - 1) as usize;
                if let Some(sample) = grid.get(x, y) {
                    if DepthGrid::is_valid_sample(sample) {
                        sum += sample as f64;
                        count += 1;
                    }
                }
            }
        }

        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    fn heuristic(&self, bbox: &Rect) -> Distance {
        // Divide the areas in f64 with the box area as the divisor.
        // Forming an f32 area ratio first perturbs exact boundaries: a
        // box covering a fifth of the frame becomes ratio 0.20000000298
        // and 0.5 / ratio lands just under 2.5, rounding to 2 instead
        // of 3.
        let feet = (self.config.full_frame_feet * self.screen.area() as f64
            / bbox.area() as f64)
            .clamp(self.config.min_feet, self.config.max_feet);
        Distance {
            feet: feet.round() as u32,
            from_depth: false,
        }
    }
}
