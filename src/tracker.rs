// src/tracker.rs
//
// Label-keyed object tracker. Remembers where each recognized category
// was last seen and when it was last announced, and decides whether a
// fresh observation is "new enough" to be worth announcing.
//
// Identity is the label string: two simultaneous objects of the same
// class collapse into one tracked entry. That is the intended policy
// for this pipeline (one serial audio channel, category-level memory),
// not per-instance multi-object tracking.
//
// Entries are never evicted. The identifier space is bounded by the
// detector's fixed class vocabulary, so the map stays small for the
// lifetime of the process.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::geometry::{Rect, ScreenBounds};
use crate::types::TrackerConfig;

#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub bbox: Rect,
    pub last_seen: Instant,
    /// `None` until the first announcement actually fires — treated as
    /// infinitely far in the past by the cooldown check.
    pub last_announced: Option<Instant>,
}

pub struct ObjectTracker {
    config: TrackerConfig,
    /// Movement reference length, computed once from the display bounds.
    screen_diagonal: f32,
    /// Announce cooldown, sanitized once at construction.
    cooldown: Duration,
    objects: HashMap<String, TrackedObject>,
}

impl ObjectTracker {
    pub fn new(config: TrackerConfig, screen: ScreenBounds) -> Self {
        // Negative or NaN cooldowns from a hand-edited config collapse
        // to zero rather than panicking in Duration conversion;
        // overlong values saturate.
        let secs = config.announce_cooldown_secs;
        let cooldown = if secs.is_finite() && secs > 0.0 {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        Self {
            config,
            screen_diagonal: screen.diagonal(),
            cooldown,
            objects: HashMap::new(),
        }
    }

    /// Record one observation of `label` and report whether it is
    /// eligible for announcement this frame.
    ///
    /// Eligible = moved beyond the movement threshold OR the announce
    /// cooldown has elapsed (an OR, deliberately: a stationary object
    /// re-announces once the cooldown passes, and a moved object
    /// re-announces immediately). Position and last-seen time update
    /// unconditionally — tracking state is distinct from gating.
    pub fn update(&mut self, label: &str, bbox: Rect, now: Instant) -> bool {
        let threshold = self.screen_diagonal * self.config.movement_ratio;
        let cooldown = self.cooldown;

        let (moved, cooldown_elapsed) = match self.objects.get(label) {
            Some(previous) => {
                let moved = previous.bbox.center_distance(&bbox) > threshold;
                let elapsed = previous
                    .last_announced
                    .map_or(true, |t| now.saturating_duration_since(t) > cooldown);
                (moved, elapsed)
            }
            // First sighting: no prior position, treated as moved.
            None => (true, true),
        };

        let eligible = moved || cooldown_elapsed;
        debug!(
            label,
            moved, cooldown_elapsed, eligible, "tracker observation"
        );

        self.objects
            .entry(label.to_string())
            .and_modify(|obj| {
                obj.bbox = bbox;
                obj.last_seen = now;
            })
            .or_insert(TrackedObject {
                bbox,
                last_seen: now,
                last_announced: None,
            });

        eligible
    }

    /// Stamp the announcement time for exactly the label that was
    /// spoken. Idempotent for repeated calls with the same timestamp.
    pub fn record_announcement(&mut self, label: &str, now: Instant) {
        if let Some(obj) = self.objects.get_mut(label) {
            obj.last_announced = Some(now);
        }
    }

    pub fn get(&self, label: &str) -> Option<&TrackedObject> {
        self.objects.get(label)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 300×400 screen → diagonal 500, movement threshold 25 px.
    fn tracker() -> ObjectTracker {
        ObjectTracker::new(TrackerConfig::default(), ScreenBounds::new(300.0, 400.0))
    }

    fn rect_at(x: f32, y: f32) -> Rect {
        Rect::new(x, y, 50.0, 50.0)
    }

    #[test]
    fn test_first_sighting_always_eligible() {
        let mut t = tracker();
        assert!(t.update("chair", rect_at(10.0, 10.0), Instant::now()));
    }

    #[test]
    fn test_movement_beyond_threshold_is_eligible() {
        let mut t = tracker();
        let now = Instant::now();
        t.update("chair", rect_at(10.0, 10.0), now);
        t.record_announcement("chair", now);

        // Center moves 40 px > 25 px threshold — eligible regardless of
        // the cooldown just having started.
        let later = now + Duration::from_millis(100);
        assert!(t.update("chair", rect_at(50.0, 10.0), later));
    }

    #[test]
    fn test_cooldown_blocks_unmoved_object() {
        let mut t = tracker();
        let now = Instant::now();
        t.update("chair", rect_at(10.0, 10.0), now);
        t.record_announcement("chair", now);

        let later = now + Duration::from_secs(2);
        assert!(
            !t.update("chair", rect_at(12.0, 10.0), later),
            "2 px move within a 4 s cooldown must be ineligible"
        );
    }

    #[test]
    fn test_cooldown_elapsed_reenables_unmoved_object() {
        let mut t = tracker();
        let now = Instant::now();
        t.update("chair", rect_at(10.0, 10.0), now);
        t.record_announcement("chair", now);

        let later = now + Duration::from_secs(5);
        assert!(t.update("chair", rect_at(10.0, 10.0), later));
    }

    #[test]
    fn test_position_updates_even_when_ineligible() {
        let mut t = tracker();
        let now = Instant::now();
        t.update("chair", rect_at(10.0, 10.0), now);
        t.record_announcement("chair", now);

        let later = now + Duration::from_millis(50);
        t.update("chair", rect_at(12.0, 10.0), later);

        let obj = t.get("chair").unwrap();
        assert_eq!(obj.bbox.x, 12.0, "position must refresh unconditionally");
        assert_eq!(obj.last_seen, later);
    }

    #[test]
    fn test_record_announcement_idempotent() {
        let mut t = tracker();
        let now = Instant::now();
        t.update("chair", rect_at(10.0, 10.0), now);
        t.record_announcement("chair", now);
        t.record_announcement("chair", now);
        assert_eq!(t.get("chair").unwrap().last_announced, Some(now));
    }

    #[test]
    fn test_same_label_collapses_to_one_entry() {
        let mut t = tracker();
        let now = Instant::now();
        t.update("person", rect_at(10.0, 10.0), now);
        t.update("person", rect_at(200.0, 300.0), now);
        assert_eq!(t.len(), 1, "identity is the label, not the instance");
    }

    #[test]
    fn test_negative_cooldown_collapses_to_zero() {
        // A bad config value must not panic; it degrades to "no
        // cooldown", i.e. unmoved objects are always eligible.
        let config = TrackerConfig {
            movement_ratio: 0.05,
            announce_cooldown_secs: -4.0,
        };
        let mut t = ObjectTracker::new(config, ScreenBounds::new(300.0, 400.0));
        let now = Instant::now();
        t.update("chair", rect_at(10.0, 10.0), now);
        t.record_announcement("chair", now);
        assert!(t.update("chair", rect_at(10.0, 10.0), now + Duration::from_millis(1)));
    }

    #[test]
    fn test_nan_cooldown_collapses_to_zero() {
        let config = TrackerConfig {
            movement_ratio: 0.05,
            announce_cooldown_secs: f64::NAN,
        };
        let mut t = ObjectTracker::new(config, ScreenBounds::new(300.0, 400.0));
        assert!(t.update("chair", rect_at(10.0, 10.0), Instant::now()));
    }

    #[test]
    fn test_announcement_does_not_leak_across_labels() {
        let mut t = tracker();
        let now = Instant::now();
        t.update("chair", rect_at(10.0, 10.0), now);
        t.update("table", rect_at(100.0, 100.0), now);
        t.record_announcement("chair", now);
        assert!(t.get("table").unwrap().last_announced.is_none());
    }
}
