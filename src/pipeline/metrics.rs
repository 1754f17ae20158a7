// src/pipeline/metrics.rs
//
// Pipeline observability. Cheap atomic counters, cloneable across
// tasks, summarized into logs at shutdown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub frames_processed: Arc<AtomicU64>,
    pub detections_seen: Arc<AtomicU64>,
    pub detections_dropped: Arc<AtomicU64>,
    pub announcements_made: Arc<AtomicU64>,
    pub announcements_suppressed: Arc<AtomicU64>,
    pub depth_fallbacks: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            frames_processed: Arc::new(AtomicU64::new(0)),
            detections_seen: Arc::new(AtomicU64::new(0)),
            detections_dropped: Arc::new(AtomicU64::new(0)),
            announcements_made: Arc::new(AtomicU64::new(0)),
            announcements_suppressed: Arc::new(AtomicU64::new(0)),
            depth_fallbacks: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn fps(&self) -> f64 {
        let frames = self.frames_processed.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            frames as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            frames_processed: self.frames_processed.load(Ordering::Relaxed),
            detections_seen: self.detections_seen.load(Ordering::Relaxed),
            detections_dropped: self.detections_dropped.load(Ordering::Relaxed),
            announcements_made: self.announcements_made.load(Ordering::Relaxed),
            announcements_suppressed: self.announcements_suppressed.load(Ordering::Relaxed),
            depth_fallbacks: self.depth_fallbacks.load(Ordering::Relaxed),
            fps: self.fps(),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub frames_processed: u64,
    pub detections_seen: u64,
    pub detections_dropped: u64,
    pub announcements_made: u64,
    pub announcements_suppressed: u64,
    pub depth_fallbacks: u64,
    pub fps: f64,
    pub elapsed_secs: f64,
}
