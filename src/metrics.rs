// src/metrics.rs
//
// Session observability. Plain counters: the core is single-threaded by
// contract, one writer per frame.

use std::time::Instant;

#[derive(Debug)]
pub struct SessionMetrics {
    pub frames: u64,
    pub observations: u64,
    pub rejected_observations: u64,
    pub tracks_created: u64,
    pub tracks_evicted: u64,
    pub confirmations: u64,
    pub crossings: u64,
    started_at: Instant,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            frames: 0,
            observations: 0,
            rejected_observations: 0,
            tracks_created: 0,
            tracks_evicted: 0,
            confirmations: 0,
            crossings: 0,
            started_at: Instant::now(),
        }
    }

    pub fn fps(&self) -> f64 {
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            self.frames as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            frames: self.frames,
            observations: self.observations,
            rejected_observations: self.rejected_observations,
            tracks_created: self.tracks_created,
            tracks_evicted: self.tracks_evicted,
            confirmations: self.confirmations,
            crossings: self.crossings,
            fps: self.fps(),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub frames: u64,
    pub observations: u64,
    pub rejected_observations: u64,
    pub tracks_created: u64,
    pub tracks_evicted: u64,
    pub confirmations: u64,
    pub crossings: u64,
    pub fps: f64,
    pub elapsed_secs: f64,
}
