// src/tracking/speed.rs
//
// Smoothed instantaneous speed per track: Euclidean pixel distance over
// elapsed time, converted through the caller's pixel-to-meter calibration,
// then exponentially smoothed with fixed weights. The EMA trades
// responsiveness for stability against per-frame jitter in both detection
// position and timing.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

use crate::geometry;
use crate::types::{Point2D, SpeedConfig};

/// Movements at or below this many pixels are stationary jitter; the
/// previous smoothed speed is kept.
const NOISE_FLOOR_PX: f32 = 2.0;

/// EMA weights: `smoothed = 0.8 * prev + 0.2 * raw`.
const EMA_PREV_WEIGHT: f32 = 0.8;
const EMA_RAW_WEIGHT: f32 = 0.2;

const MPS_TO_KMH: f64 = 3.6;

#[derive(Debug, Clone, Copy)]
struct SpeedTrack {
    position: Point2D,
    timestamp: f64,
    smoothed_kmh: f32,
}

#[derive(Debug)]
pub struct SpeedEstimator {
    pixels_per_meter: f32,
    tracks: HashMap<u32, SpeedTrack>,
}

impl SpeedEstimator {
    pub fn new(config: &SpeedConfig) -> Self {
        Self {
            pixels_per_meter: config.pixels_per_meter,
            tracks: HashMap::new(),
        }
    }

    /// Feed one confirmed observation. Returns the smoothed speed in km/h
    /// (0.0 until the track has a second sample). Non-monotonic or
    /// duplicate timestamps keep the previous smoothed value.
    pub fn update(&mut self, track_id: u32, position: Point2D, timestamp: f64) -> f32 {
        let track = match self.tracks.entry(track_id) {
            Entry::Vacant(entry) => {
                entry.insert(SpeedTrack {
                    position,
                    timestamp,
                    smoothed_kmh: 0.0,
                });
                return 0.0;
            }
            Entry::Occupied(entry) => entry.into_mut(),
        };

        let pixel_dist = geometry::distance(track.position, position);
        let mut smoothed = track.smoothed_kmh;

        if pixel_dist > NOISE_FLOOR_PX {
            let dt = timestamp - track.timestamp;
            if dt > 0.0 {
                let meters = f64::from(pixel_dist / self.pixels_per_meter);
                let raw_kmh = (meters / dt * MPS_TO_KMH) as f32;
                smoothed = EMA_PREV_WEIGHT * track.smoothed_kmh + EMA_RAW_WEIGHT * raw_kmh;
            } else {
                debug!(
                    "track {}: non-monotonic timestamp ({:.3} after {:.3}), keeping speed",
                    track_id, timestamp, track.timestamp
                );
            }
        }

        track.position = position;
        track.timestamp = timestamp;
        track.smoothed_kmh = smoothed;
        smoothed
    }

    pub fn speed_of(&self, track_id: u32) -> Option<f32> {
        self.tracks.get(&track_id).map(|t| t.smoothed_kmh)
    }

    /// Current smoothed speed per track.
    pub fn speeds(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.tracks.iter().map(|(id, t)| (*id, t.smoothed_kmh))
    }

    /// Forget a track's estimator state (used on eviction).
    pub fn remove(&mut self, track_id: u32) {
        self.tracks.remove(&track_id);
    }
}
