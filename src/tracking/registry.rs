// src/tracking/registry.rs
//
// Owns every identity's lifecycle state. One entry per track_id; entries
// are created on first sight and mutated only through update(). Without an
// eviction limit the map grows for the whole session. The source scripts
// behaved the same way, so bounded memory is an explicit opt-in.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use crate::types::{Observation, Point2D};

/// Recent confirmed positions kept per track for path overlays.
pub const TRAIL_CAPACITY: usize = 40;

/// Lifecycle state for one identity. Owned exclusively by the registry;
/// callers read it through references and never hold a copy across frames.
#[derive(Debug, Clone)]
pub struct TrackState {
    pub track_id: u32,
    pub first_seen_frame: u64,
    pub last_seen_frame: u64,
    pub observation_count: u32,
    pub last_position: Point2D,
    pub last_timestamp: f64,
    pub smoothed_speed: f32,
    /// Sticky: set once by the flicker filter, never reverts
    pub confirmed: bool,
    /// Sticky: set once by the crossing counter, never reverts
    pub counted: bool,
    /// Ring of recent positions, populated only once confirmed
    pub trail: VecDeque<Point2D>,
}

impl TrackState {
    fn new(obs: &Observation, frame_id: u64) -> Self {
        Self {
            track_id: obs.track_id,
            first_seen_frame: frame_id,
            last_seen_frame: frame_id,
            observation_count: 1,
            last_position: obs.position,
            last_timestamp: obs.timestamp,
            smoothed_speed: 0.0,
            confirmed: false,
            counted: false,
            trail: VecDeque::with_capacity(TRAIL_CAPACITY),
        }
    }

    fn refresh(&mut self, obs: &Observation, frame_id: u64) {
        self.observation_count += 1;
        self.last_seen_frame = frame_id;
        self.last_position = obs.position;
        self.last_timestamp = obs.timestamp;
        if self.confirmed {
            if self.trail.len() == TRAIL_CAPACITY {
                self.trail.pop_front();
            }
            self.trail.push_back(obs.position);
        }
    }

    /// Frames since this track was last observed.
    pub fn frames_unseen(&self, current_frame: u64) -> u64 {
        current_frame.saturating_sub(self.last_seen_frame)
    }
}

#[derive(Debug, Default)]
pub struct TrackRegistry {
    tracks: HashMap<u32, TrackState>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or refresh the state for one observation. Returns the mutated
    /// state and whether this call created it.
    pub fn update(&mut self, obs: &Observation, frame_id: u64) -> (&mut TrackState, bool) {
        match self.tracks.entry(obs.track_id) {
            Entry::Occupied(entry) => {
                let state = entry.into_mut();
                state.refresh(obs, frame_id);
                (state, false)
            }
            Entry::Vacant(entry) => {
                debug!("new track {} at frame {}", obs.track_id, frame_id);
                (entry.insert(TrackState::new(obs, frame_id)), true)
            }
        }
    }

    pub fn get(&self, track_id: u32) -> Option<&TrackState> {
        self.tracks.get(&track_id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn confirmed_count(&self) -> usize {
        self.tracks.values().filter(|t| t.confirmed).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackState> {
        self.tracks.values()
    }

    /// Drop every track unseen for more than `max_unseen_frames`. Returns
    /// the evicted ids so the caller can clear per-track state elsewhere
    /// (e.g. the speed estimator). Crossing and rep totals are scalars and
    /// are unaffected.
    pub fn evict_stale(&mut self, current_frame: u64, max_unseen_frames: u32) -> Vec<u32> {
        let mut evicted = Vec::new();
        self.tracks.retain(|id, state| {
            if state.frames_unseen(current_frame) > u64::from(max_unseen_frames) {
                debug!(
                    "evicting track {} (unseen for {} frames)",
                    id,
                    state.frames_unseen(current_frame)
                );
                evicted.push(*id);
                false
            } else {
                true
            }
        });
        evicted
    }
}
