// src/tracking/flicker.rs
//
// Confirmation gate over raw tracker identities. Detector ID assignment is
// noisy frame to frame; requiring a minimum total observation count before
// an identity is treated as real suppresses transient false positives and
// ID churn. The trade-off is undercounting entities that leave the frame
// before reaching min_hits.

use tracing::debug;

use super::registry::TrackState;

#[derive(Debug, Clone, Copy)]
pub struct FlickerFilter {
    min_hits: u32,
}

impl FlickerFilter {
    pub fn new(min_hits: u32) -> Self {
        Self { min_hits }
    }

    /// Check (and latch) confirmation for one track. The flag is sticky:
    /// once a track is confirmed it stays confirmed for its lifetime, even
    /// if observation bookkeeping were later reset.
    pub fn confirm(&self, state: &mut TrackState) -> bool {
        if state.confirmed {
            return true;
        }
        if state.observation_count > self.min_hits {
            state.confirmed = true;
            debug!(
                "track {} confirmed after {} observations",
                state.track_id, state.observation_count
            );
            return true;
        }
        false
    }
}
