// src/tracking/crossing.rs
//
// Unique-entity boundary counter. The boundary is a horizontal line with a
// band half-width around it; an identity is counted the first time its
// position lands strictly inside the band, and never again: the counted
// flag on the track is sticky, so the running total is monotonic.

use tracing::info;

use super::registry::TrackState;
use crate::types::CrossingConfig;

#[derive(Debug, Clone)]
pub struct LineCrossingCounter {
    line_y: f32,
    band: f32,
    total: u64,
}

impl LineCrossingCounter {
    pub fn new(config: &CrossingConfig) -> Self {
        Self {
            line_y: config.line_y,
            band: config.band,
            total: 0,
        }
    }

    /// Evaluate one confirmed track against the band. Returns true iff
    /// this call produced a new count. Unconfirmed tracks are never
    /// counted regardless of position.
    pub fn update(&mut self, state: &mut TrackState) -> bool {
        if !state.confirmed || state.counted {
            return false;
        }
        let y = state.last_position.y;
        if y > self.line_y - self.band && y < self.line_y + self.band {
            state.counted = true;
            self.total += 1;
            info!(
                "track {} crossed at y={:.1} (total {})",
                state.track_id, y, self.total
            );
            return true;
        }
        false
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}
