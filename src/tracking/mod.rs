// src/tracking/mod.rs
//
// Per-identity tracking pipeline modules.
//
// Signal flow:
//   Observation → registry (lifecycle state)
//               → flicker (confirmation gate)
//               → crossing (unique boundary counts)   [confirmed only]
//               → speed (smoothed km/h)               [confirmed only]
//
// Orchestrated per frame by session::CounterSession.

pub mod crossing;
pub mod flicker;
pub mod registry;
pub mod speed;

// Re-exports for ergonomic access from the session and embedders
pub use crossing::LineCrossingCounter;
pub use flicker::FlickerFilter;
pub use registry::{TrackRegistry, TrackState, TRAIL_CAPACITY};
pub use speed::SpeedEstimator;
