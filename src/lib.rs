// src/lib.rs
//
// Per-entity kinematic tracking and event-counting core.
//
// Consumes per-frame detector output (stable track id, 2D position,
// optional pose/hand keypoints, timestamp) and maintains the cross-frame
// state behind throughput and fitness counters:
//
//   Observations → TrackRegistry → FlickerFilter ─┬→ LineCrossingCounter
//                                                 ├→ SpeedEstimator
//                                                 └→ RepCounter / digit / posture
//
// Video capture, the detection/pose model, and rendering are external
// collaborators. One CounterSession per video source; the core performs
// no I/O and imposes no timing of its own.

mod config;
pub mod digit_counter;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod posture;
pub mod rep_counter;
pub mod session;
pub mod tracking;
pub mod types;

// Re-exports for ergonomic access from embedding applications
pub use digit_counter::{count_open_fingers, HAND_LANDMARKS};
pub use error::CounterError;
pub use metrics::{MetricsSummary, SessionMetrics};
pub use posture::{PostureReport, PostureStatus};
pub use rep_counter::{joint_angle, RepCounter, RepReport, RepStage};
pub use session::{CounterSession, CounterSnapshot};
pub use tracking::{FlickerFilter, LineCrossingCounter, SpeedEstimator, TrackRegistry, TrackState};
pub use types::{
    CrossingConfig, JointSpec, Keypoint, Observation, Point2D, PostureConfig, RepConfig,
    SessionConfig, Side, SpeedConfig, TrackingConfig,
};
