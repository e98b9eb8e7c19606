// src/error.rs
//
// Typed errors for caller/detector configuration mismatches. Per-frame
// degradation (NaN positions, stale timestamps, stationary jitter) is
// handled locally and never surfaces here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CounterError {
    /// A configured joint triple references a keypoint the current model
    /// does not provide: the requested body part is not tracked.
    #[error("keypoint index {index} out of range: model provides {available} keypoints")]
    KeypointOutOfRange { index: usize, available: usize },

    /// A landmark-consuming counter was handed too few landmarks
    /// (e.g. a hand model emitting fewer than the 21-point convention).
    #[error("insufficient landmarks: got {got}, need {need}")]
    InsufficientLandmarks { got: usize, need: usize },

    /// Hysteresis thresholds must satisfy `low < high`, otherwise the
    /// Down and Up bands overlap and every frame double-counts.
    #[error("invalid hysteresis thresholds: low {low}° must be below high {high}°")]
    InvalidThresholds { low: f32, high: f32 },

    /// The pixel-to-metric scale must be positive.
    #[error("invalid calibration: pixels_per_meter must be positive, got {pixels_per_meter}")]
    InvalidCalibration { pixels_per_meter: f32 },

    /// The crossing band half-width must be positive.
    #[error("invalid crossing band: half-width must be positive, got {band}")]
    InvalidBand { band: f32 },
}
