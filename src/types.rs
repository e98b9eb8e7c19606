// src/types.rs

use serde::{Deserialize, Serialize};

// ============================================================================
// GEOMETRIC PRIMITIVES
// ============================================================================

/// 2D position. Normalized or pixel coordinates; the unit is
/// caller-defined but must stay consistent within a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One model landmark: position plus the detector's confidence in it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Keypoint {
    pub point: Point2D,
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self {
            point: Point2D::new(x, y),
            confidence,
        }
    }
}

/// Handedness label from the detector, for side-dependent decision rules
/// (the thumb rule mirrors with a front-facing camera).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

// ============================================================================
// PER-FRAME INPUT
// ============================================================================

/// One detected entity in one frame, as produced by the external
/// detector/tracker. Immutable once created.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Stable identity assigned by the upstream tracker
    pub track_id: u32,
    /// Representative position (e.g. bbox bottom-center for vehicles,
    /// wrist for hands)
    pub position: Point2D,
    /// Ordered model landmarks, when the upstream model is a pose/hand
    /// model. Absent keypoints are a representable state, not a fault.
    pub keypoints: Option<Vec<Keypoint>>,
    /// Handedness, when the entity is a hand
    pub side: Option<Side>,
    /// Monotonic seconds
    pub timestamp: f64,
}

impl Observation {
    pub fn new(track_id: u32, position: Point2D, timestamp: f64) -> Self {
        Self {
            track_id,
            position,
            keypoints: None,
            side: None,
            timestamp,
        }
    }

    pub fn with_keypoints(mut self, keypoints: Vec<Keypoint>) -> Self {
        self.keypoints = Some(keypoints);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// An observation with a non-finite position or timestamp is rejected
    /// wholesale at the session boundary.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.timestamp.is_finite()
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Full session configuration. Components are opt-in: a fitness session
/// enables `reps`, a throughput session enables `crossing`, a traffic
/// session enables `speed`. Loadable from YAML via `SessionConfig::load`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub tracking: TrackingConfig,
    pub crossing: Option<CrossingConfig>,
    pub speed: Option<SpeedConfig>,
    pub reps: RepConfig,
    pub posture: Option<PostureConfig>,
    /// Run the open-finger counter on confirmed hand observations
    /// (requires keypoints and a `Side` label on the observation).
    pub count_fingers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Total observations required before an identity is confirmed and
    /// becomes eligible for counting. 0 confirms on first sight; typical
    /// CCTV values are 5–60 depending on the detector's noise profile.
    pub min_hits: u32,
    /// Evict tracks not observed for this many frames. `None` reproduces
    /// the unbounded growth of the source scripts. Callers running on
    /// long streams should set this.
    pub max_unseen_frames: Option<u32>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_hits: 0,
            max_unseen_frames: None,
        }
    }
}

/// A horizontal counting line: an identity is counted once when its
/// position enters the band `line_y ± band`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossingConfig {
    pub line_y: f32,
    /// Band half-width in the same unit as positions
    pub band: f32,
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self {
            line_y: 0.0,
            band: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Calibration: how many image pixels span one real-world meter.
    /// Supplied by the caller; the core performs no auto-calibration.
    pub pixels_per_meter: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
        }
    }
}

/// Repetition counting over joint angles. Thresholds are shared across the
/// monitored joints; each joint gets its own independent state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepConfig {
    /// Angle above which the limb is considered extended (stage → Down)
    pub high_deg: f32,
    /// Angle below which a flexion completes the rep (Down → Up, count++)
    pub low_deg: f32,
    /// Optional rep goal; `RepReport::goal_reached` flips when reached
    pub target: Option<u32>,
    /// Monitored joint triples. Empty disables rep counting.
    pub joints: Vec<JointSpec>,
}

impl Default for RepConfig {
    fn default() -> Self {
        Self {
            high_deg: 160.0,
            low_deg: 30.0,
            target: None,
            joints: Vec::new(),
        }
    }
}

/// One monitored joint: three keypoint indices with the vertex in the
/// middle (e.g. shoulder–elbow–wrist for a curl).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointSpec {
    pub label: String,
    pub triple: [usize; 3],
}

/// Posture assessment over the ear–shoulder–hip angle. The side is chosen
/// per frame by whichever ear landmark the model is more confident about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Angles below this are reported as slouching
    pub warn_below_deg: f32,
    /// Left ear, shoulder, hip keypoint indices (COCO-17 by default)
    pub left_triple: [usize; 3],
    /// Right ear, shoulder, hip keypoint indices
    pub right_triple: [usize; 3],
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            warn_below_deg: 140.0,
            left_triple: [3, 5, 11],
            right_triple: [4, 6, 12],
        }
    }
}
