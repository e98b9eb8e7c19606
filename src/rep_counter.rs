// src/rep_counter.rs
//
// Angle-hysteresis repetition counter.
//
// Two thresholds, not one: the stage must first pass `high_deg` (limb
// extended, stage → Down) and then drop below `low_deg` (flexion complete,
// stage → Up, count++). Angle noise oscillating near a single threshold
// therefore cannot double-count: a full cycle must cross both bands in
// order.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::CounterError;
use crate::geometry;
use crate::types::{Keypoint, RepConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RepStage {
    /// No stage established yet (fresh session, or `high_deg` never crossed)
    None,
    /// Limb extended past `high_deg`; armed for a rep
    Down,
    /// Flexion completed below `low_deg`
    Up,
}

impl RepStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "-",
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

/// Per-frame rep state for one monitored joint.
#[derive(Debug, Clone, Serialize)]
pub struct RepReport {
    pub label: String,
    pub stage: RepStage,
    pub count: u32,
    pub goal_reached: bool,
}

/// One hysteresis state machine. Instantiate one per monitored joint
/// triple; states are independent.
#[derive(Debug, Clone)]
pub struct RepCounter {
    high_deg: f32,
    low_deg: f32,
    target: Option<u32>,
    stage: RepStage,
    count: u32,
}

impl RepCounter {
    pub fn new(config: &RepConfig) -> Self {
        Self {
            high_deg: config.high_deg,
            low_deg: config.low_deg,
            target: config.target,
            stage: RepStage::None,
            count: 0,
        }
    }

    /// Feed one frame's joint angle. Returns true iff this call completed
    /// a rep.
    pub fn update(&mut self, angle_deg: f32) -> bool {
        if angle_deg > self.high_deg {
            // Idempotent: staying extended keeps the stage armed
            if self.stage != RepStage::Down {
                debug!("stage → down at {:.1}°", angle_deg);
            }
            self.stage = RepStage::Down;
            return false;
        }
        if angle_deg < self.low_deg && self.stage == RepStage::Down {
            self.stage = RepStage::Up;
            self.count += 1;
            info!("rep {} completed at {:.1}°", self.count, angle_deg);
            if Some(self.count) == self.target {
                info!("rep target {} reached", self.count);
            }
            return true;
        }
        false
    }

    pub fn stage(&self) -> RepStage {
        self.stage
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn goal_reached(&self) -> bool {
        self.target.is_some_and(|t| self.count >= t)
    }

    pub fn report(&self, label: &str) -> RepReport {
        RepReport {
            label: label.to_string(),
            stage: self.stage,
            count: self.count,
            goal_reached: self.goal_reached(),
        }
    }
}

/// Angle at the middle keypoint of `triple`. Errs when the model provides
/// fewer keypoints than the triple references. That is a caller/detector
/// mismatch, not a per-frame glitch.
pub fn joint_angle(keypoints: &[Keypoint], triple: [usize; 3]) -> Result<f32, CounterError> {
    for index in triple {
        if index >= keypoints.len() {
            return Err(CounterError::KeypointOutOfRange {
                index,
                available: keypoints.len(),
            });
        }
    }
    Ok(geometry::angle(
        keypoints[triple[0]].point,
        keypoints[triple[1]].point,
        keypoints[triple[2]].point,
    ))
}
