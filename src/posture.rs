// src/posture.rs
//
// Per-frame posture assessment from body keypoints: the ear–shoulder–hip
// angle straightens toward 180° when sitting upright and collapses as the
// head drifts forward. The body side is picked per frame by whichever ear
// landmark the model is more confident about, since a webcam usually sees
// one side clearly.

use serde::Serialize;

use crate::error::CounterError;
use crate::geometry;
use crate::types::{Keypoint, PostureConfig, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostureStatus {
    Good,
    Slouching,
}

impl PostureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Slouching => "SLOUCHING",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PostureReport {
    /// Which body side the assessment used
    pub side: Side,
    pub angle_deg: f32,
    pub status: PostureStatus,
}

/// Assess posture for one frame. Stateless, recomputed from raw geometry
/// every call.
pub fn assess(keypoints: &[Keypoint], config: &PostureConfig) -> Result<PostureReport, CounterError> {
    for index in config.left_triple.iter().chain(config.right_triple.iter()) {
        if *index >= keypoints.len() {
            return Err(CounterError::KeypointOutOfRange {
                index: *index,
                available: keypoints.len(),
            });
        }
    }

    // Ear confidence decides which profile the camera actually sees
    let left_ear = keypoints[config.left_triple[0]];
    let right_ear = keypoints[config.right_triple[0]];
    let (side, triple) = if left_ear.confidence > right_ear.confidence {
        (Side::Left, config.left_triple)
    } else {
        (Side::Right, config.right_triple)
    };

    let angle_deg = geometry::angle(
        keypoints[triple[0]].point,
        keypoints[triple[1]].point,
        keypoints[triple[2]].point,
    );
    let status = if angle_deg < config.warn_below_deg {
        PostureStatus::Slouching
    } else {
        PostureStatus::Good
    };

    Ok(PostureReport {
        side,
        angle_deg,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// COCO-17 skeleton with every landmark parked at the origin.
    fn body() -> Vec<Keypoint> {
        vec![Keypoint::new(0.0, 0.0, 0.1); 17]
    }

    fn set(body: &mut [Keypoint], index: usize, x: f32, y: f32, confidence: f32) {
        body[index] = Keypoint::new(x, y, confidence);
    }

    #[test]
    fn test_upright_reads_good() {
        let mut kps = body();
        set(&mut kps, 3, 0.5, 0.2, 0.9); // left ear
        set(&mut kps, 5, 0.5, 0.5, 0.9); // left shoulder
        set(&mut kps, 11, 0.5, 0.9, 0.9); // left hip
        let report = assess(&kps, &PostureConfig::default()).unwrap();
        assert_eq!(report.side, Side::Left);
        assert_eq!(report.status, PostureStatus::Good);
        assert!((report.angle_deg - 180.0).abs() < 1.0);
    }

    #[test]
    fn test_forward_head_reads_slouching() {
        let mut kps = body();
        set(&mut kps, 3, 0.8, 0.45, 0.9); // ear drifted forward
        set(&mut kps, 5, 0.5, 0.5, 0.9);
        set(&mut kps, 11, 0.5, 0.9, 0.9);
        let report = assess(&kps, &PostureConfig::default()).unwrap();
        assert_eq!(report.status, PostureStatus::Slouching);
        assert!(report.angle_deg < 140.0);
    }

    #[test]
    fn test_more_confident_ear_wins() {
        let mut kps = body();
        // Right side well-placed and confident, left side garbage
        set(&mut kps, 3, 0.0, 0.0, 0.2);
        set(&mut kps, 4, 0.5, 0.2, 0.95); // right ear
        set(&mut kps, 6, 0.5, 0.5, 0.9); // right shoulder
        set(&mut kps, 12, 0.5, 0.9, 0.9); // right hip
        let report = assess(&kps, &PostureConfig::default()).unwrap();
        assert_eq!(report.side, Side::Right);
        assert_eq!(report.status, PostureStatus::Good);
    }

    #[test]
    fn test_short_skeleton_rejected() {
        let kps = vec![Keypoint::new(0.0, 0.0, 0.9); 8];
        assert!(matches!(
            assess(&kps, &PostureConfig::default()),
            Err(CounterError::KeypointOutOfRange { .. })
        ));
    }
}
