// src/digit_counter.rs
//
// Stateless open-finger counter over one hand's 21 landmarks.
//
// Image-space convention: the Y axis points down, so a fingertip "above"
// its PIP joint has the numerically smaller y. The thumb moves laterally
// instead, and its open/closed rule mirrors with handedness under a
// front-facing (selfie) camera.

use crate::error::CounterError;
use crate::types::{Keypoint, Side};

/// Landmarks per hand in the standard hand-skeleton convention.
pub const HAND_LANDMARKS: usize = 21;

/// Fingertip indices: thumb, index, middle, ring, pinky.
const TIP_IDS: [usize; 5] = [4, 8, 12, 16, 20];

/// The thumb's comparison joint (IP, directly below the tip).
const THUMB_IP: usize = 3;

/// Count open digits on one hand. Recomputed from raw geometry every
/// call: no cross-frame memory, no hysteresis. Callers with several hands in
/// frame invoke this once per hand.
pub fn count_open_fingers(landmarks: &[Keypoint], side: Side) -> Result<u8, CounterError> {
    if landmarks.len() < HAND_LANDMARKS {
        return Err(CounterError::InsufficientLandmarks {
            got: landmarks.len(),
            need: HAND_LANDMARKS,
        });
    }

    let mut count = 0u8;

    // Four non-thumb digits: tip above the PIP joint (two indices below)
    for tip in &TIP_IDS[1..] {
        if landmarks[*tip].point.y < landmarks[tip - 2].point.y {
            count += 1;
        }
    }

    // Thumb: horizontal axis, direction flipped by handedness
    let thumb_tip_x = landmarks[TIP_IDS[0]].point.x;
    let thumb_ip_x = landmarks[THUMB_IP].point.x;
    let thumb_open = match side {
        Side::Left => thumb_tip_x > thumb_ip_x,
        Side::Right => thumb_tip_x < thumb_ip_x,
    };
    if thumb_open {
        count += 1;
    }

    Ok(count)
}
