// src/session.rs
//
// One CounterSession per video source. Owns every piece of mutable
// counting state (registry, confirmation gate, crossing counter, speed
// estimator, rep state machines, metrics) with lifecycle
// create → process_frame* → read. Nothing is process-wide; concurrent
// sources use independent sessions.
//
// Per-frame flow:
//   Observation → registry.update → flicker.confirm ─┬→ crossing.update
//                                                    ├→ speed.update
//                                                    └→ rep / digit / posture (keypoints)

use std::collections::{HashMap, VecDeque};
use serde::Serialize;
use tracing::warn;

use crate::digit_counter;
use crate::error::CounterError;
use crate::metrics::SessionMetrics;
use crate::posture::{self, PostureReport};
use crate::rep_counter::{self, RepCounter, RepReport};
use crate::tracking::{FlickerFilter, LineCrossingCounter, SpeedEstimator, TrackRegistry, TrackState};
use crate::types::{JointSpec, Observation, Point2D, SessionConfig};

/// Per-frame aggregate of whichever counters are active, emitted once per
/// `process_frame` call for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct CounterSnapshot {
    pub frame_id: u64,
    /// One entry per monitored joint, in configuration order
    pub reps: Vec<RepReport>,
    /// Open-finger count of the hand evaluated this frame, if any.
    /// Sessions with several hands in frame call
    /// `digit_counter::count_open_fingers` per hand instead.
    pub digit_count: Option<u8>,
    pub posture: Option<PostureReport>,
    pub unique_crossings: u64,
    pub confirmed_tracks: usize,
    /// Smoothed km/h per confirmed track
    pub speeds_kmh: HashMap<u32, f32>,
}

#[derive(Debug)]
struct RepStream {
    spec: JointSpec,
    counter: RepCounter,
}

pub struct CounterSession {
    config: SessionConfig,
    registry: TrackRegistry,
    flicker: FlickerFilter,
    crossing: Option<LineCrossingCounter>,
    speed: Option<SpeedEstimator>,
    reps: Vec<RepStream>,
    metrics: SessionMetrics,
    frame_id: u64,
}

impl CounterSession {
    pub fn new(config: SessionConfig) -> Result<Self, CounterError> {
        config.validate()?;
        let reps = config
            .reps
            .joints
            .iter()
            .map(|spec| RepStream {
                spec: spec.clone(),
                counter: RepCounter::new(&config.reps),
            })
            .collect();
        Ok(Self {
            flicker: FlickerFilter::new(config.tracking.min_hits),
            crossing: config.crossing.as_ref().map(LineCrossingCounter::new),
            speed: config.speed.as_ref().map(SpeedEstimator::new),
            registry: TrackRegistry::new(),
            metrics: SessionMetrics::new(),
            frame_id: 0,
            reps,
            config,
        })
    }

    /// Consume one frame's observations and emit the aggregate snapshot.
    ///
    /// Malformed observations (non-finite position/timestamp) are skipped
    /// with a warning. An `Err` here always means a caller/detector
    /// configuration mismatch (a joint triple or landmark convention the
    /// current model does not provide), and the frame may be partially
    /// applied when it surfaces.
    pub fn process_frame(
        &mut self,
        observations: &[Observation],
    ) -> Result<CounterSnapshot, CounterError> {
        self.frame_id += 1;
        self.metrics.frames += 1;

        let mut digit_count = None;
        let mut posture_report = None;

        for obs in observations {
            if !obs.is_finite() {
                warn!(
                    "rejecting malformed observation for track {} (non-finite position or timestamp)",
                    obs.track_id
                );
                self.metrics.rejected_observations += 1;
                continue;
            }
            self.metrics.observations += 1;

            let (state, created) = self.registry.update(obs, self.frame_id);
            if created {
                self.metrics.tracks_created += 1;
            }

            let was_confirmed = state.confirmed;
            if !self.flicker.confirm(state) {
                continue;
            }
            if !was_confirmed {
                self.metrics.confirmations += 1;
            }

            if let Some(crossing) = self.crossing.as_mut() {
                if crossing.update(state) {
                    self.metrics.crossings += 1;
                }
            }

            if let Some(speed) = self.speed.as_mut() {
                state.smoothed_speed = speed.update(obs.track_id, obs.position, obs.timestamp);
            }

            if let Some(keypoints) = &obs.keypoints {
                for stream in self.reps.iter_mut() {
                    let angle = rep_counter::joint_angle(keypoints, stream.spec.triple)?;
                    stream.counter.update(angle);
                }
                if self.config.count_fingers {
                    if let Some(side) = obs.side {
                        digit_count = Some(digit_counter::count_open_fingers(keypoints, side)?);
                    }
                }
                if let Some(posture_config) = &self.config.posture {
                    posture_report = Some(posture::assess(keypoints, posture_config)?);
                }
            }
        }

        if let Some(limit) = self.config.tracking.max_unseen_frames {
            let evicted = self.registry.evict_stale(self.frame_id, limit);
            if !evicted.is_empty() {
                if let Some(speed) = self.speed.as_mut() {
                    for id in &evicted {
                        speed.remove(*id);
                    }
                }
                self.metrics.tracks_evicted += evicted.len() as u64;
            }
        }

        Ok(CounterSnapshot {
            frame_id: self.frame_id,
            reps: self.rep_reports(),
            digit_count,
            posture: posture_report,
            unique_crossings: self.unique_crossings(),
            confirmed_tracks: self.registry.confirmed_count(),
            speeds_kmh: self
                .speed
                .as_ref()
                .map(|s| s.speeds().collect())
                .unwrap_or_default(),
        })
    }

    // ── Pure query accessors ──

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    pub fn rep_reports(&self) -> Vec<RepReport> {
        self.reps
            .iter()
            .map(|s| s.counter.report(&s.spec.label))
            .collect()
    }

    pub fn unique_crossings(&self) -> u64 {
        self.crossing.as_ref().map(|c| c.total()).unwrap_or(0)
    }

    pub fn confirmed_count(&self) -> usize {
        self.registry.confirmed_count()
    }

    pub fn speed_of(&self, track_id: u32) -> Option<f32> {
        self.speed.as_ref().and_then(|s| s.speed_of(track_id))
    }

    pub fn track(&self, track_id: u32) -> Option<&TrackState> {
        self.registry.get(track_id)
    }

    pub fn trail_of(&self, track_id: u32) -> Option<&VecDeque<Point2D>> {
        self.registry.get(track_id).map(|t| &t.trail)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &TrackState> {
        self.registry.iter()
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digit_counter::HAND_LANDMARKS;
    use crate::rep_counter::RepStage;
    use crate::types::{
        CrossingConfig, Keypoint, PostureConfig, RepConfig, Side, SpeedConfig, TrackingConfig,
    };

    fn obs(track_id: u32, x: f32, y: f32, timestamp: f64) -> Observation {
        Observation::new(track_id, Point2D::new(x, y), timestamp)
    }

    /// Shoulder–elbow–wrist keypoints producing the given pose: the wrist
    /// moves, shoulder and elbow stay put.
    fn arm(wrist: Point2D) -> Vec<Keypoint> {
        let mut kps = vec![Keypoint::new(0.0, 0.0, 0.9); 10];
        kps[5] = Keypoint::new(0.0, 0.0, 0.9); // shoulder
        kps[7] = Keypoint::new(1.0, 0.0, 0.9); // elbow
        kps[9] = Keypoint { point: wrist, confidence: 0.9 };
        kps
    }

    fn curl_config() -> SessionConfig {
        SessionConfig {
            reps: RepConfig {
                joints: vec![JointSpec {
                    label: "left_elbow".to_string(),
                    triple: [5, 7, 9],
                }],
                ..RepConfig::default()
            },
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_pedestrian_flow_counts_each_person_once() {
        let mut session = CounterSession::new(SessionConfig {
            tracking: TrackingConfig {
                min_hits: 2,
                max_unseen_frames: None,
            },
            crossing: Some(CrossingConfig {
                line_y: 60.0,
                band: 10.0,
            }),
            ..SessionConfig::default()
        })
        .unwrap();

        // Person 1 walks down through the band; person 2 flickers once
        let ys = [40.0, 50.0, 55.0, 62.0, 75.0];
        let mut last = None;
        for (i, y) in ys.iter().enumerate() {
            let t = i as f64 * 0.1;
            let mut frame = vec![obs(1, 0.0, *y, t)];
            if i == 0 {
                frame.push(obs(2, 0.0, 60.0, t)); // single-frame ghost
            }
            last = Some(session.process_frame(&frame).unwrap());
        }

        let snapshot = last.unwrap();
        // Confirmed on the 3rd observation (count 3 > 2), counted at y=55
        assert_eq!(snapshot.unique_crossings, 1);
        assert_eq!(snapshot.confirmed_tracks, 1);
        assert!(session.track(2).is_some());
        assert!(!session.track(2).unwrap().confirmed);
        assert_eq!(session.metrics().crossings, 1);
    }

    #[test]
    fn test_crossing_band_is_strict() {
        let mut session = CounterSession::new(SessionConfig {
            crossing: Some(CrossingConfig {
                line_y: 60.0,
                band: 10.0,
            }),
            ..SessionConfig::default()
        })
        .unwrap();

        // Exactly on the lower boundary: 60 - 10 = 50 is outside
        session.process_frame(&[obs(1, 0.0, 50.0, 0.0)]).unwrap();
        assert_eq!(session.unique_crossings(), 0);
        session.process_frame(&[obs(1, 0.0, 55.0, 0.1)]).unwrap();
        assert_eq!(session.unique_crossings(), 1);
    }

    #[test]
    fn test_speed_flow_reaches_snapshot_and_track_state() {
        let mut session = CounterSession::new(SessionConfig {
            speed: Some(SpeedConfig {
                pixels_per_meter: 20.0,
            }),
            ..SessionConfig::default()
        })
        .unwrap();

        session.process_frame(&[obs(1, 0.0, 0.0, 0.0)]).unwrap();
        let snapshot = session.process_frame(&[obs(1, 100.0, 0.0, 1.0)]).unwrap();

        let speed = snapshot.speeds_kmh[&1];
        assert!((speed - 3.6).abs() < 1e-4);
        assert_eq!(session.speed_of(1), Some(speed));
        assert_eq!(session.track(1).unwrap().smoothed_speed, speed);
    }

    #[test]
    fn test_curl_session_counts_reps() {
        let mut session = CounterSession::new(curl_config()).unwrap();

        let extended = Point2D::new(2.0, 0.0); // straight arm, ~180°
        let flexed = Point2D::new(0.05, 0.02); // wrist back at the shoulder

        for (i, wrist) in [extended, flexed, extended, flexed].iter().enumerate() {
            let frame =
                vec![obs(1, 0.0, 0.0, i as f64 * 0.1).with_keypoints(arm(*wrist))];
            session.process_frame(&frame).unwrap();
        }

        let reps = session.rep_reports();
        assert_eq!(reps.len(), 1);
        assert_eq!(reps[0].label, "left_elbow");
        assert_eq!(reps[0].count, 2);
        assert_eq!(reps[0].stage, RepStage::Up);
    }

    #[test]
    fn test_unconfirmed_observations_do_not_drive_reps() {
        let mut config = curl_config();
        config.tracking.min_hits = 100;
        let mut session = CounterSession::new(config).unwrap();

        let extended = Point2D::new(2.0, 0.0);
        let flexed = Point2D::new(0.05, 0.02);
        for (i, wrist) in [extended, flexed].iter().enumerate() {
            let frame =
                vec![obs(1, 0.0, 0.0, i as f64 * 0.1).with_keypoints(arm(*wrist))];
            session.process_frame(&frame).unwrap();
        }
        assert_eq!(session.rep_reports()[0].count, 0);
    }

    #[test]
    fn test_mismatched_joint_triple_is_reported() {
        let mut config = curl_config();
        config.reps.joints[0].triple = [5, 7, 30];
        let mut session = CounterSession::new(config).unwrap();

        let frame = vec![obs(1, 0.0, 0.0, 0.0).with_keypoints(arm(Point2D::new(2.0, 0.0)))];
        let result = session.process_frame(&frame);
        assert_eq!(
            result.unwrap_err(),
            CounterError::KeypointOutOfRange {
                index: 30,
                available: 10
            }
        );
    }

    #[test]
    fn test_finger_counting_flows_into_snapshot() {
        let mut session = CounterSession::new(SessionConfig {
            count_fingers: true,
            ..SessionConfig::default()
        })
        .unwrap();

        let mut hand = vec![Keypoint::new(0.5, 0.5, 0.9); HAND_LANDMARKS];
        hand[8] = Keypoint::new(0.5, 0.2, 0.9); // index finger open

        let frame = vec![obs(1, 0.5, 0.5, 0.0)
            .with_keypoints(hand)
            .with_side(Side::Right)];
        let snapshot = session.process_frame(&frame).unwrap();
        assert_eq!(snapshot.digit_count, Some(1));

        // No hand in the next frame, so the per-frame result resets
        let snapshot = session.process_frame(&[]).unwrap();
        assert_eq!(snapshot.digit_count, None);
    }

    #[test]
    fn test_posture_flows_into_snapshot() {
        let mut session = CounterSession::new(SessionConfig {
            posture: Some(PostureConfig::default()),
            ..SessionConfig::default()
        })
        .unwrap();

        let mut kps = vec![Keypoint::new(0.0, 0.0, 0.1); 17];
        kps[3] = Keypoint::new(0.5, 0.2, 0.9);
        kps[5] = Keypoint::new(0.5, 0.5, 0.9);
        kps[11] = Keypoint::new(0.5, 0.9, 0.9);

        let frame = vec![obs(1, 0.5, 0.5, 0.0).with_keypoints(kps)];
        let snapshot = session.process_frame(&frame).unwrap();
        let report = snapshot.posture.unwrap();
        assert_eq!(report.status, crate::posture::PostureStatus::Good);
    }

    #[test]
    fn test_malformed_observation_is_skipped() {
        let mut session = CounterSession::new(SessionConfig::default()).unwrap();
        let frame = vec![
            obs(1, f32::NAN, 0.0, 0.0),
            obs(2, 0.0, 0.0, 0.0),
        ];
        let snapshot = session.process_frame(&frame).unwrap();
        assert!(session.track(1).is_none());
        assert!(session.track(2).is_some());
        assert_eq!(session.metrics().rejected_observations, 1);
        assert_eq!(snapshot.confirmed_tracks, 1);
    }

    #[test]
    fn test_eviction_clears_track_and_speed_state() {
        let mut session = CounterSession::new(SessionConfig {
            tracking: TrackingConfig {
                min_hits: 0,
                max_unseen_frames: Some(3),
            },
            speed: Some(SpeedConfig {
                pixels_per_meter: 20.0,
            }),
            ..SessionConfig::default()
        })
        .unwrap();

        session.process_frame(&[obs(1, 0.0, 0.0, 0.0)]).unwrap();
        session.process_frame(&[obs(1, 100.0, 0.0, 1.0)]).unwrap();
        assert!(session.speed_of(1).is_some());

        for i in 0..4 {
            session.process_frame(&[obs(2, 0.0, 0.0, 2.0 + i as f64)]).unwrap();
        }
        assert!(session.track(1).is_none());
        assert_eq!(session.speed_of(1), None);
        assert!(session.track(2).is_some());
        assert_eq!(session.metrics().tracks_evicted, 1);
    }

    #[test]
    fn test_accessors_are_idempotent_between_updates() {
        let mut session = CounterSession::new(SessionConfig {
            crossing: Some(CrossingConfig {
                line_y: 60.0,
                band: 10.0,
            }),
            ..SessionConfig::default()
        })
        .unwrap();
        session.process_frame(&[obs(1, 0.0, 60.0, 0.0)]).unwrap();

        assert_eq!(session.unique_crossings(), session.unique_crossings());
        assert_eq!(session.confirmed_count(), session.confirmed_count());
        assert_eq!(session.frame_id(), session.frame_id());
    }
}
