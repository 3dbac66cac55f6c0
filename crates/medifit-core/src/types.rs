//! Fundamental types for the MediFit system.

use chrono::{DateTime, Utc};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Caller-supplied user identifier; one live session per user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one exercise-tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }
}

/// 33 body landmarks produced by the pose estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    pub const COUNT: usize = 33;

    pub const ALL: [PoseLandmark; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(idx: u8) -> Option<Self> {
        Self::ALL.get(idx as usize).copied()
    }
}

/// A single landmark in normalized image coordinates (x, y roughly in [0, 1])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub position: Point2<f64>,
    #[serde(default = "full_visibility")]
    pub visibility: f32,
}

fn full_visibility() -> f32 {
    1.0
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            visibility: 1.0,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Landmarks for one video frame, as returned by the pose estimator.
///
/// Read-only for the rep counters; an undetected frame carries no landmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkFrame {
    pub detected: bool,
    #[serde(default)]
    pub landmarks: HashMap<PoseLandmark, Landmark>,
    #[serde(default = "full_visibility")]
    pub confidence: f32,
}

impl LandmarkFrame {
    /// Frame in which no person was detected
    pub fn undetected() -> Self {
        Self {
            detected: false,
            landmarks: HashMap::new(),
            confidence: 0.0,
        }
    }

    pub fn from_landmarks(landmarks: impl IntoIterator<Item = (PoseLandmark, Landmark)>) -> Self {
        Self {
            detected: true,
            landmarks: landmarks.into_iter().collect(),
            confidence: 1.0,
        }
    }

    /// Build a frame from a flat array in landmark-index order.
    ///
    /// Accepts 33 × (x, y) or 33 × (x, y, visibility) values.
    pub fn from_flat(data: &[f64]) -> Result<Self> {
        let stride = match data.len() {
            n if n == PoseLandmark::COUNT * 2 => 2,
            n if n == PoseLandmark::COUNT * 3 => 3,
            actual => {
                return Err(Error::MalformedFrame {
                    expected: format!("{} or {}", PoseLandmark::COUNT * 2, PoseLandmark::COUNT * 3),
                    actual,
                })
            }
        };

        let landmarks = PoseLandmark::ALL.iter().zip(data.chunks_exact(stride)).map(|(&kind, chunk)| {
            let landmark = Landmark::new(chunk[0], chunk[1]);
            let landmark = match chunk.get(2) {
                Some(&visibility) => landmark.with_visibility(visibility as f32),
                None => landmark,
            };
            (kind, landmark)
        });

        Ok(Self::from_landmarks(landmarks))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Position of a joint, or `None` when it cannot be used.
    pub fn point(&self, landmark: PoseLandmark) -> Option<Point2<f64>> {
        if !self.detected {
            return None;
        }

        self.landmarks
            .get(&landmark)
            .map(|l| l.position)
            .filter(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Positions of three joints forming an angle, all or nothing.
    pub fn triple(
        &self,
        a: PoseLandmark,
        b: PoseLandmark,
        c: PoseLandmark,
    ) -> Option<(Point2<f64>, Point2<f64>, Point2<f64>)> {
        Some((self.point(a)?, self.point(b)?, self.point(c)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_landmark_roundtrip() {
        for i in 0..PoseLandmark::COUNT as u8 {
            let landmark = PoseLandmark::from_index(i).unwrap();
            assert_eq!(landmark as u8, i);
        }
        assert!(PoseLandmark::from_index(33).is_none());
    }

    #[test]
    fn test_undetected_frame_has_no_points() {
        let frame = LandmarkFrame::undetected();
        assert!(frame.point(PoseLandmark::LeftHip).is_none());
    }

    #[test]
    fn test_non_finite_point_is_unavailable() {
        let frame = LandmarkFrame::from_landmarks([
            (PoseLandmark::LeftHip, Landmark::new(f64::NAN, 0.5)),
            (PoseLandmark::LeftKnee, Landmark::new(0.4, 0.7)),
        ]);
        assert!(frame.point(PoseLandmark::LeftHip).is_none());
        assert!(frame.point(PoseLandmark::LeftKnee).is_some());
        assert!(frame
            .triple(PoseLandmark::LeftHip, PoseLandmark::LeftKnee, PoseLandmark::LeftHeel)
            .is_none());
    }

    #[test]
    fn test_from_flat_xy() {
        let data: Vec<f64> = (0..PoseLandmark::COUNT * 2).map(|i| i as f64 / 100.0).collect();
        let frame = LandmarkFrame::from_flat(&data).unwrap();
        let hip = frame.point(PoseLandmark::LeftHip).unwrap();
        assert!((hip.x - 0.46).abs() < 1e-12);
        assert!((hip.y - 0.47).abs() < 1e-12);
    }

    #[test]
    fn test_from_flat_with_visibility() {
        let data = vec![0.5; PoseLandmark::COUNT * 3];
        let frame = LandmarkFrame::from_flat(&data).unwrap();
        assert_eq!(frame.landmarks.len(), PoseLandmark::COUNT);
        assert_eq!(frame.landmarks[&PoseLandmark::Nose].visibility, 0.5);
    }

    #[test]
    fn test_from_flat_rejects_wrong_length() {
        let err = LandmarkFrame::from_flat(&[0.0; 10]).unwrap_err();
        assert!(matches!(err, Error::MalformedFrame { actual: 10, .. }));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "detected": true,
            "landmarks": {
                "LEFT_HIP": { "position": [0.1, 0.2] },
                "LEFT_KNEE": { "position": [0.1, 0.5], "visibility": 0.8 }
            }
        }"#;
        let frame = LandmarkFrame::from_json(json).unwrap();
        assert_eq!(frame.confidence, 1.0);
        assert_eq!(frame.landmarks[&PoseLandmark::LeftKnee].visibility, 0.8);
        assert!(frame.point(PoseLandmark::LeftHip).is_some());
    }

    #[test]
    fn test_timestamp_datetime() {
        let ts = Timestamp::from_nanos(1_000_000_000);
        assert_eq!(ts.to_datetime().timestamp(), 1);
    }
}
