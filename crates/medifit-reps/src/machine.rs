//! Shared shape of the per-exercise repetition state machines.

use medifit_core::{checked_joint_angle, LandmarkFrame, PoseLandmark};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::exercise::ExerciseKind;
use crate::feedback::{FeedbackUpdate, FeedbackWrites};
use crate::history::AngleHistory;

/// Binary exercise phase; meaning is exercise-specific
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// At rest / top of the motion
    #[default]
    Up,
    /// Contracted / bottom of the motion
    Down,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Up => f.write_str("Up"),
            Phase::Down => f.write_str("Down"),
        }
    }
}

/// Outcome of feeding one frame to a state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepStep {
    /// A repetition completed on this frame
    pub counted: bool,
    pub feedback: FeedbackUpdate,
}

impl RepStep {
    /// No phase, counter or feedback change
    pub fn unchanged() -> Self {
        Self {
            counted: false,
            feedback: FeedbackUpdate::Keep,
        }
    }

    pub fn new(counted: bool, writes: &FeedbackWrites) -> Self {
        Self {
            counted,
            feedback: writes.resolve(),
        }
    }
}

/// Per-exercise repetition recognizer.
///
/// `update` measures the joints it needs, appends the samples to `history`
/// (the fallback angle when landmarks are unusable) and, only when the
/// measurement succeeded, applies the exercise's transition table.
pub trait RepStateMachine: Send + Sync {
    fn kind(&self) -> ExerciseKind;

    fn phase(&self) -> Phase;

    fn update(&mut self, frame: &LandmarkFrame, history: &mut AngleHistory) -> RepStep;

    /// Back to `Up` with flags at their initial values
    fn reset(&mut self);
}

/// Three landmarks forming an angle at the middle one
pub type JointTriple = [PoseLandmark; 3];

/// Angle at the middle joint, `None` if any joint is unusable
pub fn measure_angle(frame: &LandmarkFrame, joints: JointTriple) -> Option<f64> {
    let (a, b, c) = frame.triple(joints[0], joints[1], joints[2])?;
    checked_joint_angle(a, b, c)
}

/// Left and right angles, both or neither
pub fn measure_pair(frame: &LandmarkFrame, left: JointTriple, right: JointTriple) -> Option<(f64, f64)> {
    Some((measure_angle(frame, left)?, measure_angle(frame, right)?))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    const LEFT_ARM: JointTriple = [
        PoseLandmark::LeftShoulder,
        PoseLandmark::LeftElbow,
        PoseLandmark::LeftWrist,
    ];
    const RIGHT_ARM: JointTriple = [
        PoseLandmark::RightShoulder,
        PoseLandmark::RightElbow,
        PoseLandmark::RightWrist,
    ];

    #[test]
    fn test_measure_pair() {
        let frame = pair_frame(LEFT_ARM, RIGHT_ARM, 45.0, 120.0);
        let (left, right) = measure_pair(&frame, LEFT_ARM, RIGHT_ARM).unwrap();
        assert!((left - 45.0).abs() < 1e-6);
        assert!((right - 120.0).abs() < 1e-6);
    }

    #[test]
    fn test_measure_pair_needs_both_sides() {
        let mut frame = pair_frame(LEFT_ARM, RIGHT_ARM, 45.0, 120.0);
        frame.landmarks.remove(&PoseLandmark::RightWrist);
        assert!(measure_angle(&frame, LEFT_ARM).is_some());
        assert!(measure_pair(&frame, LEFT_ARM, RIGHT_ARM).is_none());
    }

    #[test]
    fn test_default_phase_is_up() {
        assert_eq!(Phase::default(), Phase::Up);
        assert_eq!(Phase::Down.to_string(), "Down");
    }
}
