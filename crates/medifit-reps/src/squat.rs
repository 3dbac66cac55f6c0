//! Squat: hip-knee-heel angle on both legs plus a stance-width check.

use medifit_core::{LandmarkFrame, PoseLandmark};

use crate::exercise::ExerciseKind;
use crate::feedback::{Cue, FeedbackWrites};
use crate::history::AngleHistory;
use crate::machine::{measure_pair, JointTriple, Phase, RepStateMachine, RepStep};

pub const SQUAT_LEFT_LEG: JointTriple = [
    PoseLandmark::LeftHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::LeftHeel,
];
pub const SQUAT_RIGHT_LEG: JointTriple = [
    PoseLandmark::RightHip,
    PoseLandmark::RightKnee,
    PoseLandmark::RightHeel,
];

/// Both knees above this: standing
const STANDING_ANGLE: f64 = 170.0;
/// Either knee below this: descending
const DESCENT_ANGLE: f64 = 165.0;
/// Both knees below this: deep enough to count
const DEPTH_ANGLE: f64 = 140.0;
/// Shoulder span may exceed knee span by at most this much (normalized x)
const STANCE_TOLERANCE: f64 = 0.04;

/// Joint measurements for one squat frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquatReading {
    pub left: f64,
    pub right: f64,
    /// Shoulder span minus knee span along x
    pub stance_gap: f64,
}

impl SquatReading {
    pub fn measure(frame: &LandmarkFrame) -> Option<Self> {
        let (left, right) = measure_pair(frame, SQUAT_LEFT_LEG, SQUAT_RIGHT_LEG)?;
        let shoulder_span =
            frame.point(PoseLandmark::LeftShoulder)?.x - frame.point(PoseLandmark::RightShoulder)?.x;
        let knee_span = frame.point(PoseLandmark::LeftKnee)?.x - frame.point(PoseLandmark::RightKnee)?.x;

        Some(Self {
            left,
            right,
            stance_gap: shoulder_span - knee_span,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SquatCounter {
    phase: Phase,
}

impl SquatCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the transition table to one reading.
    ///
    /// Feedback order: clear, almost-there, good-rep while down, stance warning.
    pub fn step(&mut self, reading: &SquatReading) -> RepStep {
        let SquatReading { left, right, stance_gap } = *reading;
        let mut feedback = FeedbackWrites::new();
        let mut counted = false;

        feedback.clear();

        if left > STANDING_ANGLE && right > STANDING_ANGLE {
            self.phase = Phase::Up;
        }

        if left < DESCENT_ANGLE || right < DESCENT_ANGLE {
            feedback.set(Cue::AlmostThere);
        }

        if left < DEPTH_ANGLE && right < DEPTH_ANGLE && self.phase == Phase::Up {
            self.phase = Phase::Down;
            counted = true;
        }

        if self.phase == Phase::Down {
            feedback.set(Cue::GoodRep);
        }

        if stance_gap > STANCE_TOLERANCE {
            feedback.set(Cue::WidenStance);
        }

        RepStep::new(counted, &feedback)
    }
}

impl RepStateMachine for SquatCounter {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Squat
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn update(&mut self, frame: &LandmarkFrame, history: &mut AngleHistory) -> RepStep {
        let reading = SquatReading::measure(frame);
        history.record_pair(reading.map(|r| (r.left, r.right)));

        match reading {
            Some(reading) => self.step(&reading),
            None => RepStep::unchanged(),
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Up;
    }
}
