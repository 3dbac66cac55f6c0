//! Push-up: shoulder-elbow-wrist angle on both arms.

use medifit_core::{LandmarkFrame, PoseLandmark};

use crate::exercise::ExerciseKind;
use crate::feedback::{Cue, FeedbackWrites};
use crate::history::AngleHistory;
use crate::machine::{measure_pair, JointTriple, Phase, RepStateMachine, RepStep};

pub const PUSHUP_LEFT_ARM: JointTriple = [
    PoseLandmark::LeftShoulder,
    PoseLandmark::LeftElbow,
    PoseLandmark::LeftWrist,
];
pub const PUSHUP_RIGHT_ARM: JointTriple = [
    PoseLandmark::RightShoulder,
    PoseLandmark::RightElbow,
    PoseLandmark::RightWrist,
];

/// Both elbows above this: arms locked out
const LOCKOUT_ANGLE: f64 = 160.0;
/// Both elbows below this: chest lowered enough to count
const BOTTOM_ANGLE: f64 = 90.0;

#[derive(Debug, Clone, Default)]
pub struct PushUpCounter {
    phase: Phase,
}

impl PushUpCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, left: f64, right: f64) -> RepStep {
        let mut feedback = FeedbackWrites::new();
        let mut counted = false;

        if left > LOCKOUT_ANGLE && right > LOCKOUT_ANGLE {
            self.phase = Phase::Up;
            feedback.clear();
        }

        if left < BOTTOM_ANGLE && right < BOTTOM_ANGLE && self.phase == Phase::Up {
            self.phase = Phase::Down;
            counted = true;
            feedback.set(Cue::GoodPushUp);
        }

        RepStep::new(counted, &feedback)
    }
}

impl RepStateMachine for PushUpCounter {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::PushUp
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn update(&mut self, frame: &LandmarkFrame, history: &mut AngleHistory) -> RepStep {
        let reading = measure_pair(frame, PUSHUP_LEFT_ARM, PUSHUP_RIGHT_ARM);
        history.record_pair(reading);

        match reading {
            Some((left, right)) => self.step(left, right),
            None => RepStep::unchanged(),
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Up;
    }
}
