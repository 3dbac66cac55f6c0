//! Lunge: hip-knee-ankle angle on both legs.

use medifit_core::{LandmarkFrame, PoseLandmark};

use crate::exercise::ExerciseKind;
use crate::feedback::{Cue, FeedbackWrites};
use crate::history::AngleHistory;
use crate::machine::{measure_pair, JointTriple, Phase, RepStateMachine, RepStep};

pub const LUNGE_LEFT_LEG: JointTriple = [
    PoseLandmark::LeftHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::LeftAnkle,
];
pub const LUNGE_RIGHT_LEG: JointTriple = [
    PoseLandmark::RightHip,
    PoseLandmark::RightKnee,
    PoseLandmark::RightAnkle,
];

const STANDING_ANGLE: f64 = 160.0;
const LUNGE_DEPTH_ANGLE: f64 = 100.0;

#[derive(Debug, Clone, Default)]
pub struct LungeCounter {
    phase: Phase,
}

impl LungeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, left: f64, right: f64) -> RepStep {
        let mut feedback = FeedbackWrites::new();
        let mut counted = false;

        if left > STANDING_ANGLE && right > STANDING_ANGLE {
            self.phase = Phase::Up;
            feedback.clear();
        }

        if left < LUNGE_DEPTH_ANGLE && right < LUNGE_DEPTH_ANGLE && self.phase == Phase::Up {
            self.phase = Phase::Down;
            counted = true;
            feedback.set(Cue::GoodLunge);
        }

        RepStep::new(counted, &feedback)
    }
}

impl RepStateMachine for LungeCounter {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Lunge
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn update(&mut self, frame: &LandmarkFrame, history: &mut AngleHistory) -> RepStep {
        let reading = measure_pair(frame, LUNGE_LEFT_LEG, LUNGE_RIGHT_LEG);
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
