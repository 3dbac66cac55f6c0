//! Arm curl: shoulder-elbow-wrist angle on both arms.
//!
//! `Down` means arms extended. A rep is counted when both elbows close below
//! the curled threshold from `Down`. Passing through the partial band while
//! extended marks the next extension as an incomplete curl.

use medifit_core::{LandmarkFrame, PoseLandmark};

use crate::exercise::ExerciseKind;
use crate::feedback::{Cue, FeedbackWrites};
use crate::history::AngleHistory;
use crate::machine::{measure_pair, JointTriple, Phase, RepStateMachine, RepStep};

pub const CURL_LEFT_ARM: JointTriple = [
    PoseLandmark::LeftShoulder,
    PoseLandmark::LeftElbow,
    PoseLandmark::LeftWrist,
];
pub const CURL_RIGHT_ARM: JointTriple = [
    PoseLandmark::RightShoulder,
    PoseLandmark::RightElbow,
    PoseLandmark::RightWrist,
];

const EXTENDED_ANGLE: f64 = 160.0;
const PARTIAL_ANGLE: f64 = 50.0;
const CURLED_ANGLE: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct CurlCounter {
    phase: Phase,
    range_ok: bool,
}

impl Default for CurlCounter {
    fn default() -> Self {
        Self {
            phase: Phase::Up,
            range_ok: true,
        }
    }
}

impl CurlCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last curl reached full range
    pub fn range_ok(&self) -> bool {
        self.range_ok
    }

    pub fn step(&mut self, left: f64, right: f64) -> RepStep {
        let mut feedback = FeedbackWrites::new();
        let mut counted = false;

        if left > EXTENDED_ANGLE && right > EXTENDED_ANGLE {
            feedback.set(if self.range_ok {
                Cue::GoodRep
            } else {
                Cue::IncompleteCurl
            });
            self.phase = Phase::Down;
        } else if left > PARTIAL_ANGLE && right > PARTIAL_ANGLE && self.phase == Phase::Down {
            // Only reachable while extended; Up never clears range_ok
            self.range_ok = false;
            feedback.clear();
        } else if left < CURLED_ANGLE && right < CURLED_ANGLE && self.phase == Phase::Down {
            self.phase = Phase::Up;
            self.range_ok = true;
            feedback.clear();
            counted = true;
        }

        RepStep::new(counted, &feedback)
    }
}

impl RepStateMachine for CurlCounter {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Curl
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn update(&mut self, frame: &LandmarkFrame, history: &mut AngleHistory) -> RepStep {
        let reading = measure_pair(frame, CURL_LEFT_ARM, CURL_RIGHT_ARM);
        history.record_pair(reading);

        match reading {
            Some((left, right)) => self.step(left, right),
            None => RepStep::unchanged(),
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackUpdate;
    use crate::machine::test_support::pair_frame;

    #[test]
    fn test_full_curl_counts_on_close() {
        let mut curl = CurlCounter::new();

        let step = curl.step(170.0, 170.0);
        assert_eq!(curl.phase(), Phase::Down);
        assert_eq!(step.feedback, FeedbackUpdate::Replace(Some(Cue::GoodRep)));

        let step = curl.step(100.0, 100.0);
        assert!(!step.counted);
        assert!(!curl.range_ok());

        let step = curl.step(20.0, 20.0);
        assert!(step.counted);
        assert_eq!(curl.phase(), Phase::Up);
        assert!(curl.range_ok());
        assert_eq!(step.feedback, FeedbackUpdate::Replace(None));
    }

    #[test]
    fn test_skipping_partial_band_keeps_range() {
        let mut curl = CurlCounter::new();
        curl.step(170.0, 170.0);
        let step = curl.step(20.0, 20.0);
        assert!(step.counted);
        assert!(curl.range_ok());

        let step = curl.step(170.0, 170.0);
        assert_eq!(step.feedback, FeedbackUpdate::Replace(Some(Cue::GoodRep)));
    }

    #[test]
    fn test_returning_to_extension_from_partial_is_incomplete() {
        let mut curl = CurlCounter::new();
        curl.step(170.0, 170.0);
        curl.step(100.0, 100.0);

        let step = curl.step(170.0, 170.0);
        assert!(!step.counted);
        assert_eq!(step.feedback, FeedbackUpdate::Replace(Some(Cue::IncompleteCurl)));
    }

    #[test]
    fn test_no_count_without_extension_first() {
        let mut curl = CurlCounter::new();
        assert!(!curl.step(20.0, 20.0).counted);
        assert!(!curl.step(100.0, 100.0).counted);
        assert_eq!(curl.phase(), Phase::Up);
        assert_eq!(curl.step(100.0, 100.0).feedback, FeedbackUpdate::Keep);
    }

    #[test]
    fn test_one_arm_curled_does_not_count() {
        let mut curl = CurlCounter::new();
        curl.step(170.0, 170.0);
        assert!(!curl.step(20.0, 40.0).counted);
        assert_eq!(curl.phase(), Phase::Down);
    }

    #[test]
    fn test_update_from_landmarks() {
        let mut curl = CurlCounter::new();
        let mut history = AngleHistory::new();

        curl.update(&pair_frame(CURL_LEFT_ARM, CURL_RIGHT_ARM, 170.0, 170.0), &mut history);
        let step = curl.update(&pair_frame(CURL_LEFT_ARM, CURL_RIGHT_ARM, 20.0, 20.0), &mut history);

        assert!(step.counted);
        assert_eq!(history.left.len(), 2);
    }

    #[test]
    fn test_reset() {
        let mut curl = CurlCounter::new();
        curl.step(170.0, 170.0);
        curl.step(100.0, 100.0);
        curl.reset();
        assert_eq!(curl.phase(), Phase::Up);
        assert!(curl.range_ok());
    }
}
