//! Sit-up: torso angle (shoulder-hip-knee) and knee angle (hip-knee-heel),
//! measured on the left side.
//!
//! `Down` is lying back, `Up` is sitting up. A rep is counted on lying back
//! down after having passed the halfway band and reached the top.

use medifit_core::{LandmarkFrame, PoseLandmark};

use crate::exercise::ExerciseKind;
use crate::feedback::{Cue, FeedbackWrites};
use crate::history::AngleHistory;
use crate::machine::{measure_angle, JointTriple, Phase, RepStateMachine, RepStep};

pub const SITUP_BODY: JointTriple = [
    PoseLandmark::LeftShoulder,
    PoseLandmark::LeftHip,
    PoseLandmark::LeftKnee,
];
pub const SITUP_KNEE: JointTriple = [
    PoseLandmark::LeftHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::LeftHeel,
];

/// Open interval of body angles counted as halfway up
const HALFWAY_BAND: (f64, f64) = (50.0, 80.0);
const TOP_ANGLE: f64 = 40.0;
const LYING_ANGLE: f64 = 90.0;
const TUCKED_KNEE_ANGLE: f64 = 60.0;
const LOOSE_KNEE_ANGLE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SitUpReading {
    pub body: f64,
    pub knee: f64,
}

impl SitUpReading {
    pub fn measure(frame: &LandmarkFrame) -> Option<Self> {
        Some(Self {
            body: measure_angle(frame, SITUP_BODY)?,
            knee: measure_angle(frame, SITUP_KNEE)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SitUpCounter {
    phase: Phase,
    range_ok: bool,
    halfway: bool,
}

impl Default for SitUpCounter {
    fn default() -> Self {
        Self {
            phase: Phase::Up,
            range_ok: true,
            halfway: false,
        }
    }
}

impl SitUpCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn halfway(&self) -> bool {
        self.halfway
    }

    pub fn range_ok(&self) -> bool {
        self.range_ok
    }

    pub fn step(&mut self, reading: &SitUpReading) -> RepStep {
        let SitUpReading { body, knee } = *reading;
        let mut feedback = FeedbackWrites::new();
        let mut counted = false;

        if body > HALFWAY_BAND.0 && body < HALFWAY_BAND.1 && self.phase == Phase::Down {
            self.halfway = true;
        }

        if body < TOP_ANGLE && self.phase == Phase::Down {
            self.phase = Phase::Up;
            self.range_ok = true;
        }

        if body > LYING_ANGLE && knee < TUCKED_KNEE_ANGLE {
            self.phase = Phase::Down;
            if self.halfway {
                if self.range_ok {
                    counted = true;
                    feedback.set(Cue::GoodSitUp);
                } else {
                    feedback.set(Cue::IncompleteSitUp);
                }
                self.range_ok = false;
                self.halfway = false;
            }
        }

        // May override the rep message from this same frame
        if knee > LOOSE_KNEE_ANGLE {
            feedback.set(Cue::KeepLegsTucked);
        }

        RepStep::new(counted, &feedback)
    }
}

impl RepStateMachine for SitUpCounter {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::SitUp
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn update(&mut self, frame: &LandmarkFrame, history: &mut AngleHistory) -> RepStep {
        let reading = SitUpReading::measure(frame);
        history.record_body(reading.map(|r| r.body));

        match reading {
            Some(reading) => self.step(&reading),
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
    use crate::history::FALLBACK_ANGLE;
    use medifit_core::Landmark;
    use nalgebra::{Point2, Vector2};

    fn reading(body: f64, knee: f64) -> SitUpReading {
        SitUpReading { body, knee }
    }

    /// Shoulder, hip, knee and heel laid out for the given angles
    fn situp_frame(body: f64, knee: f64) -> LandmarkFrame {
        let hip = Point2::new(0.5, 0.7);
        let knee_pos = hip + Vector2::new(0.2, 0.0);
        let body_rad = body.to_radians();
        // Angle at the hip between hip->knee (0 degrees) and hip->shoulder
        let shoulder = hip + Vector2::new(0.25 * body_rad.cos(), 0.25 * body_rad.sin());
        // Angle at the knee between knee->hip (180 degrees) and knee->heel
        let heel_dir = (180.0 - knee).to_radians();
        let heel = knee_pos + Vector2::new(0.2 * heel_dir.cos(), 0.2 * heel_dir.sin());

        LandmarkFrame::from_landmarks([
            (PoseLandmark::LeftShoulder, Landmark::new(shoulder.x, shoulder.y)),
            (PoseLandmark::LeftHip, Landmark::new(hip.x, hip.y)),
            (PoseLandmark::LeftKnee, Landmark::new(knee_pos.x, knee_pos.y)),
            (PoseLandmark::LeftHeel, Landmark::new(heel.x, heel.y)),
        ])
    }

    #[test]
    fn test_full_situp_counts_once() {
        let mut situp = SitUpCounter::new();

        // Lie back first
        assert!(!situp.step(&reading(95.0, 50.0)).counted);
        assert_eq!(situp.phase(), Phase::Down);

        situp.step(&reading(65.0, 50.0));
        assert!(situp.halfway());

        situp.step(&reading(35.0, 50.0));
        assert_eq!(situp.phase(), Phase::Up);

        let step = situp.step(&reading(95.0, 50.0));
        assert!(step.counted);
        assert_eq!(step.feedback, FeedbackUpdate::Replace(Some(Cue::GoodSitUp)));
        assert!(!situp.halfway());

        // Lying still does not count again
        assert!(!situp.step(&reading(95.0, 50.0)).counted);
    }

    #[test]
    fn test_lying_down_without_halfway_does_not_count() {
        let mut situp = SitUpCounter::new();
        assert!(!situp.step(&reading(95.0, 50.0)).counted);
        assert!(!situp.step(&reading(95.0, 50.0)).counted);
        // Halfway band while Up does nothing
        let mut fresh = SitUpCounter::new();
        fresh.step(&reading(65.0, 50.0));
        assert!(!fresh.halfway());
        assert!(!fresh.step(&reading(95.0, 50.0)).counted);
    }

    #[test]
    fn test_halfway_without_reaching_top_is_incomplete() {
        let mut situp = SitUpCounter::new();
        for (body, knee) in [(95.0, 50.0), (65.0, 50.0), (35.0, 50.0)] {
            situp.step(&reading(body, knee));
        }
        assert!(situp.step(&reading(95.0, 50.0)).counted);
        assert!(!situp.range_ok());

        // Halfway again, but back down without reaching the top
        situp.step(&reading(65.0, 50.0));
        let step = situp.step(&reading(95.0, 50.0));
        assert!(!step.counted);
        assert_eq!(step.feedback, FeedbackUpdate::Replace(Some(Cue::IncompleteSitUp)));
        assert!(!situp.halfway());
    }

    #[test]
    fn test_lying_still_keeps_feedback() {
        let mut situp = SitUpCounter::new();
        situp.step(&reading(95.0, 50.0));
        assert_eq!(situp.step(&reading(95.0, 50.0)).feedback, FeedbackUpdate::Keep);
    }

    #[test]
    fn test_loose_knees_warning() {
        let mut situp = SitUpCounter::new();
        let step = situp.step(&reading(60.0, 75.0));
        assert_eq!(step.feedback, FeedbackUpdate::Replace(Some(Cue::KeepLegsTucked)));
    }

    #[test]
    fn test_update_from_landmarks() {
        let mut situp = SitUpCounter::new();
        let mut history = AngleHistory::new();

        let counted = [(95.0, 50.0), (65.0, 50.0), (35.0, 50.0), (95.0, 50.0)]
            .into_iter()
            .filter(|&(body, knee)| situp.update(&situp_frame(body, knee), &mut history).counted)
            .count();

        assert_eq!(counted, 1);
        assert_eq!(history.body.len(), 4);
        assert!((history.body[1] - 65).abs() <= 1);
        assert!(history.left.is_empty());
        assert_eq!(situp.phase(), Phase::Down);
    }

    #[test]
    fn test_undetected_frame_records_fallback_only() {
        let mut situp = SitUpCounter::new();
        let mut history = AngleHistory::new();
        let step = situp.update(&LandmarkFrame::undetected(), &mut history);
        assert_eq!(step, RepStep::unchanged());
        assert_eq!(history.body, vec![FALLBACK_ANGLE]);
    }
}
