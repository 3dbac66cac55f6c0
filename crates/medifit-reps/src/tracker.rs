//! Session Tracker: owns counters, history, feedback and one state machine
//! per exercise for a single user's session.

use medifit_core::{LandmarkFrame, Result, SessionId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::curl::CurlCounter;
use crate::exercise::ExerciseKind;
use crate::feedback::Cue;
use crate::history::AngleHistory;
use crate::lunge::LungeCounter;
use crate::machine::{Phase, RepStateMachine};
use crate::pushup::PushUpCounter;
use crate::situp::SitUpCounter;
use crate::squat::SquatCounter;
use crate::summary::{Summary, SummaryBuilder};

/// Per-exercise repetition counts, never decremented within a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepCounters([u32; ExerciseKind::COUNT]);

impl RepCounters {
    pub fn increment(&mut self, kind: ExerciseKind) -> u32 {
        let count = &mut self.0[kind.slot()];
        *count = count.saturating_add(1);
        *count
    }

    pub fn get(&self, kind: ExerciseKind) -> u32 {
        self.0[kind.slot()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn reset(&mut self) {
        self.0 = [0; ExerciseKind::COUNT];
    }

    /// Counts in exercise id order
    pub fn iter(&self) -> impl Iterator<Item = (ExerciseKind, u32)> + '_ {
        ExerciseKind::ALL.iter().map(|&kind| (kind, self.get(kind)))
    }
}

#[derive(Debug, Clone, Default)]
struct Machines {
    squat: SquatCounter,
    curl: CurlCounter,
    situp: SitUpCounter,
    lunge: LungeCounter,
    pushup: PushUpCounter,
}

impl Machines {
    fn get(&self, kind: ExerciseKind) -> &dyn RepStateMachine {
        match kind {
            ExerciseKind::Squat => &self.squat,
            ExerciseKind::Curl => &self.curl,
            ExerciseKind::SitUp => &self.situp,
            ExerciseKind::Lunge => &self.lunge,
            ExerciseKind::PushUp => &self.pushup,
        }
    }

    fn get_mut(&mut self, kind: ExerciseKind) -> &mut dyn RepStateMachine {
        match kind {
            ExerciseKind::Squat => &mut self.squat,
            ExerciseKind::Curl => &mut self.curl,
            ExerciseKind::SitUp => &mut self.situp,
            ExerciseKind::Lunge => &mut self.lunge,
            ExerciseKind::PushUp => &mut self.pushup,
        }
    }

    fn reset(&mut self) {
        for kind in ExerciseKind::ALL {
            self.get_mut(kind).reset();
        }
    }
}

/// Result of one processed frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameReport {
    pub exercise_type: String,
    /// Reps so far for the routed exercise
    pub reps: u32,
    pub feedback: String,
    #[serde(rename = "state")]
    pub phase: Phase,
}

/// Mutable state of one exercise-tracking session.
///
/// Not synchronized; callers keep one tracker per user and serialize access.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    session_id: SessionId,
    exercise: ExerciseKind,
    started_at: Timestamp,
    machines: Machines,
    counters: RepCounters,
    history: AngleHistory,
    feedback: Option<Cue>,
    frame_index: u64,
}

impl SessionTracker {
    pub fn new(exercise_choice: u8) -> Result<Self> {
        let exercise = ExerciseKind::try_from(exercise_choice)?;
        Ok(Self::for_exercise(exercise))
    }

    pub fn for_exercise(exercise: ExerciseKind) -> Self {
        Self {
            session_id: SessionId::new(),
            exercise,
            started_at: Timestamp::now(),
            machines: Machines::default(),
            counters: RepCounters::default(),
            history: AngleHistory::new(),
            feedback: None,
            frame_index: 0,
        }
    }

    /// Begin a fresh session, discarding everything from the previous one
    pub fn start(&mut self, exercise_choice: u8) -> Result<()> {
        let exercise = ExerciseKind::try_from(exercise_choice)?;
        *self = Self::for_exercise(exercise);
        tracing::info!("Session {} started for {}", self.session_id, exercise);
        Ok(())
    }

    /// Clear counters, phases, flags, history and feedback, keeping the exercise
    pub fn reset(&mut self) {
        self.machines.reset();
        self.counters.reset();
        self.history.clear();
        self.feedback = None;
        self.frame_index = 0;
    }

    /// Route one frame to the selected exercise.
    ///
    /// An invalid selector is rejected before any state is touched.
    pub fn process_frame(&mut self, frame: &LandmarkFrame, exercise_choice: u8) -> Result<FrameReport> {
        let kind = ExerciseKind::try_from(exercise_choice)?;

        if !frame.detected {
            tracing::debug!("No pose detected in frame {} of session {}", self.frame_index, self.session_id);
        }

        let machine = self.machines.get_mut(kind);
        let step = machine.update(frame, &mut self.history);
        let phase = machine.phase();

        self.history.record_frame(self.frame_index);
        self.frame_index += 1;

        step.feedback.apply(&mut self.feedback);

        let reps = if step.counted {
            let reps = self.counters.increment(kind);
            tracing::debug!("{} rep {} counted in session {}", kind, reps, self.session_id);
            reps
        } else {
            self.counters.get(kind)
        };

        Ok(FrameReport {
            exercise_type: kind.frame_label().to_string(),
            reps,
            feedback: self.feedback_message().to_string(),
            phase,
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn counters(&self) -> &RepCounters {
        &self.counters
    }

    pub fn history(&self) -> &AngleHistory {
        &self.history
    }

    pub fn phase(&self, kind: ExerciseKind) -> Phase {
        self.machines.get(kind).phase()
    }

    pub fn feedback(&self) -> Option<Cue> {
        self.feedback
    }

    /// Current feedback text, empty when cleared
    pub fn feedback_message(&self) -> &'static str {
        self.feedback.map(|cue| cue.message()).unwrap_or("")
    }

    pub fn frames_processed(&self) -> u64 {
        self.frame_index
    }

    /// Summary of the current state; attaches the session exercise's angle
    /// history when `include_angle_data` is set
    pub fn summary(&self, include_angle_data: bool) -> Summary {
        let builder = SummaryBuilder::new(self.session_id, &self.counters);
        let builder = if include_angle_data {
            builder.with_angle_data(self.exercise, &self.history)
        } else {
            builder
        };
        builder.build()
    }

    /// Summarize, then start over with a new session id
    pub fn end(&mut self, include_angle_data: bool) -> Summary {
        let summary = self.summary(include_angle_data);
        *self = Self::for_exercise(self.exercise);
        summary
    }
}
