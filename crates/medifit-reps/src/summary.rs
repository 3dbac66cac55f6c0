//! End-of-session summary: totals, performance tier and muscles worked.

use medifit_core::{SessionId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::exercise::{ExerciseKind, MuscleGroup};
use crate::history::AngleHistory;
use crate::tracker::RepCounters;

/// Total-rep tier; lower edges are inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceTier {
    NoExercise,
    GoodStart,
    NiceWork,
    GreatJob,
    Excellent,
}

impl PerformanceTier {
    pub fn from_total(total_reps: u32) -> Self {
        match total_reps {
            0 => Self::NoExercise,
            1..=9 => Self::GoodStart,
            10..=19 => Self::NiceWork,
            20..=29 => Self::GreatJob,
            _ => Self::Excellent,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::NoExercise => "No exercises completed. Keep trying!",
            Self::GoodStart => "Good start! Keep practicing.",
            Self::NiceWork => "Nice work! You're making progress.",
            Self::GreatJob => "Great job! You're getting stronger.",
            Self::Excellent => "Excellent performance! You're a fitness champion!",
        }
    }
}

/// Raw angle samples of one exercise, parallel to the frame indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AngleData {
    Paired {
        left: Vec<i32>,
        right: Vec<i32>,
        frames: Vec<u64>,
    },
    Body {
        body: Vec<i32>,
        frames: Vec<u64>,
    },
}

impl AngleData {
    pub fn from_history(kind: ExerciseKind, history: &AngleHistory) -> Self {
        if kind.tracks_body_angle() {
            Self::Body {
                body: history.body.clone(),
                frames: history.frames.clone(),
            }
        } else {
            Self::Paired {
                left: history.left.clone(),
                right: history.right.clone(),
                frames: history.frames.clone(),
            }
        }
    }

    pub fn frames(&self) -> &[u64] {
        match self {
            Self::Paired { frames, .. } | Self::Body { frames, .. } => frames,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub session_id: SessionId,
    pub total_reps: u32,
    /// Summary label to count, every exercise included
    pub exercise_counts: BTreeMap<String, u32>,
    pub overall_feedback: String,
    pub performance_tier: PerformanceTier,
    pub muscles_worked: BTreeSet<MuscleGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_data: Option<AngleData>,
    pub generated_at: Timestamp,
}

impl Summary {
    pub fn count(&self, kind: ExerciseKind) -> u32 {
        self.exercise_counts.get(kind.summary_label()).copied().unwrap_or(0)
    }
}

/// Assembles a [`Summary`] from final counters and, optionally, one
/// exercise's angle history.
#[derive(Debug)]
pub struct SummaryBuilder<'a> {
    session_id: SessionId,
    counters: &'a RepCounters,
    angle_data: Option<AngleData>,
}

impl<'a> SummaryBuilder<'a> {
    pub fn new(session_id: SessionId, counters: &'a RepCounters) -> Self {
        Self {
            session_id,
            counters,
            angle_data: None,
        }
    }

    pub fn with_angle_data(mut self, kind: ExerciseKind, history: &AngleHistory) -> Self {
        self.angle_data = Some(AngleData::from_history(kind, history));
        self
    }

    pub fn build(self) -> Summary {
        let total_reps = self.counters.total();
        let tier = PerformanceTier::from_total(total_reps);

        let exercise_counts = self
            .counters
            .iter()
            .map(|(kind, count)| (kind.summary_label().to_string(), count))
            .collect();

        let muscles_worked = self
            .counters
            .iter()
            .filter(|&(_, count)| count > 0)
            .flat_map(|(kind, _)| kind.target_muscles().iter().copied())
            .collect();

        Summary {
            session_id: self.session_id,
            total_reps,
            exercise_counts,
            overall_feedback: tier.message().to_string(),
            performance_tier: tier,
            muscles_worked,
            angle_data: self.angle_data,
            generated_at: Timestamp::now(),
        }
    }
}
