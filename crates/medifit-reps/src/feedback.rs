//! Coaching cues and last-write-wins feedback resolution.
//!
//! Exercise rules write candidate cues in evaluation order while they look at
//! a frame; the last write decides what the session shows. A frame with no
//! writes leaves the previous cue in place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coaching message shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Squat: knees narrower than shoulders
    WidenStance,
    /// Squat: bending but not yet deep enough
    AlmostThere,
    GoodRep,
    /// Curl: arms extended again without a full curl
    IncompleteCurl,
    GoodSitUp,
    IncompleteSitUp,
    KeepLegsTucked,
    GoodLunge,
    GoodPushUp,
}

impl Cue {
    pub fn message(&self) -> &'static str {
        match self {
            Self::WidenStance => "Open up your knees further apart to shoulder width!",
            Self::AlmostThere => "Almost there... lower until height of hips!",
            Self::GoodRep => "Good rep!",
            Self::IncompleteCurl => "Did not curl completely.",
            Self::GoodSitUp => "Good repetition!",
            Self::IncompleteSitUp => "Did not perform sit up completely.",
            Self::KeepLegsTucked => "Keep legs tucked in closer",
            Self::GoodLunge => "Good lunge!",
            Self::GoodPushUp => "Good pushup!",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Net effect of one frame on the session feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackUpdate {
    Keep,
    /// Replace the current cue; `None` clears it
    Replace(Option<Cue>),
}

impl FeedbackUpdate {
    pub fn apply(self, current: &mut Option<Cue>) {
        if let Self::Replace(cue) = self {
            *current = cue;
        }
    }
}

/// Ordered candidate writes collected during one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackWrites {
    writes: Vec<Option<Cue>>,
}

impl FeedbackWrites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, cue: Cue) {
        self.writes.push(Some(cue));
    }

    pub fn clear(&mut self) {
        self.writes.push(None);
    }

    pub fn resolve(&self) -> FeedbackUpdate {
        match self.writes.last() {
            Some(&cue) => FeedbackUpdate::Replace(cue),
            None => FeedbackUpdate::Keep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_writes_keeps_feedback() {
        let mut current = Some(Cue::GoodLunge);
        FeedbackWrites::new().resolve().apply(&mut current);
        assert_eq!(current, Some(Cue::GoodLunge));
    }

    #[test]
    fn test_last_write_wins() {
        let mut writes = FeedbackWrites::new();
        writes.set(Cue::GoodSitUp);
        writes.set(Cue::KeepLegsTucked);
        assert_eq!(writes.resolve(), FeedbackUpdate::Replace(Some(Cue::KeepLegsTucked)));

        writes.clear();
        assert_eq!(writes.resolve(), FeedbackUpdate::Replace(None));
    }

    #[test]
    fn test_messages() {
        assert_eq!(Cue::GoodRep.to_string(), "Good rep!");
        assert_eq!(Cue::GoodPushUp.message(), "Good pushup!");
    }
}
