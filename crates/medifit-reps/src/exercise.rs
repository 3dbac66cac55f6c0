//! Exercise catalog: identifiers, labels and target muscle groups.

use medifit_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five tracked exercises, numbered as callers select them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExerciseKind {
    Squat = 1,
    Curl = 2,
    SitUp = 3,
    Lunge = 4,
    PushUp = 5,
}

impl ExerciseKind {
    pub const COUNT: usize = 5;

    pub const ALL: [ExerciseKind; Self::COUNT] = [
        Self::Squat,
        Self::Curl,
        Self::SitUp,
        Self::Lunge,
        Self::PushUp,
    ];

    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Zero-based slot for per-exercise arrays
    pub fn slot(&self) -> usize {
        *self as usize - 1
    }

    /// Catalog name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Squat => "Squat",
            Self::Curl => "Arm Curl",
            Self::SitUp => "Sit-up",
            Self::Lunge => "Lunge",
            Self::PushUp => "Push-up",
        }
    }

    /// Label used in per-frame reports and stored records
    pub fn frame_label(&self) -> &'static str {
        match self {
            Self::Squat => "Squat",
            Self::Curl => "Curl",
            Self::SitUp => "Sit-up",
            Self::Lunge => "Lunge",
            Self::PushUp => "Pushup",
        }
    }

    /// Label used in session summaries
    pub fn summary_label(&self) -> &'static str {
        match self {
            Self::Squat => "Squats",
            Self::Curl => "Arm Curls",
            Self::SitUp => "Sit-ups",
            Self::Lunge => "Lunges",
            Self::PushUp => "Pushups",
        }
    }

    pub fn target_muscles(&self) -> &'static [MuscleGroup] {
        use MuscleGroup::*;
        match self {
            Self::Squat => &[Quadriceps, Glutes, Hamstrings],
            Self::Curl => &[Biceps, Forearms],
            Self::SitUp => &[Core, AbdominalMuscles],
            Self::Lunge => &[Quadriceps, Glutes, Calves],
            Self::PushUp => &[Chest, Triceps, Core],
        }
    }

    /// Sit-ups record a single body-angle stream instead of a left/right pair
    pub fn tracks_body_angle(&self) -> bool {
        matches!(self, Self::SitUp)
    }
}

impl TryFrom<u8> for ExerciseKind {
    type Error = Error;

    fn try_from(choice: u8) -> Result<Self, Self::Error> {
        match choice {
            1 => Ok(Self::Squat),
            2 => Ok(Self::Curl),
            3 => Ok(Self::SitUp),
            4 => Ok(Self::Lunge),
            5 => Ok(Self::PushUp),
            other => Err(Error::InvalidArgument(format!(
                "exercise choice must be 1..=5, got {other}"
            ))),
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Muscle groups attributed to exercises in summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MuscleGroup {
    Quadriceps,
    Glutes,
    Hamstrings,
    Biceps,
    Forearms,
    Core,
    #[serde(rename = "Abdominal Muscles")]
    AbdominalMuscles,
    Calves,
    Chest,
    Triceps,
}

impl MuscleGroup {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Quadriceps => "Quadriceps",
            Self::Glutes => "Glutes",
            Self::Hamstrings => "Hamstrings",
            Self::Biceps => "Biceps",
            Self::Forearms => "Forearms",
            Self::Core => "Core",
            Self::AbdominalMuscles => "Abdominal Muscles",
            Self::Calves => "Calves",
            Self::Chest => "Chest",
            Self::Triceps => "Triceps",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseInfo {
    pub id: u8,
    pub name: String,
    pub target_muscles: Vec<MuscleGroup>,
}

impl From<ExerciseKind> for ExerciseInfo {
    fn from(kind: ExerciseKind) -> Self {
        Self {
            id: kind.id(),
            name: kind.name().to_string(),
            target_muscles: kind.target_muscles().to_vec(),
        }
    }
}

/// All available exercises, in id order
pub fn list_exercises() -> Vec<ExerciseInfo> {
    ExerciseKind::ALL.iter().copied().map(ExerciseInfo::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_roundtrip() {
        for kind in ExerciseKind::ALL {
            assert_eq!(ExerciseKind::try_from(kind.id()).unwrap(), kind);
        }
    }

    #[test]
    fn test_invalid_choice() {
        for choice in [0u8, 6, 255] {
            let err = ExerciseKind::try_from(choice).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_catalog() {
        let catalog = list_exercises();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog[1].id, 2);
        assert_eq!(catalog[1].name, "Arm Curl");
        assert_eq!(
            catalog[4].target_muscles,
            vec![MuscleGroup::Chest, MuscleGroup::Triceps, MuscleGroup::Core]
        );
    }

    #[test]
    fn test_muscle_group_serializes_display_name() {
        let json = serde_json::to_string(&MuscleGroup::AbdominalMuscles).unwrap();
        assert_eq!(json, "\"Abdominal Muscles\"");
    }
}
