//! # MediFit-Reps
//!
//! Real-time exercise repetition recognition from pose landmarks.
//!
//! ## Pipeline
//!
//! ```text
//! LandmarkFrame (external pose estimator)
//!     ↓
//! [SessionTracker] routes to the active exercise
//!     ↓
//! [RepStateMachine] joint angles → Up/Down phase → rep count + coaching cue
//!     ↓
//! [SummaryBuilder] counts → performance tier + muscles worked
//! ```
//!
//! ## Exercises
//!
//! | id | exercise | joints tracked                     |
//! |----|----------|------------------------------------|
//! | 1  | Squat    | hip-knee-heel, left and right      |
//! | 2  | Curl     | shoulder-elbow-wrist, both arms    |
//! | 3  | Sit-up   | shoulder-hip-knee and hip-knee-heel|
//! | 4  | Lunge    | hip-knee-ankle, left and right     |
//! | 5  | Push-up  | shoulder-elbow-wrist, both arms    |
//!
//! Phase transitions depend only on joint angles and the current phase,
//! never on wall-clock time.

pub mod curl;
pub mod exercise;
pub mod feedback;
pub mod history;
pub mod lunge;
pub mod machine;
pub mod pushup;
pub mod situp;
pub mod squat;
pub mod summary;
pub mod tracker;

pub use curl::*;
pub use exercise::*;
pub use feedback::*;
pub use history::*;
pub use lunge::*;
pub use machine::*;
pub use pushup::*;
pub use situp::*;
pub use squat::*;
pub use summary::*;
pub use tracker::*;
