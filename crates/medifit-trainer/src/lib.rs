//! # MediFit-Trainer
//!
//! Session management for the gym trainer: one [`SessionTracker`] per user,
//! frames decoded by a [`PoseDetector`], finished sessions written to an
//! [`ExerciseRecordStore`].
//!
//! [`SessionTracker`]: medifit_reps::SessionTracker

pub mod config;
pub mod detector;
pub mod error;
pub mod records;
pub mod service;

pub use config::*;
pub use detector::*;
pub use error::{TrainerError, TrainerResult};
pub use records::*;
pub use service::*;
