//! Error types for the trainer service.

use medifit_core::UserId;
use thiserror::Error;

/// Result type for trainer operations
pub type TrainerResult<T> = std::result::Result<T, TrainerError>;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No active session for user {0}")]
    NoActiveSession(UserId),

    #[error("Active session limit of {limit} reached")]
    SessionLimit { limit: usize },

    #[error("Pose detector error: {0}")]
    Detector(String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] medifit_core::Error),
}

impl From<config::ConfigError> for TrainerError {
    fn from(err: config::ConfigError) -> Self {
        TrainerError::Config(err.to_string())
    }
}

impl TrainerError {
    /// Caller mistakes, as opposed to collaborator failures
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::NoActiveSession(_)
                | Self::Core(medifit_core::Error::InvalidArgument(_))
                | Self::Core(medifit_core::Error::MalformedFrame { .. })
        )
    }
}
