//! Trainer service configuration.

use serde::{Deserialize, Serialize};

use crate::error::TrainerResult;

const ENV_PREFIX: &str = "MEDIFIT";

/// Complete trainer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Settings handed to the pose detector
    pub pose: PoseConfig,

    /// Session registry limits
    pub sessions: SessionConfig,

    /// Exercise record persistence
    pub records: RecordConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Frames below this confidence count as detection misses
    pub min_detection_confidence: f32,

    pub min_tracking_confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum concurrently tracked users
    pub max_active_sessions: usize,

    /// Sessions without a frame for this long may be evicted (seconds)
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Maximum records returned by a history query
    pub history_limit: usize,

    /// Accuracy stored with every completed exercise (percent)
    pub default_accuracy: u8,

    /// Feedback text stored with every completed exercise
    pub completion_feedback: String,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_active_sessions: 1000,
            idle_timeout_secs: 30 * 60,
        }
    }
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            default_accuracy: 95,
            completion_feedback: "Session completed successfully".to_string(),
        }
    }
}

impl TrainerConfig {
    /// Load configuration from file, with `MEDIFIT_` environment overrides
    pub fn from_file(path: &str) -> TrainerResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(environment())
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> TrainerResult<Self> {
        let settings = config::Config::builder().add_source(environment()).build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TrainerResult<()> {
        let in_unit_range = |v: f32| (0.0..=1.0).contains(&v);
        if !in_unit_range(self.pose.min_detection_confidence)
            || !in_unit_range(self.pose.min_tracking_confidence)
        {
            return Err(crate::TrainerError::Config(
                "pose confidences must be within 0.0..=1.0".to_string(),
            ));
        }
        if self.sessions.max_active_sessions == 0 {
            return Err(crate::TrainerError::Config(
                "max_active_sessions must be positive".to_string(),
            ));
        }
        if self.sessions.idle_timeout_secs == 0 {
            return Err(crate::TrainerError::Config(
                "idle_timeout_secs must be positive".to_string(),
            ));
        }
        if self.records.default_accuracy > 100 {
            return Err(crate::TrainerError::Config(format!(
                "default_accuracy is a percentage, got {}",
                self.records.default_accuracy
            )));
        }
        Ok(())
    }
}

/// `MEDIFIT_SESSIONS__MAX_ACTIVE_SESSIONS=50` sets `sessions.max_active_sessions`
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
