//! Pose detector boundary.

use async_trait::async_trait;
use medifit_core::LandmarkFrame;

use crate::config::PoseConfig;
use crate::error::{TrainerError, TrainerResult};

/// Turns one captured image into pose landmarks.
///
/// `Ok(None)` means no person was found; `Err` is a detector failure and is
/// never treated as a miss.
#[async_trait]
pub trait PoseDetector: Send + Sync {
    /// Detector name/identifier
    fn name(&self) -> &str;

    async fn detect(&self, image: &[u8], config: &PoseConfig) -> TrainerResult<Option<LandmarkFrame>>;
}

/// Detector for clients that run pose estimation themselves and upload the
/// landmarks instead of pixels.
///
/// Accepts a JSON [`LandmarkFrame`] object or a flat JSON array of
/// 33 × (x, y) or 33 × (x, y, visibility) numbers in landmark-index order.
#[derive(Debug, Clone, Default)]
pub struct LandmarkPayloadDetector;

impl LandmarkPayloadDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(payload: &[u8]) -> TrainerResult<LandmarkFrame> {
        let value: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| TrainerError::InvalidArgument(format!("landmark payload is not JSON: {e}")))?;

        let frame = match value {
            serde_json::Value::Array(_) => {
                let flat: Vec<f64> = serde_json::from_value(value).map_err(medifit_core::Error::from)?;
                LandmarkFrame::from_flat(&flat)?
            }
            other => serde_json::from_value(other).map_err(medifit_core::Error::from)?,
        };

        Ok(frame)
    }
}

#[async_trait]
impl PoseDetector for LandmarkPayloadDetector {
    fn name(&self) -> &str {
        "landmark-payload"
    }

    async fn detect(&self, image: &[u8], _config: &PoseConfig) -> TrainerResult<Option<LandmarkFrame>> {
        let frame = Self::decode(image)?;
        Ok(frame.detected.then_some(frame))
    }
}
